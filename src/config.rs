/// Capacity of every receive relay, in bytes.
pub const AT_CLI_FIFO_SIZE: usize = 256;

/// Longest command line the editor will assemble.
pub const AT_CMD_MAX_LEN: usize = 80;

/// Longest line terminator a parser can carry.
pub const AT_END_MARK_LEN: usize = 4;

/// Runtime configuration for the `at` command
#[derive(Clone, Copy, Debug)]
pub struct CliConfig {
    /// Echo typed characters back to the console
    pub echo: bool,
    /// Line terminator installed on the server for the length of a session
    pub session_end_mark: &'static str,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            echo: true,
            session_end_mark: "\r",
        }
    }
}
