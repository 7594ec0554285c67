use embedded_io_async::ErrorKind;
use thiserror::Error;

use crate::parser::Mode;

/// Errors reported by the `at` command.
///
/// The `Display` text is what the operator sees on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CliError {
    #[error("Please input 'at <server|client>'")]
    Usage,
    #[error("Not support AT {0}, please check your configure!")]
    UnsupportedMode(Mode),
    #[error("AT {0} not initialized")]
    NotInitialized(Mode),
    #[error("No console device")]
    NoConsole,
    #[error("No mem for AT cli")]
    ResourceExhausted,
    #[error("Device is already redirected by another AT cli session")]
    AlreadyRedirected,
    #[error("End mark does not fit the parser")]
    EndMarkTooLong,
    #[error("AT {0} session failed")]
    SessionFailed(Mode),
    #[error("Console write failed: {0:?}")]
    Console(ErrorKind),
}

impl CliError {
    /// Map a console writer error into a `CliError`
    pub fn console<E: embedded_io_async::Error>(err: E) -> Self {
        CliError::Console(err.kind())
    }
}
