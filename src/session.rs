//! Interfaces of the AT engine objects the CLI drives.
//!
//! The AT parser, the client link and the command executor live outside this
//! crate. The CLI only needs to swap a few of their slots and call into them.

use alloc::sync::Arc;

use heapless::String;

use crate::config::AT_END_MARK_LEN;
use crate::device::DeviceRef;
use crate::error::CliError;
use crate::relay::ByteSource;

/// Shared handle to a parser's byte source
pub type InputSource = Arc<dyn ByteSource>;

/// Line terminator of an AT parser
pub type EndMark = String<AT_END_MARK_LEN>;

/// Build an [`EndMark`] from a string, failing if it does not fit
pub fn end_mark(mark: &str) -> Result<EndMark, CliError> {
    EndMark::try_from(mark).map_err(|_| CliError::EndMarkTooLong)
}

/// The local AT command server.
///
/// Each `replace_*` installs a new value and hands back the one it replaced.
#[allow(async_fn_in_trait)]
pub trait AtServer {
    type Error: core::fmt::Debug;

    /// Swap the source the parser reads request bytes from
    fn replace_input(&mut self, input: InputSource) -> InputSource;

    /// Swap the device responses are written to
    fn replace_device(&mut self, device: DeviceRef) -> DeviceRef;

    /// Swap the request line terminator
    fn replace_end_mark(&mut self, mark: EndMark) -> EndMark;

    /// Run the parser until the operator leaves the session
    async fn run(&mut self) -> Result<(), Self::Error>;
}

/// An AT client attached to a remote modem
pub trait AtClient {
    /// Serial device the client talks through
    fn device(&self) -> DeviceRef;
}

/// Sends AT requests through a client
#[allow(async_fn_in_trait)]
pub trait CommandExecutor {
    type Error: core::fmt::Debug;

    /// Execute `cmd` on the client named `target`, or on the default client
    async fn exec_cmd(&mut self, target: Option<&str>, cmd: &str) -> Result<(), Self::Error>;
}

/// Access to the process-wide objects the `at` command works with
pub trait AtHost {
    type Server: AtServer;
    type Client: AtClient;

    /// Active console device, if any
    fn console_device(&self) -> Option<DeviceRef>;

    /// The AT server, if one has been initialized
    fn server(&mut self) -> Option<&mut Self::Server>;

    /// The default AT client, if one has been initialized
    fn client(&mut self) -> Option<&mut Self::Client>;
}
