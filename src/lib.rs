#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]

//! Interactive AT command console for `no_std` systems.
//!
//! The `at` command borrows the console's receive path (and, in client mode,
//! the AT client's serial port) for the length of a debugging session and
//! hands both back untouched when the operator presses escape.

extern crate alloc;

pub mod cli;
pub mod config;
pub mod device;
pub mod editor;
pub mod error;
pub mod parser;
pub mod pump;
pub mod redirect;
pub mod relay;
pub mod session;
pub mod writer;

#[cfg(test)]
mod testing;

pub use cli::AtCli;
pub use config::CliConfig;
pub use device::{Device, DeviceRef, RxHook, RxIndicate};
pub use editor::LineEditor;
pub use error::CliError;
pub use parser::Mode;
pub use relay::{ByteRelay, ByteSource};
pub use session::{AtClient, AtHost, AtServer, CommandExecutor};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cli::AtCli;
    pub use crate::config::CliConfig;
    pub use crate::device::{Device, DeviceRef, RxHook, RxIndicate};
    pub use crate::relay::{read_byte, ByteRelay, ByteSource};
    pub use crate::session::{AtClient, AtHost, AtServer, CommandExecutor, EndMark, InputSource};
}
