use embedded_io_async::Write as AsyncWrite;
use heapless::String;
use tracing::{debug, warn};

use crate::config::AT_CMD_MAX_LEN;
use crate::error::CliError;
use crate::relay::ByteRelay;
use crate::session::CommandExecutor;
use crate::writer::ConsoleWriter;

/// Key codes the editor reacts to
pub const ESC_KEY: u8 = 0x1B;
pub const BACKSPACE_KEY: u8 = 0x08;
pub const DELETE_KEY: u8 = 0x7F;

/// What the editor wants done after consuming a byte
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditAction {
    /// Byte appended to the line; echo it
    Echo(u8),
    /// Last character removed; rub it out on the console
    Erase,
    /// A non-empty line is ready to be taken
    Submit,
    /// Operator pressed escape
    Exit,
    /// Nothing to do
    None,
}

/// Line editor for AT requests typed at the console
pub struct LineEditor<const BUF_SIZE: usize = AT_CMD_MAX_LEN> {
    line: String<BUF_SIZE>,
    echo: bool,
}

impl<const BUF_SIZE: usize> LineEditor<BUF_SIZE> {
    pub fn new(echo: bool) -> Self {
        Self {
            line: String::new(),
            echo,
        }
    }

    /// Line assembled so far
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Process a single byte of input
    pub fn feed(&mut self, byte: u8) -> EditAction {
        match byte {
            ESC_KEY => {
                self.line.clear();
                EditAction::Exit
            }
            BACKSPACE_KEY | DELETE_KEY => match self.line.pop() {
                Some(_) => EditAction::Erase,
                None => EditAction::None,
            },
            b'\r' | b'\n' => {
                if self.line.is_empty() {
                    EditAction::None
                } else {
                    EditAction::Submit
                }
            }
            0x20..=0x7E => match self.line.push(byte as char) {
                Ok(()) => EditAction::Echo(byte),
                // Full line: drop the byte
                Err(()) => EditAction::None,
            },
            _ => EditAction::None,
        }
    }

    /// Take the assembled line, leaving the editor empty
    pub fn take_line(&mut self) -> String<BUF_SIZE> {
        core::mem::take(&mut self.line)
    }

    /// Edit lines read from `input` until escape, executing each one.
    ///
    /// Executor failures are logged and the next line is read as usual.
    pub async fn run<W, X, const N: usize>(
        &mut self,
        input: &ByteRelay<N>,
        console: &ConsoleWriter<W>,
        executor: &mut X,
    ) -> Result<(), CliError>
    where
        W: AsyncWrite,
        X: CommandExecutor,
    {
        loop {
            let byte = input.pop().await;
            match self.feed(byte) {
                EditAction::Echo(ch) => {
                    if self.echo {
                        console.write_bytes(&[ch]).await?;
                    }
                }
                EditAction::Erase => {
                    if self.echo {
                        console.erase_char().await?;
                    }
                }
                EditAction::Submit => {
                    let line = self.take_line();
                    console.newline().await?;
                    debug!(cmd = line.as_str(), "executing AT request");
                    if let Err(err) = executor.exec_cmd(None, &line).await {
                        warn!(cmd = line.as_str(), error = ?err, "AT request failed");
                    }
                }
                EditAction::Exit => return Ok(()),
                EditAction::None => {}
            }
        }
    }
}
