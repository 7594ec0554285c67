use core::fmt;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embedded_io_async::Write as AsyncWrite;

use crate::error::CliError;

/// Console output shared by the line editor and the relay pump
pub struct ConsoleWriter<W: AsyncWrite> {
    writer: Mutex<CriticalSectionRawMutex, W>,
}

impl<W: AsyncWrite> ConsoleWriter<W> {
    /// Create a new console writer
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Write raw bytes
    pub async fn write_bytes(&self, bytes: &[u8]) -> Result<(), CliError> {
        let mut writer = self.writer.lock().await;
        writer.write_all(bytes).await.map_err(CliError::console)?;
        writer.flush().await.map_err(CliError::console)
    }

    /// Write a string
    pub async fn write_str(&self, s: &str) -> Result<(), CliError> {
        self.write_bytes(s.as_bytes()).await
    }

    /// Write a formatted string
    pub async fn write_fmt(&self, args: fmt::Arguments<'_>) -> Result<(), CliError> {
        // No allocator on the output path; format into a bounded buffer
        use heapless::String;
        let mut buffer = String::<256>::new();
        // Output longer than the buffer is truncated
        let _ = fmt::write(&mut buffer, args);
        self.write_str(&buffer).await
    }

    /// Write a line (adds \r\n)
    pub async fn writeln(&self, s: &str) -> Result<(), CliError> {
        let mut writer = self.writer.lock().await;
        writer.write_all(s.as_bytes()).await.map_err(CliError::console)?;
        writer.write_all(b"\r\n").await.map_err(CliError::console)?;
        writer.flush().await.map_err(CliError::console)
    }

    pub async fn newline(&self) -> Result<(), CliError> {
        self.write_bytes(b"\r\n").await
    }

    /// Rub out the character left of the cursor
    pub async fn erase_char(&self) -> Result<(), CliError> {
        self.write_bytes(b"\x08 \x08").await
    }
}
