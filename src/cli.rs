//! The `at <server|client>` console command.

use embedded_io_async::Write as AsyncWrite;
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::error::CliError;
use crate::parser::{CommandParser, Mode};
use crate::session::{AtHost, CommandExecutor};
use crate::writer::ConsoleWriter;

/// Interactive AT debugging console
pub struct AtCli<H, W, X>
where
    H: AtHost,
    W: AsyncWrite,
    X: CommandExecutor,
{
    host: H,
    console: ConsoleWriter<W>,
    executor: X,
    config: CliConfig,
}

impl<H, W, X> AtCli<H, W, X>
where
    H: AtHost,
    W: AsyncWrite,
    X: CommandExecutor,
{
    pub fn new(host: H, console: W, executor: X, config: CliConfig) -> Self {
        Self {
            host,
            console: ConsoleWriter::new(console),
            executor,
            config,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn executor(&self) -> &X {
        &self.executor
    }

    /// Run one `at` command line, reporting any failure on the console
    pub async fn at(&mut self, line: &str) {
        if let Err(err) = self.dispatch(line).await {
            warn!(error = %err, "at command failed");
            if let Err(report) = self.console.write_fmt(format_args!("{}\r\n", err)).await {
                warn!(error = %report, "could not report failure");
            }
        }
    }

    /// Run one `at` command line and return the mode of the finished session
    pub async fn dispatch(&mut self, line: &str) -> Result<Mode, CliError> {
        let mode = CommandParser::parse_mode(line).map_err(|_| CliError::Usage)?;
        match mode {
            Mode::Server => self.server_session().await?,
            Mode::Client => self.client_session().await?,
        }
        Ok(mode)
    }

    #[cfg(feature = "server")]
    async fn server_session(&mut self) -> Result<(), CliError> {
        use crate::config::AT_CLI_FIFO_SIZE;
        use crate::redirect::{DeviceRedirect, ParserRedirect};
        use crate::relay::ByteRelay;
        use crate::session::{end_mark, AtServer};
        use alloc::sync::Arc;
        use tracing::debug;

        let Self {
            host,
            console,
            config,
            ..
        } = self;

        let console_dev = host.console_device();
        let server = host
            .server()
            .ok_or(CliError::NotInitialized(Mode::Server))?;
        let console_dev = console_dev.ok_or(CliError::NoConsole)?;
        let mark = end_mark(config.session_end_mark)?;

        let relay = Arc::new(ByteRelay::<AT_CLI_FIFO_SIZE>::try_new()?);
        let _console_rx = DeviceRedirect::install(console_dev.clone(), Some(relay.clone()))?;
        let mut parser = ParserRedirect::install(server, relay.clone(), console_dev, mark);

        console
            .writeln("======== Welcome to using AT command server cli ========")
            .await?;
        console
            .writeln("Input your at command for test server. Press 'ESC' to exit.")
            .await?;
        info!("AT server cli session started");

        let result = parser.run().await;

        debug!(overruns = relay.overruns(), "console relay closed");
        info!("AT server cli session ended");
        result.map_err(|err| {
            warn!(error = ?err, "AT server parser failed");
            CliError::SessionFailed(Mode::Server)
        })
    }

    #[cfg(not(feature = "server"))]
    async fn server_session(&mut self) -> Result<(), CliError> {
        Err(CliError::UnsupportedMode(Mode::Server))
    }

    #[cfg(feature = "client")]
    async fn client_session(&mut self) -> Result<(), CliError> {
        use crate::config::{AT_CLI_FIFO_SIZE, AT_CMD_MAX_LEN};
        use crate::editor::LineEditor;
        use crate::pump::{RelayPump, StopSignal};
        use crate::redirect::DeviceRedirect;
        use crate::relay::ByteRelay;
        use crate::session::AtClient;
        use alloc::sync::Arc;
        use embassy_futures::join::join;
        use tracing::debug;

        let Self {
            host,
            console,
            executor,
            config,
        } = self;

        let device = host
            .client()
            .ok_or(CliError::NotInitialized(Mode::Client))?
            .device();
        let console_dev = host.console_device().ok_or(CliError::NoConsole)?;

        let console_relay = Arc::new(ByteRelay::<AT_CLI_FIFO_SIZE>::try_new()?);
        let client_relay = Arc::new(ByteRelay::<AT_CLI_FIFO_SIZE>::try_new()?);
        let _console_rx = DeviceRedirect::install(console_dev, Some(console_relay.clone()))?;
        let _client_rx = DeviceRedirect::install(device.clone(), Some(client_relay.clone()))?;

        console
            .writeln("======== Welcome to using AT command client cli ========")
            .await?;
        console
            .write_fmt(format_args!(
                "Cli will forward your command to server port({}). Press 'ESC' to exit.\r\n",
                device.name()
            ))
            .await?;
        info!(port = device.name(), "AT client cli session started");

        let console = &*console;
        let stop = StopSignal::new();
        let mut editor = LineEditor::<AT_CMD_MAX_LEN>::new(config.echo);

        let (edited, pumped) = join(
            async {
                let result = editor.run(&*console_relay, console, executor).await;
                stop.signal(());
                result
            },
            RelayPump::new(&*client_relay).run(console, &stop),
        )
        .await;

        debug!(
            console_overruns = console_relay.overruns(),
            client_overruns = client_relay.overruns(),
            "relays closed"
        );
        edited?;
        let forwarded = pumped?;
        info!(forwarded, "AT client cli session ended");
        Ok(())
    }

    #[cfg(not(feature = "client"))]
    async fn client_session(&mut self) -> Result<(), CliError> {
        Err(CliError::UnsupportedMode(Mode::Client))
    }
}
