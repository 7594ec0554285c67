use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_io_async::Write as AsyncWrite;

use crate::error::CliError;
use crate::relay::ByteRelay;
use crate::writer::ConsoleWriter;

/// Stop request for a [`RelayPump`]
pub type StopSignal = Signal<CriticalSectionRawMutex, ()>;

/// Echoes bytes arriving from a remote AT peer to the console
pub struct RelayPump<'a, const N: usize> {
    relay: &'a ByteRelay<N>,
}

impl<'a, const N: usize> RelayPump<'a, N> {
    pub fn new(relay: &'a ByteRelay<N>) -> Self {
        Self { relay }
    }

    /// Forward bytes until `stop` is signalled, returning how many were sent.
    ///
    /// Bytes still queued when the stop arrives stay in the relay.
    pub async fn run<W: AsyncWrite>(
        &self,
        console: &ConsoleWriter<W>,
        stop: &StopSignal,
    ) -> Result<usize, CliError> {
        let mut forwarded = 0;
        loop {
            match select(stop.wait(), self.relay.pop()).await {
                Either::First(()) => return Ok(forwarded),
                Either::Second(byte) => {
                    console.write_bytes(&[byte]).await?;
                    forwarded += 1;
                }
            }
        }
    }
}
