//! Scoped receive redirection.
//!
//! Both guards snapshot what they replace on construction and put it back in
//! `Drop`, so the original wiring returns on every exit path, including a
//! dropped session future or an unwinding panic.

use core::ops::{Deref, DerefMut};

use tracing::debug;

use crate::device::{DeviceRef, RxHook};
use crate::error::CliError;
use crate::session::{AtServer, EndMark, InputSource};

/// Routes a device's receive notifications to a new hook while alive
pub struct DeviceRedirect {
    device: DeviceRef,
    previous: RxHook,
}

impl DeviceRedirect {
    /// Install `hook` on `device`, remembering the hook it replaces.
    ///
    /// Refuses with [`CliError::AlreadyRedirected`] if another session's relay
    /// is installed; nothing is changed in that case.
    pub fn install(device: DeviceRef, hook: RxHook) -> Result<Self, CliError> {
        let previous = critical_section::with(|_| {
            let current = device.rx_indicate();
            if current.as_ref().is_some_and(|h| h.is_relay()) {
                return Err(CliError::AlreadyRedirected);
            }
            Ok(device.set_rx_indicate(hook))
        })?;

        debug!(device = device.name(), "receive hook redirected");
        Ok(Self { device, previous })
    }
}

impl Drop for DeviceRedirect {
    fn drop(&mut self) {
        let previous = self.previous.take();
        critical_section::with(|_| {
            self.device.set_rx_indicate(previous);
        });
        debug!(device = self.device.name(), "receive hook restored");
    }
}

struct ParserSnapshot {
    input: InputSource,
    device: DeviceRef,
    end_mark: EndMark,
}

/// Points a server's input, output and terminator at the console while alive.
///
/// Derefs to the server so the session body can run it.
pub struct ParserRedirect<'a, S: AtServer> {
    server: &'a mut S,
    saved: Option<ParserSnapshot>,
}

impl<'a, S: AtServer> ParserRedirect<'a, S> {
    pub fn install(
        server: &'a mut S,
        input: InputSource,
        device: DeviceRef,
        end_mark: EndMark,
    ) -> Self {
        let saved = ParserSnapshot {
            input: server.replace_input(input),
            device: server.replace_device(device),
            end_mark: server.replace_end_mark(end_mark),
        };
        debug!("server parser redirected");
        Self {
            server,
            saved: Some(saved),
        }
    }
}

impl<S: AtServer> Deref for ParserRedirect<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.server
    }
}

impl<S: AtServer> DerefMut for ParserRedirect<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.server
    }
}

impl<S: AtServer> Drop for ParserRedirect<'_, S> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.server.replace_input(saved.input);
            self.server.replace_device(saved.device);
            self.server.replace_end_mark(saved.end_mark);
            debug!("server parser restored");
        }
    }
}
