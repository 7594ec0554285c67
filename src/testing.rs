//! Test doubles for the collaborators the CLI drives.

use std::collections::VecDeque;
use std::string::{String, ToString};
use std::sync::{Arc, Mutex};
use std::vec::Vec;

use core::convert::Infallible;

use embassy_futures::yield_now;
use embedded_io_async::{ErrorType, Write};

use crate::device::{Device, DeviceRef, RxHook, RxIndicate};
use crate::editor::ESC_KEY;
use crate::relay::{read_byte, ByteRelay};
use crate::session::{end_mark, AtClient, AtHost, AtServer, CommandExecutor, EndMark, InputSource};

/// Serial device fed by the test instead of hardware
pub struct MockDevice {
    name: &'static str,
    rx: Mutex<VecDeque<u8>>,
    hook: Mutex<RxHook>,
}

impl MockDevice {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            rx: Mutex::new(VecDeque::new()),
            hook: Mutex::new(None),
        })
    }

    /// Bytes arrive on the wire; notify the installed hook like an ISR would
    pub fn receive(&self, bytes: &[u8]) {
        self.rx.lock().unwrap().extend(bytes.iter().copied());
        let hook = self.rx_indicate();
        if let Some(hook) = hook {
            hook.indicate(self, bytes.len());
        }
    }

    pub fn is_redirected(&self) -> bool {
        self.hook
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|h| h.is_relay())
    }

    /// Wait until an AT CLI session owns the device, then deliver `bytes`
    pub async fn receive_when_redirected(&self, bytes: &[u8]) {
        while !self.is_redirected() {
            yield_now().await;
        }
        self.receive(bytes);
    }
}

impl Device for MockDevice {
    fn name(&self) -> &str {
        self.name
    }

    fn read(&self, _offset: usize, buf: &mut [u8]) -> usize {
        let mut rx = self.rx.lock().unwrap();
        let mut n = 0;
        while n < buf.len() {
            match rx.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }

    fn rx_indicate(&self) -> RxHook {
        self.hook.lock().unwrap().clone()
    }

    fn set_rx_indicate(&self, hook: RxHook) -> RxHook {
        core::mem::replace(&mut *self.hook.lock().unwrap(), hook)
    }
}

/// Hook standing in for a driver's own receive callback
pub struct NoopHook;

impl RxIndicate for NoopHook {
    fn indicate(&self, _device: &dyn Device, _size: usize) {}
}

/// In-memory console output
#[derive(Clone, Default)]
pub struct ConsoleSink {
    out: Arc<Mutex<Vec<u8>>>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.out.lock().unwrap()).into_owned()
    }
}

impl ErrorType for ConsoleSink {
    type Error = Infallible;
}

impl Write for ConsoleSink {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.out.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
}

#[derive(Debug)]
pub struct MockFailure;

/// Records every request; fails on the literal request `FAIL`
#[derive(Default)]
pub struct MockExecutor {
    commands: Vec<String>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.clone()
    }
}

impl CommandExecutor for MockExecutor {
    type Error = MockFailure;

    async fn exec_cmd(&mut self, target: Option<&str>, cmd: &str) -> Result<(), Self::Error> {
        assert!(target.is_none());
        self.commands.push(cmd.to_string());
        if cmd == "FAIL" {
            Err(MockFailure)
        } else {
            Ok(())
        }
    }
}

/// AT server parser splitting its input on the current end mark
pub struct MockServer {
    input: InputSource,
    device: DeviceRef,
    end_mark: EndMark,
    pub requests: Vec<String>,
    pub seen_device: Option<String>,
    pub seen_end_mark: Option<EndMark>,
    pub fail_after_first: bool,
}

impl MockServer {
    pub fn new() -> Self {
        let idle: Arc<ByteRelay<8>> = Arc::new(ByteRelay::try_new().unwrap());
        Self {
            input: idle,
            device: MockDevice::new("uart0"),
            end_mark: end_mark("\r\n").unwrap(),
            requests: Vec::new(),
            seen_device: None,
            seen_end_mark: None,
            fail_after_first: false,
        }
    }

    pub fn wiring(&self) -> (InputSource, DeviceRef, EndMark) {
        (self.input.clone(), self.device.clone(), self.end_mark.clone())
    }
}

impl AtServer for MockServer {
    type Error = MockFailure;

    fn replace_input(&mut self, input: InputSource) -> InputSource {
        core::mem::replace(&mut self.input, input)
    }

    fn replace_device(&mut self, device: DeviceRef) -> DeviceRef {
        core::mem::replace(&mut self.device, device)
    }

    fn replace_end_mark(&mut self, mark: EndMark) -> EndMark {
        core::mem::replace(&mut self.end_mark, mark)
    }

    async fn run(&mut self) -> Result<(), Self::Error> {
        self.seen_device = Some(self.device.name().to_string());
        self.seen_end_mark = Some(self.end_mark.clone());

        let mut line = String::new();
        loop {
            let byte = read_byte(&*self.input).await;
            if byte == ESC_KEY {
                return Ok(());
            }
            line.push(byte as char);
            if let Some(request) = line.strip_suffix(self.end_mark.as_str()) {
                self.requests.push(request.to_string());
                line.clear();
                if self.fail_after_first {
                    return Err(MockFailure);
                }
            }
        }
    }
}

pub struct MockClient {
    pub device: Arc<MockDevice>,
}

impl AtClient for MockClient {
    fn device(&self) -> DeviceRef {
        self.device.clone()
    }
}

#[derive(Default)]
pub struct MockHost {
    pub console: Option<Arc<MockDevice>>,
    pub server: Option<MockServer>,
    pub client: Option<MockClient>,
}

impl AtHost for MockHost {
    type Server = MockServer;
    type Client = MockClient;

    fn console_device(&self) -> Option<DeviceRef> {
        self.console.clone().map(|d| d as DeviceRef)
    }

    fn server(&mut self) -> Option<&mut MockServer> {
        self.server.as_mut()
    }

    fn client(&mut self) -> Option<&mut MockClient> {
        self.client.as_mut()
    }
}
