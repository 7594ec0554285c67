//! Interrupt-safe byte relay.
//!
//! A [`ByteRelay`] bridges a producer running in interrupt context (the
//! device's receive hook) to a single consumer task. The producer never
//! blocks: when the ring is full the oldest byte is overwritten. The consumer
//! suspends in [`ByteRelay::pop`] until a byte is available.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::future::poll_fn;
use core::task::{Context, Poll};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::waitqueue::AtomicWaker;

use crate::config::AT_CLI_FIFO_SIZE;
use crate::device::{Device, RxIndicate};
use crate::error::CliError;

/// Pollable source of input bytes, as consumed by an AT parser
pub trait ByteSource: Send + Sync {
    /// Poll for the next byte
    fn poll_byte(&self, cx: &mut Context<'_>) -> Poll<u8>;
}

/// Wait for the next byte from `source`
pub async fn read_byte(source: &dyn ByteSource) -> u8 {
    poll_fn(|cx| source.poll_byte(cx)).await
}

/// Fixed-size ring that overwrites its oldest byte when full
struct Ring {
    buf: Box<[u8]>,
    head: usize,
    len: usize,
    overruns: usize,
}

impl Ring {
    fn push_force(&mut self, byte: u8) {
        let cap = self.buf.len();
        let tail = (self.head + self.len) % cap;
        self.buf[tail] = byte;
        if self.len == cap {
            // tail == head here: the oldest byte was just replaced
            self.head = (self.head + 1) % cap;
            self.overruns = self.overruns.wrapping_add(1);
        } else {
            self.len += 1;
        }
    }

    fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        let byte = self.buf[self.head];
        self.head = (self.head + 1) % self.buf.len();
        self.len -= 1;
        Some(byte)
    }
}

/// Single-producer, single-consumer byte relay with `N` bytes of storage
pub struct ByteRelay<const N: usize = AT_CLI_FIFO_SIZE> {
    ring: Mutex<CriticalSectionRawMutex, RefCell<Ring>>,
    waker: AtomicWaker,
}

impl<const N: usize> ByteRelay<N> {
    const NONZERO: () = assert!(N > 0, "Relay capacity must be non-zero");

    /// Allocate a relay.
    ///
    /// Fails with [`CliError::ResourceExhausted`] if the ring storage cannot
    /// be allocated.
    pub fn try_new() -> Result<Self, CliError> {
        #[allow(clippy::let_unit_value)]
        let () = Self::NONZERO;

        let mut buf = Vec::new();
        buf.try_reserve_exact(N)
            .map_err(|_| CliError::ResourceExhausted)?;
        buf.resize(N, 0u8);

        Ok(Self {
            ring: Mutex::new(RefCell::new(Ring {
                buf: buf.into_boxed_slice(),
                head: 0,
                len: 0,
                overruns: 0,
            })),
            waker: AtomicWaker::new(),
        })
    }

    /// Queue a byte. Safe to call from interrupt context.
    ///
    /// Never blocks and never fails; a full relay drops its oldest byte.
    #[inline]
    pub fn push(&self, byte: u8) {
        self.ring.lock(|ring| ring.borrow_mut().push_force(byte));
        self.waker.wake();
    }

    /// Take the oldest byte without waiting
    pub fn try_pop(&self) -> Option<u8> {
        self.ring.lock(|ring| ring.borrow_mut().pop())
    }

    /// Poll for the oldest byte, registering the waker when empty
    pub fn poll_pop(&self, cx: &mut Context<'_>) -> Poll<u8> {
        if let Some(byte) = self.try_pop() {
            return Poll::Ready(byte);
        }
        self.waker.register(cx.waker());
        // A push may have landed before the waker was registered
        match self.try_pop() {
            Some(byte) => Poll::Ready(byte),
            None => Poll::Pending,
        }
    }

    /// Wait for the oldest byte.
    ///
    /// Only the relay's single consumer may call this. Cancel-safe: a byte is
    /// only removed when the future completes.
    pub async fn pop(&self) -> u8 {
        poll_fn(|cx| self.poll_pop(cx)).await
    }

    /// Bytes currently queued
    pub fn len(&self) -> usize {
        self.ring.lock(|ring| ring.borrow().len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of bytes overwritten because the relay was full
    pub fn overruns(&self) -> usize {
        self.ring.lock(|ring| ring.borrow().overruns)
    }
}

impl<const N: usize> RxIndicate for ByteRelay<N> {
    fn indicate(&self, device: &dyn Device, size: usize) {
        let mut ch = [0u8; 1];
        for _ in 0..size {
            if device.read(0, &mut ch) == 1 {
                self.push(ch[0]);
            }
        }
    }

    fn is_relay(&self) -> bool {
        true
    }
}

impl<const N: usize> ByteSource for ByteRelay<N> {
    fn poll_byte(&self, cx: &mut Context<'_>) -> Poll<u8> {
        self.poll_pop(cx)
    }
}
