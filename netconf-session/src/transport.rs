// Copyright 2026 NETCONF session core contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The transport adapter: a thin abstraction exposing
//! blocking-looking `read`/`write` primitives over an underlying
//! non-blocking byte channel, hiding retryable "would-block" signals and
//! detecting end-of-stream.
//!
//! Authentication, channel setup, and key exchange are out of scope here
//! — a [`Transport`] is handed
//! to [`crate::session::Session`] already connected.

use std::{
    io,
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use crate::{config::SessionConfig, error::NetconfError};

/// The result of one `read_into` call.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// At least one byte was read.
    Read(usize),
    /// The peer closed the stream before a requested byte arrived.
    Eof,
}

/// The transport adapter contract. Implementors normalise whatever
/// "would-block"/EOF signalling their substrate uses into this shape;
/// every read and write is a potential suspension point but must never
/// spin without the cooperative sleep below.
pub trait Transport {
    /// Blocks until at least one byte is available, retrying
    /// transparently on transient would-block conditions. Never returns
    /// `Ok(ReadOutcome::Read(0))`.
    fn read_into(&mut self, buf: &mut [u8]) -> Result<ReadOutcome, NetconfError>;

    /// Writes the entire buffer, retrying on short writes.
    fn write_all(&mut self, buf: &[u8]) -> Result<(), NetconfError>;

    /// A pollable descriptor for this transport, if one exists. Used by
    /// [`crate::session::Session::event_fd`]. Most transports have no
    /// natural descriptor to expose and return `None`.
    fn event_fd(&self) -> Option<std::os::unix::io::RawFd> {
        None
    }
}

/// The minimal slice of an SSH channel's native API the adapter needs:
/// a read that can signal "try again", a write, and an explicit
/// "is this EOF" predicate (because a channel read of 0 is ambiguous
/// between "nothing right now" and "the peer is done").
pub trait SshChannel {
    /// `Ok(n)` for `n` bytes read (`n == 0` means "nothing available
    /// right now, not EOF"), `Err` for a hard failure.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    /// True if this would-block-free zero-read means end-of-stream.
    fn eof(&self) -> bool;
    /// True if the last read's `io::Error` represents a transient
    /// "again" condition rather than a hard failure.
    fn is_again(&self, err: &io::Error) -> bool;
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
    fn socket_fd(&self) -> Option<std::os::unix::io::RawFd> {
        None
    }
}

/// Adapts an [`SshChannel`]-shaped substrate to the [`Transport`]
/// contract.
pub struct SshChannelTransport<C> {
    channel: C,
    retry_sleep: Duration,
}

impl<C: SshChannel> SshChannelTransport<C> {
    pub fn new(channel: C, config: &SessionConfig) -> SshChannelTransport<C> {
        SshChannelTransport { channel, retry_sleep: config.read_retry_sleep }
    }
}

impl<C: SshChannel> Transport for SshChannelTransport<C> {
    fn read_into(&mut self, buf: &mut [u8]) -> Result<ReadOutcome, NetconfError> {
        loop {
            match self.channel.read(buf) {
                Ok(0) => {
                    if self.channel.eof() {
                        return Ok(ReadOutcome::Eof);
                    }
                    thread::sleep(self.retry_sleep);
                }
                Ok(n) => return Ok(ReadOutcome::Read(n)),
                Err(e) if self.channel.is_again(&e) => {
                    thread::sleep(self.retry_sleep);
                }
                Err(e) => return Err(NetconfError::Transport(e)),
            }
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<(), NetconfError> {
        let mut written = 0;
        while written < buf.len() {
            match self.channel.write(&buf[written..]) {
                Ok(n) => written += n,
                Err(e) if self.channel.is_again(&e) => {
                    thread::sleep(self.retry_sleep);
                }
                Err(e) => return Err(NetconfError::Transport(e)),
            }
        }
        Ok(())
    }

    fn event_fd(&self) -> Option<std::os::unix::io::RawFd> {
        self.channel.socket_fd()
    }
}

/// Adapts a raw byte-stream pair (file descriptors, a `TcpStream`, ...)
/// to the [`Transport`] contract, normalising `WouldBlock` the way the
/// source normalises `EAGAIN` on a raw fd read/write.
pub struct RawFdTransport<S> {
    stream: S,
    retry_sleep: Duration,
}

impl<S: io::Read + io::Write> RawFdTransport<S> {
    pub fn new(stream: S, config: &SessionConfig) -> RawFdTransport<S> {
        RawFdTransport { stream, retry_sleep: config.read_retry_sleep }
    }
}

impl<S: io::Read + io::Write> Transport for RawFdTransport<S> {
    fn read_into(&mut self, buf: &mut [u8]) -> Result<ReadOutcome, NetconfError> {
        loop {
            match self.stream.read(buf) {
                Ok(0) => return Ok(ReadOutcome::Eof),
                Ok(n) => return Ok(ReadOutcome::Read(n)),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(self.retry_sleep);
                }
                Err(e) => return Err(NetconfError::Transport(e)),
            }
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<(), NetconfError> {
        let mut written = 0;
        while written < buf.len() {
            match self.stream.write(&buf[written..]) {
                Ok(0) => {
                    return Err(NetconfError::Transport(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "write returned 0 before the whole buffer was written",
                    )))
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(self.retry_sleep);
                }
                Err(e) => return Err(NetconfError::Transport(e)),
            }
        }
        Ok(())
    }
}

/// An in-memory duplex byte pipe used by the end-to-end test scenarios so
/// they can exercise the session core without a real socket or SSH
/// dependency. Reads pull from an inbound queue a caller fills ahead of
/// time (or from another thread); writes push onto an outbound `Vec<u8>`
/// the test can inspect.
#[cfg(any(test, feature = "test-util"))]
pub struct MemoryTransport {
    inbound: std::collections::VecDeque<u8>,
    outbound: Arc<Mutex<Vec<u8>>>,
    eof_after_drain: bool,
    fail_nth_write: Option<usize>,
    write_count: usize,
}

#[cfg(any(test, feature = "test-util"))]
impl MemoryTransport {
    pub fn new() -> MemoryTransport {
        MemoryTransport {
            inbound: std::collections::VecDeque::new(),
            outbound: Arc::new(Mutex::new(Vec::new())),
            eof_after_drain: false,
            fail_nth_write: None,
            write_count: 0,
        }
    }

    pub fn push_inbound(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes.iter().copied());
    }

    pub fn set_eof_after_drain(&mut self, eof: bool) {
        self.eof_after_drain = eof;
    }

    /// Causes the Nth `write_all` call (1-indexed) to fail instead of
    /// succeeding, used by id-rollback tests.
    pub fn fail_nth_write(&mut self, n: usize) {
        self.fail_nth_write = Some(n);
    }

    /// A shared handle onto the bytes written so far. Grab this before
    /// the transport is moved into a `Session` — the session takes
    /// ownership of the transport itself and never hands it back.
    pub fn outbound_handle(&self) -> Arc<Mutex<Vec<u8>>> {
        self.outbound.clone()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Transport for MemoryTransport {
    fn read_into(&mut self, buf: &mut [u8]) -> Result<ReadOutcome, NetconfError> {
        if self.inbound.is_empty() {
            if self.eof_after_drain {
                return Ok(ReadOutcome::Eof);
            }
            return Err(NetconfError::Transport(io::Error::new(
                io::ErrorKind::WouldBlock,
                "no more inbound test bytes queued",
            )));
        }
        let mut n = 0;
        for slot in buf.iter_mut() {
            match self.inbound.pop_front() {
                Some(b) => {
                    *slot = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(ReadOutcome::Read(n))
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<(), NetconfError> {
        self.write_count += 1;
        if self.fail_nth_write == Some(self.write_count) {
            return Err(NetconfError::Transport(io::Error::new(
                io::ErrorKind::Other,
                "simulated write failure",
            )));
        }
        self.outbound.lock().unwrap().extend_from_slice(buf);
        Ok(())
    }
}
