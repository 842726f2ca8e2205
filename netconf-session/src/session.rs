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

//! The session core: owns the transport adapter, the negotiated version
//! and capability sets, peer metadata, the outgoing message-id counter,
//! and the send/receive API on complete messages.
//!
//! All mutable state lives behind one internal mutex so that
//! [`Session`] can be shared across threads (`Arc<Session>`) without the
//! caller having to wrap it themselves. The lock is held across
//! stamp-id -> serialize -> write on the send path and across the full
//! decode on the receive path, so both the msgid/send-framing pair and
//! the receive path are each atomic relative to other callers on the
//! same session; a single session still assumes strict request/response
//! ordering — there is no pipelining of multiple outstanding RPCs.

use std::sync::Mutex;

use netconf_wire::{CapabilitySet, Message, ProtocolVersion, ReplyKind};
use tracing::{instrument, warn};

use crate::{
    config::SessionConfig,
    error::NetconfError,
    framer,
    rpc,
    transport::Transport,
    xml,
};

/// The three states a session moves through.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Has a transport and a negotiated version; every operation valid.
    Active,
    /// `close` has sent `<close-session>` and is awaiting the best-effort
    /// reply.
    Closing,
    /// Terminal. No operation is valid.
    Closed,
}

struct SessionInner {
    transport: Box<dyn Transport + Send>,
    host: String,
    user: String,
    session_id: Option<String>,
    local_capabilities: CapabilitySet,
    peer_capabilities: CapabilitySet,
    version: ProtocolVersion,
    next_msgid: u64,
    decode_buf: Vec<u8>,
    state: SessionState,
    config: SessionConfig,
}

/// A live (or recently-live) NETCONF session over an already-negotiated
/// transport. Establishing the transport, authenticating, and running the
/// `<hello>` exchange are out of scope here — callers hand this
/// constructor an already-negotiated transport/version/capability
/// triple.
pub struct Session {
    inner: Mutex<SessionInner>,
}

impl Session {
    /// Builds a session from an already-negotiated transport. `next_msgid`
    /// always starts at 1.
    pub fn new(
        transport: Box<dyn Transport + Send>,
        host: impl Into<String>,
        user: impl Into<String>,
        version: ProtocolVersion,
        local_capabilities: CapabilitySet,
        peer_capabilities: CapabilitySet,
        peer_session_id: Option<String>,
    ) -> Session {
        Session::with_config(
            transport,
            host,
            user,
            version,
            local_capabilities,
            peer_capabilities,
            peer_session_id,
            SessionConfig::default(),
        )
    }

    /// As [`Session::new`], with an explicit [`SessionConfig`].
    pub fn with_config(
        transport: Box<dyn Transport + Send>,
        host: impl Into<String>,
        user: impl Into<String>,
        version: ProtocolVersion,
        local_capabilities: CapabilitySet,
        peer_capabilities: CapabilitySet,
        peer_session_id: Option<String>,
        config: SessionConfig,
    ) -> Session {
        let read_until_capacity = config.read_until_initial_capacity;
        Session {
            inner: Mutex::new(SessionInner {
                transport,
                host: host.into(),
                user: user.into(),
                session_id: peer_session_id,
                local_capabilities,
                peer_capabilities,
                version,
                next_msgid: 1,
                decode_buf: Vec::with_capacity(read_until_capacity),
                state: SessionState::Active,
                config,
            }),
        }
    }

    /// Duplicates `payload`, stamps a fresh `message-id` attribute if its
    /// root is `<rpc>`, attaches the version-appropriate base namespace,
    /// frames and writes it. Returns `Ok(id)` with the id that was
    /// stamped (0 if the root wasn't `<rpc>`, since no id applies).
    ///
    /// A transport or XML failure during the attempt is not propagated
    /// as an `Err` here — it's logged and the call returns `Ok(0)`,
    /// mirroring a C-style sentinel-return API so that a single failed
    /// send doesn't tear down the session by itself. `Err` is reserved
    /// for calling this on a session that isn't `Active`, which is a
    /// caller precondition violation rather than an operational failure.
    /// The counter only advances after a successful write, so a failed
    /// send never consumes an id.
    #[instrument(skip_all)]
    pub fn send_rpc(&self, payload: &[u8]) -> Result<u64, NetconfError> {
        let mut inner = self.inner.lock().expect("session mutex poisoned");
        if inner.state != SessionState::Active {
            return Err(NetconfError::invalid_argument("session is not Active"));
        }
        Ok(inner.send_rpc_locked(payload))
    }

    /// Reads one complete framed message, parses it, and classifies it.
    /// Fatal on any transport or framing error — there is no defined way
    /// to resynchronize after a framing mismatch, since the peer may
    /// have consumed partial bytes.
    #[instrument(skip_all)]
    pub fn recv_reply(&self) -> Result<(u64, Message), NetconfError> {
        let mut inner = self.inner.lock().expect("session mutex poisoned");
        if inner.state == SessionState::Closed {
            return Err(NetconfError::invalid_argument("session is Closed"));
        }
        inner.recv_reply_locked()
    }

    /// Best-effort NETCONF shutdown: if still `Active`, sends
    /// `<close-session>` and attempts to read one reply (discarded),
    /// then marks the session `Closed`. Every branch tolerates prior
    /// partial failure — `close` never itself returns an observable
    /// error.
    #[instrument(skip_all)]
    pub fn close(&self) -> Result<(), NetconfError> {
        let mut inner = self.inner.lock().expect("session mutex poisoned");
        if inner.state == SessionState::Closed {
            return Ok(());
        }
        inner.state = SessionState::Closing;

        let ns = inner.version.base_namespace();
        let id = inner.next_msgid;
        let close_msg = rpc::close_session_message(id, ns);
        match inner.write_framed(&close_msg.xml) {
            Ok(()) => {
                inner.next_msgid += 1;
                if let Err(e) = inner.recv_reply_locked() {
                    warn!(error = %e, "close: best-effort reply read failed, closing anyway");
                }
            }
            Err(e) => {
                warn!(error = %e, "close: best-effort close-session send failed, closing anyway");
            }
        }

        inner.state = SessionState::Closed;
        Ok(())
    }

    /// The peer-assigned session id, if the negotiation phase supplied
    /// one.
    pub fn session_id(&self) -> Option<String> {
        self.inner.lock().expect("session mutex poisoned").session_id.clone()
    }

    /// The negotiated protocol version. Immutable for the session's
    /// lifetime.
    pub fn version(&self) -> ProtocolVersion {
        self.inner.lock().expect("session mutex poisoned").version
    }

    /// This session's local capability advertisement.
    pub fn local_capabilities(&self) -> CapabilitySet {
        self.inner.lock().expect("session mutex poisoned").local_capabilities.clone()
    }

    /// The peer's advertised capability set.
    pub fn capabilities(&self) -> CapabilitySet {
        self.inner.lock().expect("session mutex poisoned").peer_capabilities.clone()
    }

    /// A pollable descriptor for the underlying transport, if it exposes
    /// one; `None` otherwise.
    pub fn event_fd(&self) -> Option<std::os::unix::io::RawFd> {
        self.inner.lock().expect("session mutex poisoned").transport.event_fd()
    }

    /// The current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.inner.lock().expect("session mutex poisoned").state
    }

    /// The peer hostname supplied at construction.
    pub fn host(&self) -> String {
        self.inner.lock().expect("session mutex poisoned").host.clone()
    }

    /// The username supplied at construction.
    pub fn user(&self) -> String {
        self.inner.lock().expect("session mutex poisoned").user.clone()
    }
}

impl SessionInner {
    fn send_rpc_locked(&mut self, payload: &[u8]) -> u64 {
        let root = match xml::root_name(payload) {
            Ok(root) => root,
            Err(e) => {
                warn!(error = %e, "send_rpc: could not read root element, send abandoned");
                return 0;
            }
        };
        let stamp_id = root == "rpc";
        let id = self.next_msgid;
        let namespace = self.version.base_namespace();

        let stamped = match xml::stamp_message_id_and_namespace(payload, id, namespace, stamp_id) {
            Ok(stamped) => stamped,
            Err(e) => {
                warn!(error = %e, "send_rpc: could not stamp id/namespace, send abandoned");
                return 0;
            }
        };

        match self.write_framed(&stamped) {
            Ok(()) if stamp_id => {
                self.next_msgid += 1;
                id
            }
            Ok(()) => 0,
            Err(e) => {
                warn!(error = %e, "send_rpc: transport write failed, counter left unchanged");
                0
            }
        }
    }

    fn write_framed(&mut self, xml: &[u8]) -> Result<(), NetconfError> {
        let framed = match self.version {
            ProtocolVersion::V1_0 => framer::encode_v1_0(xml),
            ProtocolVersion::V1_1 => framer::encode_v1_1(xml),
        };
        self.transport.write_all(&framed)
    }

    fn recv_reply_locked(&mut self) -> Result<(u64, Message), NetconfError> {
        let decoded = match self.version {
            ProtocolVersion::V1_0 => framer::decode_v1_0(&mut *self.transport, &mut self.decode_buf)?,
            ProtocolVersion::V1_1 => framer::decode_v1_1(&mut *self.transport, &mut self.decode_buf)?,
        };

        let root = xml::root_name(&decoded)?;
        let is_rpc_reply = root == "rpc-reply";

        let msgid = match xml::get_attr(&decoded, "message-id")? {
            Some(raw) => raw.parse::<u64>().unwrap_or(0),
            None => {
                if is_rpc_reply {
                    warn!("recv_reply: missing message-id on <rpc-reply>");
                }
                0
            }
        };

        let kind = if is_rpc_reply {
            match xml::first_child_name(&decoded)?.as_deref() {
                Some("ok") => ReplyKind::Ok,
                Some("rpc-error") => ReplyKind::Error,
                Some("data") => ReplyKind::Data,
                other => {
                    warn!(child = ?other, "recv_reply: unrecognized <rpc-reply> child, classifying Unknown");
                    ReplyKind::Unknown
                }
            }
        } else {
            ReplyKind::Unknown
        };

        Ok((msgid, Message::reply(decoded, msgid, kind)))
    }
}
