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

//! The session and framing core of a NETCONF client: transport
//! adaptation, NETCONF 1.0/1.1 message framing, capability negotiation,
//! and request/reply message-id correlation.
//!
//! This crate does not dial anything, run `<hello>` exchanges, build
//! specific RPC bodies beyond `<close-session>`, or parse XML beyond the
//! handful of fields [`session::Session`] needs to classify a reply.
//! Those are the job of a higher-layer client crate that hands this one
//! an already-authenticated [`transport::Transport`].

pub mod config;
pub mod error;
pub mod framer;
pub mod rpc;
pub mod session;
pub mod transport;
pub mod xml;

pub use error::{FramingErrorKind, NetconfError};
pub use session::{Session, SessionState};
pub use transport::{RawFdTransport, ReadOutcome, SshChannel, SshChannelTransport, Transport};

#[cfg(any(test, feature = "test-util"))]
pub use transport::MemoryTransport;

pub use netconf_wire::{
    CapabilitySet, Message, ProtocolVersion, ReplyKind, BASE_1_0, BASE_1_1, NS_BASE_1_0,
    NS_BASE_1_1,
};
