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

//! The public error taxonomy.
//!
//! Every fallible operation on [`crate::session::Session`] returns
//! `Result<T, NetconfError>`. There is no retry at this layer: a
//! transport or framing error is fatal to the session, and the caller is
//! expected to `close` and reconnect rather than attempt resynchronization.

use std::io;

/// The reason a chunked (v1.1) frame failed to decode.
#[derive(thiserror::Error, Debug)]
pub enum FramingErrorKind {
    #[error("chunk length was zero")]
    ZeroLength,
    #[error("chunk length {0:?} is not a valid decimal unsigned integer")]
    NonDecimalLength(String),
    #[error("terminator seen with no prior chunk")]
    EmptyMessage,
    #[error("XML parse failure: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),
}

/// The public error type of the session and framing core.
#[derive(thiserror::Error, Debug)]
pub enum NetconfError {
    /// Null/missing argument, or an operation attempted on a `Closed`
    /// session.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Allocation failure. Exceedingly rare in safe Rust, kept for
    /// parity with the source taxonomy and surfaced only by operations
    /// that pre-size a buffer to an untrusted length.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// The transport adapter returned an error, or hit end-of-stream
    /// mid-message.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// A malformed chunk header, a zero-length chunk, or an XML parse
    /// failure while decoding a framed message.
    #[error("framing error: {0}")]
    Framing(#[from] FramingErrorKind),

    /// An unexpected reply root or shape. Non-fatal: surfaced alongside
    /// [`netconf_wire::ReplyKind::Unknown`](netconf_wire::ReplyKind::Unknown)
    /// rather than returned as an `Err`, logged as a warning at the call
    /// site that observed it.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The capability set's internal bookkeeping is inconsistent (for
    /// example, an operation would leave `items` exceeding an implied
    /// capacity). Logged and the operation is refused rather than acted
    /// on.
    #[error("structural warning: {0}")]
    StructuralWarning(String),
}

impl NetconfError {
    pub fn invalid_argument(msg: impl Into<String>) -> NetconfError {
        NetconfError::InvalidArgument(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> NetconfError {
        NetconfError::Protocol(msg.into())
    }
}
