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

//! Encodes outgoing messages and decodes incoming messages according to
//! the session's negotiated framing discipline.
//!
//! `Framer` itself holds no state — the only state is the caller-owned
//! scratch buffer passed into the decode functions, which is exactly the
//! fix for the source's non-reentrant static `read_until` buffer (spec
//! section 9, Design Notes).

use tracing::trace;

use crate::{
    error::{FramingErrorKind, NetconfError},
    transport::{ReadOutcome, Transport},
};

const V1_0_TERMINATOR: &[u8] = b"]]>]]>";
const V1_1_CHUNK_SENTINEL: &[u8] = b"\n#";
const V1_1_TERMINATOR_BODY: &[u8] = b"#\n";

/// Drains exactly `n` bytes from the transport. EOF before `n` bytes have
/// arrived is a fatal framing error.
pub fn read_exactly<T: Transport + ?Sized>(t: &mut T, n: usize) -> Result<Vec<u8>, NetconfError> {
    let mut out = vec![0u8; n];
    let mut filled = 0;
    while filled < n {
        match t.read_into(&mut out[filled..])? {
            ReadOutcome::Read(k) => filled += k,
            ReadOutcome::Eof => {
                return Err(NetconfError::Transport(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "peer closed stream mid-chunk",
                )))
            }
        }
    }
    Ok(out)
}

/// Reads one byte at a time into `buf`, growing it on demand (capacity
/// doubles), until the buffer's tail equals `sentinel`. Returns the
/// sentinel-inclusive slice read during this call (not the whole of
/// `buf`, which the caller may reuse across several `read_until` calls
/// within one decode).
pub fn read_until<T: Transport + ?Sized>(
    t: &mut T,
    buf: &mut Vec<u8>,
    sentinel: &[u8],
) -> Result<Vec<u8>, NetconfError> {
    let start = buf.len();
    let mut one = [0u8; 1];
    loop {
        match t.read_into(&mut one)? {
            ReadOutcome::Read(_) => {
                buf.push(one[0]);
                let read_so_far = buf.len() - start;
                if read_so_far >= sentinel.len() && buf.ends_with(sentinel) {
                    return Ok(buf[start..].to_vec());
                }
            }
            ReadOutcome::Eof => {
                return Err(NetconfError::Transport(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "peer closed stream before sentinel was found",
                )))
            }
        }
    }
}

/// Emit the message bytes followed by the NETCONF 1.0 sentinel
/// terminator `]]>]]>`.
pub fn encode_v1_0(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + V1_0_TERMINATOR.len());
    out.extend_from_slice(payload);
    out.extend_from_slice(V1_0_TERMINATOR);
    out
}

/// Reads one sentinel-delimited message and strips the terminator.
pub fn decode_v1_0<T: Transport + ?Sized>(t: &mut T, buf: &mut Vec<u8>) -> Result<Vec<u8>, NetconfError> {
    buf.clear();
    let framed = read_until(t, buf, V1_0_TERMINATOR)?;
    let payload_len = framed.len() - V1_0_TERMINATOR.len();
    trace!(len = payload_len, "decoded v1.0 frame");
    Ok(framed[..payload_len].to_vec())
}

/// Frames a message as a single NETCONF 1.1 chunk:
/// `\n#<len>\n<payload>\n##\n`. The core always sends a message as one
/// chunk; the decoder accepts any number.
pub fn encode_v1_1(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 16);
    out.extend_from_slice(b"\n#");
    out.extend_from_slice(payload.len().to_string().as_bytes());
    out.push(b'\n');
    out.extend_from_slice(payload);
    out.extend_from_slice(b"\n##\n");
    out
}

/// Reassembles a NETCONF 1.1 chunked message, accepting an arbitrary
/// number of `\n#<len>\n<payload>` chunks terminated by `\n##\n`.
pub fn decode_v1_1<T: Transport + ?Sized>(t: &mut T, buf: &mut Vec<u8>) -> Result<Vec<u8>, NetconfError> {
    let mut accumulated = Vec::new();
    loop {
        buf.clear();
        read_until(t, buf, V1_1_CHUNK_SENTINEL)?;

        buf.clear();
        let header_tail = read_until(t, buf, b"\n")?;
        // header_tail is everything up to and including the trailing \n,
        // e.g. "5\n" or "#\n" (terminator).
        if header_tail == V1_1_TERMINATOR_BODY {
            if accumulated.is_empty() {
                return Err(NetconfError::Framing(FramingErrorKind::EmptyMessage));
            }
            return Ok(accumulated);
        }

        let digits = &header_tail[..header_tail.len() - 1];
        let digits_str = std::str::from_utf8(digits).map_err(|_| {
            FramingErrorKind::NonDecimalLength(String::from_utf8_lossy(digits).into_owned())
        })?;
        let chunk_len: usize = digits_str.parse().map_err(|_| {
            FramingErrorKind::NonDecimalLength(digits_str.to_string())
        })?;
        if chunk_len == 0 {
            return Err(NetconfError::Framing(FramingErrorKind::ZeroLength));
        }

        let chunk = read_exactly(t, chunk_len)?;
        accumulated.extend_from_slice(&chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    #[test]
    fn v1_0_round_trip() {
        let payload = b"<rpc message-id=\"1\"><get/></rpc>";
        let framed = encode_v1_0(payload);
        assert!(framed.ends_with(V1_0_TERMINATOR));

        let mut t = MemoryTransport::new();
        t.push_inbound(&framed);
        let mut buf = Vec::new();
        let decoded = decode_v1_0(&mut t, &mut buf).expect("decode succeeds");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn v1_0_round_trip_empty_payload_is_just_the_terminator() {
        let framed = encode_v1_0(b"");
        assert_eq!(framed, V1_0_TERMINATOR);
    }

    #[test]
    fn v1_1_single_chunk_round_trip() {
        let payload = b"<rpc-reply message-id=\"7\"><data/></rpc-reply>";
        let framed = encode_v1_1(payload);

        let mut t = MemoryTransport::new();
        t.push_inbound(&framed);
        let mut buf = Vec::new();
        let decoded = decode_v1_1(&mut t, &mut buf).expect("decode succeeds");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn v1_1_multi_chunk_reassembles_in_order() {
        // hand-built multi-chunk message, mirroring spec scenario S2:
        // two chunks (5 + 6 bytes) spelling "hello world".
        let mut wire = Vec::new();
        wire.extend_from_slice(b"\n#5\nhello");
        wire.extend_from_slice(b"\n#6\n world");
        wire.extend_from_slice(b"\n##\n");

        let mut t = MemoryTransport::new();
        t.push_inbound(&wire);
        let mut buf = Vec::new();
        let decoded = decode_v1_1(&mut t, &mut buf).expect("decode succeeds");
        assert_eq!(decoded, b"hello world");
    }

    #[test]
    fn v1_1_zero_length_chunk_is_fatal() {
        let mut t = MemoryTransport::new();
        t.push_inbound(b"\n#0\n");
        let mut buf = Vec::new();
        let err = decode_v1_1(&mut t, &mut buf).expect_err("zero length is malformed");
        assert!(matches!(err, NetconfError::Framing(FramingErrorKind::ZeroLength)));
    }

    #[test]
    fn v1_1_non_decimal_length_is_fatal() {
        let mut t = MemoryTransport::new();
        t.push_inbound(b"\n#abc\n");
        let mut buf = Vec::new();
        let err = decode_v1_1(&mut t, &mut buf).expect_err("non-decimal length is malformed");
        assert!(matches!(err, NetconfError::Framing(FramingErrorKind::NonDecimalLength(_))));
    }

    #[test]
    fn v1_1_bare_terminator_with_no_chunks_is_malformed() {
        let mut t = MemoryTransport::new();
        t.push_inbound(b"\n##\n");
        let mut buf = Vec::new();
        let err = decode_v1_1(&mut t, &mut buf).expect_err("empty message is malformed");
        assert!(matches!(err, NetconfError::Framing(FramingErrorKind::EmptyMessage)));
    }

    #[test]
    fn read_until_buffer_is_sentinel_inclusive_and_no_early_match() {
        let mut t = MemoryTransport::new();
        t.push_inbound(b"abc]]>]]>");
        let mut buf = Vec::new();
        let framed = read_until(&mut t, &mut buf, b"]]>]]>").expect("sentinel found");
        assert!(framed.ends_with(b"]]>]]>"));
        assert_eq!(&framed[..framed.len() - 6], b"abc");
    }
}
