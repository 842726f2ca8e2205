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

//! The narrow slice of an XML collaborator that the
//! session core actually needs: read the root element's name and
//! attributes, read its first child's name, and stamp a `message-id`
//! attribute plus a base namespace onto a freshly duplicated document.
//!
//! This is intentionally not a general-purpose DOM — no XPath, no schema
//! validation, no mutation beyond the root start tag. Building specific
//! RPC bodies (`get-config`, `edit-config`, ...) stays out of scope.

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::{FramingErrorKind, NetconfError};

/// The root element's tag name, e.g. `"rpc-reply"`.
pub fn root_name(xml: &[u8]) -> Result<String, NetconfError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(FramingErrorKind::from)? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Event::Eof => {
                return Err(NetconfError::protocol("document has no root element"));
            }
            _ => {}
        }
        buf.clear();
    }
}

/// The value of `name` on the root element, if present.
pub fn get_attr(xml: &[u8], name: &str) -> Result<Option<String>, NetconfError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(FramingErrorKind::from)? {
            Event::Start(e) | Event::Empty(e) => {
                for attr in e.attributes() {
                    let attr = attr.map_err(FramingErrorKind::from)?;
                    if attr.key.local_name().as_ref() == name.as_bytes() {
                        let value = attr.unescape_value().map_err(FramingErrorKind::from)?;
                        return Ok(Some(value.into_owned()));
                    }
                }
                return Ok(None);
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

/// The tag name of the root's first child element, if any.
pub fn first_child_name(xml: &[u8]) -> Result<Option<String>, NetconfError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event_into(&mut buf).map_err(FramingErrorKind::from)? {
            Event::Start(e) => {
                depth += 1;
                if depth == 2 {
                    return Ok(Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned()));
                }
            }
            Event::Empty(e) => {
                if depth == 1 {
                    return Ok(Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned()));
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Ok(None);
                }
                depth -= 1;
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

/// Deep-copies `xml`, then rewrites its root start tag to carry
/// `message-id="<id>"` (only if `stamp_id` is true — `<hello>` and other
/// non-`<rpc>` top-level elements never get one) and `xmlns="<namespace>"`.
/// The caller's original bytes are never touched.
pub fn stamp_message_id_and_namespace(
    xml: &[u8],
    id: u64,
    namespace: &str,
    stamp_id: bool,
) -> Result<Vec<u8>, NetconfError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();
    let mut stamped_root = false;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(FramingErrorKind::from)?;
        match event {
            Event::Eof => break,
            Event::Start(e) if !stamped_root => {
                let mut elem = e.to_owned();
                rewrite_root_attrs(&mut elem, id, namespace, stamp_id)?;
                stamped_root = true;
                writer.write_event(Event::Start(elem)).map_err(FramingErrorKind::from)?;
            }
            Event::Empty(e) if !stamped_root => {
                let mut elem = e.to_owned();
                rewrite_root_attrs(&mut elem, id, namespace, stamp_id)?;
                stamped_root = true;
                writer.write_event(Event::Empty(elem)).map_err(FramingErrorKind::from)?;
            }
            other => {
                writer.write_event(other).map_err(FramingErrorKind::from)?;
            }
        }
        buf.clear();
    }

    if !stamped_root {
        return Err(NetconfError::protocol("document has no root element to stamp"));
    }

    Ok(writer.into_inner())
}

/// Rebuilds `elem`'s attribute list: drops any existing `message-id`
/// (only when `stamp_id` is set) and `xmlns`, keeping every other
/// attribute's raw bytes untouched, then appends the fresh
/// `message-id`/`xmlns` pair. `BytesStart` has no `retain_attributes` in
/// the pinned quick-xml version, so the kept attributes are collected
/// first and re-pushed after `clear_attributes`.
fn rewrite_root_attrs(
    elem: &mut BytesStart<'static>,
    id: u64,
    namespace: &str,
    stamp_id: bool,
) -> Result<(), NetconfError> {
    let kept: Vec<(Vec<u8>, Vec<u8>)> = elem
        .attributes()
        .map(|a| a.map_err(FramingErrorKind::from))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|a| {
            let local = a.key.local_name();
            let local = local.as_ref();
            !(local == b"xmlns" || (stamp_id && local == b"message-id"))
        })
        .map(|a| (a.key.as_ref().to_vec(), a.value.into_owned()))
        .collect();

    elem.clear_attributes();
    for (key, value) in &kept {
        elem.push_attribute((key.as_slice(), value.as_slice()));
    }
    if stamp_id {
        elem.push_attribute(("message-id", id.to_string().as_str()));
    }
    elem.push_attribute(("xmlns", namespace));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_name_reads_tag_without_namespace_prefix() {
        let xml = br#"<rpc-reply message-id="7"><data/></rpc-reply>"#;
        assert_eq!(root_name(xml).unwrap(), "rpc-reply");
    }

    #[test]
    fn get_attr_finds_message_id() {
        let xml = br#"<rpc-reply message-id="7"><ok/></rpc-reply>"#;
        assert_eq!(get_attr(xml, "message-id").unwrap(), Some("7".to_string()));
        assert_eq!(get_attr(xml, "nonexistent").unwrap(), None);
    }

    #[test]
    fn first_child_name_reports_ok_error_data() {
        assert_eq!(
            first_child_name(br#"<rpc-reply><ok/></rpc-reply>"#).unwrap(),
            Some("ok".to_string())
        );
        assert_eq!(
            first_child_name(br#"<rpc-reply><rpc-error/></rpc-reply>"#).unwrap(),
            Some("rpc-error".to_string())
        );
        assert_eq!(
            first_child_name(br#"<rpc-reply><data/></rpc-reply>"#).unwrap(),
            Some("data".to_string())
        );
        assert_eq!(first_child_name(br#"<rpc-reply></rpc-reply>"#).unwrap(), None);
    }

    #[test]
    fn stamp_message_id_and_namespace_rewrites_only_root() {
        let xml = br#"<rpc><get/></rpc>"#;
        let stamped = stamp_message_id_and_namespace(
            xml,
            42,
            "urn:ietf:params:xml:ns:netconf:base:1.0",
            true,
        )
        .unwrap();
        let stamped_str = String::from_utf8(stamped).unwrap();
        assert!(stamped_str.contains(r#"message-id="42""#));
        assert!(stamped_str.contains(r#"xmlns="urn:ietf:params:xml:ns:netconf:base:1.0""#));
        assert!(stamped_str.contains("<get/>"));

        // the caller's original bytes are untouched
        assert_eq!(xml.as_slice(), b"<rpc><get/></rpc>");
    }

    #[test]
    fn stamp_message_id_and_namespace_skips_id_for_non_rpc_roots() {
        let xml = br#"<hello><capabilities/></hello>"#;
        let stamped = stamp_message_id_and_namespace(
            xml,
            42,
            "urn:ietf:params:xml:ns:netconf:base:1.0",
            false,
        )
        .unwrap();
        let stamped_str = String::from_utf8(stamped).unwrap();
        assert!(!stamped_str.contains("message-id"));
        assert!(stamped_str.contains(r#"xmlns="urn:ietf:params:xml:ns:netconf:base:1.0""#));
    }
}
