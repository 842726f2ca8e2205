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

//! Wire-level types shared between a NETCONF client and the session core:
//! the negotiated protocol version, the capability URI set each peer
//! advertises, and the message/reply-classification types that cross the
//! framer boundary.
//!
//! This crate is deliberately I/O free. It holds bare data plus the small
//! amount of logic (version negotiation, capability lookups) that doesn't
//! need a transport or an XML parser to make sense.

use std::fmt;

/// `urn:ietf:params:netconf:base:1.0`
pub const BASE_1_0: &str = "urn:ietf:params:netconf:base:1.0";
/// `urn:ietf:params:netconf:base:1.1`
pub const BASE_1_1: &str = "urn:ietf:params:netconf:base:1.1";
/// `urn:ietf:params:netconf:capability:writable-running:1.0`
pub const WRITABLE_RUNNING_1_0: &str = "urn:ietf:params:netconf:capability:writable-running:1.0";
/// `urn:ietf:params:netconf:capability:candidate:1.0`
pub const CANDIDATE_1_0: &str = "urn:ietf:params:netconf:capability:candidate:1.0";
/// `urn:ietf:params:netconf:capability:startup:1.0`
pub const STARTUP_1_0: &str = "urn:ietf:params:netconf:capability:startup:1.0";

/// `xmlns` value an `<rpc>`/`<hello>` root carries for NETCONF 1.0.
pub const NS_BASE_1_0: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";
/// `xmlns` value an `<rpc>`/`<hello>` root carries for NETCONF 1.1.
pub const NS_BASE_1_1: &str = "urn:ietf:params:xml:ns:netconf:base:1.1";

/// Initial capacity hint for a freshly constructed [`CapabilitySet`],
/// mirroring the source implementation's `list_size = 10` starting point.
pub const DEFAULT_CAPABILITY_CAPACITY: usize = 10;

/// The negotiated NETCONF protocol version. Immutable for the lifetime of
/// a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    V1_0,
    V1_1,
}

impl ProtocolVersion {
    /// Selects the session's protocol version from a local and peer
    /// capability set: NETCONF 1.1 if both sides advertise `base:1.1`,
    /// otherwise 1.0.
    pub fn negotiate(local: &CapabilitySet, peer: &CapabilitySet) -> ProtocolVersion {
        if local.contains(BASE_1_1) && peer.contains(BASE_1_1) {
            ProtocolVersion::V1_1
        } else {
            ProtocolVersion::V1_0
        }
    }

    /// The `xmlns` value stamped onto every outgoing top-level element for
    /// this version.
    pub fn base_namespace(&self) -> &'static str {
        match self {
            ProtocolVersion::V1_0 => NS_BASE_1_0,
            ProtocolVersion::V1_1 => NS_BASE_1_1,
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::V1_0 => write!(f, "1.0"),
            ProtocolVersion::V1_1 => write!(f, "1.1"),
        }
    }
}

/// An ordered, duplicate-tolerant collection of capability URIs.
///
/// Duplicates are tolerated in storage (the source implementation never
/// deduplicated `add`) but are semantically meaningless: [`contains`] and
/// [`intersects_base_11`] treat the set as a set.
///
/// [`contains`]: CapabilitySet::contains
/// [`intersects_base_11`]: CapabilitySet::intersects_base_11
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    items: Vec<String>,
}

impl CapabilitySet {
    /// An empty capability set, pre-sized to
    /// [`DEFAULT_CAPABILITY_CAPACITY`].
    pub fn new() -> CapabilitySet {
        CapabilitySet { items: Vec::with_capacity(DEFAULT_CAPABILITY_CAPACITY) }
    }

    /// Builds a capability set seeded from an ordered input list, in
    /// input order, preserving whatever duplicates the caller passes in.
    pub fn from_list<I, S>(list: I) -> CapabilitySet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CapabilitySet { items: list.into_iter().map(Into::into).collect() }
    }

    /// The default local advertisement a session builds when it has no
    /// more specific configuration. Unlike the C source's
    /// `nc_session_get_cpblts_default`, `base:1.0` is emitted exactly
    /// once here; see the default-local test below for the documented
    /// source quirk this intentionally does not reproduce.
    pub fn default_local() -> CapabilitySet {
        CapabilitySet::from_list([
            BASE_1_0,
            BASE_1_1,
            WRITABLE_RUNNING_1_0,
            CANDIDATE_1_0,
            STARTUP_1_0,
        ])
    }

    /// Appends a capability URI. Not deduplicated: callers wanting set
    /// semantics must check [`contains`] first.
    ///
    /// [`contains`]: CapabilitySet::contains
    pub fn add<S: Into<String>>(&mut self, uri: S) {
        self.items.push(uri.into());
    }

    /// Removes the first byte-equal occurrence of `uri`, if any, via
    /// swap-remove. Iteration order is therefore not preserved across
    /// removals. Returns whether anything was removed.
    pub fn remove(&mut self, uri: &str) -> bool {
        if let Some(idx) = self.items.iter().position(|item| item == uri) {
            self.items.swap_remove(idx);
            true
        } else {
            false
        }
    }

    /// A fresh, independent cursor over the set in storage order. Unlike
    /// the source's single static cursor, every call returns its own
    /// iterator, so concurrent observers don't stomp on each other.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Exact byte-equality membership test, treating the set as a set
    /// despite tolerating duplicate storage.
    pub fn contains(&self, uri: &str) -> bool {
        self.items.iter().any(|item| item == uri)
    }

    /// True if both this set and `other` advertise `base:1.1`.
    pub fn intersects_base_11(&self, other: &CapabilitySet) -> bool {
        self.contains(BASE_1_1) && other.contains(BASE_1_1)
    }
}

impl<'a> IntoIterator for &'a CapabilitySet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The classification of a `<rpc-reply>` by its root element and first
/// child. Outgoing requests always carry `Unknown`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReplyKind {
    Ok,
    Error,
    Data,
    Unknown,
}

/// An opaque XML document plus the two fields the session core derives
/// from it: the message id (0 when absent or not applicable) and, for
/// replies, a classification tag.
#[derive(Clone, Debug)]
pub struct Message {
    pub xml: Vec<u8>,
    pub message_id: u64,
    pub kind: ReplyKind,
}

impl Message {
    /// Wraps a raw framed XML document as a request (classification is
    /// meaningless for outgoing messages).
    pub fn request(xml: Vec<u8>, message_id: u64) -> Message {
        Message { xml, message_id, kind: ReplyKind::Unknown }
    }

    /// Wraps a raw framed XML document as a reply, with its derived id
    /// and classification.
    pub fn reply(xml: Vec<u8>, message_id: u64, kind: ReplyKind) -> Message {
        Message { xml, message_id, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_list_preserves_order_and_multiplicity() {
        let set = CapabilitySet::from_list(["a", "b", "a", "c"]);
        let collected: Vec<&str> = set.iter().map(String::as_str).collect();
        assert_eq!(collected, vec!["a", "b", "a", "c"]);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn add_does_not_dedup() {
        let mut set = CapabilitySet::new();
        set.add(BASE_1_0);
        set.add(BASE_1_0);
        assert_eq!(set.len(), 2);
        assert!(set.contains(BASE_1_0));
    }

    #[test]
    fn remove_swap_removes_first_match_and_shrinks_len_only() {
        let mut set = CapabilitySet::from_list(["a", "b", "c"]);
        assert!(set.remove("a"));
        assert_eq!(set.len(), 2);
        assert!(!set.contains("a"));
        // a second removal of something absent changes nothing
        assert!(!set.remove("a"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn remove_never_touches_other_entries_multiplicity() {
        let mut set = CapabilitySet::from_list(["x", "x", "y"]);
        assert!(set.remove("x"));
        assert_eq!(set.len(), 2);
        assert!(set.contains("x"));
        assert!(set.remove("x"));
        assert_eq!(set.len(), 1);
        assert!(!set.contains("x"));
    }

    #[test]
    fn default_local_matches_documented_source_quirk() {
        // The rewrite emits base:1.0 exactly once...
        let set = CapabilitySet::default_local();
        let ones: Vec<&String> = set.iter().filter(|u| u.as_str() == BASE_1_0).collect();
        assert_eq!(ones.len(), 1);

        let expected = vec![BASE_1_0, BASE_1_1, WRITABLE_RUNNING_1_0, CANDIDATE_1_0, STARTUP_1_0];
        let actual: Vec<&str> = set.iter().map(String::as_str).collect();
        assert_eq!(actual, expected);

        // ...whereas the original C `nc_session_get_cpblts_default` called
        // `nc_cpblts_add(retval, "urn:ietf:params:netconf:base:1.0")` twice
        // in a row before adding base:1.1. A downstream peer that counts on
        // that multiplicity would see 6 entries from the source, not 5.
        let source_quirk_list = CapabilitySet::from_list([
            BASE_1_0,
            BASE_1_0,
            BASE_1_1,
            WRITABLE_RUNNING_1_0,
            CANDIDATE_1_0,
            STARTUP_1_0,
        ]);
        assert_eq!(source_quirk_list.len(), 6);
        assert_ne!(source_quirk_list.len(), set.len());
    }

    #[test]
    fn negotiate_selects_1_1_only_when_both_sides_advertise_it() {
        let both = CapabilitySet::from_list([BASE_1_0, BASE_1_1]);
        let only_1_0 = CapabilitySet::from_list([BASE_1_0]);

        assert_eq!(ProtocolVersion::negotiate(&both, &both), ProtocolVersion::V1_1);
        assert_eq!(ProtocolVersion::negotiate(&both, &only_1_0), ProtocolVersion::V1_0);
        assert_eq!(ProtocolVersion::negotiate(&only_1_0, &both), ProtocolVersion::V1_0);
        assert_eq!(ProtocolVersion::negotiate(&only_1_0, &only_1_0), ProtocolVersion::V1_0);
    }

    #[test]
    fn base_namespace_matches_version() {
        assert_eq!(ProtocolVersion::V1_0.base_namespace(), NS_BASE_1_0);
        assert_eq!(ProtocolVersion::V1_1.base_namespace(), NS_BASE_1_1);
    }
}
