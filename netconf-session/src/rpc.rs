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

//! The narrow slice of an RPC-construction collaborator that the session
//! core needs internally: a factory for
//! `<close-session>` and a duplicate-message helper. Building the bodies
//! of other operations (`get-config`, `edit-config`, ...) is out of
//! scope and left to a higher layer.

use netconf_wire::Message;

/// Builds the unframed `<rpc message-id="N"
/// xmlns="...">...<close-session/></rpc>` document for the given
/// namespace. The message id is stamped directly since this document is
/// never user-supplied — there's no caller original to preserve.
pub fn close_session_message(message_id: u64, namespace: &str) -> Message {
    let xml = format!(
        r#"<rpc message-id="{id}" xmlns="{ns}"><close-session/></rpc>"#,
        id = message_id,
        ns = namespace,
    )
    .into_bytes();
    Message::request(xml, message_id)
}

/// Deep-copies a message's XML bytes. The caller's original is never
/// mutated by anything downstream of this call.
pub fn dup(msg: &Message) -> Message {
    Message { xml: msg.xml.clone(), message_id: msg.message_id, kind: msg.kind }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_session_message_carries_id_and_namespace() {
        let msg = close_session_message(9, "urn:ietf:params:xml:ns:netconf:base:1.0");
        let xml = String::from_utf8(msg.xml.clone()).unwrap();
        assert!(xml.contains(r#"message-id="9""#));
        assert!(xml.contains("urn:ietf:params:xml:ns:netconf:base:1.0"));
        assert!(xml.contains("<close-session/>"));
        assert_eq!(msg.message_id, 9);
    }

    #[test]
    fn dup_copies_without_aliasing() {
        let original = Message::request(b"<rpc><get/></rpc>".to_vec(), 3);
        let mut copy = dup(&original);
        copy.xml.push(b'!');
        assert_ne!(copy.xml, original.xml);
    }
}
