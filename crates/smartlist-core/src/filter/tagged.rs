//! Tagged codec: the authoritative, round-trip-safe persistence form.
//!
//! Trees are written as JSON bytes:
//!
//! ```text
//! {"version":1,"root":NODE}
//! NODE ::= {"node":"conjunction","operator":0|1,"children":[NODE,...]}
//!        | {"node":"leaf","tag":"<type tag>","payload":<criterion JSON>}
//! ```
//!
//! Decoding looks every leaf tag up in a [`TypeRegistry`]. What happens to
//! tags written by a newer build is chosen with [`UnknownLeafPolicy`].
//!
//! Both directions share one depth limit, [`MAX_DEPTH`], so every tree that
//! encodes also decodes.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ast::{Conjunction, ConjunctionNode, FilterNode, MAX_DEPTH};
use super::error::{FilterError, FilterResult};
use super::registry::TypeRegistry;

/// Highest envelope version this build reads and the one it writes.
pub const TAGGED_FORMAT_VERSION: u32 = 1;

/// What to do with a leaf whose type tag is not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownLeafPolicy {
    /// Fail the whole decode with `UnknownTypeTag`.
    #[default]
    Fail,
    /// Drop the leaf from its parent, log a warning and keep going.
    ///
    /// A group left with no children by dropping is dropped as well, so a
    /// skipped branch never turns into a match-everything AND group. If the
    /// root itself would be dropped the decode fails with `UnknownTypeTag`.
    Skip,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    root: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
enum WireNode {
    Leaf {
        tag: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
    Conjunction {
        operator: i64,
        children: Vec<WireNode>,
    },
}

/// Result of a decode, including any leaves dropped under
/// [`UnknownLeafPolicy::Skip`].
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// The reconstructed tree.
    pub node: FilterNode,
    /// Tags of dropped leaves, in document order.
    pub skipped: Vec<String>,
}

/// Encodes a tree into tagged bytes.
///
/// # Errors
///
/// Returns `FilterError::NestingTooDeep` if the tree is deeper than
/// [`MAX_DEPTH`].
pub fn encode(node: &FilterNode) -> FilterResult<Vec<u8>> {
    if node.exceeds_depth(MAX_DEPTH) {
        return Err(FilterError::NestingTooDeep { limit: MAX_DEPTH });
    }
    Ok(json!({
        "version": TAGGED_FORMAT_VERSION,
        "root": node_to_json(node),
    })
    .to_string()
    .into_bytes())
}

fn node_to_json(node: &FilterNode) -> serde_json::Value {
    match node {
        FilterNode::Leaf(leaf) => json!({
            "node": "leaf",
            "tag": leaf.type_tag(),
            "payload": leaf.payload(),
        }),
        FilterNode::Conjunction(group) => json!({
            "node": "conjunction",
            "operator": group.operator().ordinal(),
            "children": group.children().iter().map(node_to_json).collect::<Vec<_>>(),
        }),
    }
}

/// Decodes tagged bytes using a registry and an unknown-leaf policy.
///
/// # Example
///
/// ```
/// use smartlist_core::filter::criteria::FieldEquals;
/// use smartlist_core::filter::{tagged, Leaf, FilterNode, TaggedDecoder, TypeRegistry};
///
/// let node = FilterNode::from(Leaf::new(FieldEquals::new("status", "open")).unwrap());
/// let bytes = tagged::encode(&node).unwrap();
///
/// let registry = TypeRegistry::with_builtin();
/// let decoded = TaggedDecoder::new(&registry).decode(&bytes).unwrap();
/// assert_eq!(decoded, node);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TaggedDecoder<'a> {
    registry: &'a TypeRegistry,
    policy: UnknownLeafPolicy,
}

impl<'a> TaggedDecoder<'a> {
    /// Creates a decoder with the default (`Fail`) policy.
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            policy: UnknownLeafPolicy::default(),
        }
    }

    /// Sets the unknown-leaf policy.
    pub fn with_policy(mut self, policy: UnknownLeafPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Decodes bytes into a tree.
    ///
    /// # Errors
    ///
    /// - `MalformedTaggedPayload` for invalid JSON, missing fields, an
    ///   unsupported version, nesting deeper than [`MAX_DEPTH`], or a payload
    ///   the leaf factory rejects.
    /// - `UnknownTypeTag` for unregistered tags under the `Fail` policy
    ///   (and for an unregistered root leaf under any policy).
    /// - `UnknownOperator` for an operator ordinal other than 0 or 1.
    pub fn decode(&self, bytes: &[u8]) -> FilterResult<FilterNode> {
        self.decode_report(bytes).map(|decoded| decoded.node)
    }

    /// Like [`decode`](Self::decode), also reporting skipped leaves.
    pub fn decode_report(&self, bytes: &[u8]) -> FilterResult<Decoded> {
        let envelope: Envelope = serde_json::from_slice(bytes).map_err(malformed)?;
        if envelope.version > TAGGED_FORMAT_VERSION {
            return Err(FilterError::malformed_tagged(format!(
                "unsupported format version {} (newest supported is {})",
                envelope.version, TAGGED_FORMAT_VERSION
            )));
        }
        let root: WireNode = serde_json::from_value(envelope.root).map_err(malformed)?;

        tracing::debug!(bytes = bytes.len(), policy = ?self.policy, "decoding tagged filter");

        let mut skipped = Vec::new();
        let node = match root {
            WireNode::Leaf { tag, payload } => FilterNode::Leaf(self.registry.build(&tag, payload)?),
            group => match self.build(group, 1, &mut skipped)? {
                Some(node) => node,
                None => {
                    let tag = skipped.first().map(String::as_str).unwrap_or_default();
                    return Err(self.registry.unknown(tag));
                }
            },
        };
        Ok(Decoded { node, skipped })
    }

    /// Rebuilds one node found at `depth`; `Ok(None)` means it was skipped.
    fn build(
        &self,
        wire: WireNode,
        depth: usize,
        skipped: &mut Vec<String>,
    ) -> FilterResult<Option<FilterNode>> {
        if depth > MAX_DEPTH {
            return Err(FilterError::malformed_tagged(format!(
                "nesting deeper than {MAX_DEPTH} levels"
            )));
        }
        match wire {
            WireNode::Leaf { tag, payload } => {
                if !self.registry.contains(&tag) && self.policy == UnknownLeafPolicy::Skip {
                    tracing::warn!(tag = %tag, "dropping leaf with unregistered criterion type");
                    skipped.push(tag);
                    return Ok(None);
                }
                Ok(Some(FilterNode::Leaf(self.registry.build(&tag, payload)?)))
            }
            WireNode::Conjunction { operator, children } => {
                let operator = Conjunction::from_ordinal(operator)?;
                let had_children = !children.is_empty();
                let mut rebuilt = Vec::with_capacity(children.len());
                for child in children {
                    if let Some(node) = self.build(child, depth + 1, skipped)? {
                        rebuilt.push(node);
                    }
                }
                if had_children && rebuilt.is_empty() {
                    return Ok(None);
                }
                Ok(Some(FilterNode::Conjunction(ConjunctionNode::new(
                    operator, rebuilt,
                ))))
            }
        }
    }
}

fn malformed(err: serde_json::Error) -> FilterError {
    FilterError::malformed_tagged(err.to_string())
}

impl FilterNode {
    /// Tagged bytes of this tree.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::NestingTooDeep` if the tree is deeper than
    /// [`MAX_DEPTH`].
    pub fn to_tagged_bytes(&self) -> FilterResult<Vec<u8>> {
        encode(self)
    }

    /// Decodes tagged bytes with the `Fail` policy.
    pub fn from_tagged_bytes(bytes: &[u8], registry: &TypeRegistry) -> FilterResult<Self> {
        TaggedDecoder::new(registry).decode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::criteria::{FieldEquals, FieldLike};
    use crate::filter::criterion::Leaf;

    fn leaf(field: &str, value: &str) -> FilterNode {
        Leaf::new(FieldEquals::new(field, value)).unwrap().into()
    }

    #[test]
    fn test_encode_shape() {
        let node: FilterNode =
            ConjunctionNode::new(Conjunction::Or, vec![leaf("a", "1"), leaf("b", "x")]).into();
        let value: serde_json::Value = serde_json::from_slice(&encode(&node).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "version": 1,
                "root": {
                    "node": "conjunction",
                    "operator": 1,
                    "children": [
                        {"node": "leaf", "tag": "field_eq", "payload": {"field": "a", "value": "1"}},
                        {"node": "leaf", "tag": "field_eq", "payload": {"field": "b", "value": "x"}},
                    ]
                }
            })
        );
    }

    #[test]
    fn test_roundtrip_nested() {
        let registry = TypeRegistry::with_builtin();
        let inner = ConjunctionNode::new(
            Conjunction::Or,
            vec![
                leaf("tag", "home"),
                Leaf::new(FieldLike::new("name", "%milk%")).unwrap().into(),
            ],
        );
        let node: FilterNode = ConjunctionNode::new(
            Conjunction::And,
            vec![inner.into(), leaf("status", "open"), leaf("status", "open")],
        )
        .into();

        let bytes = node.to_tagged_bytes().unwrap();
        let decoded = FilterNode::from_tagged_bytes(&bytes, &registry).unwrap();
        assert_eq!(decoded, node);
    }

    #[test]
    fn test_roundtrip_empty_groups_keep_operator() {
        let registry = TypeRegistry::with_builtin();
        for op in [Conjunction::And, Conjunction::Or] {
            let node: FilterNode = ConjunctionNode::empty(op).into();
            let bytes = node.to_tagged_bytes().unwrap();
            let decoded = FilterNode::from_tagged_bytes(&bytes, &registry).unwrap();
            assert_eq!(decoded, node);
        }
    }

    #[test]
    fn test_unknown_tag_fails_by_default() {
        let registry = TypeRegistry::with_builtin();
        let bytes = br#"{"version":1,"root":{"node":"conjunction","operator":0,"children":[
            {"node":"leaf","tag":"due_before","payload":{"days":3}}]}}"#;
        let err = TaggedDecoder::new(&registry).decode(bytes).unwrap_err();
        assert!(matches!(err, FilterError::UnknownTypeTag { ref tag, .. } if tag == "due_before"));
    }

    #[test]
    fn test_unknown_tag_skipped_under_skip_policy() {
        let registry = TypeRegistry::with_builtin();
        let bytes = br#"{"version":1,"root":{"node":"conjunction","operator":1,"children":[
            {"node":"leaf","tag":"field_eq","payload":{"field":"a","value":1}},
            {"node":"leaf","tag":"due_before","payload":{"days":3}},
            {"node":"conjunction","operator":0,"children":[
                {"node":"leaf","tag":"geo_near","payload":null}]}]}}"#;

        let decoded = TaggedDecoder::new(&registry)
            .with_policy(UnknownLeafPolicy::Skip)
            .decode_report(bytes)
            .unwrap();

        assert_eq!(decoded.skipped, vec!["due_before", "geo_near"]);
        let FilterNode::Conjunction(root) = &decoded.node else {
            panic!("expected conjunction root");
        };
        assert_eq!(root.operator(), Conjunction::Or);
        assert_eq!(root.len(), 1);
        assert_eq!(root.children()[0].to_text(), "a=1");
    }

    #[test]
    fn test_fully_skipped_root_group_fails() {
        let registry = TypeRegistry::with_builtin();
        let bytes = br#"{"version":1,"root":{"node":"conjunction","operator":0,"children":[
            {"node":"leaf","tag":"due_before","payload":{}}]}}"#;
        let err = TaggedDecoder::new(&registry)
            .with_policy(UnknownLeafPolicy::Skip)
            .decode(bytes)
            .unwrap_err();
        assert!(matches!(err, FilterError::UnknownTypeTag { ref tag, .. } if tag == "due_before"));
    }

    #[test]
    fn test_unknown_root_leaf_fails_even_when_skipping() {
        let registry = TypeRegistry::with_builtin();
        let bytes = br#"{"version":1,"root":{"node":"leaf","tag":"due_before","payload":{}}}"#;
        let err = TaggedDecoder::new(&registry)
            .with_policy(UnknownLeafPolicy::Skip)
            .decode(bytes)
            .unwrap_err();
        assert!(matches!(err, FilterError::UnknownTypeTag { .. }));
    }

    #[test]
    fn test_malformed_payloads_return_errors() {
        let registry = TypeRegistry::with_builtin();
        let decoder = TaggedDecoder::new(&registry);
        let full = encode(&leaf("a", "b")).unwrap();

        for bad in [
            &b""[..],
            &b"not json"[..],
            &full[..full.len() / 2],
            &br#"{"root":{"node":"leaf","tag":"field_eq"}}"#[..],
            &br#"{"version":1,"root":{"node":"branch"}}"#[..],
            &br#"{"version":1,"root":{"node":"conjunction","operator":0}}"#[..],
            &br#"{"version":1,"root":{"node":"leaf","tag":"field_eq","payload":{"value":1}}}"#[..],
        ] {
            let err = decoder.decode(bad).unwrap_err();
            assert!(
                matches!(err, FilterError::MalformedTaggedPayload { .. }),
                "expected malformed payload for {:?}, got {err:?}",
                String::from_utf8_lossy(bad)
            );
        }
    }

    #[test]
    fn test_newer_version_rejected() {
        let registry = TypeRegistry::with_builtin();
        let bytes = br#"{"version":2,"root":{"node":"conjunction","operator":0,"children":[]}}"#;
        let err = TaggedDecoder::new(&registry).decode(bytes).unwrap_err();
        assert!(err.to_string().contains("unsupported format version 2"));
    }

    #[test]
    fn test_unknown_operator_ordinal() {
        let registry = TypeRegistry::with_builtin();
        let bytes = br#"{"version":1,"root":{"node":"conjunction","operator":7,"children":[]}}"#;
        let err = TaggedDecoder::new(&registry).decode(bytes).unwrap_err();
        assert_eq!(err, FilterError::UnknownOperator { value: 7 });
    }

    /// `depth` levels: groups of one nested group plus one leaf, down to a leaf.
    fn nested(depth: usize) -> FilterNode {
        let mut node = leaf("n", "0");
        for level in 1..depth {
            let op = if level % 2 == 0 { Conjunction::And } else { Conjunction::Or };
            node = ConjunctionNode::new(op, vec![node, leaf("n", &level.to_string())]).into();
        }
        node
    }

    /// A well-formed document whose root nests `groups` single-child groups.
    fn nested_document(groups: usize) -> String {
        let mut doc = String::from(r#"{"version":1,"root":"#);
        for _ in 0..groups {
            doc.push_str(r#"{"node":"conjunction","operator":0,"children":["#);
        }
        doc.push_str(r#"{"node":"leaf","tag":"field_eq","payload":{"field":"a","value":1}}"#);
        for _ in 0..groups {
            doc.push_str("]}");
        }
        doc.push('}');
        doc
    }

    #[test]
    fn test_roundtrip_at_max_depth() {
        let registry = TypeRegistry::with_builtin();
        let node = nested(MAX_DEPTH);
        assert_eq!(node.depth(), MAX_DEPTH);

        let bytes = node.to_tagged_bytes().unwrap();
        let decoded = FilterNode::from_tagged_bytes(&bytes, &registry).unwrap();
        assert_eq!(decoded, node);
    }

    #[test]
    fn test_encode_rejects_tree_past_max_depth() {
        let node = nested(MAX_DEPTH + 1);
        assert_eq!(
            encode(&node).unwrap_err(),
            FilterError::NestingTooDeep { limit: MAX_DEPTH }
        );
    }

    #[test]
    fn test_decode_rejects_document_past_max_depth() {
        let registry = TypeRegistry::with_builtin();
        let decoder = TaggedDecoder::new(&registry);

        let at_limit = nested_document(MAX_DEPTH - 1);
        assert_eq!(decoder.decode(at_limit.as_bytes()).unwrap().depth(), MAX_DEPTH);

        let err = decoder
            .decode(nested_document(MAX_DEPTH).as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("nesting deeper than"), "{err}");
    }

    #[test]
    fn test_decode_of_very_deep_document_returns_error() {
        let registry = TypeRegistry::with_builtin();
        let doc = nested_document(10_000);
        let err = TaggedDecoder::new(&registry)
            .decode(doc.as_bytes())
            .unwrap_err();
        assert!(matches!(err, FilterError::MalformedTaggedPayload { .. }));
    }
}
