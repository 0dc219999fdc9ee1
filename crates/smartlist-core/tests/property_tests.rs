//! Property tests over randomly generated filter trees.

use proptest::collection::vec;
use proptest::prelude::*;
use smartlist_core::backend::{MemoryBackend, Row};
use smartlist_core::filter::criteria::{FieldEquals, FieldNotEquals};
use smartlist_core::filter::{
    Conjunction, ConjunctionNode, FilterNode, Leaf, TextReader, TypeRegistry, Value,
};

// =============================================================================
// STRATEGIES
// =============================================================================

fn operator() -> impl Strategy<Value = Conjunction> {
    prop_oneof![Just(Conjunction::And), Just(Conjunction::Or)]
}

/// Leaves over fields `a`..`c`; values avoid the typed keywords so the textual
/// form reads back as text.
fn leaf() -> impl Strategy<Value = FilterNode> {
    ("[a-c]", "[a-z,\\[\\]]{1,3}", any::<bool>()).prop_map(|(field, value, negated)| {
        let leaf = if negated {
            Leaf::new(FieldNotEquals::new(field, value))
        } else {
            Leaf::new(FieldEquals::new(field, value))
        };
        FilterNode::Leaf(leaf.expect("stock criteria serialize"))
    })
}

fn tree() -> impl Strategy<Value = FilterNode> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        (operator(), vec(inner, 0..4))
            .prop_map(|(op, children)| ConjunctionNode::new(op, children).into())
    })
}

fn rows() -> impl Strategy<Value = Vec<Row>> {
    vec(
        vec(("[a-c]", "[a-z]{1,2}"), 0..3).prop_map(|pairs| {
            pairs
                .into_iter()
                .map(|(k, v)| (k, Value::Text(v)))
                .collect::<Row>()
        }),
        0..8,
    )
}

// =============================================================================
// REFERENCE EVALUATION
// =============================================================================

/// Evaluates a tree the obvious way, straight from its leaves' payloads.
fn reference_matches(node: &FilterNode, row: &Row) -> bool {
    match node {
        FilterNode::Leaf(leaf) => {
            let field = leaf.payload()["field"].as_str().unwrap_or_default();
            let expected: Value =
                serde_json::from_value(leaf.payload()["value"].clone()).expect("value");
            let actual = row.get(field).cloned().unwrap_or(Value::Null);
            match leaf.type_tag() {
                "field_eq" => actual == expected,
                "field_ne" => actual != expected,
                other => panic!("unexpected leaf kind {other}"),
            }
        }
        FilterNode::Conjunction(group) => match group.operator() {
            Conjunction::And => group.children().iter().all(|c| reference_matches(c, row)),
            Conjunction::Or => group.children().iter().any(|c| reference_matches(c, row)),
        },
    }
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Tagged encoding restores an equal tree.
    #[test]
    fn tagged_roundtrip_restores_equal_tree(node in tree()) {
        let registry = TypeRegistry::with_builtin();
        let bytes = node.to_tagged_bytes().expect("encode");
        let restored = FilterNode::from_tagged_bytes(&bytes, &registry).expect("decode");
        prop_assert_eq!(&restored, &node);
        prop_assert_eq!(restored.to_text(), node.to_text());
    }

    /// A single-child group writes exactly its child's text.
    #[test]
    fn single_child_group_text_is_child_text(node in tree(), op in operator()) {
        let wrapped = FilterNode::from(ConjunctionNode::new(op, vec![node.clone()]));
        prop_assert_eq!(wrapped.to_text(), node.to_text());
    }

    /// Reading the textual form back and writing it again is stable.
    #[test]
    fn text_reader_reproduces_text(node in tree(), op in operator()) {
        let registry = TypeRegistry::with_builtin();
        let text = node.to_text();
        let reread = TextReader::new(&registry, op).parse(&text).expect("parse");
        prop_assert_eq!(reread.to_text(), text);
    }

    /// Compiled predicates agree with direct evaluation.
    #[test]
    fn compiled_predicate_matches_reference(node in tree(), rows in rows()) {
        let backend = MemoryBackend::new();
        let predicate = node.compile(&backend).expect("compile");
        for row in &rows {
            prop_assert_eq!(predicate.matches(row), reference_matches(&node, row));
        }
    }

    /// Wrapping never changes what a tree matches.
    #[test]
    fn wrap_preserves_meaning(node in tree(), op in operator(), rows in rows()) {
        let backend = MemoryBackend::new();
        let wrapped = FilterNode::from(ConjunctionNode::wrap(node.clone(), op));
        let before = node.compile(&backend).expect("compile");
        let after = wrapped.compile(&backend).expect("compile");
        for row in &rows {
            prop_assert_eq!(before.matches(row), after.matches(row));
        }
    }
}
