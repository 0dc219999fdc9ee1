//! Registry mapping criterion type tags to reconstruction factories.
//!
//! The surrounding application registers every criterion kind it persists
//! before decoding anything; the core only reads the registry.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use strsim::levenshtein;

use super::criteria::{FieldEquals, FieldLike, FieldNotEquals};
use super::criterion::{Criterion, CriterionKind, Leaf};
use super::error::{FilterError, FilterResult};

/// Maximum Levenshtein distance to consider a tag as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

type PayloadFactory = Box<dyn Fn(serde_json::Value) -> FilterResult<Leaf> + Send + Sync>;
type TextFactory = Box<dyn Fn(&str) -> Option<FilterResult<Leaf>> + Send + Sync>;

struct Entry {
    from_payload: PayloadFactory,
    from_text: Option<TextFactory>,
}

impl Entry {
    fn for_kind<C: CriterionKind>() -> Self {
        Entry {
            from_payload: Box::new(|payload| {
                let criterion: C = serde_json::from_value(payload).map_err(|e| {
                    FilterError::malformed_tagged(format!("{} payload: {e}", C::TYPE_TAG))
                })?;
                Leaf::new(criterion)
            }),
            from_text: Some(Box::new(|text: &str| C::from_text(text).map(Leaf::new))),
        }
    }
}

/// Type tag → factory map used by the decoders.
#[derive(Default)]
pub struct TypeRegistry {
    entries: BTreeMap<String, Entry>,
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("tags", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the stock field criteria registered.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for (tag, entry) in [
            (FieldEquals::TYPE_TAG, Entry::for_kind::<FieldEquals>()),
            (FieldNotEquals::TYPE_TAG, Entry::for_kind::<FieldNotEquals>()),
            (FieldLike::TYPE_TAG, Entry::for_kind::<FieldLike>()),
        ] {
            registry.entries.insert(tag.to_string(), entry);
        }
        registry
    }

    /// Registers a criterion kind by its `TYPE_TAG`.
    ///
    /// Both the tagged payload factory and, if the kind implements
    /// `from_text`, the textual reader are registered.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::DuplicateTypeTag` if the tag is already present.
    pub fn register_kind<C: CriterionKind>(&mut self) -> FilterResult<()> {
        self.insert(C::TYPE_TAG, Entry::for_kind::<C>())
    }

    /// Registers a custom payload factory for `tag`.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::DuplicateTypeTag` if the tag is already present.
    pub fn register<F>(&mut self, tag: &str, factory: F) -> FilterResult<()>
    where
        F: Fn(serde_json::Value) -> FilterResult<Arc<dyn Criterion>> + Send + Sync + 'static,
    {
        self.insert(
            tag,
            Entry {
                from_payload: Box::new(move |payload| Leaf::from_arc(factory(payload)?)),
                from_text: None,
            },
        )
    }

    fn insert(&mut self, tag: &str, entry: Entry) -> FilterResult<()> {
        if self.entries.contains_key(tag) {
            return Err(FilterError::DuplicateTypeTag {
                tag: tag.to_string(),
            });
        }
        self.entries.insert(tag.to_string(), entry);
        Ok(())
    }

    /// Returns true if `tag` is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Reconstructs a leaf from its tagged payload.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownTypeTag` if `tag` is not registered, or
    /// `FilterError::MalformedTaggedPayload` if the factory rejects the payload.
    pub fn build(&self, tag: &str, payload: serde_json::Value) -> FilterResult<Leaf> {
        let entry = self.entries.get(tag).ok_or_else(|| self.unknown(tag))?;
        (entry.from_payload)(payload)
    }

    /// Reads a leaf from its textual form using the first kind that accepts it.
    ///
    /// Kinds are tried in tag order; returns `None` if no kind recognizes the text.
    pub fn parse_text(&self, text: &str) -> Option<FilterResult<Leaf>> {
        self.entries
            .values()
            .filter_map(|entry| entry.from_text.as_ref())
            .find_map(|reader| reader(text))
    }

    pub(crate) fn unknown(&self, tag: &str) -> FilterError {
        FilterError::unknown_type_tag(tag, self.suggest(tag))
    }

    /// Finds the closest registered tag by Levenshtein distance.
    fn suggest(&self, tag: &str) -> Option<String> {
        let (best, distance) = self
            .entries
            .keys()
            .map(|candidate| (candidate, levenshtein(tag, candidate)))
            .min_by_key(|(_, d)| *d)?;

        if distance > 0 && distance <= MAX_SUGGESTION_DISTANCE {
            Some(best.clone())
        } else {
            None
        }
    }
}
