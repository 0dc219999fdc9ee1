//! Localized, human-readable rendering of filter trees.

use std::collections::HashMap;

use super::ast::{Conjunction, ConjunctionNode, FilterNode};
use super::error::FilterResult;

/// Display strings the core and the stock criteria need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phrase {
    /// Joiner word for AND groups.
    And,
    /// Joiner word for OR groups.
    Or,
    /// "field is value".
    Is,
    /// "field is not value".
    IsNot,
    /// "field matches pattern".
    Matches,
}

impl Phrase {
    /// English text used when a localizer has no entry.
    pub fn fallback(self) -> &'static str {
        match self {
            Phrase::And => "and",
            Phrase::Or => "or",
            Phrase::Is => "is",
            Phrase::IsNot => "is not",
            Phrase::Matches => "matches",
        }
    }
}

impl From<Conjunction> for Phrase {
    fn from(op: Conjunction) -> Self {
        match op {
            Conjunction::And => Phrase::And,
            Conjunction::Or => Phrase::Or,
        }
    }
}

/// Injected string lookup service.
pub trait Localizer: Send + Sync {
    /// Returns the display string for `phrase` in `locale`, if known.
    fn lookup(&self, phrase: Phrase, locale: &str) -> Option<String>;

    /// Returns the display string, falling back to English.
    fn text(&self, phrase: Phrase, locale: &str) -> String {
        self.lookup(phrase, locale)
            .unwrap_or_else(|| phrase.fallback().to_string())
    }
}

/// In-memory phrase catalog keyed by locale.
///
/// Lookups try the exact locale first, then its language part
/// (`de-AT` falls back to `de`).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, HashMap<Phrase, String>>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog with English and German entries.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for phrase in [
            Phrase::And,
            Phrase::Or,
            Phrase::Is,
            Phrase::IsNot,
            Phrase::Matches,
        ] {
            catalog.insert("en", phrase, phrase.fallback());
        }
        catalog.insert("de", Phrase::And, "und");
        catalog.insert("de", Phrase::Or, "oder");
        catalog.insert("de", Phrase::Is, "ist");
        catalog.insert("de", Phrase::IsNot, "ist nicht");
        catalog.insert("de", Phrase::Matches, "entspricht");
        catalog
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, locale: &str, phrase: Phrase, text: impl Into<String>) {
        self.entries
            .entry(locale.to_lowercase())
            .or_default()
            .insert(phrase, text.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, locale: &str, phrase: Phrase, text: impl Into<String>) -> Self {
        self.insert(locale, phrase, text);
        self
    }

    /// Returns true if any entry exists for the locale or its language.
    pub fn supports(&self, locale: &str) -> bool {
        candidates(locale).any(|l| self.entries.contains_key(&l))
    }
}

fn candidates(locale: &str) -> impl Iterator<Item = String> {
    let exact = locale.to_lowercase();
    let language = exact
        .split(['-', '_'])
        .next()
        .filter(|lang| *lang != exact)
        .map(str::to_string);
    std::iter::once(exact).chain(language)
}

impl Localizer for Catalog {
    fn lookup(&self, phrase: Phrase, locale: &str) -> Option<String> {
        candidates(locale).find_map(|l| self.entries.get(&l)?.get(&phrase).cloned())
    }
}

/// Returns the localized joiner word for an operator.
pub fn localized_operator_word(localizer: &dyn Localizer, op: Conjunction, locale: &str) -> String {
    localizer.text(op.into(), locale)
}

/// Returns the localized joiner word for a raw operator ordinal.
///
/// # Errors
///
/// Returns `FilterError::UnknownOperator` if the ordinal is not a known operator.
pub fn localized_operator_word_for_ordinal(
    localizer: &dyn Localizer,
    ordinal: i64,
    locale: &str,
) -> FilterResult<String> {
    let op = Conjunction::from_ordinal(ordinal)?;
    Ok(localized_operator_word(localizer, op, locale))
}

/// Renders filter trees as localized, parenthesized text.
///
/// # Example
///
/// ```
/// use smartlist_core::filter::criteria::FieldEquals;
/// use smartlist_core::filter::{Catalog, Conjunction, ConjunctionNode, FilterNode, Leaf, SummaryFormatter};
///
/// let open = Leaf::new(FieldEquals::new("status", "open")).unwrap();
/// let urgent = Leaf::new(FieldEquals::new("tag", "urgent")).unwrap();
/// let node = FilterNode::from(ConjunctionNode::new(
///     Conjunction::And,
///     vec![open.into(), urgent.into()],
/// ));
///
/// let catalog = Catalog::builtin();
/// let formatter = SummaryFormatter::new(&catalog, "en");
/// assert_eq!(formatter.summary(&node), "status is open and tag is urgent");
/// ```
pub struct SummaryFormatter<'a> {
    localizer: &'a dyn Localizer,
    locale: &'a str,
}

impl<'a> SummaryFormatter<'a> {
    /// Creates a formatter for one locale.
    pub fn new(localizer: &'a dyn Localizer, locale: &'a str) -> Self {
        Self { localizer, locale }
    }

    /// Standalone summary of a node.
    pub fn summary(&self, node: &FilterNode) -> String {
        match node {
            FilterNode::Leaf(leaf) => leaf.criterion().describe(self.localizer, self.locale),
            FilterNode::Conjunction(group) => self.group_summary(group),
        }
    }

    /// Summary of a node that appears as a child of a conjunction.
    ///
    /// Groups are parenthesized; leaves use their conjunction phrasing.
    pub fn summary_in_conjunction(&self, node: &FilterNode) -> String {
        match node {
            FilterNode::Leaf(leaf) => leaf
                .criterion()
                .describe_in_conjunction(self.localizer, self.locale),
            FilterNode::Conjunction(group) => format!("({})", self.group_summary(group)),
        }
    }

    fn group_summary(&self, group: &ConjunctionNode) -> String {
        let separator = format!(
            " {} ",
            localized_operator_word(self.localizer, group.operator(), self.locale)
        );
        group
            .children()
            .iter()
            .map(|child| self.summary_in_conjunction(child))
            .collect::<Vec<_>>()
            .join(&separator)
    }
}

impl FilterNode {
    /// Localized standalone summary.
    pub fn summary(&self, localizer: &dyn Localizer, locale: &str) -> String {
        SummaryFormatter::new(localizer, locale).summary(self)
    }

    /// Localized summary in conjunction context.
    pub fn summary_in_conjunction(&self, localizer: &dyn Localizer, locale: &str) -> String {
        SummaryFormatter::new(localizer, locale).summary_in_conjunction(self)
    }
}
