//! Cache key for re-priced quotes.
//!
//! Keys have the shape `odds:{event_id}:{market}:{selection}`. Each segment is
//! percent-escaped for the separator, the escape character itself and the glob
//! metacharacters understood by prefix scans, so a `:` inside a selection name
//! can never be confused with a segment boundary. Segments without those
//! characters render unchanged.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace prefix shared by every quote key.
pub const NAMESPACE: &str = "odds";

/// Segment separator.
pub const SEPARATOR: char = ':';

/// Identity of a cached quote: (event, market, selection).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteKey {
    event_id: String,
    market: String,
    selection: String,
}

impl QuoteKey {
    pub fn new(
        event_id: impl Into<String>,
        market: impl Into<String>,
        selection: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            market: market.into(),
            selection: selection.into(),
        }
    }

    #[must_use]
    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    #[must_use]
    pub fn market(&self) -> &str {
        &self.market
    }

    #[must_use]
    pub fn selection(&self) -> &str {
        &self.selection
    }

    /// Render the store key for this quote.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "{}{}{SEPARATOR}{}",
            event_prefix(&self.event_id),
            escape_segment(&self.market),
            escape_segment(&self.selection)
        )
    }
}

impl fmt::Display for QuoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.event_id, self.market, self.selection)
    }
}

/// Key prefix shared by every quote of one event, including the trailing separator.
#[must_use]
pub fn event_prefix(event_id: &str) -> String {
    format!("{NAMESPACE}{SEPARATOR}{}{SEPARATOR}", escape_segment(event_id))
}

/// Escape one key segment.
#[must_use]
pub fn escape_segment(segment: &str) -> Cow<'_, str> {
    if !segment.chars().any(needs_escape) {
        return Cow::Borrowed(segment);
    }

    let mut escaped = String::with_capacity(segment.len() + 8);
    for c in segment.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            ':' => escaped.push_str("%3A"),
            '*' => escaped.push_str("%2A"),
            '?' => escaped.push_str("%3F"),
            '[' => escaped.push_str("%5B"),
            ']' => escaped.push_str("%5D"),
            '\\' => escaped.push_str("%5C"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

const fn needs_escape(c: char) -> bool {
    matches!(c, '%' | ':' | '*' | '?' | '[' | ']' | '\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_segments_render_legacy_layout() {
        let key = QuoteKey::new("event-123", "match_winner", "Team A");
        assert_eq!(key.cache_key(), "odds:event-123:match_winner:Team A");
    }

    #[test]
    fn separator_inside_selection_is_escaped() {
        let key = QuoteKey::new("event-123", "correct_score", "Team A: 2-1");
        assert_eq!(key.cache_key(), "odds:event-123:correct_score:Team A%3A 2-1");
    }

    #[test]
    fn ambiguous_triples_render_distinct_keys() {
        let a = QuoteKey::new("e1", "m:x", "s");
        let b = QuoteKey::new("e1", "m", "x:s");
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn event_prefix_does_not_match_sibling_events() {
        let prefix = event_prefix("e1");
        let sibling = QuoteKey::new("e1:extra", "m", "s").cache_key();
        assert!(!sibling.starts_with(&prefix));
        assert!(QuoteKey::new("e1", "m", "s").cache_key().starts_with(&prefix));
    }

    #[test]
    fn escape_character_and_glob_metacharacters_are_escaped() {
        assert_eq!(escape_segment("100%"), "100%25");
        assert_eq!(escape_segment("a*b?[c]\\"), "a%2Ab%3F%5Bc%5D%5C");
        assert!(matches!(escape_segment("plain"), Cow::Borrowed("plain")));
    }
}
