//! Tag normalization.
//!
//! Tags are lower-case tokens with words joined by `_` (`bluetooth_kulaklik`).
//! Everything that enters the catalog or a search query goes through
//! [`normalize_tag`] so that scoring only ever compares normalized strings.

use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-]+").expect("separator pattern is valid"));

/// Lower-cases a tag and joins its words with `_`.
///
/// Returns `None` when nothing is left after trimming.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let lowered = tag.trim().to_lowercase();
    let joined = SEPARATORS.replace_all(&lowered, "_");
    let joined = joined.trim_matches('_');

    if joined.is_empty() {
        None
    } else {
        Some(joined.to_string())
    }
}

/// Normalizes a list of tags, dropping empties and duplicates while keeping
/// first-seen order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter_map(|tag| normalize_tag(tag.as_ref()))
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Splits comma separated user input into normalized tags.
pub fn parse_tags(tags: &str) -> Vec<String> {
    normalize_tags(tags.split(','))
}

/// A normalized, ordered set of query tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        TagSet(
            tags.into_iter()
                .filter_map(|tag| normalize_tag(tag.as_ref()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// All tags joined by a single space.
    pub fn joined(&self) -> String {
        self.0.iter().cloned().collect::<Vec<_>>().join(" ")
    }

    /// `|self ∩ other|`; duplicates in `other` are counted once.
    pub fn overlap(&self, other: &[String]) -> usize {
        let other: HashSet<&str> = other.iter().map(String::as_str).collect();
        self.0.iter().filter(|tag| other.contains(tag.as_str())).count()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        TagSet::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("  Bluetooth Kulaklik "), Some("bluetooth_kulaklik".into()));
        assert_eq!(normalize_tag("yan-sehpa"), Some("yan_sehpa".into()));
        assert_eq!(normalize_tag("c_sehpa"), Some("c_sehpa".into()));
        assert_eq!(normalize_tag(" - "), None);
        assert_eq!(normalize_tag(""), None);
    }

    #[test]
    fn test_normalize_tags_dedupes_in_order() {
        let tags = normalize_tags(["b", "A", "a", " b ", ""]);
        assert_eq!(tags, vec!["b", "a"]);
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            parse_tags("c_sehpa, Yan Sehpa,,modern_mobilya"),
            vec!["c_sehpa", "yan_sehpa", "modern_mobilya"]
        );
    }

    #[test]
    fn test_tag_set_overlap() {
        let query = TagSet::new(["c_sehpa", "yan_sehpa"]);
        let product = vec![
            "c_sehpa".to_string(),
            "modern_mobilya".to_string(),
            "c_sehpa".to_string(),
        ];
        assert_eq!(query.overlap(&product), 1);
        assert_eq!(TagSet::default().overlap(&product), 0);
    }

    #[test]
    fn test_tag_set_joined_is_sorted() {
        let query: TagSet = ["zeta", "alpha", "Alpha"].into_iter().collect();
        assert_eq!(query.len(), 2);
        assert_eq!(query.joined(), "alpha zeta");
    }
}
