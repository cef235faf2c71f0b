//! List normalization and ordered deduplication.
//!
//! Every component that builds a first-seen-ordered, deduplicated sequence
//! goes through [`OrderedSet`] instead of carrying its own seen-set.

use std::collections::HashSet;

/// Trim each entry, drop the ones that come out empty, keep the rest in
/// their original order.
pub fn normalize_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ordered accumulator with first-seen-wins membership.
///
/// Empty strings are never admitted.
#[derive(Debug, Default)]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item` unless it is empty or already present.
    /// Returns whether the item was added.
    pub fn insert(&mut self, item: &str) -> bool {
        if item.is_empty() || self.seen.contains(item) {
            return false;
        }
        self.seen.insert(item.to_string());
        self.items.push(item.to_string());
        true
    }

    pub fn extend<'a>(&mut self, items: impl IntoIterator<Item = &'a str>) {
        for item in items {
            self.insert(item);
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_list() {
        let input = vec![
            " a ".to_string(),
            String::new(),
            "  ".to_string(),
            "b".to_string(),
        ];
        assert_eq!(normalize_list(&input), vec!["a", "b"]);
    }

    #[test]
    fn test_normalize_list_empty() {
        assert!(normalize_list(&[]).is_empty());
    }

    #[test]
    fn test_ordered_set_first_seen_wins() {
        let mut set = OrderedSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b"));
        assert!(!set.insert(""));
        assert_eq!(set.into_vec(), vec!["b", "a"]);
    }

    #[test]
    fn test_extend_dedups_across_calls() {
        let mut set = OrderedSet::new();
        set.extend(["x", "y"]);
        set.extend(["y", "z"]);
        assert_eq!(set.into_vec(), vec!["x", "y", "z"]);
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(values in proptest::collection::vec(".{0,12}", 0..8)) {
            let once = normalize_list(&values);
            let twice = normalize_list(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn ordered_set_has_no_duplicates(values in proptest::collection::vec("[a-c]{1,2}", 0..16)) {
            let mut set = OrderedSet::new();
            set.extend(values.iter().map(String::as_str));
            let collected = set.into_vec();
            let mut sorted = collected.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(collected.len(), sorted.len());
        }
    }
}
