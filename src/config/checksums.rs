use std::collections::HashSet;
use std::sync::Arc;

/// Checksums in first-seen order, without duplicates. The order list and the
/// lookup set share one allocation per checksum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumSet {
    ordered: Vec<Arc<str>>,
    seen: HashSet<Arc<str>>,
}

impl ChecksumSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, checksum: &str) -> bool {
        if self.seen.contains(checksum) {
            return false;
        }
        let shared: Arc<str> = Arc::from(checksum);
        self.seen.insert(Arc::clone(&shared));
        self.ordered.push(shared);
        true
    }

    /// Returns how many of the given checksums were new.
    pub fn extend<I, S>(&mut self, checksums: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        checksums
            .into_iter()
            .filter(|c| self.insert(c.as_ref()))
            .count()
    }

    pub fn contains(&self, checksum: &str) -> bool {
        self.seen.contains(checksum)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.ordered.first().map(|c| &**c)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(|c| &**c)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ordered.iter().map(|c| c.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_seen_order() {
        let mut set = ChecksumSet::new();
        set.insert("b");
        set.insert("a");
        set.insert("b");
        assert_eq!(set.to_vec(), vec!["b", "a"]);
    }

    #[test]
    fn test_extend_counts_new_values() {
        let mut set = ChecksumSet::new();
        assert_eq!(set.extend(["c1", "c2"]), 2);
        assert_eq!(set.extend(["c2", "c3", "c3"]), 1);
        assert_eq!(set.to_vec(), vec!["c1", "c2", "c3"]);
    }

    #[test]
    fn test_order_and_lookup_share_storage() {
        let mut set = ChecksumSet::new();
        set.insert("abc123");
        let stored = set.seen.get("abc123").unwrap();
        assert!(Arc::ptr_eq(&set.ordered[0], stored));
        assert_eq!(Arc::strong_count(stored), 2);
    }

    #[test]
    fn test_empty_set() {
        let set = ChecksumSet::new();
        assert!(set.is_empty());
        assert_eq!(set.first(), None);
        assert!(!set.contains(""));
    }
}
