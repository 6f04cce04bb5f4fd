//! Per-mode request sequencing
//!
//! Every fetch takes a ticket from its mode's counter before doing anything
//! else; completions holding a ticket that is no longer the newest for that
//! mode are dropped. Last *issued* wins, not last to complete, so a slow
//! early response cannot clobber a fresher one.

use dashmap::DashMap;

/// Monotonic per-key request counters
#[derive(Debug, Default)]
pub struct RequestSequencer {
    counters: DashMap<String, u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self {
            counters: DashMap::new(),
        }
    }

    /// Issue the next ticket for a mode key
    pub fn begin(&self, key: &str) -> u64 {
        let mut entry = self.counters.entry(key.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Latest ticket issued for a mode key (0 if none)
    pub fn latest(&self, key: &str) -> u64 {
        self.counters.get(key).map(|v| *v).unwrap_or(0)
    }

    /// Whether a ticket is still the newest for its mode key
    pub fn is_latest(&self, key: &str, ticket: u64) -> bool {
        self.latest(key) == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_increase_per_key() {
        let seq = RequestSequencer::new();
        assert_eq!(seq.latest("view"), 0);
        assert_eq!(seq.begin("view"), 1);
        assert_eq!(seq.begin("view"), 2);
        assert_eq!(seq.begin("categories"), 1);
        assert_eq!(seq.latest("view"), 2);
    }

    #[test]
    fn newer_ticket_invalidates_older() {
        let seq = RequestSequencer::new();
        let first = seq.begin("view");
        assert!(seq.is_latest("view", first));

        let second = seq.begin("view");
        assert!(!seq.is_latest("view", first));
        assert!(seq.is_latest("view", second));
    }
}
