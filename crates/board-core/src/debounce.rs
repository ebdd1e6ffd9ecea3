//! Debounced field edits.
//!
//! Each editable field gets a ticket per keystroke. The caller waits out the
//! quiet period and then redeems the ticket; only the latest ticket for a
//! field yields its value, earlier ones are cancelled implicitly.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket<K> {
    pub key: K,
    seq: u64,
}

#[derive(Debug)]
pub struct Debouncer<K, V> {
    pending: HashMap<K, (u64, V)>,
    seq: u64,
}

impl<K, V> Default for Debouncer<K, V> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
            seq: 0,
        }
    }
}

impl<K: Copy + Eq + Hash, V> Debouncer<K, V> {
    /// Record the latest value for `key`, superseding earlier tickets
    pub fn schedule(&mut self, key: K, value: V) -> DebounceTicket<K> {
        self.seq += 1;
        self.pending.insert(key, (self.seq, value));
        DebounceTicket { key, seq: self.seq }
    }

    /// Value to commit, if `ticket` is still the latest for its key
    pub fn take(&mut self, ticket: DebounceTicket<K>) -> Option<V> {
        match self.pending.get(&ticket.key) {
            Some((seq, _)) if *seq == ticket.seq => {
                self.pending.remove(&ticket.key).map(|(_, value)| value)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self, key: K) {
        self.pending.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_fires() {
        let mut debouncer = Debouncer::default();
        let first = debouncer.schedule(1u32, "Fa");
        let second = debouncer.schedule(1u32, "Fazer");

        assert_eq!(debouncer.take(first), None);
        assert_eq!(debouncer.take(second), Some("Fazer"));
        // redeemed once
        assert_eq!(debouncer.take(second), None);
    }

    #[test]
    fn test_keys_are_independent() {
        let mut debouncer = Debouncer::default();
        let a = debouncer.schedule(1u32, "a");
        let b = debouncer.schedule(2u32, "b");
        assert_eq!(debouncer.take(b), Some("b"));
        assert_eq!(debouncer.take(a), Some("a"));
    }

    #[test]
    fn test_cancel() {
        let mut debouncer = Debouncer::default();
        let ticket = debouncer.schedule(1u32, "x");
        debouncer.cancel(1);
        assert_eq!(debouncer.take(ticket), None);
    }
}
