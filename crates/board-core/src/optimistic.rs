//! Optimistic mutations.
//!
//! A mutation is applied to the cache before the server confirms it. The
//! command object keeps the value it replaced, so a failed confirmation can
//! put the cache back.
//!
//! State per mutation: `Idle -> Applied -> {Confirmed | RolledBack}`, and
//! `settle` returns a finished mutation to `Idle`.

use crate::cache::{QueryCache, QueryData, QueryKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    Applied,
    Confirmed,
    RolledBack,
}

#[derive(Debug, Clone)]
pub struct OptimisticMutation {
    key: QueryKey,
    inverse: Option<QueryData>,
    state: MutationState,
}

impl OptimisticMutation {
    pub fn new(key: QueryKey) -> Self {
        Self {
            key,
            inverse: None,
            state: MutationState::Idle,
        }
    }

    /// Edit a copy of the cached value, then cancel in-flight fetches of the
    /// key and write the copy back.
    ///
    /// `edit` returns false to abort: nothing is written and running fetches
    /// are left alone. Returns false as well when the key holds no data.
    pub fn apply<F>(&mut self, cache: &QueryCache, edit: F) -> bool
    where
        F: FnOnce(&mut QueryData) -> bool,
    {
        if self.state != MutationState::Idle {
            return false;
        }
        let Some(snapshot) = cache.get(&self.key) else {
            return false;
        };
        let mut next = snapshot.clone();
        if !edit(&mut next) {
            return false;
        }
        cache.cancel_queries(&self.key);
        cache.set(self.key, next);
        self.inverse = Some(snapshot);
        self.state = MutationState::Applied;
        tracing::debug!(key = ?self.key, "optimistic update applied");
        true
    }

    pub fn confirm(&mut self) {
        if self.state == MutationState::Applied {
            self.state = MutationState::Confirmed;
        }
    }

    /// Restore the pre-mutation snapshot
    pub fn rollback(&mut self, cache: &QueryCache) {
        if self.state != MutationState::Applied {
            return;
        }
        if let Some(inverse) = self.inverse.take() {
            cache.set(self.key, inverse);
        }
        self.state = MutationState::RolledBack;
        tracing::debug!(key = ?self.key, "optimistic update rolled back");
    }

    /// Confirm on success, roll back on failure, then go back to idle.
    /// Hands the outcome back to the caller.
    pub fn settle<T, E>(&mut self, cache: &QueryCache, result: Result<T, E>) -> Result<T, E> {
        match &result {
            Ok(_) => self.confirm(),
            Err(_) => self.rollback(cache),
        }
        self.inverse = None;
        self.state = MutationState::Idle;
        result
    }

    pub fn state(&self) -> MutationState {
        self.state
    }

}
