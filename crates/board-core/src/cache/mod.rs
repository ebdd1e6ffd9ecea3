//! Client Cache
//!
//! In-memory, key-addressed mirror of server state. Cloning a `QueryCache`
//! shares the same store, so it can be injected into every component that
//! needs it.
//!
//! Fetches are guarded by per-key generations: `cancel_queries` bumps the
//! generation so a response started earlier cannot clobber a newer
//! optimistic write.

mod keys;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{Board, CardId, Checklist, Tag};

pub use keys::{QueryData, QueryKey};

type Listener = Arc<dyn Fn(&QueryKey) + Send + Sync>;

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

/// Proof that a fetch was started at a given generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: QueryKey,
    generation: u64,
}

#[derive(Debug, Default)]
struct Entry {
    data: Option<QueryData>,
    stale: bool,
    generation: u64,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<QueryKey, Entry>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    next_temp_id: i64,
}

#[derive(Clone, Default)]
pub struct QueryCache {
    inner: Arc<RwLock<CacheInner>>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("QueryCache")
            .field("keys", &inner.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Call listeners outside the lock so they may read the cache
    fn notify(&self, key: &QueryKey) {
        let listeners: Vec<Listener> = self
            .read()
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(key);
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<QueryData> {
        self.read().entries.get(key).and_then(|e| e.data.clone())
    }

    /// Write a value, marking it fresh
    pub fn set(&self, key: QueryKey, data: QueryData) {
        {
            let mut inner = self.write();
            let entry = inner.entries.entry(key).or_default();
            entry.data = Some(data);
            entry.stale = false;
        }
        tracing::trace!(?key, "cache set");
        self.notify(&key);
    }

    pub fn remove(&self, key: &QueryKey) {
        let removed = self.write().entries.remove(key).is_some();
        if removed {
            self.notify(key);
        }
    }

    /// Mark a key stale; the next load refetches it
    pub fn invalidate(&self, key: &QueryKey) {
        {
            let mut inner = self.write();
            let entry = inner.entries.entry(*key).or_default();
            entry.stale = true;
        }
        tracing::debug!(?key, "cache invalidated");
        self.notify(key);
    }

    /// Missing keys count as stale
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.read()
            .entries
            .get(key)
            .map_or(true, |e| e.stale || e.data.is_none())
    }

    /// Drop interest in every fetch of `key` started so far
    pub fn cancel_queries(&self, key: &QueryKey) {
        let mut inner = self.write();
        inner.entries.entry(*key).or_default().generation += 1;
    }

    pub fn begin_fetch(&self, key: QueryKey) -> FetchTicket {
        let mut inner = self.write();
        let generation = inner.entries.entry(key).or_default().generation;
        FetchTicket { key, generation }
    }

    /// Store a fetch result unless the key was cancelled since the ticket
    /// was issued. Returns whether the data was stored.
    pub fn resolve_fetch(&self, ticket: FetchTicket, data: QueryData) -> bool {
        {
            let mut inner = self.write();
            let entry = inner.entries.entry(ticket.key).or_default();
            if entry.generation != ticket.generation {
                tracing::debug!(key = ?ticket.key, "discarding superseded fetch");
                return false;
            }
            entry.data = Some(data);
            entry.stale = false;
        }
        self.notify(&ticket.key);
        true
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&QueryKey) + Send + Sync + 'static,
    {
        let mut inner = self.write();
        inner.next_listener += 1;
        let id = ListenerId(inner.next_listener);
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.write().listeners.retain(|(lid, _)| *lid != id);
    }

    /// Allocate a temporary (negative) id for an optimistic insert
    pub fn temp_id(&self) -> i64 {
        let mut inner = self.write();
        inner.next_temp_id -= 1;
        inner.next_temp_id
    }

    // ========================
    // Typed helpers
    // ========================

    pub fn board(&self) -> Option<Board> {
        match self.get(&QueryKey::Board)? {
            QueryData::Board(board) => Some(board),
            _ => None,
        }
    }

    pub fn set_board(&self, board: Board) {
        self.set(QueryKey::Board, QueryData::Board(board));
    }

    pub fn tags(&self) -> Option<Vec<Tag>> {
        match self.get(&QueryKey::Tags)? {
            QueryData::Tags(tags) => Some(tags),
            _ => None,
        }
    }

    pub fn set_tags(&self, tags: Vec<Tag>) {
        self.set(QueryKey::Tags, QueryData::Tags(tags));
    }

    /// `None` when not loaded, `Some(None)` when the card has no checklist
    pub fn checklist(&self, card: CardId) -> Option<Option<Checklist>> {
        match self.get(&QueryKey::Checklist(card))? {
            QueryData::Checklist(list) => Some(list),
            _ => None,
        }
    }

    pub fn set_checklist(&self, card: CardId, checklist: Option<Checklist>) {
        self.set(QueryKey::Checklist(card), QueryData::Checklist(checklist));
    }
}
