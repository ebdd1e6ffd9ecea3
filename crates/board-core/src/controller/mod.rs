//! Board Controller
//!
//! Owns the handles every board interaction needs (cache, remote store,
//! notifier) and implements the drag-and-drop reordering plus the column,
//! card, tag and checklist mutations on top of them.
//!
//! Every mutation writes the cache first and reconciles with the store
//! afterwards. Drag reorders self-heal by refetching on failure; the other
//! mutations restore the snapshot they replaced.

mod cards;
mod checklists;
mod columns;
mod drag;
mod tags;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cache::{QueryCache, QueryData, QueryKey};
use crate::config::BoardConfig;
use crate::debounce::Debouncer;
use crate::dnd::DragId;
use crate::domain::{Board, CardId, Column, ColumnId, SubtaskId};
use crate::error::{BoardError, BoardResult};
use crate::notify::{
    Notifier, CARD_REORDER_FAILURE, COLUMN_MOVE_FAILURE, DEMO_MODE_NOTICE, GENERIC_FAILURE,
};
use crate::optimistic::OptimisticMutation;
use crate::remote::{ColumnUpdate, HttpTaskStore, InMemoryTaskStore, ReorderCard, TaskStore};

pub use cards::DEFAULT_CARD_TITLE;
pub use drag::DragPreview;

/// Request that reconciles a drop with the store
#[derive(Debug, Clone, PartialEq)]
pub enum PendingSync {
    MoveColumn(ColumnUpdate),
    ReorderCard(ReorderCard),
}

impl PendingSync {
    fn failure_message(&self) -> &'static str {
        match self {
            PendingSync::MoveColumn(_) => COLUMN_MOVE_FAILURE,
            PendingSync::ReorderCard(_) => CARD_REORDER_FAILURE,
        }
    }
}

/// Interaction state that is not server data
#[derive(Debug, Default)]
struct EditState {
    /// Columns whose title input has focus; they cannot be dragged
    editing_columns: HashSet<ColumnId>,
    column_titles: Debouncer<ColumnId, String>,
    subtask_names: Debouncer<SubtaskId, (CardId, String)>,
    active_drag: Option<DragId>,
}

#[derive(Clone)]
pub struct BoardController {
    cache: QueryCache,
    store: Arc<dyn TaskStore>,
    notifier: Notifier,
    edits: Arc<Mutex<EditState>>,
}

impl std::fmt::Debug for BoardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardController")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl BoardController {
    pub fn new(store: Arc<dyn TaskStore>, cache: QueryCache, notifier: Notifier) -> Self {
        Self {
            cache,
            store,
            notifier,
            edits: Arc::new(Mutex::new(EditState::default())),
        }
    }

    /// HTTP store when an API URL is configured, the demo board otherwise
    pub fn from_config(config: &BoardConfig) -> BoardResult<Self> {
        let notifier = Notifier::new();
        let store: Arc<dyn TaskStore> = match config.api_base_url {
            Some(_) => Arc::new(HttpTaskStore::new(config)?),
            None => {
                tracing::info!("no API configured, using the in-memory demo board");
                notifier.info(DEMO_MODE_NOTICE);
                Arc::new(InMemoryTaskStore::demo())
            }
        };
        Ok(Self::new(store, QueryCache::new(), notifier))
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Current board, empty until loaded
    pub fn board(&self) -> Board {
        self.cache.board().unwrap_or_default()
    }

    fn edits(&self) -> MutexGuard<'_, EditState> {
        self.edits.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================
    // Loading
    // ========================

    /// Fetch columns with their cards. Returns false when the response was
    /// superseded by an optimistic write and dropped.
    pub async fn load_board(&self) -> BoardResult<bool> {
        let result = self.fetch_board().await;
        if let Err(err) = &result {
            self.report(err, GENERIC_FAILURE);
        }
        result
    }

    /// Load the board unless a fresh copy is cached
    pub async fn ensure_board(&self) -> BoardResult<()> {
        if self.cache.is_stale(&QueryKey::Board) {
            self.load_board().await?;
        }
        Ok(())
    }

    async fn fetch_board(&self) -> BoardResult<bool> {
        let ticket = self.cache.begin_fetch(QueryKey::Board);
        let columns = self.store.list_columns().await?;
        let board = Board::new(columns);
        tracing::debug!(columns = board.columns.len(), cards = board.card_count(), "board fetched");
        Ok(self.cache.resolve_fetch(ticket, QueryData::Board(board)))
    }

    /// Re-read cards from the flat listing and regroup them under the
    /// cached columns
    pub async fn refresh_cards(&self) -> BoardResult<bool> {
        let ticket = self.cache.begin_fetch(QueryKey::Board);
        let result = async {
            let columns: Vec<Column> = match self.cache.board() {
                Some(board) => board.columns,
                None => self.store.list_columns().await?,
            };
            let cards = self.store.list_cards().await?;
            Ok::<_, BoardError>(Board::from_parts(columns, cards))
        }
        .await;
        match result {
            Ok(board) => Ok(self.cache.resolve_fetch(ticket, QueryData::Board(board))),
            Err(err) => {
                self.report(&err, GENERIC_FAILURE);
                Err(err)
            }
        }
    }

    // ========================
    // Reconciliation
    // ========================

    /// Send the request for a drop. On failure the board is invalidated and
    /// refetched so the server order wins again.
    pub async fn sync(&self, pending: PendingSync) -> BoardResult<()> {
        let result = match &pending {
            PendingSync::MoveColumn(req) => self.store.update_column(req).await,
            PendingSync::ReorderCard(req) => self.store.reorder_card(req).await,
        };
        if let Err(err) = result {
            self.report(&err, pending.failure_message());
            self.heal(QueryKey::Board).await;
            return Err(err);
        }
        tracing::debug!(?pending, "drop synced");
        Ok(())
    }

    /// Invalidate a key and refetch it from the store
    async fn heal(&self, key: QueryKey) {
        self.cache.invalidate(&key);
        let refetched = match key {
            QueryKey::Board => self.fetch_board().await.map(|_| ()),
            QueryKey::Tags => self.fetch_tags().await.map(|_| ()),
            QueryKey::Checklist(card) => self.fetch_checklist(card).await.map(|_| ()),
        };
        if let Err(err) = refetched {
            tracing::warn!(?key, error = %err, "refetch after failure also failed");
        }
    }

    fn report(&self, err: &BoardError, message: &str) {
        tracing::warn!(error = %err, "{}", message);
        self.notifier.error(message);
    }

    // ========================
    // Optimistic helpers
    // ========================

    /// Apply `edit` to the value under `key` as an optimistic mutation.
    /// `edit` returns `None` to leave the cache untouched.
    fn optimistic<T>(
        &self,
        key: QueryKey,
        edit: impl FnOnce(&mut QueryData) -> Option<T>,
    ) -> Option<(OptimisticMutation, T)> {
        let mut mutation = OptimisticMutation::new(key);
        let mut out = None;
        let applied = mutation.apply(&self.cache, |data| {
            out = edit(data);
            out.is_some()
        });
        if applied {
            out.map(|value| (mutation, value))
        } else {
            None
        }
    }

    fn optimistic_board<T>(
        &self,
        edit: impl FnOnce(&mut Board) -> Option<T>,
    ) -> Option<(OptimisticMutation, T)> {
        self.optimistic(QueryKey::Board, |data| data.as_board_mut().and_then(edit))
    }

    /// Confirm or roll back `mutation`, reporting a failure
    fn settle<T>(&self, mutation: &mut OptimisticMutation, result: BoardResult<T>) -> BoardResult<T> {
        let result = mutation.settle(&self.cache, result);
        if let Err(err) = &result {
            self.report(err, GENERIC_FAILURE);
        }
        result
    }

    // ========================
    // Column edit locks
    // ========================

    pub fn begin_column_edit(&self, column: ColumnId) {
        self.edits().editing_columns.insert(column);
    }

    pub fn end_column_edit(&self, column: ColumnId) {
        self.edits().editing_columns.remove(&column);
    }

    pub fn is_column_edited(&self, column: ColumnId) -> bool {
        self.edits().editing_columns.contains(&column)
    }
}

fn unsaved(what: &str, id: impl std::fmt::Display) -> BoardError {
    BoardError::Unsaved(format!("{} {}", what, id))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::remote::StoreOp;

    #[tokio::test]
    async fn test_load_board_fills_cache() {
        let (controller, _) = loaded(two_column_board()).await;
        assert_eq!(controller.board().columns.len(), 2);
        assert!(!controller.cache().is_stale(&QueryKey::Board));
    }

    #[tokio::test]
    async fn test_load_failure_notifies() {
        let store = InMemoryTaskStore::with_board(two_column_board());
        store.fail(StoreOp::ListColumns);
        let controller =
            BoardController::new(Arc::new(store), QueryCache::new(), Notifier::new());
        assert!(controller.load_board().await.is_err());
        assert_eq!(controller.notifier().drain()[0].message, GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn test_refresh_cards_regroups() {
        let (controller, store) = loaded(two_column_board()).await;
        store
            .reorder_card(&ReorderCard {
                tarefa_id: CardId(10),
                position: 1,
                card_id: ColumnId(2),
            })
            .await
            .unwrap();
        assert!(controller.refresh_cards().await.unwrap());
        let board = controller.board();
        assert_eq!(board.column(ColumnId(2)).unwrap().cards[0].id, CardId(10));
        assert_eq!(board.column(ColumnId(1)).unwrap().cards.len(), 1);
    }

    #[tokio::test]
    async fn test_edit_lock() {
        let (controller, _) = loaded(two_column_board()).await;
        controller.begin_column_edit(ColumnId(1));
        assert!(controller.is_column_edited(ColumnId(1)));
        controller.end_column_edit(ColumnId(1));
        assert!(!controller.is_column_edited(ColumnId(1)));
    }

    #[test]
    fn test_from_config_without_url_uses_demo() {
        let controller = BoardController::from_config(&BoardConfig::default()).unwrap();
        assert!(controller.board().columns.is_empty());

        let notices = controller.notifier().drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, crate::notify::NotificationLevel::Info);
        assert_eq!(notices[0].message, DEMO_MODE_NOTICE);
    }
}
