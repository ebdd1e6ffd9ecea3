//! Remote Task Store
//!
//! Abstract interface to the backend owning columns, cards, tags and
//! checklists. `HttpTaskStore` talks to the REST API, `InMemoryTaskStore`
//! stands in for it offline and in tests.

mod http;
mod memory;
mod wire;

use async_trait::async_trait;

use crate::domain::{CardId, Checklist, Card, Column, ColumnId, Subtask, SubtaskId, Tag, TagId};
use crate::error::BoardResult;

pub use http::HttpTaskStore;
pub use memory::{InMemoryTaskStore, RecordedRequest, StoreOp};
pub use wire::{
    CardUpdate, ColumnUpdate, NewCard, NewColumn, NewSubtask, NewTag, ReorderCard, SubtaskUpdate,
};

/// Operations offered by the backend.
///
/// Futures are not required to be `Send`: in the browser they wrap
/// `fetch` promises.
#[async_trait(?Send)]
pub trait TaskStore: Send + Sync {
    // Columns (task lists)
    async fn list_columns(&self) -> BoardResult<Vec<Column>>;
    async fn create_column(&self, req: &NewColumn) -> BoardResult<Column>;
    async fn update_column(&self, req: &ColumnUpdate) -> BoardResult<()>;
    /// Cascades to the column's cards server-side
    async fn delete_column(&self, id: ColumnId) -> BoardResult<()>;

    // Cards (tasks)
    async fn list_cards(&self) -> BoardResult<Vec<Card>>;
    async fn create_card(&self, req: &NewCard) -> BoardResult<Card>;
    async fn update_card(&self, id: CardId, req: &CardUpdate) -> BoardResult<()>;
    async fn reorder_card(&self, req: &ReorderCard) -> BoardResult<()>;
    async fn delete_card(&self, id: CardId) -> BoardResult<()>;

    // Tags
    async fn list_tags(&self) -> BoardResult<Vec<Tag>>;
    async fn create_tag(&self, req: &NewTag) -> BoardResult<Tag>;
    async fn delete_tag(&self, id: TagId) -> BoardResult<()>;
    async fn attach_tag(&self, card: CardId, tag: TagId) -> BoardResult<()>;
    async fn detach_tag(&self, card: CardId, tag: TagId) -> BoardResult<()>;

    // Checklists
    async fn get_checklist(&self, card: CardId) -> BoardResult<Option<Checklist>>;
    async fn create_checklist(&self, card: CardId) -> BoardResult<Checklist>;
    async fn create_subtask(&self, req: &NewSubtask) -> BoardResult<Subtask>;
    async fn update_subtask(&self, id: SubtaskId, req: &SubtaskUpdate) -> BoardResult<()>;
    async fn delete_subtask(&self, id: SubtaskId) -> BoardResult<()>;
}
