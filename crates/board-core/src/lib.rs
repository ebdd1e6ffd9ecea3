//! Modo Caverna Board Core
//!
//! Layered architecture:
//! - domain: Columns, cards, checklists, tags and the board view
//! - positioning: Contiguous ordering helpers
//! - cache: Key-scoped client cache mirroring server state
//! - remote: Task store abstraction with HTTP and in-memory backends
//! - controller: Drag handling and optimistic mutations over the cache

pub mod cache;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod dnd;
pub mod domain;
pub mod error;
pub mod logging;
pub mod notify;
pub mod optimistic;
pub mod positioning;
pub mod remote;

pub use cache::{FetchTicket, QueryCache, QueryData, QueryKey};
pub use config::{BoardConfig, ConfigError};
pub use controller::{BoardController, DragPreview, PendingSync};
pub use debounce::{DebounceTicket, Debouncer};
pub use dnd::{DragEnd, DragId, DragMachine, DragPhase};
pub use domain::{
    Board, Card, CardId, Checklist, ChecklistId, Column, ColumnId, Entity, Priority, Subtask,
    SubtaskId, Tag, TagId,
};
pub use error::{BoardError, BoardResult};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use optimistic::{MutationState, OptimisticMutation};
pub use positioning::POSITION_BASE;
pub use remote::{HttpTaskStore, InMemoryTaskStore, TaskStore};
