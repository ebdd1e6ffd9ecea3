//! Domain Layer
//!
//! Board entities and their wire shapes.
//! This layer has no external dependencies except serde.

mod board;
mod card;
mod checklist;
mod column;
mod entity;
mod ids;
mod tag;

pub use board::Board;
pub use card::{Card, Priority};
pub use checklist::{Checklist, Subtask};
pub(crate) use checklist::bool_string;
pub use column::Column;
pub use entity::{remove_by_id, swap_temporary, Entity};
pub use ids::{CardId, ChecklistId, ColumnId, SubtaskId, TagId};
pub use tag::{Tag, DEFAULT_TAG_COLOR};
