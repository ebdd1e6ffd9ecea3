//! Request payloads, named after the backend's fields.

use serde::{Deserialize, Serialize};

use crate::domain::{CardId, ChecklistId, ColumnId, Priority, TagId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewColumn {
    pub title: String,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnUpdate {
    pub id: ColumnId,
    pub title: String,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCard {
    #[serde(rename = "item")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub position: i32,
    #[serde(rename = "card_id")]
    pub column_id: ColumnId,
    #[serde(rename = "prioridade")]
    pub priority: Priority,
}

/// Fields editable from the card dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardUpdate {
    #[serde(rename = "item")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "prioridade")]
    pub priority: Priority,
}

/// Card move request: the card, its new column and its new position there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderCard {
    pub tarefa_id: CardId,
    pub position: i32,
    pub card_id: ColumnId,
}

/// Body of `PATCH /tarefas/reorder/{id}`
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct ReorderBody {
    pub position: i32,
    pub taskcard_id: ColumnId,
}

impl From<&ReorderCard> for ReorderBody {
    fn from(req: &ReorderCard) -> Self {
        Self {
            position: req.position,
            taskcard_id: req.card_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct AttachTag {
    pub tarefa_id: CardId,
    pub ticket_id: TagId,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct NewChecklist {
    pub tarefa_id: CardId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubtask {
    pub checklist_id: ChecklistId,
    pub name: String,
    #[serde(with = "crate::domain::bool_string")]
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtaskUpdate {
    pub name: String,
    #[serde(with = "crate::domain::bool_string")]
    pub checked: bool,
}

/// Responses may come bare or wrapped in `{"data": ...}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}
