//! Column Entity
//!
//! A named, ordered bucket of cards ("task list").

use serde::{Deserialize, Serialize};

use super::card::Card;
use super::entity::Entity;
use super::ids::ColumnId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    /// Left-to-right order on the board
    #[serde(default)]
    pub position: i32,
    /// Cards ordered top to bottom
    #[serde(rename = "tarefas", alias = "tasks", default)]
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(id: ColumnId, title: impl Into<String>, position: i32) -> Self {
        Self {
            id,
            title: title.into(),
            position,
            cards: Vec::new(),
        }
    }

    pub fn card_index(&self, card: crate::domain::CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card)
    }
}

impl Entity for Column {
    type Id = ColumnId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
