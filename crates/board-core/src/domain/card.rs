//! Card Entity
//!
//! A single work item living in exactly one column. Field names on the wire
//! follow the backend (`item`, `descricao`, `prioridade`, ...).

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::ids::{CardId, ChecklistId, ColumnId, TagId};

/// Card priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "baixa")]
    Low,
    #[default]
    #[serde(alias = "media", alias = "média")]
    Medium,
    #[serde(alias = "alta")]
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Label shown in the card dialog
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Baixa",
            Priority::Medium => "Média",
            Priority::High => "Alta",
        }
    }
}

/// A task card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    /// Owning column
    #[serde(rename = "card_id", alias = "taskcard_id")]
    pub column_id: ColumnId,
    #[serde(rename = "item")]
    pub title: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "prioridade", default)]
    pub priority: Priority,
    /// Position within the column (top to bottom)
    #[serde(default)]
    pub position: i32,
    /// Attached tags, in display order
    #[serde(rename = "tickets", default)]
    pub tags: Vec<TagId>,
    #[serde(rename = "checklist_id", default)]
    pub checklist: Option<ChecklistId>,
}

impl Card {
    pub fn new(id: CardId, column_id: ColumnId, title: impl Into<String>, position: i32) -> Self {
        Self {
            id,
            column_id,
            title: title.into(),
            description: None,
            priority: Priority::Medium,
            position,
            tags: Vec::new(),
            checklist: None,
        }
    }

    pub fn has_tag(&self, tag: TagId) -> bool {
        self.tags.contains(&tag)
    }
}

impl Entity for Card {
    type Id = CardId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_decodes_backend_fields() {
        let json = r#"{
            "id": 4,
            "card_id": 2,
            "item": "Ler 10 páginas",
            "descricao": null,
            "prioridade": "alta",
            "position": 3,
            "tickets": [1, 5]
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, CardId(4));
        assert_eq!(card.column_id, ColumnId(2));
        assert_eq!(card.priority, Priority::High);
        assert_eq!(card.tags, vec![TagId(1), TagId(5)]);
        assert!(card.checklist.is_none());
    }

    #[test]
    fn test_priority_wire_names() {
        assert_eq!(serde_json::to_value(Priority::Low).unwrap(), "low");
        let media: Priority = serde_json::from_str(r#""média""#).unwrap();
        assert_eq!(media, Priority::Medium);
        assert!(serde_json::from_str::<Priority>(r#""???""#).is_err());
        assert_eq!(Priority::default(), Priority::Medium);
    }
}
