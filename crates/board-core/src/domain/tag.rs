//! Tag Entity
//!
//! Tags are attached to cards (many-to-many) for categorization.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::ids::TagId;

pub const DEFAULT_TAG_COLOR: &str = "#666666";

/// A tag for categorizing cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    /// Color (hex, e.g., "#FF5733")
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_TAG_COLOR.to_string()
}

impl Tag {
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: default_color(),
        }
    }

    pub fn with_color(id: TagId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
        }
    }
}

impl Entity for Tag {
    type Id = TagId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_creation() {
        let tag = Tag::new(TagId(1), "Trabalho");
        assert_eq!(tag.id(), TagId(1));
        assert_eq!(tag.color, DEFAULT_TAG_COLOR);
    }

    #[test]
    fn test_tag_missing_color_defaults() {
        let tag: Tag = serde_json::from_str(r#"{"id": 2, "name": "Urgente"}"#).unwrap();
        assert_eq!(tag.color, DEFAULT_TAG_COLOR);
    }
}
