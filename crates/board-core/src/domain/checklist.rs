//! Checklist Entity
//!
//! At most one checklist per card, holding ordered subtasks.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::ids::{CardId, ChecklistId, SubtaskId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: ChecklistId,
    #[serde(rename = "tarefa_id")]
    pub card_id: CardId,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Checklist {
    pub fn new(id: ChecklistId, card_id: CardId) -> Self {
        Self {
            id,
            card_id,
            subtasks: Vec::new(),
        }
    }

    /// (checked, total)
    pub fn progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.checked).count();
        (done, self.subtasks.len())
    }

    pub fn subtask_mut(&mut self, id: SubtaskId) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub name: String,
    /// Sent and received as "true"/"false"
    #[serde(with = "bool_string")]
    pub checked: bool,
}

impl Subtask {
    pub fn new(id: SubtaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            checked: false,
        }
    }
}

impl Entity for Checklist {
    type Id = ChecklistId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Entity for Subtask {
    type Id = SubtaskId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Boolean flag carried as a string by the backend.
pub(crate) mod bool_string {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
        Number(i64),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => b,
            Raw::Text(s) => matches!(s.trim(), "true" | "1"),
            Raw::Number(n) => n != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_flag_is_a_string_on_the_wire() {
        let subtask = Subtask {
            id: SubtaskId(1),
            name: "Comprar café".into(),
            checked: true,
        };
        let json = serde_json::to_value(&subtask).unwrap();
        assert_eq!(json["checked"], "true");
    }

    #[test]
    fn test_checked_flag_accepts_strings_and_bools() {
        let a: Subtask = serde_json::from_str(r#"{"id":1,"name":"a","checked":"false"}"#).unwrap();
        let b: Subtask = serde_json::from_str(r#"{"id":2,"name":"b","checked":true}"#).unwrap();
        assert!(!a.checked);
        assert!(b.checked);
    }

    #[test]
    fn test_progress() {
        let mut list = Checklist::new(ChecklistId(1), CardId(9));
        list.subtasks.push(Subtask::new(SubtaskId(1), "a"));
        list.subtasks.push(Subtask::new(SubtaskId(2), "b"));
        list.subtask_mut(SubtaskId(2)).unwrap().checked = true;
        assert_eq!(list.progress(), (1, 2));
    }
}
