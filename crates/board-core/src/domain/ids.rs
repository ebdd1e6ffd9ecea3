//! Entity identifiers.
//!
//! Server-assigned ids are positive. Optimistic inserts use negative
//! temporary ids until the server confirms the entity.

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Placeholder id for an entity the server has not confirmed yet
            pub fn is_temporary(self) -> bool {
                self.0 < 0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

entity_id!(
    /// Task list (column) id
    ColumnId
);
entity_id!(
    /// Task (card) id
    CardId
);
entity_id!(TagId);
entity_id!(ChecklistId);
entity_id!(SubtaskId);
