//! Cache keys and the values stored under them.

use crate::domain::{Board, CardId, Checklist, Tag};

/// Key addressing one cached query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Columns with their nested cards
    Board,
    /// All tags
    Tags,
    /// Checklist of one card
    Checklist(CardId),
}

/// Cached query result
#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    Board(Board),
    Tags(Vec<Tag>),
    Checklist(Option<Checklist>),
}

impl QueryData {
    pub fn as_board_mut(&mut self) -> Option<&mut Board> {
        match self {
            QueryData::Board(board) => Some(board),
            _ => None,
        }
    }

    pub fn as_tags_mut(&mut self) -> Option<&mut Vec<Tag>> {
        match self {
            QueryData::Tags(tags) => Some(tags),
            _ => None,
        }
    }

    pub fn as_checklist_mut(&mut self) -> Option<&mut Checklist> {
        match self {
            QueryData::Checklist(Some(list)) => Some(list),
            _ => None,
        }
    }
}
