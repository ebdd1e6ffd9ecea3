//! Board View
//!
//! The ordered set of columns (each owning its ordered cards) as held in the
//! client cache.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::card::Card;
use super::column::Column;
use super::ids::{CardId, ColumnId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    /// Build a board, ordering columns and cards by their positions
    pub fn new(mut columns: Vec<Column>) -> Self {
        columns.sort_by_key(|c| (c.position, c.id));
        for column in &mut columns {
            column.cards.sort_by_key(|c| (c.position, c.id));
        }
        Self { columns }
    }

    /// Regroup a flat card listing under its columns.
    ///
    /// Cards already nested in `columns` are replaced; cards pointing at an
    /// unknown column are dropped.
    pub fn from_parts(mut columns: Vec<Column>, cards: Vec<Card>) -> Self {
        let mut by_column: HashMap<ColumnId, Vec<Card>> = HashMap::new();
        for card in cards {
            by_column.entry(card.column_id).or_default().push(card);
        }
        for column in &mut columns {
            column.cards = by_column.remove(&column.id).unwrap_or_default();
        }
        Self::new(columns)
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == id)
    }

    pub fn column_index(&self, id: ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    /// (column index, card index) of a card
    pub fn locate_card(&self, id: CardId) -> Option<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(ci, column)| column.card_index(id).map(|ki| (ci, ki)))
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        let (ci, ki) = self.locate_card(id)?;
        Some(&self.columns[ci].cards[ki])
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        let (ci, ki) = self.locate_card(id)?;
        Some(&mut self.columns[ci].cards[ki])
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.columns.iter().flat_map(|c| c.cards.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_card(id: i64, column: i64, position: i32) -> Card {
        Card::new(CardId(id), ColumnId(column), format!("Card {}", id), position)
    }

    #[test]
    fn test_new_sorts_by_position() {
        let mut a = Column::new(ColumnId(1), "A", 2);
        a.cards = vec![make_card(11, 1, 2), make_card(10, 1, 1)];
        let b = Column::new(ColumnId(2), "B", 1);

        let board = Board::new(vec![a, b]);
        assert_eq!(board.columns[0].id, ColumnId(2));
        assert_eq!(board.columns[1].cards[0].id, CardId(10));
    }

    #[test]
    fn test_from_parts_regroups_flat_cards() {
        let columns = vec![Column::new(ColumnId(1), "A", 1), Column::new(ColumnId(2), "B", 2)];
        let cards = vec![make_card(1, 2, 1), make_card(2, 1, 1), make_card(3, 9, 1)];

        let board = Board::from_parts(columns, cards);
        assert_eq!(board.column(ColumnId(1)).unwrap().cards.len(), 1);
        assert_eq!(board.column(ColumnId(2)).unwrap().cards[0].id, CardId(1));
        assert_eq!(board.card_count(), 2);
    }

    #[test]
    fn test_locate_card() {
        let mut a = Column::new(ColumnId(1), "A", 1);
        a.cards = vec![make_card(1, 1, 1), make_card(2, 1, 2)];
        let board = Board::new(vec![a]);
        assert_eq!(board.locate_card(CardId(2)), Some((0, 1)));
        assert_eq!(board.locate_card(CardId(3)), None);
    }
}
