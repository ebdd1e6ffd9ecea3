//! Positioning Operations
//!
//! Columns and cards carry integer positions that must stay contiguous
//! (base, base + 1, ...) after every insert, move and delete.

use crate::domain::{Card, Column};

/// First position value in any ordered list
pub const POSITION_BASE: i32 = 1;

/// Anything ordered by an integer position
pub trait Positioned {
    fn position(&self) -> i32;
    fn set_position(&mut self, position: i32);
}

impl Positioned for Column {
    fn position(&self) -> i32 {
        self.position
    }

    fn set_position(&mut self, position: i32) {
        self.position = position;
    }
}

impl Positioned for Card {
    fn position(&self) -> i32 {
        self.position
    }

    fn set_position(&mut self, position: i32) {
        self.position = position;
    }
}

/// Position value for a list index
pub fn position_for_index(index: usize) -> i32 {
    POSITION_BASE + index as i32
}

/// Position a new entry appended to `items` will get
pub fn next_position<T: Positioned>(items: &[T]) -> i32 {
    position_for_index(items.len())
}

/// Reindex items to be sequential in their current slice order
pub fn resequence<T: Positioned>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_position(position_for_index(index));
    }
}

/// Move the element at `from` so it ends up at `to`.
///
/// Returns false (leaving the list untouched) when the move is a no-op or
/// either index is out of range.
pub fn move_within<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// True when positions run base, base + 1, ... in slice order
pub fn is_contiguous<T: Positioned>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.position() == position_for_index(index))
}
