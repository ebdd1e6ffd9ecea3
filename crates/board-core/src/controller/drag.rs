//! Drop resolution for column and card drags.

use super::{BoardController, PendingSync};
use crate::dnd::DragId;
use crate::domain::{Board, Card, CardId, Column, ColumnId};
use crate::positioning::{move_within, resequence};
use crate::remote::{ColumnUpdate, ReorderCard};

/// What the floating preview shows while dragging
#[derive(Debug, Clone, PartialEq)]
pub enum DragPreview {
    Column(Column),
    Card(Card),
}

impl BoardController {
    /// Start a drag. Returns `None` when the entity is unknown, not saved
    /// yet, or sits in a column whose title is being edited.
    pub fn on_drag_start(&self, id: DragId) -> Option<DragPreview> {
        let board = self.cache.board()?;
        let mut edits = self.edits();
        let preview = match id {
            DragId::Column(column) => {
                let column = board.column(column)?;
                if column.id.is_temporary() || edits.editing_columns.contains(&column.id) {
                    return None;
                }
                DragPreview::Column(column.clone())
            }
            DragId::Card(card) => {
                let card = board.card(card)?;
                if card.id.is_temporary() || edits.editing_columns.contains(&card.column_id) {
                    return None;
                }
                DragPreview::Card(card.clone())
            }
        };
        edits.active_drag = Some(id);
        tracing::debug!(?id, "drag started");
        Some(preview)
    }

    /// Entity currently being dragged
    pub fn active_drag(&self) -> Option<DragId> {
        self.edits().active_drag
    }

    /// Resolve a drop, write the new order to the cache and hand back the
    /// request that reconciles it. `None` means nothing changed.
    pub fn on_drag_end(&self, dragged: DragId, target: Option<DragId>) -> Option<PendingSync> {
        self.edits().active_drag = None;
        let target = target.filter(|t| *t != dragged)?;

        let (_mutation, pending) = self.optimistic_board(|board| match dragged {
            DragId::Column(column) => {
                move_column(board, column, target).map(PendingSync::MoveColumn)
            }
            DragId::Card(card) => move_card(board, card, target).map(PendingSync::ReorderCard),
        })?;
        tracing::debug!(?dragged, ?target, "drop applied");
        Some(pending)
    }

    /// `on_drag_end` followed by `sync`
    pub async fn drop_and_sync(&self, dragged: DragId, target: Option<DragId>) -> bool {
        match self.on_drag_end(dragged, target) {
            Some(pending) => self.sync(pending).await.is_ok(),
            None => false,
        }
    }
}

/// Move a column to where `target` sits. Dropping a column on a card does
/// nothing.
fn move_column(board: &mut Board, dragged: ColumnId, target: DragId) -> Option<ColumnUpdate> {
    let DragId::Column(target) = target else {
        return None;
    };
    if dragged.is_temporary() {
        return None;
    }
    let from = board.column_index(dragged)?;
    let to = board.column_index(target)?;
    if !move_within(&mut board.columns, from, to) {
        return None;
    }
    resequence(&mut board.columns);

    let moved = &board.columns[to];
    Some(ColumnUpdate {
        id: moved.id,
        title: moved.title.clone(),
        position: moved.position,
    })
}

/// Move a card onto another card (taking its index) or onto a column (to
/// the end of it)
fn move_card(board: &mut Board, dragged: CardId, target: DragId) -> Option<ReorderCard> {
    let (source, from) = board.locate_card(dragged)?;
    let (dest, to) = match target {
        DragId::Card(other) => board.locate_card(other)?,
        DragId::Column(column) => {
            let dest = board.column_index(column)?;
            let len = board.columns[dest].cards.len();
            (dest, if dest == source { len - 1 } else { len })
        }
    };
    let dest_id = board.columns[dest].id;
    if dragged.is_temporary() || dest_id.is_temporary() {
        return None;
    }

    if source == dest {
        let cards = &mut board.columns[source].cards;
        if !move_within(cards, from, to) {
            return None;
        }
        resequence(cards);
    } else {
        let mut card = board.columns[source].cards.remove(from);
        resequence(&mut board.columns[source].cards);
        card.column_id = dest_id;
        let cards = &mut board.columns[dest].cards;
        cards.insert(to.min(cards.len()), card);
        resequence(cards);
    }

    let card = board.card(dragged)?;
    Some(ReorderCard {
        tarefa_id: dragged,
        position: card.position,
        card_id: dest_id,
    })
}
