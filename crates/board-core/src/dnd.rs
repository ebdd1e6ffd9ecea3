//! Drag gesture state machine.
//!
//! `Idle -> Pending -> Dragging -> Completed -> Idle`. A press only becomes
//! a drag once the pointer travels the activation distance, which tells
//! clicks apart from drags and keeps a second drag from starting while one
//! is active.

use crate::domain::{CardId, ColumnId};

/// What is being dragged, or what it is dropped on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragId {
    Column(ColumnId),
    Card(CardId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase<Id> {
    Idle,
    /// Pressed, not yet moved far enough
    Pending { id: Id, origin: (i32, i32) },
    Dragging { id: Id, over: Option<Id> },
    /// Released; waiting for the drop to be handled
    Completed { id: Id, target: Option<Id> },
}

/// Result of releasing an active drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnd<Id> {
    pub dragged: Id,
    /// `None` when released outside any valid drop zone
    pub target: Option<Id>,
}

#[derive(Debug, Clone)]
pub struct DragMachine<Id> {
    phase: DragPhase<Id>,
    activation_distance: i32,
}

impl<Id: Copy + Eq> DragMachine<Id> {
    pub fn new(activation_distance: i32) -> Self {
        Self {
            phase: DragPhase::Idle,
            activation_distance: activation_distance.max(0),
        }
    }

    pub fn phase(&self) -> DragPhase<Id> {
        self.phase
    }

    /// Pointer down on a draggable. Ignored unless idle.
    pub fn press(&mut self, id: Id, x: i32, y: i32) -> bool {
        match self.phase {
            DragPhase::Idle | DragPhase::Completed { .. } => {
                self.phase = DragPhase::Pending { id, origin: (x, y) };
                true
            }
            _ => false,
        }
    }

    /// Pointer moved. Returns the id when this move activates the drag.
    pub fn pointer_move(&mut self, x: i32, y: i32) -> Option<Id> {
        let DragPhase::Pending { id, origin } = self.phase else {
            return None;
        };
        let dx = (x - origin.0).abs();
        let dy = (y - origin.1).abs();
        if dx.max(dy) >= self.activation_distance && (dx > 0 || dy > 0) {
            self.phase = DragPhase::Dragging { id, over: None };
            return Some(id);
        }
        None
    }

    /// Pointer entered (`Some`) or left (`None`) a drop target
    pub fn hover(&mut self, target: Option<Id>) {
        if let DragPhase::Dragging { id, .. } = self.phase {
            let over = target.filter(|t| *t != id);
            self.phase = DragPhase::Dragging { id, over };
        }
    }

    /// Pointer up. Only an active drag produces a `DragEnd`; a pending
    /// press falls back to idle so the click goes through.
    pub fn release(&mut self) -> Option<DragEnd<Id>> {
        match self.phase {
            DragPhase::Dragging { id, over } => {
                self.phase = DragPhase::Completed { id, target: over };
                Some(DragEnd {
                    dragged: id,
                    target: over,
                })
            }
            DragPhase::Pending { .. } => {
                self.phase = DragPhase::Idle;
                None
            }
            _ => None,
        }
    }

    /// Abort whatever is in progress
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }

    /// Drop handled
    pub fn finish(&mut self) {
        if let DragPhase::Completed { .. } = self.phase {
            self.phase = DragPhase::Idle;
        }
    }

    pub fn dragging(&self) -> Option<Id> {
        match self.phase {
            DragPhase::Dragging { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn over(&self) -> Option<Id> {
        match self.phase {
            DragPhase::Dragging { over, .. } => over,
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, DragPhase::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: DragId = DragId::Card(CardId(1));
    const OTHER: DragId = DragId::Card(CardId(2));

    #[test]
    fn test_small_move_stays_pending() {
        let mut dnd = DragMachine::new(5);
        assert!(dnd.press(CARD, 100, 100));
        assert_eq!(dnd.pointer_move(103, 102), None);
        assert!(matches!(dnd.phase(), DragPhase::Pending { .. }));
    }

    #[test]
    fn test_activation_after_threshold() {
        let mut dnd = DragMachine::new(5);
        dnd.press(CARD, 0, 0);
        assert_eq!(dnd.pointer_move(0, 6), Some(CARD));
        assert_eq!(dnd.dragging(), Some(CARD));
        // already dragging: no second activation
        assert_eq!(dnd.pointer_move(0, 20), None);
    }

    #[test]
    fn test_click_releases_to_idle() {
        let mut dnd = DragMachine::new(5);
        dnd.press(CARD, 0, 0);
        assert_eq!(dnd.release(), None);
        assert!(dnd.is_idle());
    }

    #[test]
    fn test_drop_on_target() {
        let mut dnd = DragMachine::new(0);
        dnd.press(CARD, 0, 0);
        dnd.pointer_move(1, 0);
        dnd.hover(Some(OTHER));
        let end = dnd.release().unwrap();
        assert_eq!(end.dragged, CARD);
        assert_eq!(end.target, Some(OTHER));
        assert!(matches!(dnd.phase(), DragPhase::Completed { .. }));
        dnd.finish();
        assert!(dnd.is_idle());
    }

    #[test]
    fn test_hover_self_and_leave_clear_target() {
        let mut dnd = DragMachine::new(0);
        dnd.press(CARD, 0, 0);
        dnd.pointer_move(3, 3);
        dnd.hover(Some(CARD));
        assert_eq!(dnd.over(), None);
        dnd.hover(Some(OTHER));
        dnd.hover(None);
        assert_eq!(dnd.release().unwrap().target, None);
    }

    #[test]
    fn test_second_press_ignored_while_dragging() {
        let mut dnd = DragMachine::new(0);
        dnd.press(CARD, 0, 0);
        dnd.pointer_move(2, 0);
        assert!(!dnd.press(OTHER, 0, 0));
        assert_eq!(dnd.dragging(), Some(CARD));
    }
}
