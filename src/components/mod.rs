//! UI Components
//!
//! Board views, card editing dialogs and feedback overlays.

mod board_view;
mod card_dialog;
mod card_tile;
mod checklist_editor;
mod column_view;
mod confirm_delete;
mod drag_preview;
mod new_column_form;
mod tag_picker;
mod toasts;

pub use board_view::BoardView;
pub use card_dialog::CardDialog;
pub use card_tile::CardTile;
pub use checklist_editor::ChecklistEditor;
pub use column_view::ColumnView;
pub use confirm_delete::ConfirmDelete;
pub use drag_preview::DragPreviewLayer;
pub use new_column_form::NewColumnForm;
pub use tag_picker::TagPicker;
pub use toasts::Toasts;
