//! Drag Preview Component
//!
//! Floating copy of the column or card being dragged, following the pointer.

use board_core::DragPreview;
use leptos::prelude::*;

use crate::context::use_board;

#[component]
pub fn DragPreviewLayer() -> impl IntoView {
    let ctx = use_board();

    let style = move || {
        let (x, y) = ctx.dnd.pointer.get();
        format!("left: {}px; top: {}px;", x + 8, y + 8)
    };

    view! {
        {move || ctx.preview.get().map(|preview| {
            let body = match preview {
                DragPreview::Column(column) => view! {
                    <div class="board-column preview">
                        <strong>{column.title}</strong>
                        <span class="column-count">{column.cards.len()}</span>
                    </div>
                }.into_any(),
                DragPreview::Card(card) => view! {
                    <div class="card-tile preview">
                        <div class="card-title">{card.title}</div>
                        <span class="priority">{card.priority.label()}</span>
                    </div>
                }.into_any(),
            };
            view! { <div class="drag-preview" style=style>{body}</div> }
        })}
    }
}
