//! Board View Component
//!
//! Columns laid out left to right, followed by the new-column form.

use leptos::prelude::*;
use leptos_dragdrop::make_on_mouseleave;

use crate::components::{ColumnView, NewColumnForm};
use crate::context::use_board;

#[component]
pub fn BoardView() -> impl IntoView {
    let ctx = use_board();
    let column_ids = move || {
        ctx.board
            .get()
            .columns
            .iter()
            .map(|c| c.id)
            .collect::<Vec<_>>()
    };

    view! {
        <div class="board" on:mouseleave=make_on_mouseleave(ctx.dnd)>
            <For
                each=column_ids
                key=|id| *id
                children=move |id| view! { <ColumnView id=id /> }
            />
            <NewColumnForm />
        </div>
    }
}
