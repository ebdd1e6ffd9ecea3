//! Column View Component
//!
//! One task list: draggable header with inline rename and confirmed delete,
//! its cards, and the button that appends a new card.

use board_core::{ColumnId, DragId};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{make_on_mousedown, make_on_mouseover};

use crate::components::{CardTile, ConfirmDelete};
use crate::context::use_board;

#[component]
pub fn ColumnView(id: ColumnId) -> impl IntoView {
    let ctx = use_board();
    let drag_id = DragId::Column(id);

    let column = Memo::new(move |_| ctx.board.get().column(id).cloned());
    let title = move || column.get().map(|c| c.title).unwrap_or_default();
    let card_ids = move || {
        column
            .get()
            .map(|c| c.cards.iter().map(|card| card.id).collect::<Vec<_>>())
            .unwrap_or_default()
    };

    let column_class = move || {
        let mut c = String::from("board-column");
        if ctx.dnd.dragging.get() == Some(drag_id) { c.push_str(" dragging"); }
        if ctx.dnd.over.get() == Some(drag_id) { c.push_str(" drop-target"); }
        if id.is_temporary() { c.push_str(" pending"); }
        c
    };

    let on_title_input = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        let controller = ctx.controller();
        if let Some(ticket) = controller.rename_column_local(id, &value) {
            let delay = ctx.debounce_ms;
            spawn_local(async move {
                TimeoutFuture::new(delay).await;
                let _ = controller.flush_column_rename(ticket).await;
            });
        }
    };

    let add_card = move |_| {
        let controller = ctx.controller();
        spawn_local(async move {
            if let Ok(card) = controller.create_card(id).await {
                web_sys::console::log_1(&format!("[BOARD] Created card {}", card).into());
            }
        });
    };

    view! {
        <section
            class=column_class
            on:mousedown=make_on_mousedown(ctx.dnd, drag_id)
            on:mouseover=make_on_mouseover(ctx.dnd, drag_id)
        >
            <header class="column-header">
                <input
                    class="column-title"
                    type="text"
                    prop:value=title
                    on:focus=move |_| ctx.controller().begin_column_edit(id)
                    on:blur=move |_| ctx.controller().end_column_edit(id)
                    on:input=on_title_input
                />
                <span class="column-count">{move || card_ids().len()}</span>
                <ConfirmDelete
                    prompt=Signal::derive(move || match card_ids().len() {
                        0 => "Excluir coluna?".to_string(),
                        1 => "Excluir coluna e 1 tarefa?".to_string(),
                        n => format!("Excluir coluna e {} tarefas?", n),
                    })
                    unsaved=id.is_temporary()
                    on_confirm=move |_| {
                        let controller = ctx.controller();
                        spawn_local(async move {
                            let _ = controller.delete_column(id).await;
                        });
                    }
                />
            </header>

            <div class="column-cards">
                <For
                    each=card_ids
                    key=|card| *card
                    children=move |card| view! { <CardTile id=card /> }
                />
            </div>

            <button class="add-card-btn" on:click=add_card disabled=id.is_temporary()>
                "+ Nova tarefa"
            </button>
        </section>
    }
}
