//! Card Tile Component
//!
//! Compact card inside a column. Clicking opens the card dialog.

use board_core::{CardId, DragId, Priority};
use leptos::prelude::*;
use leptos_dragdrop::{make_on_mousedown, make_on_mouseover};

use crate::context::use_board;

fn priority_class(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "priority low",
        Priority::Medium => "priority medium",
        Priority::High => "priority high",
    }
}

#[component]
pub fn CardTile(id: CardId) -> impl IntoView {
    let ctx = use_board();
    let drag_id = DragId::Card(id);

    let card = Memo::new(move |_| ctx.board.get().card(id).cloned());
    let tag_chips = move || {
        let Some(card) = card.get() else {
            return Vec::new();
        };
        let tags = ctx.tags.get();
        card.tags
            .iter()
            .filter_map(|tag_id| tags.iter().find(|t| t.id == *tag_id).cloned())
            .collect::<Vec<_>>()
    };

    let tile_class = move || {
        let mut c = String::from("card-tile");
        if ctx.dnd.dragging.get() == Some(drag_id) { c.push_str(" dragging"); }
        if ctx.dnd.over.get() == Some(drag_id) { c.push_str(" drop-target"); }
        if id.is_temporary() { c.push_str(" pending"); }
        c
    };

    view! {
        <article
            class=tile_class
            on:mousedown=make_on_mousedown(ctx.dnd, drag_id)
            on:mouseover=make_on_mouseover(ctx.dnd, drag_id)
            on:click=move |_| {
                // ignore the click that ends a drag
                if !ctx.dnd.drag_just_ended.get_untracked() && !id.is_temporary() {
                    ctx.opened_card.set(Some(id));
                }
            }
        >
            {move || card.get().map(|card| {
                let priority = card.priority;
                view! {
                    <div class="card-title">{card.title.clone()}</div>
                    <div class="card-meta">
                        <span class=priority_class(priority)>{priority.label()}</span>
                        {card.checklist.map(|_| view! { <span class="checklist-mark">"☑"</span> })}
                    </div>
                }
            })}
            <div class="card-tags">
                {move || tag_chips().into_iter().map(|tag| view! {
                    <span class="tag-chip" style=format!("background: {};", tag.color)>
                        {tag.name}
                    </span>
                }).collect_view()}
            </div>
        </article>
    }
}
