//! New Column Form Component

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_board;

#[component]
pub fn NewColumnForm() -> impl IntoView {
    let ctx = use_board();
    let (new_title, set_new_title) = signal(String::new());

    let create_column = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let title = new_title.get();
        if title.trim().is_empty() { return; }
        set_new_title.set(String::new());

        let controller = ctx.controller();
        spawn_local(async move {
            if controller.create_column(&title).await.is_err() {
                // put the text back so it is not lost
                set_new_title.set(title);
            }
        });
    };

    view! {
        <form class="new-column-form" on:submit=create_column>
            <input
                type="text"
                placeholder="Nova lista..."
                prop:value=move || new_title.get()
                on:input=move |ev| set_new_title.set(event_target_value(&ev))
            />
            <button type="submit">"Adicionar"</button>
        </form>
    }
}
