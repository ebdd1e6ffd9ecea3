//! Two-step delete for columns, cards and tags.
//!
//! The prompt names what goes with the entity (a column takes its cards
//! along). Entities the server has not confirmed cannot be deleted yet, and
//! a pending confirmation closes as soon as a drag starts.

use leptos::prelude::*;

use crate::context::use_board;

#[component]
pub fn ConfirmDelete(
    /// Question shown once the × is clicked
    #[prop(into)]
    prompt: Signal<String>,
    /// Entity still carries a temporary id
    #[prop(optional)]
    unsaved: bool,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let ctx = use_board();
    let (asking, set_asking) = signal(false);

    Effect::new(move |_| {
        if ctx.dnd.dragging.get().is_some() {
            set_asking.set(false);
        }
    });

    view! {
        {move || if asking.get() {
            view! {
                <span
                    class="delete-confirm"
                    on:mousedown=|ev| ev.stop_propagation()
                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Escape" {
                            set_asking.set(false);
                        }
                    }
                >
                    <span class="delete-confirm-text">{move || prompt.get()}</span>
                    <button
                        type="button"
                        class="confirm-btn"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_asking.set(false);
                            on_confirm.run(());
                        }
                    >
                        "Excluir"
                    </button>
                    <button
                        type="button"
                        class="cancel-btn"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_asking.set(false);
                        }
                    >
                        "Cancelar"
                    </button>
                </span>
            }.into_any()
        } else {
            view! {
                <button
                    type="button"
                    class="delete-btn"
                    title=if unsaved { "Aguardando o servidor" } else { "Excluir" }
                    disabled=unsaved
                    on:mousedown=|ev| ev.stop_propagation()
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_asking.set(true);
                    }
                >
                    "×"
                </button>
            }.into_any()
        }}
    }
}
