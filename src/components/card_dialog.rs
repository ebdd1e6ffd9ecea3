//! Card Dialog Component
//!
//! Full card editor: title, priority, tags, description with markdown
//! preview, and checklist.

use board_core::remote::CardUpdate;
use board_core::{Card, Priority};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{ChecklistEditor, ConfirmDelete, TagPicker};
use crate::context::use_board;
use crate::markdown::parse_markdown;

#[component]
pub fn CardDialog() -> impl IntoView {
    let ctx = use_board();

    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (priority, set_priority) = signal(Priority::default());
    let (preview_mode, set_preview_mode) = signal(false);

    // Fill the form only when the opened card changes, so edits are not
    // overwritten by cache updates while typing
    Effect::new(move |previous: Option<Option<board_core::CardId>>| {
        let opened = ctx.opened_card.get();
        if opened != previous.flatten() {
            let card: Option<Card> =
                opened.and_then(|id| ctx.board.get_untracked().card(id).cloned());
            if let Some(card) = card {
                set_title.set(card.title);
                set_description.set(card.description.unwrap_or_default());
                set_priority.set(card.priority);
                set_preview_mode.set(false);
            }
        }
        opened
    });

    let close = move || ctx.opened_card.set(None);

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(id) = ctx.opened_card.get_untracked() else { return; };
        let update = CardUpdate {
            title: title.get_untracked(),
            description: Some(description.get_untracked()),
            priority: priority.get_untracked(),
        };
        close();
        let controller = ctx.controller();
        spawn_local(async move {
            let _ = controller.update_card(id, update).await;
        });
    };

    let rendered_html = move || parse_markdown(&description.get());

    view! {
        <Show when=move || ctx.opened_card.get().is_some()>
            <div class="dialog-backdrop" on:click=move |_| close()>
                <form
                    class="card-dialog"
                    on:click=|ev| ev.stop_propagation()
                    on:submit=save
                >
                    <div class="dialog-header">
                        <input
                            class="dialog-title"
                            type="text"
                            prop:value=move || title.get()
                            on:input=move |ev| set_title.set(event_target_value(&ev))
                        />
                        <button type="button" class="close-btn" on:click=move |_| close()>"×"</button>
                    </div>

                    <div class="priority-selector">
                        {Priority::ALL.iter().map(|p| {
                            let p = *p;
                            view! {
                                <button
                                    type="button"
                                    class=move || if priority.get() == p { "type-btn active" } else { "type-btn" }
                                    on:click=move |_| set_priority.set(p)
                                >
                                    {p.label()}
                                </button>
                            }
                        }).collect_view()}
                    </div>

                    {move || ctx.opened_card.get().map(|card| view! { <TagPicker card=card /> })}

                    <div class="description-pane">
                        <div class="pane-header">
                            <button type="button" class="tab-btn" on:click=move |_| set_preview_mode.set(false)>"Editar"</button>
                            <button type="button" class="tab-btn" on:click=move |_| set_preview_mode.set(true)>"Visualizar"</button>
                        </div>
                        <Show
                            when=move || preview_mode.get()
                            fallback=move || view! {
                                <textarea
                                    class="memo-textarea"
                                    placeholder="Descrição (Markdown)..."
                                    prop:value=move || description.get()
                                    on:input=move |ev| set_description.set(event_target_value(&ev))
                                ></textarea>
                            }
                        >
                            <div class="memo-preview-content" inner_html=rendered_html></div>
                        </Show>
                    </div>

                    {move || ctx.opened_card.get().map(|card| view! { <ChecklistEditor card=card /> })}

                    <div class="dialog-footer">
                        {move || ctx.opened_card.get().map(|card| view! {
                            <ConfirmDelete
                                prompt=Signal::derive(|| "Excluir tarefa?".to_string())
                                unsaved=card.is_temporary()
                                on_confirm=move |_| {
                                    close();
                                    let controller = ctx.controller();
                                    spawn_local(async move {
                                        let _ = controller.delete_card(card).await;
                                    });
                                }
                            />
                        })}
                        <button type="submit" class="save-btn">"Salvar"</button>
                    </div>
                </form>
            </div>
        </Show>
    }
}
