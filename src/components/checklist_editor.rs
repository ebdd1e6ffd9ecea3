//! Checklist Editor Component
//!
//! Loads the card's checklist on open. Subtasks toggle immediately; name
//! edits are debounced like column titles.

use board_core::{CardId, SubtaskId};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_board;

#[component]
pub fn ChecklistEditor(card: CardId) -> impl IntoView {
    let ctx = use_board();
    let (new_subtask, set_new_subtask) = signal(String::new());

    let controller = ctx.controller();
    spawn_local(async move {
        let _ = controller.load_checklist(card).await;
    });

    let checklist = move || ctx.checklist(card);
    let progress = move || {
        checklist().map(|c| {
            let (done, total) = c.progress();
            format!("{}/{}", done, total)
        })
    };

    let rename = move |subtask: SubtaskId, value: String| {
        let controller = ctx.controller();
        if let Some(ticket) = controller.rename_subtask_local(card, subtask, &value) {
            let delay = ctx.debounce_ms;
            spawn_local(async move {
                TimeoutFuture::new(delay).await;
                let _ = controller.flush_subtask_rename(ticket).await;
            });
        }
    };

    let add_subtask = move || {
        let name = new_subtask.get();
        if name.trim().is_empty() { return; }
        set_new_subtask.set(String::new());
        let controller = ctx.controller();
        spawn_local(async move {
            let _ = controller.add_subtask(card, &name).await;
        });
    };

    view! {
        <div class="checklist-editor">
            <div class="pane-header">
                "Checklist " {progress}
            </div>
            {move || match checklist() {
                None => view! {
                    <button
                        type="button"
                        class="create-checklist-btn"
                        on:click=move |_| {
                            let controller = ctx.controller();
                            spawn_local(async move {
                                let _ = controller.create_checklist(card).await;
                            });
                        }
                    >
                        "Criar checklist"
                    </button>
                }.into_any(),
                Some(list) => view! {
                    <ul class="subtask-list">
                        {list.subtasks.into_iter().map(|subtask| {
                            let id = subtask.id;
                            view! {
                                <li class=if subtask.checked { "subtask done" } else { "subtask" }>
                                    <input
                                        type="checkbox"
                                        prop:checked=subtask.checked
                                        disabled=id.is_temporary()
                                        on:change=move |_| {
                                            let controller = ctx.controller();
                                            spawn_local(async move {
                                                let _ = controller.toggle_subtask(card, id).await;
                                            });
                                        }
                                    />
                                    <input
                                        type="text"
                                        class="subtask-name"
                                        prop:value=subtask.name
                                        on:input=move |ev| rename(id, event_target_value(&ev))
                                    />
                                    <button
                                        type="button"
                                        class="delete-btn"
                                        on:click=move |_| {
                                            let controller = ctx.controller();
                                            spawn_local(async move {
                                                let _ = controller.remove_subtask(card, id).await;
                                            });
                                        }
                                    >
                                        "×"
                                    </button>
                                </li>
                            }
                        }).collect_view()}
                    </ul>
                    <div class="subtask-add">
                        <input
                            type="text"
                            placeholder="Nova subtarefa..."
                            prop:value=move || new_subtask.get()
                            on:input=move |ev| set_new_subtask.set(event_target_value(&ev))
                            on:keydown=move |ev: web_sys::KeyboardEvent| {
                                if ev.key() == "Enter" {
                                    ev.prevent_default();
                                    add_subtask();
                                }
                            }
                        />
                        <button type="button" on:click=move |_| add_subtask()>"+"</button>
                    </div>
                }.into_any(),
            }}
        </div>
    }
}
