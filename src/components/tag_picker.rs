//! Tag Picker Component
//!
//! Shows the tags on a card and an input with fuzzy autocomplete over all
//! tags. Submitting a name that does not exist yet creates the tag first.
//! Semicolon-separated input adds several tags at once.

use board_core::{CardId, Tag};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::ConfirmDelete;
use crate::context::use_board;

/// Simple fuzzy match: check if query chars appear in order in the target
pub fn fuzzy_match(query: &str, target: &str) -> bool {
    let query = query.to_lowercase();
    let target = target.to_lowercase();

    let mut target_chars = target.chars();
    query
        .chars()
        .all(|q| target_chars.any(|c| c == q))
}

/// Text after the last semicolon
fn current_segment(input: &str) -> &str {
    input.rsplit(';').next().unwrap_or("").trim()
}

fn replace_current_segment(input: &str, new_segment: &str) -> String {
    match input.rfind(';') {
        Some(pos) => format!("{}; {}", &input[..pos], new_segment),
        None => new_segment.to_string(),
    }
}

/// Add `name` to the card, creating the tag when no tag has that name
async fn add_tag_by_name(controller: board_core::BoardController, card: CardId, name: String) {
    let existing = controller
        .tags()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(&name))
        .map(|t| t.id);
    let tag = match existing {
        Some(id) => id,
        None => match controller.create_tag(&name, None).await {
            Ok(id) => id,
            Err(_) => return,
        },
    };
    let _ = controller.assign_tag(card, tag).await;
}

#[component]
pub fn TagPicker(card: CardId) -> impl IntoView {
    let ctx = use_board();
    let (input_value, set_input_value) = signal(String::new());
    let (selected_idx, set_selected_idx) = signal(0usize);

    let assigned = move || {
        let tag_ids = ctx
            .board
            .get()
            .card(card)
            .map(|c| c.tags.clone())
            .unwrap_or_default();
        let tags = ctx.tags.get();
        tag_ids
            .iter()
            .filter_map(|id| tags.iter().find(|t| t.id == *id).cloned())
            .collect::<Vec<Tag>>()
    };

    let suggestions = move || {
        let input = input_value.get();
        let segment = current_segment(&input);
        if segment.is_empty() {
            return vec![];
        }
        ctx.tags
            .get()
            .into_iter()
            .filter(|tag| fuzzy_match(segment, &tag.name))
            .take(5)
            .collect::<Vec<_>>()
    };

    let submit_input = move || {
        let input = input_value.get();
        let names: Vec<String> = input
            .split(';')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // the last segment may be a partial match of the highlighted suggestion
        let sugg = suggestions();
        let sel = selected_idx.get();
        let last = names.len().saturating_sub(1);
        for (i, name) in names.into_iter().enumerate() {
            let name = match sugg.get(sel) {
                Some(s) if i == last && fuzzy_match(&name, &s.name) => s.name.clone(),
                _ => name,
            };
            spawn_local(add_tag_by_name(ctx.controller(), card, name));
        }
        set_input_value.set(String::new());
        set_selected_idx.set(0);
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        let sugg = suggestions();
        let sel = selected_idx.get();
        match ev.key().as_str() {
            // Enter would otherwise submit the surrounding card form
            "Enter" => {
                ev.prevent_default();
                submit_input();
            }
            "Tab" => {
                ev.prevent_default();
                if let Some(s) = sugg.get(sel) {
                    set_input_value.set(replace_current_segment(&input_value.get(), &s.name));
                    set_selected_idx.set(0);
                }
            }
            "ArrowDown" => {
                ev.prevent_default();
                if sel + 1 < sugg.len() {
                    set_selected_idx.set(sel + 1);
                }
            }
            "ArrowUp" => {
                ev.prevent_default();
                if sel > 0 {
                    set_selected_idx.set(sel - 1);
                }
            }
            _ => {}
        }
    };

    view! {
        <div class="tag-picker">
            <div class="card-tags">
                {move || assigned().into_iter().map(|tag| {
                    let tag_id = tag.id;
                    view! {
                        <span class="tag-chip" style=format!("background: {};", tag.color)>
                            {tag.name}
                            <button
                                type="button"
                                class="tag-remove-btn"
                                on:click=move |_| {
                                    let controller = ctx.controller();
                                    spawn_local(async move {
                                        let _ = controller.unassign_tag(card, tag_id).await;
                                    });
                                }
                            >
                                "×"
                            </button>
                        </span>
                    }
                }).collect_view()}
            </div>

            <div class="tag-input-wrapper">
                <input
                    type="text"
                    placeholder="Adicionar etiqueta (separe com ;)..."
                    autocomplete="off"
                    prop:value=move || input_value.get()
                    on:input=move |ev| {
                        set_input_value.set(event_target_value(&ev));
                        set_selected_idx.set(0);
                    }
                    on:keydown=on_keydown
                />

                {move || {
                    let sugg = suggestions();
                    let selected = selected_idx.get();
                    (!sugg.is_empty()).then(|| view! {
                        <div class="autocomplete-list">
                            {sugg.into_iter().enumerate().map(|(i, tag)| {
                                let name = tag.name.clone();
                                view! {
                                    <button
                                        type="button"
                                        class=if i == selected { "autocomplete-item selected" } else { "autocomplete-item" }
                                        on:click=move |_| {
                                            set_input_value.set(replace_current_segment(&input_value.get_untracked(), &name));
                                            set_selected_idx.set(0);
                                        }
                                    >
                                        {tag.name}
                                    </button>
                                }
                            }).collect_view()}
                        </div>
                    })
                }}
            </div>

            <details class="tag-catalogue">
                <summary>"Gerenciar etiquetas"</summary>
                {move || ctx.tags.get().into_iter().map(|tag| {
                    let tag_id = tag.id;
                    view! {
                        <div class="tag-row">
                            <span class="tag-chip" style=format!("background: {};", tag.color)>{tag.name}</span>
                            <ConfirmDelete
                                prompt=Signal::derive(|| "Excluir etiqueta de todas as tarefas?".to_string())
                                unsaved=tag_id.is_temporary()
                                on_confirm=move |_| {
                                    let controller = ctx.controller();
                                    spawn_local(async move {
                                        let _ = controller.delete_tag(tag_id).await;
                                    });
                                }
                            />
                        </div>
                    }
                }).collect_view()}
            </details>
        </div>
    }
}
