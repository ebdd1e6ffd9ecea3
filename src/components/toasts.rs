//! Toast notifications for failed mutations and board notices.

use board_core::{Notification, NotificationLevel};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_board;

const TOAST_MS: u32 = 4000;

#[component]
pub fn Toasts() -> impl IntoView {
    let ctx = use_board();
    let toasts = RwSignal::new(Vec::<(u64, Notification)>::new());
    let next_id = StoredValue::new(0u64);

    let show = move |notification: Notification| {
        let id = next_id.get_value();
        next_id.set_value(id + 1);
        web_sys::console::log_1(&format!("[BOARD] {}", notification.message).into());
        toasts.update(|list| list.push((id, notification)));
        spawn_local(async move {
            TimeoutFuture::new(TOAST_MS).await;
            toasts.update(|list| list.retain(|(tid, _)| *tid != id));
        });
    };

    // anything queued before mount
    let notifier = ctx.controller().notifier().clone();
    for notification in notifier.drain() {
        show(notification);
    }
    notifier.subscribe(move |notification| show(notification.clone()));

    view! {
        <div class="toasts">
            <For
                each=move || toasts.get()
                key=|(id, _)| *id
                children=move |(id, notification)| {
                    let class = match notification.level {
                        NotificationLevel::Error => "toast error",
                        NotificationLevel::Info => "toast",
                    };
                    view! {
                        <div class=class on:click=move |_| toasts.update(|list| list.retain(|(tid, _)| *tid != id))>
                            {notification.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
