//! Modo Caverna Board App
//!
//! Builds the controller, loads the board and wires drag and drop.

use std::sync::Arc;

use board_core::notify::DEMO_MODE_NOTICE;
use board_core::{BoardController, DragId, InMemoryTaskStore, Notifier, QueryCache};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::bind_global_handlers;

use crate::components::{BoardView, CardDialog, DragPreviewLayer, Toasts};
use crate::context::{ui_config, BoardContext};

#[component]
pub fn App() -> impl IntoView {
    let config = ui_config();
    let controller = BoardController::from_config(&config).unwrap_or_else(|err| {
        web_sys::console::error_1(&format!("[BOARD] Falling back to demo data: {}", err).into());
        let notifier = Notifier::new();
        notifier.info(DEMO_MODE_NOTICE);
        BoardController::new(Arc::new(InMemoryTaskStore::demo()), QueryCache::new(), notifier)
    });

    let ctx = BoardContext::new(controller, &config);
    provide_context(ctx);

    // Initial load
    spawn_local(async move {
        let controller = ctx.controller();
        if controller.load_board().await.is_ok() {
            web_sys::console::log_1(
                &format!("[BOARD] Loaded {} columns", ctx.board.get_untracked().columns.len()).into(),
            );
        }
        let _ = controller.load_tags().await;
    });

    bind_global_handlers(
        ctx.dnd,
        move |id: DragId| match ctx.controller().on_drag_start(id) {
            Some(preview) => {
                ctx.preview.set(Some(preview));
                true
            }
            None => false,
        },
        move |dragged: DragId, target: Option<DragId>| {
            ctx.preview.set(None);
            web_sys::console::log_1(&format!("[DND] Drop: dragged={:?}, target={:?}", dragged, target).into());
            let controller = ctx.controller();
            // Cache is written synchronously; only the request is awaited
            if let Some(pending) = controller.on_drag_end(dragged, target) {
                spawn_local(async move {
                    let _ = controller.sync(pending).await;
                });
            }
        },
    );

    view! {
        <div class="app-layout">
            <main class="main-content">
                <h1>"Quadro de tarefas"</h1>
                <BoardView />
                <p class="item-count">
                    {move || {
                        let board = ctx.board.get();
                        format!("{} listas, {} tarefas", board.columns.len(), board.card_count())
                    }}
                </p>
            </main>
            <CardDialog />
            <DragPreviewLayer />
            <Toasts />
        </div>
    }
}
