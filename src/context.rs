//! Board Context
//!
//! Shared state provided via Leptos Context API. The controller lives in a
//! stored value; views track `version`, which a cache listener bumps on
//! every cache write.

use board_core::{
    Board, BoardConfig, BoardController, CardId, Checklist, DragId, DragPreview, Tag,
};
use leptos::prelude::*;
use leptos_dragdrop::{create_dnd_signals, DndSignals};

/// Config baked in at build time (`CAVERNA_API_URL`, `CAVERNA_API_TOKEN`)
pub fn ui_config() -> BoardConfig {
    let defaults = BoardConfig::default();
    let url = option_env!("CAVERNA_API_URL").map(str::to_string);
    let token = option_env!("CAVERNA_API_TOKEN").map(str::to_string);
    match defaults.clone().with_overrides(url, token) {
        Ok(config) => config,
        Err(err) => {
            web_sys::console::error_1(&format!("[BOARD] Invalid build config: {}", err).into());
            defaults
        }
    }
}

#[derive(Clone, Copy)]
pub struct BoardContext {
    controller: StoredValue<BoardController>,
    /// Bumped on every cache write
    version: ReadSignal<u64>,
    pub board: Memo<Board>,
    pub tags: Memo<Vec<Tag>>,
    pub dnd: DndSignals<DragId>,
    /// Floating preview of the entity being dragged
    pub preview: RwSignal<Option<DragPreview>>,
    /// Card shown in the edit dialog
    pub opened_card: RwSignal<Option<CardId>>,
    pub debounce_ms: u32,
}

impl BoardContext {
    pub fn new(controller: BoardController, config: &BoardConfig) -> Self {
        let (version, set_version) = signal(0u64);
        controller.cache().subscribe(move |_key| {
            set_version.update(|v| *v += 1);
        });

        let controller = StoredValue::new(controller);
        let board = Memo::new(move |_| {
            version.track();
            controller.with_value(|c| c.board())
        });
        let tags = Memo::new(move |_| {
            version.track();
            controller.with_value(|c| c.tags())
        });

        Self {
            controller,
            version,
            board,
            tags,
            dnd: create_dnd_signals(config.drag_activation_px),
            preview: RwSignal::new(None),
            opened_card: RwSignal::new(None),
            debounce_ms: u32::try_from(config.rename_debounce_ms).unwrap_or(500),
        }
    }

    /// Handle for async work; clones share the same cache and store
    pub fn controller(&self) -> BoardController {
        self.controller.get_value()
    }

    /// Cached checklist of a card, tracked
    pub fn checklist(&self, card: CardId) -> Option<Checklist> {
        self.version.track();
        self.controller.with_value(|c| c.checklist(card))
    }
}

pub fn use_board() -> BoardContext {
    use_context::<BoardContext>().expect("BoardContext should be provided")
}
