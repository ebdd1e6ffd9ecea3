//! Modo Caverna Board Frontend Entry Point

mod app;
mod components;
mod context;
mod markdown;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    board_core::logging::init_logging();
    mount_to_body(App);
}
