//! TaskFlow Frontend Entry Point

mod app;
mod auth;
mod commands;
mod components;
mod config;
mod context;
mod models;
mod notes;
mod session;
mod storage;
mod tasks;
mod toast;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    wasm_tracing::set_as_global_default();
    mount_to_body(App);
}
