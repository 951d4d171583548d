pub mod app;
pub mod components;
#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod event_stream;
pub mod handlers;
pub mod middleware;
#[cfg(feature = "ssr")]
pub mod pipeline;
pub mod services;
pub mod session;
pub mod sse_codec;
pub mod state;
pub mod types;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
