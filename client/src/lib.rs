//! Browser front-end for the teacher-evaluation platform.
//!
//! ARCHITECTURE
//! ============
//! - `app` builds the one `SessionController` and the router.
//! - `net` adapts the browser's fetch to the core `Transport` seam.
//! - `state` holds reactive mirrors of session and notice state.
//! - `components` / `pages` render; `util` holds browser glue.
//!
//! Everything that touches `web-sys` or `gloo` is gated on the `csr`
//! feature so the pure helpers build and test natively.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger unavailable: {e}");
    }
    leptos::mount::mount_to_body(app::App);
}
