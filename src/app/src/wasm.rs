//! WebAssembly bindings so a browser or webview shell can drive the core.
//!
//! Events, effects and the view model cross the boundary serialized by the
//! Crux bridge.

use lazy_static::lazy_static;
use wasm_bindgen::prelude::wasm_bindgen;

use crux_core::{bridge::Bridge, Core};

use crate::App;

lazy_static! {
    static ref CORE: Bridge<App> = Bridge::new(Core::new());
}

#[wasm_bindgen(start)]
pub fn init_wasm() {
    // a second init (module reloaded in the same page) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Process a serialized [`crate::Event`], returning serialized effects.
#[wasm_bindgen]
pub fn process_event(event_bytes: &[u8]) -> Vec<u8> {
    let mut effects = Vec::new();
    if let Err(e) = CORE.update(event_bytes, &mut effects) {
        log::error!("failed to process event: {e:?}");
    }
    effects
}

/// Resolve the effect `id` (an HTTP response or an acknowledged alert).
#[wasm_bindgen]
pub fn handle_response(id: u32, response_bytes: &[u8]) -> Vec<u8> {
    let mut effects = Vec::new();
    if let Err(e) = CORE.resolve(
        crux_core::bridge::EffectId(id),
        response_bytes,
        &mut effects,
    ) {
        log::error!("failed to resolve effect {id}: {e:?}");
    }
    effects
}

/// Serialized view model for the control screen.
#[wasm_bindgen]
pub fn view() -> Vec<u8> {
    let mut view = Vec::new();
    if let Err(e) = CORE.view(&mut view) {
        log::error!("failed to serialize view model: {e:?}");
    }
    view
}
