//! Gallery WASM Web Runtime
//!
//! Runs the walkthrough (intro dolly, movement with collision, crosshair
//! interaction) against the page's DOM and exposes the camera pose to the
//! host renderer. Also hosts the homepage orb.

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod orb;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod page;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Entry point, called when the WASM module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second start after a hot reload finds the logger already set.
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Gallery web runtime initialized");
}

/// Create the gallery walkthrough on `canvas_id`.
///
/// `layout_toml` overrides the built-in layout when given.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn create_gallery(canvas_id: String, layout_toml: Option<String>) -> Result<app::App, JsValue> {
    app::App::new(&canvas_id, layout_toml)
}

/// Create the homepage orb on `canvas_id`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn create_orb(canvas_id: String) -> Result<orb::OrbWidget, JsValue> {
    orb::OrbWidget::new(&canvas_id)
}
