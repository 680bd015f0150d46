use gallery_shared::orb::{self, OrbMotion, OrbSettings, OrbVisual, STORAGE_KEY_X, STORAGE_KEY_Y};
use glam::Vec2;
use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::dom;

/// Homepage orb. The host draws it from the array returned by `frame`.
#[wasm_bindgen]
pub struct OrbWidget {
    motion: OrbMotion,
    canvas: HtmlCanvasElement,
}

impl OrbWidget {
    pub fn new(canvas_id: &str) -> Result<OrbWidget, JsValue> {
        let document = dom::document()?;
        let canvas = dom::canvas(&document, canvas_id).map_err(|err| {
            log::warn!("#{canvas_id} not found; orb will not load");
            err
        })?;

        let saved = orb::restore_position(
            dom::storage_get(STORAGE_KEY_X).as_deref(),
            dom::storage_get(STORAGE_KEY_Y).as_deref(),
        );
        if let Some(pos) = saved {
            log::debug!("Restored orb position {pos}");
        }

        let now = dom::now_ms()?;
        Ok(OrbWidget {
            motion: OrbMotion::new(OrbSettings::default(), saved.unwrap_or(Vec2::ZERO), now),
            canvas,
        })
    }
}

#[wasm_bindgen]
impl OrbWidget {
    /// Advance to page time `time` (ms) and return
    /// `[x, y, scale, squash_x, squash_y, opacity, light, hue]`.
    pub fn frame(&mut self, time: f64) -> Array {
        let visual = self.motion.update(time);
        let hue_degrees = (visual.hue * 360.0).floor();
        if let Err(err) = dom::set_root_property("--card-hue", &hue_degrees.to_string()) {
            log::debug!("Failed to set --card-hue: {err:?}");
        }
        visual_to_array(&visual)
    }

    /// Pointer position in client pixels.
    pub fn pointer_move(&mut self, client_x: f32, client_y: f32, time: f64) {
        let (width, height) = match dom::viewport_size() {
            Ok(size) => size,
            Err(_) => (self.canvas.width() as f32, self.canvas.height() as f32),
        };
        let ndc = orb::pointer_to_ndc(client_x, client_y, width, height);
        self.motion.pointer_move(ndc, time);
    }

    pub fn pointer_down(&mut self) {
        self.motion.pointer_down();
    }

    pub fn pointer_up(&mut self, time: f64) {
        self.motion.pointer_up(time);
    }

    /// Persist the current position. Called on `beforeunload`.
    pub fn save(&self) -> Result<(), JsValue> {
        let pos = self.motion.position();
        dom::storage_set(STORAGE_KEY_X, &pos.x.to_string())?;
        dom::storage_set(STORAGE_KEY_Y, &pos.y.to_string())
    }

    /// World position as `[x, y]`.
    pub fn position(&self) -> Array {
        let pos = self.motion.position();
        let result = Array::new_with_length(2);
        result.set(0, JsValue::from_f64(pos.x as f64));
        result.set(1, JsValue::from_f64(pos.y as f64));
        result
    }

    pub fn is_idle(&self) -> bool {
        self.motion.is_idle()
    }
}

fn visual_to_array(visual: &OrbVisual) -> Array {
    let values = [
        visual.position.x,
        visual.position.y,
        visual.scale,
        visual.squash.x,
        visual.squash.y,
        visual.opacity,
        visual.light_intensity,
        visual.hue,
    ];
    let result = Array::new_with_length(values.len() as u32);
    for (i, v) in values.into_iter().enumerate() {
        result.set(i as u32, JsValue::from_f64(v as f64));
    }
    result
}
