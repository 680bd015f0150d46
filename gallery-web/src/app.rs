use gallery_shared::intro::IntroPhase;
use gallery_shared::{GalleryLayout, Walkthrough};
use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlCanvasElement, HtmlElement};

use crate::dom;
use crate::page::{self, InitError, PageAction};

/// Gallery walkthrough bound to a page. The host renders the scene and
/// reads the camera pose back after each `frame`.
#[wasm_bindgen]
pub struct App {
    walk: Walkthrough,
    last_time: f64,
    canvas: HtmlCanvasElement,
    crosshair: Option<HtmlElement>,
    instructions: Option<HtmlElement>,
    prompt: Option<HtmlElement>,
}

impl App {
    pub fn new(canvas_id: &str, layout_toml: Option<String>) -> Result<App, JsValue> {
        let document = dom::document()?;
        let loading = document.get_element_by_id(page::LOADING_SCREEN_ID);
        if loading.is_none() {
            log::error!("#{} not found", page::LOADING_SCREEN_ID);
        }

        let result = Self::init(&document, canvas_id, layout_toml.as_deref(), loading.as_ref());
        result.map_err(|err| {
            log::error!("Gallery init failed: {err}");
            if let Some(el) = &loading {
                dom::set_text(el, err.loading_text());
            }
            JsValue::from_str(&err.to_string())
        })
    }

    fn init(
        document: &web_sys::Document,
        canvas_id: &str,
        layout_toml: Option<&str>,
        loading: Option<&Element>,
    ) -> Result<App, InitError> {
        let canvas = dom::canvas(document, canvas_id)
            .map_err(|_| InitError::CanvasMissing(canvas_id.to_string()))?;
        let layout = page::load_layout(layout_toml)?;
        let app = Self::with_layout(document, canvas, &layout);

        match loading {
            Some(el) => dom::add_class(el, page::HIDDEN_CLASS)
                .map_err(|err| InitError::Dom(format!("{err:?}")))?,
            None => log::warn!("Loading screen missing at the end of init"),
        }

        log::info!(
            "Gallery ready: {} collidables, {} interactables, {} assets",
            app.walk.scene().collidables().len(),
            app.walk.scene().interactables().len(),
            app.walk.scene().assets.len(),
        );
        Ok(app)
    }

    fn with_layout(
        document: &web_sys::Document,
        canvas: HtmlCanvasElement,
        layout: &GalleryLayout,
    ) -> App {
        let app = App {
            walk: Walkthrough::new(layout),
            last_time: 0.0,
            canvas,
            crosshair: dom::optional_element(document, page::CROSSHAIR_ID),
            instructions: dom::optional_element(document, page::INSTRUCTIONS_ID),
            prompt: dom::optional_element(document, page::PROMPT_ID),
        };
        app.show_lock_overlays(false);
        if let Some(prompt) = &app.prompt {
            if let Err(err) = dom::set_display(prompt, "none") {
                log::warn!("Failed to hide prompt: {err:?}");
            }
        }
        app
    }

    fn show_lock_overlays(&self, locked: bool) {
        let display = page::lock_overlay_display(locked);
        for el in [&self.crosshair, &self.instructions].into_iter().flatten() {
            if let Err(err) = dom::set_display(el, display) {
                log::warn!("Failed to toggle overlay: {err:?}");
            }
        }
    }

    fn apply_events(&mut self) {
        let events = self.walk.take_events();
        self.apply(events);
    }

    fn apply(&mut self, events: Vec<gallery_shared::GalleryEvent>) {
        for action in page::page_actions(events) {
            let result = match action {
                PageAction::SetPrompt(text) => self.set_prompt(text.as_deref()),
                PageAction::Download { href, filename } => dom::trigger_download(&href, &filename),
                PageAction::Alert(message) => dom::alert(&message),
            };
            if let Err(err) = result {
                log::warn!("Page update failed: {err:?}");
            }
        }
    }

    fn set_prompt(&self, text: Option<&str>) -> Result<(), JsValue> {
        let Some(prompt) = &self.prompt else {
            return Ok(());
        };
        match text {
            Some(text) => {
                dom::set_text(prompt, text);
                dom::set_display(prompt, "block")
            }
            None => dom::set_display(prompt, "none"),
        }
    }
}

#[wasm_bindgen]
impl App {
    /// Run one frame. Called from requestAnimationFrame with its timestamp.
    pub fn frame(&mut self, time: f64) {
        let dt = if self.last_time > 0.0 {
            (time - self.last_time) / 1000.0
        } else {
            0.016
        };
        self.last_time = time;

        let events = self.walk.frame(dt as f32);
        self.apply(events);
    }

    /// Feed a `KeyboardEvent.key`. Returns true if the key is one the
    /// gallery uses, so the host can prevent the default action.
    pub fn key_down(&mut self, key: &str) -> bool {
        let press = self.walk.key_down(key);
        self.apply_events();
        !matches!(press, gallery_shared::input::KeyPress::Ignored)
    }

    pub fn key_up(&mut self, key: &str) {
        self.walk.key_up(key);
    }

    /// Drop every held key, e.g. when the window loses focus.
    pub fn release_keys(&mut self) {
        self.walk.release_keys();
    }

    /// Relative pointer motion (`movementX`, `movementY`).
    pub fn pointer_move(&mut self, dx: f32, dy: f32) {
        self.walk.pointer_move(dx, dy);
    }

    /// Mirror the page's pointer-lock state.
    pub fn set_locked(&mut self, locked: bool) {
        self.walk.set_locked(locked);
        self.show_lock_overlays(locked);
        self.apply_events();
    }

    /// Canvas click: capture the pointer when free, interact when captured.
    pub fn click(&mut self) {
        if self.walk.is_locked() {
            self.walk.interact();
            self.apply_events();
        } else {
            self.canvas.request_pointer_lock();
        }
    }

    /// Eye position as `[x, y, z]`.
    pub fn camera_position(&self) -> Array {
        let p = self.walk.position();
        let result = Array::new_with_length(3);
        result.set(0, JsValue::from_f64(p.x as f64));
        result.set(1, JsValue::from_f64(p.y as f64));
        result.set(2, JsValue::from_f64(p.z as f64));
        result
    }

    /// Camera orientation quaternion as `[x, y, z, w]`.
    pub fn camera_rotation(&self) -> Array {
        let q = self.walk.rotation();
        let result = Array::new_with_length(4);
        for (i, v) in q.to_array().into_iter().enumerate() {
            result.set(i as u32, JsValue::from_f64(v as f64));
        }
        result
    }

    pub fn asset_loaded(&mut self, id: &str) -> Result<(), JsValue> {
        self.walk
            .assets_mut()
            .mark_loaded(id)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!(
            "Asset {id} loaded ({} pending)",
            self.walk.scene().assets.pending_count()
        );
        Ok(())
    }

    /// Whether the host may swap the fallback for the loaded resource.
    pub fn asset_ready(&self, id: &str) -> bool {
        self.walk.scene().assets.is_loaded(id)
    }

    /// Declared assets whose load has not settled yet.
    pub fn assets_pending(&self) -> usize {
        self.walk.scene().assets.pending_count()
    }

    pub fn asset_failed(&mut self, id: &str, reason: &str) -> Result<(), JsValue> {
        self.walk
            .assets_mut()
            .mark_failed(id, reason)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// URL of a declared asset, for the host's loader.
    pub fn asset_url(&self, id: &str) -> Option<String> {
        self.walk.scene().assets.get(id).map(|a| a.url.clone())
    }

    /// `"intro"` or `"free_roam"`.
    pub fn phase(&self) -> String {
        match self.walk.phase() {
            IntroPhase::Intro => "intro".into(),
            IntroPhase::FreeRoam => "free_roam".into(),
        }
    }

    pub fn intro_progress(&self) -> f32 {
        self.walk.intro_progress()
    }

    pub fn skip_intro(&mut self) {
        self.walk.skip_intro();
        self.apply_events();
    }

    /// Name of the interactable under the crosshair.
    pub fn target(&self) -> Option<String> {
        self.walk.target_name().map(str::to_string)
    }

    /// Canvas aspect ratio for the host's projection.
    pub fn aspect(&self) -> f32 {
        let height = self.canvas.height().max(1);
        self.canvas.width() as f32 / height as f32
    }
}
