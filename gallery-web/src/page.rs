//! Page-side effects of the walkthrough, kept free of DOM types so the
//! mapping can be tested natively.

use gallery_shared::{GalleryEvent, GalleryLayout, LayoutError};
use thiserror::Error;

/// Loading screen text when the canvas element is missing.
pub const CANVAS_MISSING: &str = "Error: Canvas not found.";
/// Loading screen text for any other initialization failure.
pub const INIT_FAILED: &str = "An error occurred. Cannot load gallery.";

/// Element ids the runtime looks up. Only the canvas is required.
pub const LOADING_SCREEN_ID: &str = "loadingScreen";
pub const CROSSHAIR_ID: &str = "crosshair";
pub const INSTRUCTIONS_ID: &str = "instructions";
pub const PROMPT_ID: &str = "interaction-prompt";

/// Class that hides the loading screen.
pub const HIDDEN_CLASS: &str = "hidden";

/// Why the gallery failed to start.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("canvas #{0} not found")]
    CanvasMissing(String),
    #[error("failed to load layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("page setup failed: {0}")]
    Dom(String),
}

impl InitError {
    /// Text the loading screen shows for this failure.
    pub fn loading_text(&self) -> &'static str {
        match self {
            Self::CanvasMissing(_) => CANVAS_MISSING,
            Self::Layout(_) | Self::Dom(_) => INIT_FAILED,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageAction {
    /// Replace the prompt text, or hide the prompt.
    SetPrompt(Option<String>),
    Download { href: String, filename: String },
    Alert(String),
}

/// Turn one frame's events into page actions. Consecutive prompt changes
/// collapse into the last one so the prompt is written once per frame.
pub fn page_actions(events: Vec<GalleryEvent>) -> Vec<PageAction> {
    let mut actions: Vec<PageAction> = Vec::with_capacity(events.len());
    for event in events {
        match event {
            GalleryEvent::IntroFinished => {
                log::info!("Gallery intro finished");
            }
            GalleryEvent::PromptChanged(text) => {
                if let Some(PageAction::SetPrompt(last)) = actions.last_mut() {
                    *last = text;
                } else {
                    actions.push(PageAction::SetPrompt(text));
                }
            }
            GalleryEvent::Download { href, filename } => {
                actions.push(PageAction::Download { href, filename });
            }
            GalleryEvent::Notice(message) => actions.push(PageAction::Alert(message)),
        }
    }
    actions
}

/// CSS `display` value for overlays that only show while the pointer is
/// captured.
pub fn lock_overlay_display(locked: bool) -> &'static str {
    if locked {
        "block"
    } else {
        "none"
    }
}

/// Layout from an optional TOML document; the built-in default otherwise.
pub fn load_layout(source: Option<&str>) -> Result<GalleryLayout, LayoutError> {
    let layout = match source {
        Some(src) if !src.trim().is_empty() => GalleryLayout::from_toml_str(src)?,
        _ => GalleryLayout::default(),
    };
    if layout.has_placeholder_downloads() {
        log::warn!("Layout still uses the placeholder download path");
    }
    Ok(layout)
}
