//! Center-of-view targeting and the interaction trigger.

use serde::{Deserialize, Serialize};

use crate::math::{Aabb, Ray};

/// What happens when an interactable is triggered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InteractionAction {
    /// Offer the file at `path` as a browser download.
    DownloadFile { path: String },
}

/// An object the player can aim at and trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct Interactable {
    pub name: String,
    pub bounds: Aabb,
    pub action: InteractionAction,
    pub prompt: Option<String>,
}

/// Find the nearest interactable hit by `ray` within `max_range`.
/// Ties keep the earlier entry.
pub fn pick_target(ray: &Ray, interactables: &[Interactable], max_range: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, item) in interactables.iter().enumerate() {
        let Some(dist) = item.bounds.ray_distance(ray) else {
            continue;
        };
        if dist > max_range {
            continue;
        }
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((i, dist));
        }
    }
    best.map(|(i, _)| i)
}

/// Filename a browser should suggest for a download of `path`.
pub fn download_filename(path: &str) -> String {
    match path.rsplit('/').next() {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => "manuscript.pdf".to_string(),
    }
}

/// Outcome of resolving an interactable's action.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    Download { href: String, filename: String },
    /// The path was never customized; tell the user instead of downloading.
    Unconfigured { message: String },
}

pub fn resolve_action(
    action: &InteractionAction,
    placeholder_path: &str,
    unconfigured_message: &str,
) -> TriggerOutcome {
    match action {
        InteractionAction::DownloadFile { path } => {
            if path.trim().is_empty() || path == placeholder_path {
                TriggerOutcome::Unconfigured {
                    message: unconfigured_message.to_string(),
                }
            } else {
                TriggerOutcome::Download {
                    href: path.clone(),
                    filename: download_filename(path),
                }
            }
        }
    }
}

/// Prompt text replaced for a while after a successful trigger.
#[derive(Debug, Clone, PartialEq)]
struct TransientStatus {
    target: usize,
    expires_at: f64,
}

/// Tracks the currently targeted interactable and what the prompt shows.
#[derive(Debug, Clone, Default)]
pub struct Targeting {
    current: Option<usize>,
    status: Option<TransientStatus>,
}

impl Targeting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Record this frame's nearest hit. Returns the new prompt text (`None`
    /// hides it) only when the tracked target actually changed.
    pub fn observe(
        &mut self,
        hit: Option<usize>,
        interactables: &[Interactable],
    ) -> Option<Option<String>> {
        if hit == self.current {
            return None;
        }
        self.current = hit;
        self.status = None;
        Some(hit.and_then(|i| interactables.get(i)).and_then(|item| item.prompt.clone()))
    }

    /// Forget the tracked target. Returns `true` if there was one.
    pub fn clear(&mut self) -> bool {
        self.status = None;
        self.current.take().is_some()
    }

    /// Start a transient status for the current target.
    pub fn begin_status(&mut self, now: f64, duration: f64) {
        if let Some(target) = self.current {
            self.status = Some(TransientStatus {
                target,
                expires_at: now + duration,
            });
        }
    }

    /// Expire the transient status. Returns the prompt to restore when the
    /// status belonged to the still-tracked target.
    pub fn expire_status(
        &mut self,
        now: f64,
        interactables: &[Interactable],
    ) -> Option<Option<String>> {
        let status = self.status.as_ref()?;
        if now < status.expires_at {
            return None;
        }
        let target = status.target;
        self.status = None;
        if self.current != Some(target) {
            return None;
        }
        Some(interactables.get(target).and_then(|item| item.prompt.clone()))
    }
}
