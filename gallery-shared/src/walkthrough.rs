//! The gallery walkthrough context: camera, input, intro, collision and
//! interaction owned together and advanced one frame at a time.
//!
//! Hosts (the wasm runtime, the terminal walker) feed input events between
//! frames, call [`Walkthrough::frame`] once per display refresh and apply the
//! returned [`GalleryEvent`]s to their UI.

use glam::{Quat, Vec3};

use crate::assets::AssetRegistry;
use crate::camera::ViewOrientation;
use crate::input::{InputState, KeyPress};
use crate::interaction::{pick_target, resolve_action, Targeting, TriggerOutcome};
use crate::intro::{IntroAnimation, IntroPhase, IntroStep};
use crate::layout::{GalleryLayout, InteractionConfig};
use crate::movement::{intended_displacement, resolve_movement, MoveOutcome, PlayerBody};
use crate::scene::GalleryScene;

/// Side effects the host must carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    /// The opening dolly ended; the player has control.
    IntroFinished,
    /// Show this prompt, or hide it when `None`.
    PromptChanged(Option<String>),
    /// Start a browser download.
    Download { href: String, filename: String },
    /// Tell the user something directly (e.g. an alert).
    Notice(String),
}

pub struct Walkthrough {
    scene: GalleryScene,
    body: PlayerBody,
    move_speed: f32,
    look_sensitivity: f32,
    interaction: InteractionConfig,
    position: Vec3,
    view: ViewOrientation,
    input: InputState,
    intro: IntroAnimation,
    targeting: Targeting,
    locked: bool,
    clock: f64,
    last_move: Option<MoveOutcome>,
    events: Vec<GalleryEvent>,
}

impl Walkthrough {
    /// Build a walkthrough from an already validated layout.
    pub fn new(layout: &GalleryLayout) -> Self {
        let body = PlayerBody::from_config(&layout.player);
        Self {
            scene: GalleryScene::from_layout(layout),
            body,
            move_speed: layout.player.move_speed,
            look_sensitivity: layout.player.look_sensitivity,
            interaction: layout.interaction.clone(),
            position: Vec3::new(layout.player.start_x, body.eye_height, layout.intro.start_z),
            view: ViewOrientation::new(layout.player.start_yaw_degrees.to_radians(), 0.0),
            input: InputState::new(),
            intro: IntroAnimation::from_layout(layout),
            targeting: Targeting::new(),
            locked: false,
            clock: 0.0,
            last_move: None,
            events: Vec::new(),
        }
    }

    // ── Accessors ──

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn view(&self) -> ViewOrientation {
        self.view
    }

    pub fn rotation(&self) -> Quat {
        self.view.rotation()
    }

    pub fn phase(&self) -> IntroPhase {
        self.intro.phase()
    }

    pub fn intro_progress(&self) -> f32 {
        self.intro.progress()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn scene(&self) -> &GalleryScene {
        &self.scene
    }

    pub fn assets_mut(&mut self) -> &mut AssetRegistry {
        &mut self.scene.assets
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Index of the interactable currently under the crosshair.
    pub fn target(&self) -> Option<usize> {
        self.targeting.current()
    }

    pub fn target_name(&self) -> Option<&str> {
        self.target()
            .and_then(|i| self.scene.interactables().get(i))
            .map(|item| item.name.as_str())
    }

    pub fn last_move(&self) -> Option<MoveOutcome> {
        self.last_move
    }

    /// Seconds of frame time accumulated so far.
    pub fn elapsed(&self) -> f64 {
        self.clock
    }

    // ── Input ──

    /// Capture or release the pointer. Releasing drops the tracked target.
    pub fn set_locked(&mut self, locked: bool) {
        if self.locked == locked {
            return;
        }
        self.locked = locked;
        log::debug!("Pointer {}", if locked { "locked" } else { "unlocked" });
        if !locked && self.targeting.clear() {
            self.events.push(GalleryEvent::PromptChanged(None));
        }
    }

    /// Feed a key-down. A fresh press of the interaction key triggers the
    /// current target.
    pub fn key_down(&mut self, key: &str) -> KeyPress {
        let press = self.input.key_down(key);
        if let KeyPress::Pressed(id) = press {
            if id.is_interact() {
                self.interact();
            }
        }
        press
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    pub fn release_keys(&mut self) {
        self.input.release_all();
    }

    /// Pointer movement while captured, in screen pixels.
    pub fn pointer_move(&mut self, dx: f32, dy: f32) {
        if self.locked {
            self.view.apply_pointer_delta(dx, dy, self.look_sensitivity);
        }
    }

    pub fn set_view(&mut self, view: ViewOrientation) {
        self.view = view;
    }

    /// End the intro immediately.
    pub fn skip_intro(&mut self) {
        if self.intro.is_running() {
            self.position.z = self.intro.skip();
            self.events.push(GalleryEvent::IntroFinished);
        }
    }

    // ── Frame ──

    /// Advance one frame: intro or movement, then targeting, then the
    /// status-message timer. Returns every event raised since the last call.
    pub fn frame(&mut self, dt: f32) -> Vec<GalleryEvent> {
        self.clock += f64::from(dt.max(0.0));

        if self.intro.is_running() {
            match self.intro.update(dt) {
                IntroStep::Moving { z } => self.position.z = z,
                IntroStep::Finished { z } => {
                    self.position.z = z;
                    self.events.push(GalleryEvent::IntroFinished);
                }
                IntroStep::Idle => {}
            }
        } else if self.locked {
            self.update_movement(dt);
        }
        self.position.y = self.body.eye_height;

        if self.locked && !self.intro.is_running() {
            self.update_target();
        }

        if let Some(prompt) = self
            .targeting
            .expire_status(self.clock, self.scene.interactables())
        {
            self.events.push(GalleryEvent::PromptChanged(prompt));
        }

        self.take_events()
    }

    /// Drain events raised outside [`Walkthrough::frame`].
    pub fn take_events(&mut self) -> Vec<GalleryEvent> {
        std::mem::take(&mut self.events)
    }

    fn update_movement(&mut self, dt: f32) {
        let intent = self.input.move_intent();
        if intent.is_idle() {
            self.last_move = None;
            return;
        }
        let displacement = intended_displacement(intent, &self.view, self.move_speed, dt);
        let resolution = resolve_movement(
            self.position,
            displacement,
            &self.body,
            self.scene.collidables(),
        );
        if let MoveOutcome::Blocked { index } = resolution.outcome {
            log::trace!("Movement blocked by {}", self.scene.collidables()[index].name);
        }
        self.position = resolution.position;
        self.last_move = Some(resolution.outcome);
    }

    fn update_target(&mut self) {
        let ray = self.view.center_ray(self.position);
        let hit = pick_target(&ray, self.scene.interactables(), self.interaction.max_range);
        if let Some(prompt) = self.targeting.observe(hit, self.scene.interactables()) {
            self.events.push(GalleryEvent::PromptChanged(prompt));
        }
    }

    /// Trigger the tracked interactable, if any.
    pub fn interact(&mut self) -> Option<TriggerOutcome> {
        let index = self.targeting.current()?;
        let item = self.scene.interactables().get(index)?;
        let outcome = resolve_action(
            &item.action,
            &self.interaction.placeholder_path,
            &self.interaction.unconfigured_message,
        );

        match &outcome {
            TriggerOutcome::Download { href, filename } => {
                log::info!("Interacted with {}; downloading {href}", item.name);
                self.events.push(GalleryEvent::Download {
                    href: href.clone(),
                    filename: filename.clone(),
                });
                self.events.push(GalleryEvent::PromptChanged(Some(
                    self.interaction.status_message.clone(),
                )));
                self.targeting
                    .begin_status(self.clock, f64::from(self.interaction.status_duration));
            }
            TriggerOutcome::Unconfigured { message } => {
                log::warn!("{} still points at the placeholder download path", item.name);
                self.events.push(GalleryEvent::Notice(message.clone()));
            }
        }
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::InteractionAction;
    use crate::layout::PLACEHOLDER_DOWNLOAD_PATH;

    const DT: f32 = 1.0 / 60.0;
    const EYE: f32 = 1.7;

    fn configured_layout() -> GalleryLayout {
        let mut layout = GalleryLayout::default();
        layout.interactables[0].action = InteractionAction::DownloadFile {
            path: "docs/manuscript_excerpt.pdf".into(),
        };
        layout
    }

    fn free_roam(layout: &GalleryLayout) -> Walkthrough {
        let mut walk = Walkthrough::new(layout);
        walk.set_locked(true);
        walk.skip_intro();
        walk.take_events();
        walk
    }

    /// Stand inside the room facing the bench, looking down at it.
    fn facing_bench(layout: &GalleryLayout) -> Walkthrough {
        let mut walk = free_roam(layout);
        walk.position = Vec3::new(0.0, EYE, 0.5);
        walk.set_view(ViewOrientation::new(0.0, -0.42));
        walk
    }

    // ── Intro ──

    #[test]
    fn test_intro_runs_without_lock_and_ends_at_entrance() {
        let layout = GalleryLayout::default();
        let mut walk = Walkthrough::new(&layout);
        assert_eq!(walk.position().z, 12.0);
        let mut finished = false;
        for _ in 0..200 {
            let events = walk.frame(DT);
            if events.contains(&GalleryEvent::IntroFinished) {
                finished = true;
            }
            assert_eq!(walk.position().y, EYE);
        }
        assert!(finished);
        assert_eq!(walk.phase(), IntroPhase::FreeRoam);
        assert_eq!(walk.position().z, 4.5);
    }

    #[test]
    fn test_no_movement_during_intro() {
        let layout = GalleryLayout::default();
        let mut walk = Walkthrough::new(&layout);
        walk.set_locked(true);
        walk.key_down("d");
        walk.frame(0.5);
        assert_eq!(walk.position().x, 0.0);
    }

    // ── Movement ──

    #[test]
    fn test_no_movement_when_unlocked() {
        let layout = GalleryLayout::default();
        let mut walk = free_roam(&layout);
        walk.set_locked(false);
        walk.key_down("w");
        walk.frame(0.5);
        assert_eq!(walk.position().z, 4.5);
    }

    #[test]
    fn test_hold_forward_in_open_space() {
        let mut layout = GalleryLayout::default();
        layout.room.enabled = false;
        layout.interactables.clear();
        let mut walk = free_roam(&layout);
        walk.key_down("ArrowUp");
        for _ in 0..60 {
            walk.frame(DT);
        }
        let expected_z = 4.5 - 4.0;
        assert!((walk.position().z - expected_z).abs() < 1e-3, "z={}", walk.position().z);
        assert_eq!(walk.position().y, EYE);
        assert_eq!(walk.last_move(), Some(MoveOutcome::Clear));
    }

    #[test]
    fn test_walk_into_front_panel_is_blocked() {
        let layout = GalleryLayout::default();
        let mut walk = free_roam(&layout);
        // In front of the left panel, outside the doorway.
        walk.position = Vec3::new(-2.0, EYE, 3.35);
        walk.key_down("w");
        walk.frame(0.05);
        assert_eq!(walk.position(), Vec3::new(-2.0, EYE, 3.35));
        assert!(matches!(walk.last_move(), Some(MoveOutcome::Blocked { .. })));
    }

    #[test]
    fn test_walk_through_doorway() {
        let layout = GalleryLayout::default();
        let mut walk = free_roam(&layout);
        walk.key_down("w");
        for _ in 0..60 {
            walk.frame(DT);
        }
        assert!(walk.position().z < 1.0, "z={}", walk.position().z);
    }

    // ── Interaction ──

    #[test]
    fn test_prompt_appears_when_aiming_at_bench() {
        let layout = configured_layout();
        let mut walk = facing_bench(&layout);
        let events = walk.frame(DT);
        assert_eq!(
            events,
            vec![GalleryEvent::PromptChanged(Some(
                "Press E to download the manuscript excerpt".into()
            ))]
        );
        assert_eq!(walk.target_name(), Some("manuscript_bench"));
        assert!(walk.frame(DT).is_empty(), "unchanged target must not re-emit");
    }

    #[test]
    fn test_prompt_hides_when_looking_away() {
        let layout = configured_layout();
        let mut walk = facing_bench(&layout);
        walk.frame(DT);
        walk.set_view(ViewOrientation::new(std::f32::consts::PI, 0.0));
        assert_eq!(walk.frame(DT), vec![GalleryEvent::PromptChanged(None)]);
        assert_eq!(walk.target(), None);
    }

    #[test]
    fn test_bench_out_of_range_from_entrance() {
        let layout = configured_layout();
        let mut walk = free_roam(&layout);
        walk.set_view(ViewOrientation::new(0.0, -0.15));
        walk.frame(DT);
        assert_eq!(walk.target(), None);
    }

    #[test]
    fn test_interact_downloads_and_shows_status() {
        let layout = configured_layout();
        let mut walk = facing_bench(&layout);
        walk.frame(DT);
        walk.key_down("e");
        let events = walk.take_events();
        assert_eq!(
            events,
            vec![
                GalleryEvent::Download {
                    href: "docs/manuscript_excerpt.pdf".into(),
                    filename: "manuscript_excerpt.pdf".into(),
                },
                GalleryEvent::PromptChanged(Some("Download started".into())),
            ]
        );

        // Holding the key (auto-repeat) does not trigger again.
        walk.key_down("e");
        assert!(walk.take_events().is_empty());

        let mut reverted = Vec::new();
        for _ in 0..150 {
            reverted.extend(walk.frame(DT));
        }
        assert_eq!(
            reverted,
            vec![GalleryEvent::PromptChanged(Some(
                "Press E to download the manuscript excerpt".into()
            ))]
        );
    }

    #[test]
    fn test_status_revert_skipped_after_target_change() {
        let layout = configured_layout();
        let mut walk = facing_bench(&layout);
        walk.frame(DT);
        walk.interact();
        walk.take_events();
        walk.set_view(ViewOrientation::new(std::f32::consts::PI, 0.0));
        let mut events = walk.frame(DT);
        for _ in 0..150 {
            events.extend(walk.frame(DT));
        }
        assert_eq!(events, vec![GalleryEvent::PromptChanged(None)]);
    }

    #[test]
    fn test_placeholder_shows_notice_instead_of_download() {
        let layout = GalleryLayout::default();
        assert!(layout.has_placeholder_downloads());
        let mut walk = facing_bench(&layout);
        walk.frame(DT);
        let outcome = walk.interact();
        assert!(matches!(outcome, Some(TriggerOutcome::Unconfigured { .. })));
        let events = walk.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GalleryEvent::Notice(_)));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GalleryEvent::Download { href, .. } if href == PLACEHOLDER_DOWNLOAD_PATH)));
    }

    #[test]
    fn test_interact_without_target_does_nothing() {
        let layout = configured_layout();
        let mut walk = free_roam(&layout);
        walk.frame(DT);
        assert_eq!(walk.interact(), None);
        walk.key_down("E");
        assert!(walk.take_events().is_empty());
    }

    #[test]
    fn test_unlock_hides_prompt() {
        let layout = configured_layout();
        let mut walk = facing_bench(&layout);
        walk.frame(DT);
        walk.set_locked(false);
        assert_eq!(walk.take_events(), vec![GalleryEvent::PromptChanged(None)]);
        assert!(walk.frame(DT).is_empty());
    }

    #[test]
    fn test_pointer_ignored_while_unlocked() {
        let layout = GalleryLayout::default();
        let mut walk = Walkthrough::new(&layout);
        walk.pointer_move(300.0, 0.0);
        assert_eq!(walk.view(), ViewOrientation::default());
        walk.set_locked(true);
        walk.pointer_move(300.0, 0.0);
        assert!(walk.view().yaw < 0.0);
    }
}
