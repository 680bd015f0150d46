use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use gallery_shared::camera::ViewOrientation;
use gallery_shared::input::KeyId;
use gallery_shared::intro::IntroPhase;
use gallery_shared::movement::MoveOutcome;
use gallery_shared::{GalleryEvent, GalleryLayout, Walkthrough};
use glam::Vec3;

use crate::project::LayoutSource;

// ─── Log Buffer ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Prompt,
    Download,
    Notice,
}

#[derive(Debug, Clone)]
pub struct LogLine {
    pub timestamp: DateTime<Local>,
    pub text: String,
    pub kind: LogKind,
}

pub struct LogBuffer {
    pub lines: Vec<LogLine>,
    pub scroll_offset: usize,
    pub auto_scroll: bool,
    max_lines: usize,
}

impl LogBuffer {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: Vec::new(),
            scroll_offset: 0,
            auto_scroll: true,
            max_lines,
        }
    }

    pub fn push(&mut self, text: String, kind: LogKind) {
        if self.lines.len() >= self.max_lines {
            self.lines.remove(0);
            self.scroll_offset = self.scroll_offset.saturating_sub(1);
        }
        self.lines.push(LogLine {
            timestamp: chrono::Local::now(),
            text,
            kind,
        });
        if self.auto_scroll {
            self.scroll_to_bottom();
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.lines.len().saturating_sub(1);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll_offset = 0;
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
        self.auto_scroll = false;
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = (self.scroll_offset + amount).min(self.lines.len().saturating_sub(1));
        if self.scroll_offset >= self.lines.len().saturating_sub(1) {
            self.auto_scroll = true;
        }
    }
}

// ─── Key Hold Emulation ──────────────────────────────────────────────

/// Seconds a key stays held after its last press or repeat. Terminals only
/// report presses, so a release is assumed once repeats stop arriving; this
/// outlasts the usual auto-repeat delay.
pub const KEY_HOLD_SECS: f64 = 0.55;

/// Held movement keys with a release deadline each.
#[derive(Debug, Default)]
pub struct HeldKeys {
    deadlines: BTreeMap<String, f64>,
}

impl HeldKeys {
    /// Record a press at `now`. Returns true if the key was not held.
    pub fn press(&mut self, key: &str, now: f64) -> bool {
        self.deadlines
            .insert(key.to_string(), now + KEY_HOLD_SECS)
            .is_none()
    }

    /// Forget a key the terminal reported as released.
    pub fn release(&mut self, key: &str) -> bool {
        self.deadlines.remove(key).is_some()
    }

    /// Drop every key whose deadline passed and return their names.
    pub fn expire(&mut self, now: f64) -> Vec<String> {
        let expired: Vec<String> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            self.deadlines.remove(key);
        }
        expired
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.deadlines.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

// ─── Walk State ──────────────────────────────────────────────────────

/// Pixels of simulated pointer motion per turn key press.
pub const TURN_STEP_PX: f32 = 40.0;

/// State of the terminal walk view.
pub struct WalkState {
    pub walk: Walkthrough,
    pub source: LayoutSource,
    /// Where the intro started; kept in the map view.
    pub spawn: Vec3,
    pub log: LogBuffer,
    pub held: HeldKeys,
    pub prompt: Option<String>,
    pub downloads: usize,
    pub show_help: bool,
    pub should_quit: bool,
    clock: f64,
}

impl WalkState {
    pub fn new(layout: &GalleryLayout, source: LayoutSource) -> Self {
        let mut log = LogBuffer::new(500);
        log.push(format!("Loaded {}", source.label()), LogKind::Info);
        if layout.has_placeholder_downloads() {
            log.push(
                "Bench download still uses the placeholder path".into(),
                LogKind::Notice,
            );
        }
        let walk = Walkthrough::new(layout);
        Self {
            spawn: walk.position(),
            walk,
            source,
            log,
            held: HeldKeys::default(),
            prompt: None,
            downloads: 0,
            show_help: false,
            should_quit: false,
            clock: 0.0,
        }
    }

    /// Seconds since the walk started.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// A movement or interaction key arrived from the terminal.
    pub fn key_pressed(&mut self, key: &str) {
        if self.held.press(key, self.clock) {
            self.walk.key_down(key);
        }
        // Repeats only extend the deadline. The interaction key is a
        // one-shot; release it at once so the next press is fresh.
        if KeyId::from_key_name(key).is_some_and(|k| k.is_interact()) {
            self.key_released(key);
        }
        self.drain_events();
    }

    pub fn key_released(&mut self, key: &str) {
        if self.held.release(key) {
            self.walk.key_up(key);
        }
    }

    /// Simulated pointer motion, in pixels.
    pub fn turn(&mut self, dx: f32, dy: f32) {
        self.walk.pointer_move(dx, dy);
    }

    pub fn toggle_lock(&mut self) {
        let locked = !self.walk.is_locked();
        self.walk.set_locked(locked);
        self.log.push(
            if locked { "Controls captured" } else { "Controls released" }.into(),
            LogKind::Info,
        );
        self.drain_events();
    }

    pub fn skip_intro(&mut self) {
        self.walk.skip_intro();
        self.drain_events();
    }

    /// Advance one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.clock += f64::from(dt);
        for key in self.held.expire(self.clock) {
            self.walk.key_up(&key);
        }
        let events = self.walk.frame(dt);
        self.record(events);
    }

    fn drain_events(&mut self) {
        let events = self.walk.take_events();
        self.record(events);
    }

    fn record(&mut self, events: Vec<GalleryEvent>) {
        for event in events {
            match event {
                GalleryEvent::IntroFinished => {
                    self.log.push("Intro finished; you have control".into(), LogKind::Info);
                }
                GalleryEvent::PromptChanged(text) => {
                    if let Some(text) = &text {
                        self.log.push(text.clone(), LogKind::Prompt);
                    }
                    self.prompt = text;
                }
                GalleryEvent::Download { href, filename } => {
                    self.downloads += 1;
                    self.log
                        .push(format!("Download {filename} from {href}"), LogKind::Download);
                }
                GalleryEvent::Notice(message) => self.log.push(message, LogKind::Notice),
            }
        }
    }

    pub fn view(&self) -> ViewOrientation {
        self.walk.view()
    }

    pub fn phase_label(&self) -> &'static str {
        match self.walk.phase() {
            IntroPhase::Intro => "Intro",
            IntroPhase::FreeRoam => "Free roam",
        }
    }

    pub fn move_label(&self) -> String {
        match self.walk.last_move() {
            None => "Standing".into(),
            Some(MoveOutcome::Clear) => "Walking".into(),
            Some(MoveOutcome::Slid { index }) => {
                format!("Sliding along {}", self.collidable_name(index))
            }
            Some(MoveOutcome::Blocked { index }) => {
                format!("Blocked by {}", self.collidable_name(index))
            }
        }
    }

    fn collidable_name(&self, index: usize) -> &str {
        self.walk
            .scene()
            .collidables()
            .get(index)
            .map(|c| c.name.as_str())
            .unwrap_or("?")
    }
}
