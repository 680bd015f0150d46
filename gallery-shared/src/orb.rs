//! Motion model for the homepage orb: it trails the cursor with a lag,
//! drifts slightly upward, shies away when the cursor sits on top of it and
//! dims after a few seconds without pointer movement.

use std::collections::VecDeque;

use glam::Vec2;

use crate::math::lerp;

/// Local storage keys for the last orb position.
pub const STORAGE_KEY_X: &str = "orbPosX";
pub const STORAGE_KEY_Y: &str = "orbPosY";

#[derive(Debug, Clone, PartialEq)]
pub struct OrbSettings {
    pub max_trail: usize,
    /// How many samples behind the newest the orb aims at.
    pub trail_lag: usize,
    /// Pointer NDC to world scale.
    pub world_scale: Vec2,
    pub upward_bias: f32,
    pub world_top_y: f32,
    pub repulse_radius: f32,
    pub repulse_strength: f32,
    pub smoothing: Vec2,
    pub idle_after_ms: f64,
    pub click_decay_ms: f64,
    pub tween_rate: f32,
    pub active_opacity: f32,
    pub idle_opacity: f32,
    pub active_light: f32,
    pub idle_light: f32,
    /// Seconds per breathing cycle.
    pub period: f32,
}

impl Default for OrbSettings {
    fn default() -> Self {
        Self {
            max_trail: 60,
            trail_lag: 18,
            world_scale: Vec2::new(6.0, 4.0),
            upward_bias: 0.03,
            world_top_y: 3.5,
            repulse_radius: 0.1,
            repulse_strength: 0.02,
            smoothing: Vec2::new(0.012, 0.018),
            idle_after_ms: 3000.0,
            click_decay_ms: 250.0,
            tween_rate: 0.02,
            active_opacity: 0.6,
            idle_opacity: 0.3,
            active_light: 0.8,
            idle_light: 0.1,
            period: 7.0,
        }
    }
}

/// Per-frame visual parameters for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbVisual {
    pub position: Vec2,
    pub scale: f32,
    /// Horizontal / vertical squash from a click, 1.0 when at rest.
    pub squash: Vec2,
    pub opacity: f32,
    pub light_intensity: f32,
    /// Hue in [0, 1).
    pub hue: f32,
    pub idle: bool,
}

#[derive(Debug, Clone)]
pub struct OrbMotion {
    settings: OrbSettings,
    position: Vec2,
    trail: VecDeque<Vec2>,
    last_move_ms: f64,
    idle: bool,
    pressed: bool,
    release_ms: Option<f64>,
    opacity: f32,
}

impl OrbMotion {
    /// The idle timer starts at `now_ms`, the page time of creation.
    pub fn new(settings: OrbSettings, start: Vec2, now_ms: f64) -> Self {
        let opacity = settings.active_opacity;
        Self {
            settings,
            position: start,
            trail: VecDeque::new(),
            last_move_ms: now_ms,
            idle: false,
            pressed: false,
            release_ms: None,
            opacity,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_idle(&self) -> bool {
        self.idle
    }

    /// Record a pointer position in normalized device coordinates.
    pub fn pointer_move(&mut self, ndc: Vec2, now_ms: f64) {
        self.trail.push_back(ndc * self.settings.world_scale);
        while self.trail.len() > self.settings.max_trail {
            self.trail.pop_front();
        }
        self.last_move_ms = now_ms;
        self.idle = false;
    }

    pub fn pointer_down(&mut self) {
        self.pressed = true;
    }

    pub fn pointer_up(&mut self, now_ms: f64) {
        self.pressed = false;
        self.release_ms = Some(now_ms);
    }

    fn target(&self) -> Vec2 {
        let lag = self.settings.trail_lag;
        if self.trail.len() > lag {
            self.trail[self.trail.len() - 1 - lag]
        } else {
            self.trail.front().copied().unwrap_or(self.position)
        }
    }

    fn click_amount(&self, now_ms: f64) -> f32 {
        if self.pressed {
            return 1.0;
        }
        match self.release_ms {
            Some(at) if now_ms - at < self.settings.click_decay_ms => {
                (1.0 - (now_ms - at) / self.settings.click_decay_ms).clamp(0.0, 1.0) as f32
            }
            _ => 0.0,
        }
    }

    /// Advance one frame at page time `now_ms`.
    pub fn update(&mut self, now_ms: f64) -> OrbVisual {
        let s = &self.settings;
        let t = (now_ms * 0.001) as f32;

        if !self.idle && now_ms - self.last_move_ms > s.idle_after_ms {
            self.idle = true;
        }

        let target = self.target();
        let biased = Vec2::new(target.x, target.y + (s.world_top_y - target.y) * s.upward_bias);
        let mut desired = biased;
        let offset = self.position - biased;
        let dist = offset.length();
        if !self.idle && dist < s.repulse_radius && dist > 0.01 {
            desired = self.position + offset / dist * s.repulse_strength;
        }
        self.position += (desired - self.position) * s.smoothing;

        let opacity_target = if self.idle { s.idle_opacity } else { s.active_opacity };
        self.opacity = lerp(self.opacity, opacity_target, s.tween_rate);

        let tau = std::f32::consts::TAU;
        let breathe = (t * tau / (s.period * 1.2)).sin() * 0.5 + 0.5;
        let click = self.click_amount(now_ms);

        OrbVisual {
            position: self.position,
            scale: 0.28 + breathe * 0.07,
            squash: Vec2::new(1.0 + 0.15 * click, 1.0 - 0.15 * click),
            opacity: self.opacity,
            light_intensity: if self.idle { s.idle_light } else { s.active_light },
            hue: (t * 0.08).rem_euclid(1.0),
            idle: self.idle,
        }
    }
}

/// Map a pointer position in window pixels to normalized device
/// coordinates, +Y up. A degenerate viewport maps to the origin.
pub fn pointer_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(x / width * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

/// Restore a saved position. Both coordinates must parse as finite numbers,
/// otherwise the default start is used.
pub fn restore_position(x: Option<&str>, y: Option<&str>) -> Option<Vec2> {
    let parse = |v: Option<&str>| {
        v.and_then(|s| s.trim().parse::<f32>().ok())
            .filter(|n| n.is_finite())
    };
    Some(Vec2::new(parse(x)?, parse(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orb() -> OrbMotion {
        OrbMotion::new(OrbSettings::default(), Vec2::ZERO, 0.0)
    }

    // ── restore_position ──

    #[test]
    fn test_restore_both_numbers() {
        assert_eq!(restore_position(Some("1.5"), Some("-2")), Some(Vec2::new(1.5, -2.0)));
    }

    #[test]
    fn test_restore_rejects_missing_or_garbage() {
        assert_eq!(restore_position(None, Some("1")), None);
        assert_eq!(restore_position(Some("abc"), Some("1")), None);
        assert_eq!(restore_position(Some("NaN"), Some("1")), None);
        assert_eq!(restore_position(Some("1"), Some("inf")), None);
    }

    // ── pointer_to_ndc ──

    #[test]
    fn test_ndc_corners() {
        assert_eq!(pointer_to_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_to_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(pointer_to_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn test_ndc_zero_viewport() {
        assert_eq!(pointer_to_ndc(10.0, 10.0, 0.0, 600.0), Vec2::ZERO);
    }

    // ── motion ──

    #[test]
    fn test_stays_put_without_pointer() {
        let mut orb = orb();
        for i in 0..10 {
            orb.update(i as f64 * 16.0);
        }
        // Only the upward bias acts on an empty trail.
        assert_eq!(orb.position().x, 0.0);
        assert!(orb.position().y > 0.0);
    }

    #[test]
    fn test_follows_lagged_trail_sample() {
        let mut orb = orb();
        for i in 0..30 {
            orb.pointer_move(Vec2::new(1.0, 0.0), i as f64);
        }
        orb.pointer_move(Vec2::new(-1.0, 0.0), 31.0);
        orb.update(32.0);
        // Newest sample points left, lagged sample points right.
        assert!(orb.position().x > 0.0);
    }

    #[test]
    fn test_trail_capped() {
        let mut orb = orb();
        for i in 0..200 {
            orb.pointer_move(Vec2::new(0.1, 0.1), i as f64);
        }
        assert_eq!(orb.trail.len(), 60);
    }

    #[test]
    fn test_becomes_idle_and_dims() {
        let mut orb = orb();
        orb.pointer_move(Vec2::ZERO, 0.0);
        let active = orb.update(100.0);
        assert!(!active.idle);
        let mut visual = active;
        for i in 0..500 {
            visual = orb.update(3100.0 + i as f64 * 16.0);
        }
        assert!(visual.idle);
        assert!(visual.opacity < active.opacity);
        assert_eq!(visual.light_intensity, 0.1);

        orb.pointer_move(Vec2::ZERO, 20_000.0);
        assert!(!orb.is_idle());
    }

    #[test]
    fn test_idle_timer_starts_at_creation() {
        let mut orb = OrbMotion::new(OrbSettings::default(), Vec2::ZERO, 5000.0);
        let visual = orb.update(5016.0);
        assert!(!visual.idle);
        assert_eq!(visual.light_intensity, OrbSettings::default().active_light);
        assert!(orb.update(8100.0).idle);
    }

    #[test]
    fn test_click_squash_decays() {
        let mut orb = orb();
        orb.pointer_down();
        let pressed = orb.update(0.0).squash;
        assert!((pressed - Vec2::new(1.15, 0.85)).length() < 1e-6);
        orb.pointer_up(1000.0);
        let mid = orb.update(1125.0).squash;
        assert!(mid.x > 1.0 && mid.x < 1.15);
        assert_eq!(orb.update(1300.0).squash, Vec2::ONE);
    }

    #[test]
    fn test_hue_wraps() {
        let mut orb = orb();
        let v = orb.update(20_000.0);
        assert!((0.0..1.0).contains(&v.hue));
    }
}
