use crate::layout::GalleryLayout;
use crate::math::{ease_in_out_cos, lerp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroPhase {
    /// Scripted dolly toward the entrance; the player has no control.
    Intro,
    /// Player control. Terminal.
    FreeRoam,
}

/// Result of advancing the intro by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntroStep {
    /// Camera depth for this frame.
    Moving { z: f32 },
    /// The intro ended on this frame; camera depth is final.
    Finished { z: f32 },
    /// Already in free roam; nothing to do.
    Idle,
}

/// Opening camera dolly along -Z toward the room entrance.
#[derive(Debug, Clone)]
pub struct IntroAnimation {
    elapsed: f32,
    duration: f32,
    start_z: f32,
    end_z: f32,
    min_z: f32,
    phase: IntroPhase,
}

impl IntroAnimation {
    pub fn new(duration: f32, start_z: f32, end_z: f32, min_z: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
            start_z,
            end_z,
            min_z,
            phase: IntroPhase::Intro,
        }
    }

    pub fn from_layout(layout: &GalleryLayout) -> Self {
        Self::new(
            layout.intro.duration,
            layout.intro.start_z,
            layout.intro_end_z(),
            layout.intro_min_z(),
        )
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == IntroPhase::Intro
    }

    pub fn start_z(&self) -> f32 {
        self.start_z
    }

    /// Normalized progress in [0, 1].
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).min(1.0)
    }

    /// Advance time and return the camera depth for this frame.
    pub fn update(&mut self, dt: f32) -> IntroStep {
        if self.phase == IntroPhase::FreeRoam {
            return IntroStep::Idle;
        }

        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        let eased = ease_in_out_cos(self.progress());
        let z = lerp(self.start_z, self.end_z, eased);

        if self.elapsed >= self.duration {
            self.phase = IntroPhase::FreeRoam;
            let z = z.max(self.min_z);
            log::info!("Intro camera animation complete; player control active");
            return IntroStep::Finished { z };
        }

        IntroStep::Moving { z }
    }

    /// Jump straight to free roam, returning the final camera depth.
    pub fn skip(&mut self) -> f32 {
        self.elapsed = self.duration;
        self.phase = IntroPhase::FreeRoam;
        self.end_z.max(self.min_z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_intro() -> IntroAnimation {
        IntroAnimation::from_layout(&GalleryLayout::default())
    }

    #[test]
    fn test_starts_in_intro() {
        let intro = default_intro();
        assert_eq!(intro.phase(), IntroPhase::Intro);
        assert_eq!(intro.progress(), 0.0);
    }

    #[test]
    fn test_depth_moves_monotonically_toward_end() {
        let mut intro = default_intro();
        let mut prev = intro.start_z();
        loop {
            match intro.update(1.0 / 60.0) {
                IntroStep::Moving { z } => {
                    assert!(z <= prev, "depth went backwards: {z} > {prev}");
                    assert!(z >= 4.5);
                    prev = z;
                }
                IntroStep::Finished { z } => {
                    assert!(z <= prev);
                    assert_eq!(z, 4.5);
                    break;
                }
                IntroStep::Idle => panic!("intro ended without a Finished step"),
            }
        }
        assert_eq!(intro.phase(), IntroPhase::FreeRoam);
    }

    #[test]
    fn test_large_step_finishes_at_once() {
        let mut intro = default_intro();
        assert_eq!(intro.update(10.0), IntroStep::Finished { z: 4.5 });
        assert_eq!(intro.update(0.016), IntroStep::Idle);
        assert_eq!(intro.progress(), 1.0);
    }

    #[test]
    fn test_end_clamped_to_clearance() {
        // Dolly end inside the doorway; clearance plane at 3.3 wins.
        let mut intro = IntroAnimation::new(1.0, 12.0, 2.0, 3.3);
        assert_eq!(intro.update(1.0), IntroStep::Finished { z: 3.3 });
    }

    #[test]
    fn test_never_returns_to_intro() {
        let mut intro = default_intro();
        intro.update(5.0);
        for _ in 0..10 {
            assert_eq!(intro.update(1.0), IntroStep::Idle);
            assert_eq!(intro.phase(), IntroPhase::FreeRoam);
        }
    }

    #[test]
    fn test_negative_dt_does_not_rewind() {
        let mut intro = default_intro();
        intro.update(1.0);
        let before = intro.progress();
        intro.update(-0.5);
        assert_eq!(intro.progress(), before);
    }

    #[test]
    fn test_skip() {
        let mut intro = default_intro();
        assert_eq!(intro.skip(), 4.5);
        assert!(!intro.is_running());
    }
}
