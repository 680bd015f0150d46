use glam::{EulerRot, Quat, Vec3};

use crate::math::Ray;

const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2;

/// First-person view orientation driven by captured pointer movement.
///
/// Yaw 0 looks down -Z; positive yaw turns left. Pitch is clamped to straight
/// up / straight down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewOrientation {
    pub yaw: f32,
    pub pitch: f32,
}

impl ViewOrientation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
        }
    }

    /// Apply a pointer delta in screen pixels.
    pub fn apply_pointer_delta(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw -= dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Full view direction, including pitch.
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    /// View forward projected onto the ground plane.
    pub fn horizontal_forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(-sy, 0.0, -cy)
    }

    pub fn horizontal_right(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cy, 0.0, -sy)
    }

    /// Camera rotation, YXZ order as a first-person camera expects.
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Ray through the exact center of the view.
    pub fn center_ray(&self, eye: Vec3) -> Ray {
        Ray::new(eye, self.forward())
    }
}
