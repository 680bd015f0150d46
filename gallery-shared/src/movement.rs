//! Player movement and axis-separated collision resolution.
//!
//! The resolver is a simplified slide: it only reacts to the first collidable
//! the candidate position overlaps, retries the move one horizontal axis at a
//! time against that same collidable, and otherwise reverts. A second
//! obstacle is not checked in the same frame, so thin geometry or very long
//! frames can tunnel. Both behaviors are part of how movement feels and are
//! kept as is.

use glam::Vec3;

use crate::camera::ViewOrientation;
use crate::input::MoveIntent;
use crate::layout::PlayerConfig;
use crate::math::Aabb;
use crate::scene::Collidable;

/// Collision shape of the player: a box around the eye position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerBody {
    pub eye_height: f32,
    /// Horizontal half-extent.
    pub radius: f32,
    /// Vertical extent below the eye. Kept under `eye_height` so the box
    /// clears the floor slab.
    pub height: f32,
}

impl PlayerBody {
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            eye_height: config.eye_height,
            radius: config.radius,
            height: config.height,
        }
    }

    pub fn bounds_at(&self, position: Vec3) -> Aabb {
        Aabb::new(
            Vec3::new(
                position.x - self.radius,
                self.eye_height - self.height,
                position.z - self.radius,
            ),
            Vec3::new(position.x + self.radius, self.eye_height, position.z + self.radius),
        )
    }

    fn pin(&self, position: Vec3) -> Vec3 {
        Vec3::new(position.x, self.eye_height, position.z)
    }
}

/// Horizontal displacement for this frame. Magnitude is `speed * dt`
/// whatever the number of keys held.
pub fn intended_displacement(
    intent: MoveIntent,
    view: &ViewOrientation,
    speed: f32,
    dt: f32,
) -> Vec3 {
    let dir = intent.direction();
    if dir == glam::Vec2::ZERO {
        return Vec3::ZERO;
    }
    let step = speed * dt;
    (view.horizontal_forward() * dir.y + view.horizontal_right() * dir.x) * step
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Full displacement applied.
    Clear,
    /// Hit collidable `index`; at least one axis move was committed.
    Slid { index: usize },
    /// Hit collidable `index`; both axis retries failed, position unchanged.
    Blocked { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub position: Vec3,
    pub outcome: MoveOutcome,
}

/// Resolve one frame of movement against the collidable list.
pub fn resolve_movement(
    position: Vec3,
    displacement: Vec3,
    body: &PlayerBody,
    collidables: &[Collidable],
) -> Resolution {
    let start = body.pin(position);
    let candidate = body.pin(start + displacement);
    let candidate_box = body.bounds_at(candidate);

    let Some(index) = collidables
        .iter()
        .position(|c| candidate_box.intersects(&c.bounds))
    else {
        return Resolution {
            position: candidate,
            outcome: MoveOutcome::Clear,
        };
    };
    let obstacle = &collidables[index].bounds;

    let mut resolved = start;

    let x_only = body.pin(Vec3::new(start.x + displacement.x, 0.0, start.z));
    if !body.bounds_at(x_only).intersects(obstacle) {
        resolved = x_only;
    }

    let z_only = body.pin(Vec3::new(resolved.x, 0.0, resolved.z + displacement.z));
    if !body.bounds_at(z_only).intersects(obstacle) {
        resolved = z_only;
    }

    let outcome = if resolved != start {
        MoveOutcome::Slid { index }
    } else {
        MoveOutcome::Blocked { index }
    };
    Resolution {
        position: body.pin(resolved),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    const EPSILON: f32 = 1e-4;
    const EYE: f32 = 1.7;

    fn body() -> PlayerBody {
        PlayerBody {
            eye_height: EYE,
            radius: 0.3,
            height: 1.4,
        }
    }

    fn wall(center: Vec3, size: Vec3) -> Collidable {
        Collidable::new("wall", center, size)
    }

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    // ── intended_displacement ──

    #[test]
    fn test_forward_follows_view() {
        let view = ViewOrientation::default();
        let d = intended_displacement(MoveIntent { forward: 1, right: 0 }, &view, 4.0, 0.5);
        assert!(vec_approx_eq(d, Vec3::new(0.0, 0.0, -2.0)));
    }

    #[test]
    fn test_pitch_does_not_lift_movement() {
        let view = ViewOrientation::new(0.0, 1.2);
        let d = intended_displacement(MoveIntent { forward: 1, right: 0 }, &view, 4.0, 1.0);
        assert_eq!(d.y, 0.0);
        assert!((d.length() - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_diagonal_not_faster_than_single_axis() {
        let view = ViewOrientation::new(0.4, 0.0);
        let single = intended_displacement(MoveIntent { forward: 1, right: 0 }, &view, 4.0, 0.1);
        for (forward, right) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
            let diag = intended_displacement(MoveIntent { forward, right }, &view, 4.0, 0.1);
            assert!(diag.length() <= single.length() + 1e-6);
            assert!((diag.length() - single.length()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_idle_has_no_displacement() {
        let view = ViewOrientation::default();
        assert_eq!(
            intended_displacement(MoveIntent::default(), &view, 4.0, 1.0),
            Vec3::ZERO
        );
    }

    // ── resolve_movement ──

    #[test]
    fn test_open_space_commits_full_candidate() {
        let start = Vec3::new(0.0, EYE, 0.0);
        let disp = Vec3::new(0.3, 0.0, -1.1);
        let far_wall = wall(Vec3::new(10.0, 2.0, 0.0), Vec3::new(0.2, 4.0, 6.0));
        let res = resolve_movement(start, disp, &body(), &[far_wall]);
        assert_eq!(res.outcome, MoveOutcome::Clear);
        assert_eq!(res.position, Vec3::new(0.3, EYE, -1.1));
    }

    #[test]
    fn test_head_on_wall_reverts_exactly() {
        // Wall spans the whole width ahead; both axis retries still overlap.
        let start = Vec3::new(0.0, EYE, 0.0);
        let blocker = wall(Vec3::new(0.0, 2.0, -0.5), Vec3::new(4.0, 4.0, 0.2));
        let disp = Vec3::new(0.0, 0.0, -0.2);
        let res = resolve_movement(start, disp, &body(), &[blocker]);
        assert_eq!(res.outcome, MoveOutcome::Blocked { index: 0 });
        assert_eq!(res.position, start);
    }

    #[test]
    fn test_shallow_angle_slides_along_wall() {
        // Wall running along X just ahead; moving forward-right slides in X.
        let start = Vec3::new(0.0, EYE, 0.0);
        let blocker = wall(Vec3::new(0.0, 2.0, -0.45), Vec3::new(10.0, 4.0, 0.2));
        let disp = Vec3::new(0.2, 0.0, -0.1);
        let res = resolve_movement(start, disp, &body(), &[blocker]);
        assert_eq!(res.outcome, MoveOutcome::Slid { index: 0 });
        assert!(vec_approx_eq(res.position, Vec3::new(0.2, EYE, 0.0)));
    }

    #[test]
    fn test_slides_along_z_when_x_blocked() {
        let start = Vec3::new(0.0, EYE, 0.0);
        let side_wall = wall(Vec3::new(0.45, 2.0, 0.0), Vec3::new(0.2, 4.0, 10.0));
        let disp = Vec3::new(0.1, 0.0, -0.25);
        let res = resolve_movement(start, disp, &body(), &[side_wall]);
        assert_eq!(res.outcome, MoveOutcome::Slid { index: 0 });
        assert!(vec_approx_eq(res.position, Vec3::new(0.0, EYE, -0.25)));
    }

    #[test]
    fn test_only_first_overlap_is_resolved() {
        // The X retry clears the first wall but lands inside the second; the
        // second is never checked in this frame.
        let start = Vec3::new(0.0, EYE, 0.0);
        let first = wall(Vec3::new(0.0, 2.0, -0.45), Vec3::new(10.0, 4.0, 0.2));
        let second = wall(Vec3::new(0.6, 2.0, 0.0), Vec3::new(0.2, 4.0, 0.2));
        let disp = Vec3::new(0.3, 0.0, -0.1);
        let res = resolve_movement(start, disp, &body(), &[first, second.clone()]);
        assert_eq!(res.outcome, MoveOutcome::Slid { index: 0 });
        assert!(body().bounds_at(res.position).intersects(&second.bounds));
    }

    #[test]
    fn test_first_listed_collidable_wins() {
        let start = Vec3::new(0.0, EYE, 0.0);
        let a = wall(Vec3::new(0.0, 2.0, -0.45), Vec3::new(10.0, 4.0, 0.2));
        let b = wall(Vec3::new(0.0, 2.0, -0.5), Vec3::new(10.0, 4.0, 0.2));
        let disp = Vec3::new(0.0, 0.0, -0.2);
        let res = resolve_movement(start, disp, &body(), &[b, a]);
        assert_eq!(res.outcome, MoveOutcome::Blocked { index: 0 });
    }

    #[test]
    fn test_height_pinned_in_every_branch() {
        let start = Vec3::new(0.0, 5.0, 0.0);
        let blocker = wall(Vec3::new(0.0, 2.0, -0.5), Vec3::new(4.0, 4.0, 0.2));
        for disp in [
            Vec3::new(0.0, 3.0, 0.5),
            Vec3::new(0.0, -3.0, -0.2),
            Vec3::new(0.2, 1.0, -0.1),
        ] {
            let res = resolve_movement(start, disp, &body(), &[blocker.clone()]);
            assert_eq!(res.position.y, EYE, "{:?}", res.outcome);
        }
    }

    #[test]
    fn test_obstacle_below_body_is_ignored() {
        // A low step under the collision box's bottom edge does not block.
        let start = Vec3::new(0.0, EYE, 0.0);
        let step = wall(Vec3::new(0.0, 0.1, -0.5), Vec3::new(2.0, 0.2, 2.0));
        let res = resolve_movement(start, Vec3::new(0.0, 0.0, -0.5), &body(), &[step]);
        assert_eq!(res.outcome, MoveOutcome::Clear);
    }

    #[test]
    fn test_walk_forward_in_open_space() {
        let view = ViewOrientation::new(FRAC_PI_4, 0.0);
        let intent = MoveIntent { forward: 1, right: 0 };
        let mut pos = Vec3::new(0.0, EYE, 0.0);
        let dt = 1.0 / 60.0;
        for _ in 0..120 {
            let disp = intended_displacement(intent, &view, 4.0, dt);
            pos = resolve_movement(pos, disp, &body(), &[]).position;
        }
        let expected = Vec3::new(0.0, EYE, 0.0) + view.horizontal_forward() * 8.0;
        assert!(vec_approx_eq(pos, expected), "{pos} vs {expected}");
    }
}
