use glam::Vec3;

use crate::assets::AssetRegistry;
use crate::interaction::Interactable;
use crate::layout::{GalleryLayout, RoomConfig};
use crate::math::Aabb;

/// Side panels narrower than this are not built.
const MIN_PANEL: f32 = 0.01;

/// A static solid volume the player cannot walk through.
#[derive(Debug, Clone, PartialEq)]
pub struct Collidable {
    pub name: String,
    pub bounds: Aabb,
}

impl Collidable {
    pub fn new(name: impl Into<String>, center: Vec3, size: Vec3) -> Self {
        Self {
            name: name.into(),
            bounds: Aabb::from_center_size(center, size),
        }
    }
}

/// Static scene data the walkthrough reads every frame. Built once; the
/// collidable and interactable lists are never modified afterwards.
#[derive(Debug, Clone)]
pub struct GalleryScene {
    collidables: Vec<Collidable>,
    interactables: Vec<Interactable>,
    pub assets: AssetRegistry,
}

impl GalleryScene {
    /// Build the scene from a layout.
    ///
    /// Collidable order: room walls, then layout collidables, then solid
    /// interactables.
    pub fn from_layout(layout: &GalleryLayout) -> Self {
        let mut collidables = Vec::new();
        if layout.room.enabled {
            collidables.extend(room_walls(&layout.room));
        }
        collidables.extend(
            layout
                .collidables
                .iter()
                .map(|spec| Collidable::new(spec.name.clone(), spec.center, spec.size)),
        );

        let mut interactables = Vec::with_capacity(layout.interactables.len());
        for spec in &layout.interactables {
            let bounds = Aabb::from_center_size(spec.center, spec.size);
            if spec.solid {
                collidables.push(Collidable {
                    name: spec.name.clone(),
                    bounds,
                });
            }
            interactables.push(Interactable {
                name: spec.name.clone(),
                bounds,
                action: spec.action.clone(),
                prompt: spec.prompt.clone(),
            });
        }

        let mut assets = AssetRegistry::new();
        for asset in &layout.assets {
            assets.register(asset.id.clone(), asset.kind, asset.url.clone());
        }

        log::debug!(
            "Built gallery scene: {} collidables, {} interactables, {} assets",
            collidables.len(),
            interactables.len(),
            assets.len()
        );

        Self {
            collidables,
            interactables,
            assets,
        }
    }

    pub fn collidables(&self) -> &[Collidable] {
        &self.collidables
    }

    pub fn interactables(&self) -> &[Interactable] {
        &self.interactables
    }
}

/// Wall boxes of the cube room: back, left, right, the two panels beside
/// the doorway and the lintel above it. Floor and ceiling slabs are not
/// solid for the player.
pub fn room_walls(room: &RoomConfig) -> Vec<Collidable> {
    let c = room.center;
    let s = room.size;
    let t = room.wall_thickness;
    let wall_h = room.height - t;
    let wall_y = c.y + wall_h / 2.0 + t / 2.0;
    let front_z = c.z + s / 2.0 - t / 2.0;

    let mut walls = vec![
        Collidable::new(
            "back_wall",
            Vec3::new(c.x, wall_y, c.z - s / 2.0 + t / 2.0),
            Vec3::new(s - 2.0 * t, wall_h, t),
        ),
        Collidable::new(
            "left_wall",
            Vec3::new(c.x - s / 2.0 + t / 2.0, wall_y, c.z),
            Vec3::new(t, wall_h, s),
        ),
        Collidable::new(
            "right_wall",
            Vec3::new(c.x + s / 2.0 - t / 2.0, wall_y, c.z),
            Vec3::new(t, wall_h, s),
        ),
    ];

    let side = (s - room.door_width - 2.0 * t) / 2.0;
    if side > MIN_PANEL {
        let offset = room.door_width / 2.0 + side / 2.0;
        walls.push(Collidable::new(
            "front_panel_left",
            Vec3::new(c.x - offset, wall_y, front_z),
            Vec3::new(side, wall_h, t),
        ));
        walls.push(Collidable::new(
            "front_panel_right",
            Vec3::new(c.x + offset, wall_y, front_z),
            Vec3::new(side, wall_h, t),
        ));
    }

    let lintel_h = wall_h - room.door_height;
    if lintel_h > MIN_PANEL {
        walls.push(Collidable::new(
            "lintel",
            Vec3::new(c.x, c.y + room.door_height + lintel_h / 2.0 + t / 2.0, front_z),
            Vec3::new(room.door_width, lintel_h, t),
        ));
    }

    walls
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn wall<'a>(walls: &'a [Collidable], name: &str) -> &'a Collidable {
        walls.iter().find(|w| w.name == name).unwrap()
    }

    #[test]
    fn test_default_room_has_six_walls() {
        let walls = room_walls(&RoomConfig::default());
        let names: Vec<&str> = walls.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(
            names,
            ["back_wall", "left_wall", "right_wall", "front_panel_left", "front_panel_right", "lintel"]
        );
    }

    #[test]
    fn test_doorway_gap_matches_door_width() {
        let walls = room_walls(&RoomConfig::default());
        let left = wall(&walls, "front_panel_left");
        let right = wall(&walls, "front_panel_right");
        assert!(approx_eq(left.bounds.max.x, -1.0));
        assert!(approx_eq(right.bounds.min.x, 1.0));
        assert!(approx_eq(left.bounds.max.z, 3.0));
    }

    #[test]
    fn test_lintel_above_eye_height() {
        let walls = room_walls(&RoomConfig::default());
        let lintel = wall(&walls, "lintel");
        assert!(lintel.bounds.min.y > 1.7);
    }

    #[test]
    fn test_no_side_panels_when_door_fills_wall() {
        let room = RoomConfig {
            door_width: 5.6,
            ..RoomConfig::default()
        };
        let walls = room_walls(&room);
        assert!(walls.iter().all(|w| !w.name.starts_with("front_panel")));
    }

    #[test]
    fn test_scene_orders_walls_then_solid_interactables() {
        let layout = GalleryLayout::default();
        let scene = GalleryScene::from_layout(&layout);
        assert_eq!(scene.collidables().len(), 7);
        assert_eq!(scene.collidables()[6].name, "manuscript_bench");
        assert_eq!(scene.interactables().len(), 1);
        assert_eq!(scene.assets.len(), 3);
    }

    #[test]
    fn test_disabled_room_has_no_walls() {
        let mut layout = GalleryLayout::default();
        layout.room.enabled = false;
        layout.interactables[0].solid = false;
        let scene = GalleryScene::from_layout(&layout);
        assert!(scene.collidables().is_empty());
    }
}
