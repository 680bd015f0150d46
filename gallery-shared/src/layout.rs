//! Gallery layout configuration, read from TOML.
//!
//! Every section has defaults matching the black cube room, so an empty file
//! is a valid layout.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::AssetKind;
use crate::interaction::InteractionAction;

/// Download path shipped in the default layout. Triggering it shows
/// instructions instead of downloading.
pub const PLACEHOLDER_DOWNLOAD_PATH: &str = "docs/your_manuscript_excerpt.pdf";

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse layout: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize layout: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid layout: {field} {reason}")]
    Invalid { field: String, reason: String },
    #[error("duplicate asset id '{0}'")]
    DuplicateAsset(String),
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> LayoutError {
    LayoutError::Invalid {
        field: field.into(),
        reason: reason.into(),
    }
}

/// The enclosing cube room with a doorway in its +Z wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Generate wall colliders for the room.
    pub enabled: bool,
    /// Floor center of the room.
    pub center: Vec3,
    pub size: f32,
    pub height: f32,
    pub wall_thickness: f32,
    pub door_width: f32,
    pub door_height: f32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            center: Vec3::ZERO,
            size: 6.0,
            height: 4.0,
            wall_thickness: 0.2,
            door_width: 2.0,
            door_height: 2.8,
        }
    }
}

impl RoomConfig {
    /// World z of the doorway's outer face.
    pub fn entrance_z(&self) -> f32 {
        self.center.z + self.size / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub eye_height: f32,
    /// Horizontal half-extent of the player's collision box.
    pub radius: f32,
    /// Vertical extent of the collision box, measured down from eye height.
    pub height: f32,
    /// Units per second.
    pub move_speed: f32,
    /// Radians per pointer pixel.
    pub look_sensitivity: f32,
    pub start_x: f32,
    pub start_yaw_degrees: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            eye_height: 1.7,
            radius: 0.3,
            height: 1.4,
            move_speed: 4.0,
            look_sensitivity: 0.002,
            start_x: 0.0,
            start_yaw_degrees: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    /// Seconds.
    pub duration: f32,
    pub start_z: f32,
    /// Where the dolly stops, in front of the entrance.
    pub end_offset: f32,
    /// Minimum distance kept from the entrance once the intro ends.
    pub clearance: f32,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            duration: 3.0,
            start_z: 12.0,
            end_offset: 1.5,
            clearance: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub max_range: f32,
    /// Seconds the status message replaces the prompt after a trigger.
    pub status_duration: f32,
    pub status_message: String,
    pub placeholder_path: String,
    pub unconfigured_message: String,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            max_range: 5.0,
            status_duration: 2.0,
            status_message: "Download started".into(),
            placeholder_path: PLACEHOLDER_DOWNLOAD_PATH.into(),
            unconfigured_message: "The manuscript has not been published here yet. \
                Set the download path in the gallery layout to enable it."
                .into(),
        }
    }
}

/// A named solid box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    pub name: String,
    pub center: Vec3,
    pub size: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractableSpec {
    pub name: String,
    pub center: Vec3,
    pub size: Vec3,
    /// Also block player movement.
    #[serde(default)]
    pub solid: bool,
    pub action: InteractionAction,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSpec {
    pub id: String,
    pub kind: AssetKind,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryLayout {
    pub room: RoomConfig,
    pub player: PlayerConfig,
    pub intro: IntroConfig,
    pub interaction: InteractionConfig,
    pub collidables: Vec<BoxSpec>,
    pub interactables: Vec<InteractableSpec>,
    pub assets: Vec<AssetSpec>,
}

impl Default for GalleryLayout {
    fn default() -> Self {
        let room = RoomConfig::default();
        let bench = InteractableSpec {
            name: "manuscript_bench".into(),
            center: Vec3::new(
                0.0,
                0.5 + room.wall_thickness,
                room.center.z - room.size / 2.0 + 1.2,
            ),
            size: Vec3::new(1.8, 0.25, 0.6),
            solid: true,
            action: InteractionAction::DownloadFile {
                path: PLACEHOLDER_DOWNLOAD_PATH.into(),
            },
            prompt: Some("Press E to download the manuscript excerpt".into()),
        };
        let assets = (1..=3)
            .map(|i| AssetSpec {
                id: format!("painting_{i}"),
                kind: AssetKind::Texture,
                url: format!("assets/paintings/painting{i}.jpg"),
            })
            .collect();

        Self {
            room,
            player: PlayerConfig::default(),
            intro: IntroConfig::default(),
            interaction: InteractionConfig::default(),
            collidables: Vec::new(),
            interactables: vec![bench],
            assets,
        }
    }
}

impl GalleryLayout {
    /// Parse and validate a layout.
    pub fn from_toml_str(src: &str) -> Result<Self, LayoutError> {
        let layout: GalleryLayout = toml::from_str(src)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let src = std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&src)
    }

    pub fn to_toml_string(&self) -> Result<String, LayoutError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Intro dolly end depth.
    pub fn intro_end_z(&self) -> f32 {
        self.room.entrance_z() + self.intro.end_offset
    }

    /// Closest the camera may sit to the entrance when the intro ends.
    pub fn intro_min_z(&self) -> f32 {
        self.room.entrance_z() + self.intro.clearance
    }

    /// True if any download still points at the placeholder path.
    pub fn has_placeholder_downloads(&self) -> bool {
        self.interactables.iter().any(|i| match &i.action {
            InteractionAction::DownloadFile { path } => path == &self.interaction.placeholder_path,
        })
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let room = &self.room;
        finite_point("room.center", room.center)?;
        if room.enabled {
            positive("room.size", room.size)?;
            positive("room.height", room.height)?;
            positive("room.wall_thickness", room.wall_thickness)?;
            if room.door_width < 0.0 || room.door_height < 0.0 {
                return Err(invalid("room.door", "must not be negative"));
            }
        }

        let player = &self.player;
        positive("player.eye_height", player.eye_height)?;
        positive("player.radius", player.radius)?;
        positive("player.height", player.height)?;
        positive("player.move_speed", player.move_speed)?;
        finite("player.look_sensitivity", player.look_sensitivity)?;
        finite("player.start_x", player.start_x)?;
        finite("player.start_yaw_degrees", player.start_yaw_degrees)?;
        if player.height > player.eye_height {
            return Err(invalid("player.height", "must not exceed player.eye_height"));
        }

        positive("intro.duration", self.intro.duration)?;
        finite("intro.start_z", self.intro.start_z)?;
        finite("intro.end_offset", self.intro.end_offset)?;
        non_negative("intro.clearance", self.intro.clearance)?;

        positive("interaction.max_range", self.interaction.max_range)?;
        non_negative("interaction.status_duration", self.interaction.status_duration)?;

        for entry in &self.collidables {
            let field = format!("collidables.{}", entry.name);
            finite_point(&format!("{field}.center"), entry.center)?;
            non_negative_size(&field, entry.size)?;
        }
        for entry in &self.interactables {
            let field = format!("interactables.{}", entry.name);
            finite_point(&format!("{field}.center"), entry.center)?;
            non_negative_size(&field, entry.size)?;
        }

        let mut seen = HashSet::new();
        for asset in &self.assets {
            if !seen.insert(asset.id.as_str()) {
                return Err(LayoutError::DuplicateAsset(asset.id.clone()));
            }
        }

        Ok(())
    }
}

fn positive(field: &str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must not be negative, got {value}")))
    }
}

fn finite(field: &str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite, got {value}")))
    }
}

fn finite_point(field: &str, point: Vec3) -> Result<(), LayoutError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be finite"))
    }
}

fn non_negative_size(field: &str, size: Vec3) -> Result<(), LayoutError> {
    if size.is_finite() && size.cmpge(Vec3::ZERO).all() {
        Ok(())
    } else {
        Err(invalid(format!("{field}.size"), "must be finite and non-negative"))
    }
}
