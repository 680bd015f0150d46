//! Load state for optional scene assets (painting textures, models,
//! environment maps).
//!
//! Loads are started by the host and complete asynchronously. Each entry is
//! settled exactly once by its load callback; everything else only reads it.
//! A failed asset keeps its fallback appearance for the rest of the session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Texture,
    Model,
    EnvironmentMap,
}

impl AssetKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Texture => "texture",
            Self::Model => "model",
            Self::EnvironmentMap => "environment map",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetState {
    Pending,
    Loaded,
    Failed { reason: String },
}

impl AssetState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("unknown asset '{0}'")]
    Unknown(String),
    #[error("asset '{0}' was already settled")]
    AlreadySettled(String),
}

#[derive(Debug, Clone)]
pub struct AssetEntry {
    pub id: String,
    pub kind: AssetKind,
    pub url: String,
    pub state: AssetState,
}

#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    entries: Vec<AssetEntry>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, kind: AssetKind, url: impl Into<String>) {
        self.entries.push(AssetEntry {
            id: id.into(),
            kind,
            url: url.into(),
            state: AssetState::Pending,
        });
    }

    pub fn get(&self, id: &str) -> Option<&AssetEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        self.get(id).is_some_and(|e| e.state == AssetState::Loaded)
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.state.is_settled()).count()
    }

    pub fn mark_loaded(&mut self, id: &str) -> Result<(), AssetError> {
        let entry = self.settle(id)?;
        entry.state = AssetState::Loaded;
        log::info!("Loaded {} '{}' from {}", entry.kind.label(), entry.id, entry.url);
        Ok(())
    }

    pub fn mark_failed(&mut self, id: &str, reason: impl Into<String>) -> Result<(), AssetError> {
        let entry = self.settle(id)?;
        let reason = reason.into();
        log::error!(
            "Failed to load {} '{}' from {}: {reason}; keeping fallback",
            entry.kind.label(),
            entry.id,
            entry.url
        );
        entry.state = AssetState::Failed { reason };
        Ok(())
    }

    fn settle(&mut self, id: &str) -> Result<&mut AssetEntry, AssetError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| AssetError::Unknown(id.to_string()))?;
        if entry.state.is_settled() {
            return Err(AssetError::AlreadySettled(id.to_string()));
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AssetRegistry {
        let mut reg = AssetRegistry::new();
        reg.register("painting_1", AssetKind::Texture, "assets/paintings/painting1.jpg");
        reg.register("bridge", AssetKind::EnvironmentMap, "textures/cube/Bridge2/");
        reg
    }

    #[test]
    fn test_entries_start_pending() {
        let reg = registry();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.pending_count(), 2);
        assert!(!reg.is_loaded("painting_1"));
    }

    #[test]
    fn test_mark_loaded() {
        let mut reg = registry();
        reg.mark_loaded("painting_1").unwrap();
        assert!(reg.is_loaded("painting_1"));
        assert_eq!(reg.pending_count(), 1);
    }

    #[test]
    fn test_mark_failed_keeps_reason() {
        let mut reg = registry();
        reg.mark_failed("bridge", "404").unwrap();
        assert_eq!(
            reg.get("bridge").unwrap().state,
            AssetState::Failed { reason: "404".into() }
        );
        assert!(!reg.is_loaded("bridge"));
    }

    #[test]
    fn test_settle_only_once() {
        let mut reg = registry();
        reg.mark_failed("painting_1", "timeout").unwrap();
        assert_eq!(
            reg.mark_loaded("painting_1"),
            Err(AssetError::AlreadySettled("painting_1".into()))
        );
        assert!(!reg.is_loaded("painting_1"));
    }

    #[test]
    fn test_unknown_asset() {
        let mut reg = registry();
        assert_eq!(reg.mark_loaded("nope"), Err(AssetError::Unknown("nope".into())));
    }
}
