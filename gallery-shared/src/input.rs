//! Keyboard state for the walkthrough.
//!
//! Platform code feeds key-down / key-up events by key identifier (the DOM
//! `KeyboardEvent.key` string); the frame loop polls the held flags once per
//! frame. Nothing is queued: a press released before the next frame is lost.

use glam::Vec2;

const KEY_COUNT: usize = 14;

/// Every key identifier the walkthrough reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyId {
    LowerW,
    LowerA,
    LowerS,
    LowerD,
    UpperW,
    UpperA,
    UpperS,
    UpperD,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    LowerE,
    UpperE,
}

impl KeyId {
    pub const ALL: [KeyId; KEY_COUNT] = [
        KeyId::LowerW,
        KeyId::LowerA,
        KeyId::LowerS,
        KeyId::LowerD,
        KeyId::UpperW,
        KeyId::UpperA,
        KeyId::UpperS,
        KeyId::UpperD,
        KeyId::ArrowUp,
        KeyId::ArrowDown,
        KeyId::ArrowLeft,
        KeyId::ArrowRight,
        KeyId::LowerE,
        KeyId::UpperE,
    ];

    /// Map a DOM key string to a recognized key.
    pub fn from_key_name(name: &str) -> Option<KeyId> {
        Some(match name {
            "w" => KeyId::LowerW,
            "a" => KeyId::LowerA,
            "s" => KeyId::LowerS,
            "d" => KeyId::LowerD,
            "W" => KeyId::UpperW,
            "A" => KeyId::UpperA,
            "S" => KeyId::UpperS,
            "D" => KeyId::UpperD,
            "ArrowUp" => KeyId::ArrowUp,
            "ArrowDown" => KeyId::ArrowDown,
            "ArrowLeft" => KeyId::ArrowLeft,
            "ArrowRight" => KeyId::ArrowRight,
            "e" => KeyId::LowerE,
            "E" => KeyId::UpperE,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LowerW => "w",
            Self::LowerA => "a",
            Self::LowerS => "s",
            Self::LowerD => "d",
            Self::UpperW => "W",
            Self::UpperA => "A",
            Self::UpperS => "S",
            Self::UpperD => "D",
            Self::ArrowUp => "ArrowUp",
            Self::ArrowDown => "ArrowDown",
            Self::ArrowLeft => "ArrowLeft",
            Self::ArrowRight => "ArrowRight",
            Self::LowerE => "e",
            Self::UpperE => "E",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }

    pub fn is_interact(&self) -> bool {
        matches!(self, Self::LowerE | Self::UpperE)
    }
}

/// Result of feeding a key-down event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    /// Not a key the walkthrough handles.
    Ignored,
    /// Key went from released to held.
    Pressed(KeyId),
    /// Auto-repeat of a key that is already held.
    Repeat(KeyId),
}

/// Signed movement axes derived from held keys. Each axis is -1, 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveIntent {
    pub forward: i8,
    pub right: i8,
}

impl MoveIntent {
    pub fn is_idle(&self) -> bool {
        self.forward == 0 && self.right == 0
    }

    /// Unit direction as (right, forward); zero when idle. Diagonals are
    /// normalized so they are no faster than a single axis.
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.right as f32, self.forward as f32).normalize_or_zero()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: [bool; KEY_COUNT],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, name: &str) -> KeyPress {
        let Some(key) = KeyId::from_key_name(name) else {
            return KeyPress::Ignored;
        };
        let slot = &mut self.held[key.index()];
        if *slot {
            KeyPress::Repeat(key)
        } else {
            *slot = true;
            KeyPress::Pressed(key)
        }
    }

    pub fn key_up(&mut self, name: &str) {
        if let Some(key) = KeyId::from_key_name(name) {
            self.held[key.index()] = false;
        }
    }

    pub fn is_held(&self, key: KeyId) -> bool {
        self.held[key.index()]
    }

    fn any_held(&self, keys: &[KeyId]) -> bool {
        keys.iter().any(|k| self.is_held(*k))
    }

    /// Drop every held flag, e.g. when the page loses focus mid-press.
    pub fn release_all(&mut self) {
        self.held = [false; KEY_COUNT];
    }

    pub fn move_intent(&self) -> MoveIntent {
        let mut intent = MoveIntent::default();
        if self.any_held(&[KeyId::LowerW, KeyId::UpperW, KeyId::ArrowUp]) {
            intent.forward += 1;
        }
        if self.any_held(&[KeyId::LowerS, KeyId::UpperS, KeyId::ArrowDown]) {
            intent.forward -= 1;
        }
        if self.any_held(&[KeyId::LowerD, KeyId::UpperD, KeyId::ArrowRight]) {
            intent.right += 1;
        }
        if self.any_held(&[KeyId::LowerA, KeyId::UpperA, KeyId::ArrowLeft]) {
            intent.right -= 1;
        }
        intent
    }
}
