//! Hotkey combination and system-wide grab guard

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::backend::Hotkeys;
use crate::constants::modifiers;
use crate::types::WindowId;

/// Why a hotkey could not be installed.
///
/// Deliberately opaque: conflicts, invalid combinations and permission
/// problems all degrade the same way (the view runs without the hotkey).
#[derive(Debug, Error)]
pub enum HotkeyError {
    #[error("hotkey registration failed: {0}")]
    RegistrationFailed(String),
}

/// A keyboard combination: one main key plus modifier state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCombo {
    /// X11 keycode of the main key
    pub key_code: u8,

    #[serde(default)]
    pub ctrl: bool,

    #[serde(default)]
    pub shift: bool,

    #[serde(default)]
    pub alt: bool,

    #[serde(default)]
    pub super_key: bool,
}

impl KeyCombo {
    /// Create a new combination
    pub fn new(key_code: u8, ctrl: bool, shift: bool, alt: bool, super_key: bool) -> Self {
        Self {
            key_code,
            ctrl,
            shift,
            alt,
            super_key,
        }
    }

    /// Combination with no modifiers
    pub fn bare(key_code: u8) -> Self {
        Self::new(key_code, false, false, false, false)
    }

    /// X11 modifier mask bits for this combination
    pub fn modifier_bits(&self) -> u16 {
        let mut bits = 0;
        if self.shift {
            bits |= modifiers::SHIFT;
        }
        if self.ctrl {
            bits |= modifiers::CONTROL;
        }
        if self.alt {
            bits |= modifiers::ALT;
        }
        if self.super_key {
            bits |= modifiers::SUPER;
        }
        bits
    }

    /// Check whether a key press with the given modifier state matches.
    ///
    /// Lock and numlock bits in `state` are ignored.
    pub fn matches(&self, key_code: u8, state: u16) -> bool {
        self.key_code == key_code && (state & modifiers::RELEVANT) == self.modifier_bits()
    }

    /// Human-readable form for logs and UI
    pub fn display_name(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        if self.alt {
            parts.push("Alt".to_string());
        }
        if self.super_key {
            parts.push("Super".to_string());
        }
        parts.push(format!("keycode {}", self.key_code));
        parts.join("+")
    }
}

/// A live system-wide key grab.
///
/// Dropping the binding removes the grab, so replacing or clearing a view's
/// hotkey can never leak a registration.
pub struct HotkeyBinding<'a, B: Hotkeys> {
    backend: &'a B,
    owner: WindowId,
    combo: KeyCombo,
}

impl<'a, B: Hotkeys> HotkeyBinding<'a, B> {
    /// Install the grab; on failure no binding exists
    pub fn register(backend: &'a B, owner: WindowId, combo: KeyCombo) -> Result<Self, HotkeyError> {
        backend.grab_key(owner, &combo)?;
        debug!(owner = owner, combo = %combo.display_name(), "hotkey registered");
        Ok(Self {
            backend,
            owner,
            combo,
        })
    }

    /// The bound combination
    pub fn combo(&self) -> &KeyCombo {
        &self.combo
    }
}

impl<B: Hotkeys> Drop for HotkeyBinding<'_, B> {
    fn drop(&mut self) {
        self.backend.ungrab_key(self.owner, &self.combo);
        debug!(owner = self.owner, combo = %self.combo.display_name(), "hotkey unregistered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let combo = KeyCombo::bare(23);
        assert_eq!(combo.display_name(), "keycode 23");

        let combo = KeyCombo::new(23, false, true, false, false);
        assert_eq!(combo.display_name(), "Shift+keycode 23");

        let combo = KeyCombo::new(67, true, true, true, false);
        assert_eq!(combo.display_name(), "Ctrl+Shift+Alt+keycode 67");
    }

    #[test]
    fn test_modifier_bits() {
        assert_eq!(KeyCombo::bare(23).modifier_bits(), 0);
        assert_eq!(
            KeyCombo::new(23, true, true, false, false).modifier_bits(),
            modifiers::CONTROL | modifiers::SHIFT
        );
        assert_eq!(
            KeyCombo::new(23, false, false, false, true).modifier_bits(),
            modifiers::SUPER
        );
    }

    #[test]
    fn test_matches() {
        let combo = KeyCombo::new(23, false, true, false, false);

        assert!(combo.matches(23, modifiers::SHIFT));
        assert!(!combo.matches(23, 0));
        assert!(!combo.matches(24, modifiers::SHIFT));
        assert!(!combo.matches(23, modifiers::SHIFT | modifiers::CONTROL));
    }

    #[test]
    fn test_matches_ignores_lock_bits() {
        let combo = KeyCombo::bare(23);
        // Caps lock (bit 1) and numlock (Mod2, bit 4) must not spoil the match
        assert!(combo.matches(23, 1 << 1));
        assert!(combo.matches(23, 1 << 4));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let combo = KeyCombo::new(23, false, true, false, false);
        let json = serde_json::to_string(&combo).unwrap();
        let back: KeyCombo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, combo);
    }

    #[test]
    fn test_deserialization_defaults_modifiers() {
        let combo: KeyCombo = serde_json::from_str(r#"{"key_code":95}"#).unwrap();
        assert_eq!(combo, KeyCombo::bare(95));
    }
}
