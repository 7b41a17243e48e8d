//! The immutable record stored for a successfully registered binding

use crate::chord::KeyChord;
use crate::types::{CommandId, WhenExpr};

/// A fully registered keybinding
///
/// Produced only inside a successful registration, after the rule resolved
/// against the platform. Never mutated; removal is the only way out of the
/// registry. Equality is by value, so two registrations of identical rules
/// produce indistinguishable entries (their registration tokens differ).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeybindingEntry {
    /// The concrete chord to bind to
    pub chord: KeyChord,
    /// The command to run
    pub command: CommandId,
    /// Priority weight, for the downstream resolver
    pub weight: i32,
    /// Condition gating the binding, evaluated elsewhere
    pub when: Option<WhenExpr>,
}

impl KeybindingEntry {
    /// Check if this binding is active unconditionally
    pub fn is_always_active(&self) -> bool {
        self.when.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::parse_chord;

    #[test]
    fn test_value_equality() {
        let a = KeybindingEntry {
            chord: parse_chord("ctrl+s").unwrap(),
            command: CommandId::new("file.save"),
            weight: 0,
            when: None,
        };
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn test_always_active_without_when() {
        let entry = KeybindingEntry {
            chord: parse_chord("ctrl+s").unwrap(),
            command: CommandId::new("file.save"),
            weight: 0,
            when: None,
        };
        assert!(entry.is_always_active());

        let gated = KeybindingEntry {
            when: Some(WhenExpr::new("editorFocused")),
            ..entry
        };
        assert!(!gated.is_always_active());
    }
}
