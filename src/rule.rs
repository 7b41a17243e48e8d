//! Abstract binding rules and their platform resolution
//!
//! A rule describes a binding before it is tied to a platform: a primary
//! chord source, optional per-platform overrides, a priority weight, and an
//! optional activation condition. Resolution picks the source that applies to
//! the target platform and parses it into a concrete [`KeyChord`].

use crate::chord::{parse_chord, KeyChord};
use crate::types::WhenExpr;

/// The platforms a rule can specialize for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// The platform this process is running on
    pub fn current() -> Platform {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

/// An abstract, possibly platform-conditional keybinding rule
///
/// `primary` is the chord source used when no platform override applies.
/// A rule with neither a matching override nor a primary simply does not
/// bind on that platform; registering it is a no-op.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeybindingRule {
    /// Chord source used when no platform-specific override applies
    pub primary: Option<String>,
    /// Windows override
    pub win: Option<String>,
    /// macOS override
    pub mac: Option<String>,
    /// Linux override
    pub linux: Option<String>,
    /// Priority weight for the downstream resolver (higher wins)
    pub weight: i32,
    /// Optional activation condition, stored opaquely
    pub when: Option<WhenExpr>,
}

impl KeybindingRule {
    /// Create a rule with a primary chord source
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: Some(primary.into()),
            ..Self::default()
        }
    }

    /// Set the Windows override (builder pattern)
    pub fn win(mut self, source: impl Into<String>) -> Self {
        self.win = Some(source.into());
        self
    }

    /// Set the macOS override
    pub fn mac(mut self, source: impl Into<String>) -> Self {
        self.mac = Some(source.into());
        self
    }

    /// Set the Linux override
    pub fn linux(mut self, source: impl Into<String>) -> Self {
        self.linux = Some(source.into());
        self
    }

    /// Set the priority weight
    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Set the activation condition
    pub fn when(mut self, when: impl Into<WhenExpr>) -> Self {
        self.when = Some(when.into());
        self
    }

    /// Resolve this rule against the running platform
    pub fn bind_to_current_platform(&self) -> Option<KeyChord> {
        self.bind_to(Platform::current())
    }

    /// Resolve this rule against an explicit platform
    ///
    /// The platform override wins over `primary`. Returns `None` when no
    /// source applies to the platform (legitimate outcome, not an error) or
    /// when the chosen source fails to parse (logged at warn level).
    pub fn bind_to(&self, platform: Platform) -> Option<KeyChord> {
        let source = self.source_for(platform)?;

        match parse_chord(source) {
            Ok(chord) => Some(chord),
            Err(e) => {
                tracing::warn!("Ignoring keybinding rule with bad chord {:?}: {}", source, e);
                None
            }
        }
    }

    /// The chord source that applies to the given platform, if any
    fn source_for(&self, platform: Platform) -> Option<&str> {
        let override_source = match platform {
            Platform::Windows => self.win.as_deref(),
            Platform::MacOs => self.mac.as_deref(),
            Platform::Linux => self.linux.as_deref(),
        };
        override_source.or(self.primary.as_deref())
    }
}
