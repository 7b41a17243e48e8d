//! Process-wide keybinding registry
//!
//! This crate stores key-chord-to-command bindings for an application:
//! rules resolve against the running platform, successful registrations are
//! kept in registration order with their weight and activation condition,
//! and every change fires a synchronous notification. Picking a winner among
//! overlapping bindings is deliberately left to a downstream resolver —
//! the registry only stores enough for it to decide (weight, condition,
//! registration order).
//!
//! # Architecture
//!
//! ```text
//! "ctrl+s" / mac: "cmd+s" → KeybindingRule → bind_to_current_platform()
//!                                                   │
//!                     KeybindingsRegistry ← KeybindingEntry (append + notify)
//!                                                   │
//!                               downstream resolver / dispatcher
//! ```
//!
//! # Registering bindings
//!
//! ```ignore
//! let mut registry = KeybindingsRegistry::instance().lock();
//!
//! let token = registry.register_keybinding_rule(
//!     CommandId::new("file.save"),
//!     &KeybindingRule::new("ctrl+s").mac("cmd+s"),
//! );
//!
//! // Later: remove exactly this registration
//! if let Some(token) = token {
//!     registry.unregister(token)?;
//! }
//! ```

pub mod chord;
pub mod config;
pub mod entry;
pub mod registry;
pub mod rule;
pub mod signal;
pub mod types;

// Re-export commonly used types
pub use chord::{parse_chord, KeyChord, ParseError};
pub use config::{load_rules_file, parse_rules_yaml, register_rules, ConfigError};
pub use entry::KeybindingEntry;
pub use registry::{KeybindingsRegistry, RegistrationToken, UnregisterError};
pub use rule::{KeybindingRule, Platform};
pub use signal::{ChangeSignal, SubscriptionId};
pub use types::{CommandId, KeyCode, Keystroke, Modifiers, WhenExpr};
