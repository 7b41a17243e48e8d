//! The keybinding registry: ordered store, registration protocol, and the
//! process-wide instance
//!
//! The registry stores the bindings that resolved successfully for the
//! running platform, in registration order. It deliberately does not pick a
//! winner among overlapping bindings; entries carry weight, condition, and
//! order so a downstream resolver can.
//!
//! # Architecture
//!
//! ```text
//! KeybindingRule → bind_to_current_platform() → KeyChord
//!                                                  │
//!                     KeybindingsRegistry ← append + notify
//!                                                  │
//!                              downstream resolver / dispatcher
//! ```

use std::fmt;
use std::sync::OnceLock;

use parking_lot::Mutex;

use crate::entry::KeybindingEntry;
use crate::rule::{KeybindingRule, Platform};
use crate::signal::{ChangeSignal, SubscriptionId};
use crate::types::CommandId;

/// Identity of one registration, issued by [`KeybindingsRegistry`]
///
/// Carries a sequence number unique within its registry for the life of the
/// process, so removal targets exactly one registration even when several
/// entries are value-identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegistrationToken(u64);

/// Errors from [`KeybindingsRegistry::unregister`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnregisterError {
    /// The token's registration is no longer present (double removal, or a
    /// token from a registry that was since reset)
    StaleToken(RegistrationToken),
}

impl fmt::Display for UnregisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnregisterError::StaleToken(token) => {
                write!(f, "No registration #{} (already removed?)", token.0)
            }
        }
    }
}

impl std::error::Error for UnregisterError {}

/// One stored registration: the entry plus the token that removes it
struct Registration {
    token: RegistrationToken,
    entry: KeybindingEntry,
}

/// Ordered store of registered keybindings with change notification
///
/// Standalone registries can be created with [`KeybindingsRegistry::new`];
/// the shared process-wide registry lives behind
/// [`KeybindingsRegistry::instance`].
pub struct KeybindingsRegistry {
    bindings: Vec<Registration>,
    changed: ChangeSignal,
    next_token: u64,
}

impl KeybindingsRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            changed: ChangeSignal::new(),
            next_token: 0,
        }
    }

    /// The process-wide registry, created on first access
    ///
    /// Lives until process exit. The mutex guards lazy construction,
    /// append/remove, and notification delivery; callbacks registered via
    /// [`subscribe`](Self::subscribe) run while the lock is held, so they
    /// must not call back into the instance.
    pub fn instance() -> &'static Mutex<KeybindingsRegistry> {
        static INSTANCE: OnceLock<Mutex<KeybindingsRegistry>> = OnceLock::new();
        INSTANCE.get_or_init(|| Mutex::new(KeybindingsRegistry::new()))
    }

    /// Replace the process-wide registry with a fresh one
    ///
    /// Testing-only hook: lets test runs isolate global state. Tokens and
    /// subscriptions issued before the reset become stale.
    pub fn reset_instance() {
        *Self::instance().lock() = KeybindingsRegistry::new();
    }

    /// Register a rule, resolved against the running platform
    ///
    /// If the rule does not resolve (no chord source for this platform), the
    /// call is a pure no-op and returns `None`: nothing is stored and no
    /// notification fires. On success the entry is appended at the end —
    /// registration order is preserved, weight does not reorder — the change
    /// signal fires exactly once, and the returned token removes exactly
    /// this registration via [`unregister`](Self::unregister).
    pub fn register_keybinding_rule(
        &mut self,
        command: CommandId,
        rule: &KeybindingRule,
    ) -> Option<RegistrationToken> {
        self.register_keybinding_rule_for(command, rule, Platform::current())
    }

    /// Register a rule, resolved against an explicit platform
    pub fn register_keybinding_rule_for(
        &mut self,
        command: CommandId,
        rule: &KeybindingRule,
        platform: Platform,
    ) -> Option<RegistrationToken> {
        let chord = rule.bind_to(platform)?;

        let token = RegistrationToken(self.next_token);
        self.next_token += 1;

        let entry = KeybindingEntry {
            chord,
            command,
            weight: rule.weight,
            when: rule.when.clone(),
        };

        tracing::debug!(
            "Registered keybinding {} → {} (weight {})",
            entry.chord,
            entry.command,
            entry.weight
        );

        self.bindings.push(Registration { token, entry });
        self.changed.emit();

        Some(token)
    }

    /// Remove the registration the token was issued for
    ///
    /// Fires the change signal exactly once on success. Removing an absent
    /// registration (double removal, stale token) is a programmer error and
    /// fails with [`UnregisterError::StaleToken`]; nothing fires.
    pub fn unregister(&mut self, token: RegistrationToken) -> Result<(), UnregisterError> {
        let index = self
            .bindings
            .iter()
            .position(|r| r.token == token)
            .ok_or(UnregisterError::StaleToken(token))?;

        let removed = self.bindings.remove(index);
        tracing::debug!(
            "Unregistered keybinding {} → {}",
            removed.entry.chord,
            removed.entry.command
        );

        self.changed.emit();
        Ok(())
    }

    /// Iterate entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &KeybindingEntry> {
        self.bindings.iter().map(|r| &r.entry)
    }

    /// Number of registered bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if no bindings are registered
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Subscribe to change notifications
    ///
    /// The callback fires synchronously, inside the registering or removing
    /// call, with no payload; re-read the registry to observe the change.
    pub fn subscribe(&mut self, callback: impl FnMut() + Send + 'static) -> SubscriptionId {
        self.changed.subscribe(callback)
    }

    /// Remove a change subscription; false if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.changed.unsubscribe(id)
    }
}

impl Default for KeybindingsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KeybindingsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeybindingsRegistry({} bindings)", self.bindings.len())
    }
}
