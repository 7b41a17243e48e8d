//! YAML configuration parsing for keybinding rules
//!
//! Parses rule files into `(CommandId, KeybindingRule)` pairs ready for
//! registration. Chord sources are validated eagerly so a malformed file is
//! a load error, not a set of bindings that silently never resolve.
//!
//! ```yaml
//! bindings:
//!   - key: "ctrl+shift+p"
//!     command: "palette.toggle"
//!     mac: "cmd+shift+p"
//!     weight: 100
//!     when: "editorFocused"
//! ```

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::chord::parse_chord;
use crate::registry::{KeybindingsRegistry, RegistrationToken};
use crate::rule::KeybindingRule;
use crate::types::{CommandId, WhenExpr};

/// Root structure of a rules YAML file
#[derive(Debug, Deserialize)]
pub struct RulesConfig {
    pub bindings: Vec<RuleConfig>,
}

/// A single rule entry from YAML
#[derive(Debug, Deserialize)]
pub struct RuleConfig {
    /// Primary chord source, used when no platform override applies
    #[serde(default)]
    pub key: Option<String>,
    /// Windows override
    #[serde(default)]
    pub win: Option<String>,
    /// macOS override
    #[serde(default)]
    pub mac: Option<String>,
    /// Linux override
    #[serde(default)]
    pub linux: Option<String>,
    pub command: String,
    #[serde(default)]
    pub weight: i32,
    /// Condition expression source, stored opaquely
    #[serde(default)]
    pub when: Option<String>,
}

/// Load keybinding rules from a YAML file
pub fn load_rules_file(path: &Path) -> Result<Vec<(CommandId, KeybindingRule)>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

    parse_rules_yaml(&content)
}

/// Parse keybinding rules from a YAML string
pub fn parse_rules_yaml(yaml: &str) -> Result<Vec<(CommandId, KeybindingRule)>, ConfigError> {
    let config: RulesConfig =
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;

    let mut rules = Vec::with_capacity(config.bindings.len());
    for entry in config.bindings {
        rules.push(rule_from_config(entry)?);
    }

    Ok(rules)
}

/// Validate one config entry and convert it into a rule
fn rule_from_config(entry: RuleConfig) -> Result<(CommandId, KeybindingRule), ConfigError> {
    if entry.command.is_empty() {
        return Err(ConfigError::EmptyCommand);
    }

    // Validate every chord source eagerly
    for source in [&entry.key, &entry.win, &entry.mac, &entry.linux]
        .into_iter()
        .flatten()
    {
        parse_chord(source).map_err(|e| ConfigError::InvalidChord {
            command: entry.command.clone(),
            error: e.to_string(),
        })?;
    }

    let rule = KeybindingRule {
        primary: entry.key,
        win: entry.win,
        mac: entry.mac,
        linux: entry.linux,
        weight: entry.weight,
        when: entry.when.map(WhenExpr::new),
    };

    Ok((CommandId::new(entry.command), rule))
}

/// Register a batch of rules, preserving per-rule outcomes positionally
///
/// A `None` outcome means the rule did not resolve for the running platform.
pub fn register_rules(
    registry: &mut KeybindingsRegistry,
    rules: Vec<(CommandId, KeybindingRule)>,
) -> Vec<Option<RegistrationToken>> {
    let total = rules.len();
    let tokens: Vec<Option<RegistrationToken>> = rules
        .into_iter()
        .map(|(command, rule)| registry.register_keybinding_rule(command, &rule))
        .collect();

    let registered = tokens.iter().filter(|t| t.is_some()).count();
    tracing::info!("Registered {} of {} keybinding rules", registered, total);

    tokens
}

/// Errors that can occur when loading a rules file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    EmptyCommand,
    InvalidChord { command: String, error: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::EmptyCommand => write!(f, "Binding with empty command id"),
            ConfigError::InvalidChord { command, error } => {
                write!(f, "Invalid chord for {}: {}", command, error)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Platform;

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
bindings:
  - key: "ctrl+s"
    command: "file.save"
  - key: "ctrl+z"
    command: "edit.undo"
"#;

        let rules = parse_rules_yaml(yaml).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].0, CommandId::new("file.save"));
        assert_eq!(rules[1].0, CommandId::new("edit.undo"));
    }

    #[test]
    fn test_parse_yaml_with_overrides_weight_and_when() {
        let yaml = r#"
bindings:
  - key: "ctrl+shift+p"
    mac: "meta+shift+p"
    command: "palette.toggle"
    weight: 100
    when: "editorFocused"
"#;

        let rules = parse_rules_yaml(yaml).unwrap();
        let (command, rule) = &rules[0];

        assert_eq!(command.as_str(), "palette.toggle");
        assert_eq!(rule.weight, 100);
        assert_eq!(rule.when.as_ref().map(|w| w.as_str()), Some("editorFocused"));
        assert!(rule.bind_to(Platform::MacOs).unwrap().keystrokes()[0]
            .mods
            .meta());
        assert!(rule.bind_to(Platform::Linux).unwrap().keystrokes()[0]
            .mods
            .ctrl());
    }

    #[test]
    fn test_platform_only_rule_parses() {
        let yaml = r#"
bindings:
  - mac: "meta+q"
    command: "app.quit"
"#;

        let rules = parse_rules_yaml(yaml).unwrap();
        let (_, rule) = &rules[0];
        assert!(rule.bind_to(Platform::MacOs).is_some());
        assert!(rule.bind_to(Platform::Linux).is_none());
    }

    #[test]
    fn test_malformed_chord_is_config_error() {
        let yaml = r#"
bindings:
  - key: "ctrl+bogus"
    command: "file.save"
"#;

        let err = parse_rules_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidChord { .. }));
    }

    #[test]
    fn test_empty_command_rejected() {
        let yaml = r#"
bindings:
  - key: "ctrl+s"
    command: ""
"#;

        assert_eq!(parse_rules_yaml(yaml).unwrap_err(), ConfigError::EmptyCommand);
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = parse_rules_yaml("bindings: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_register_rules_preserves_outcomes() {
        let yaml = r#"
bindings:
  - key: "ctrl+s"
    command: "file.save"
  - mac: "meta+o"
    command: "mac.only"
"#;

        let rules = parse_rules_yaml(yaml).unwrap();
        let mut registry = KeybindingsRegistry::new();
        let tokens = register_rules(&mut registry, rules);

        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].is_some());

        // The mac-only rule registers only on macOS
        #[cfg(target_os = "macos")]
        assert!(tokens[1].is_some());

        #[cfg(not(target_os = "macos"))]
        assert!(tokens[1].is_none());
    }

    #[test]
    fn test_load_rules_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "bindings:\n  - key: \"ctrl+s\"\n    command: \"file.save\"\n"
        )
        .unwrap();

        let rules = load_rules_file(file.path()).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].0, CommandId::new("file.save"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_rules_file(Path::new("/nonexistent/rules.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
