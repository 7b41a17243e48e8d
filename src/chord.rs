//! Key chord value and chord-string parsing
//!
//! A chord is the concrete, platform-resolved key sequence a binding is
//! stored under. Chord sources are written in the compact config spelling
//! (`"ctrl+shift+s"`, `"ctrl+k ctrl+c"`); parsing normalizes them into typed
//! keystrokes so equality and display are canonical.

use std::fmt;
use std::str::FromStr;

use crate::types::{KeyCode, Keystroke, Modifiers};

/// A concrete key chord: one or more keystrokes pressed in sequence
///
/// Usually a single keystroke; two for chorded bindings like `Ctrl+K Ctrl+C`.
/// Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyChord(Vec<Keystroke>);

impl KeyChord {
    /// Create a single-keystroke chord
    pub fn single(stroke: Keystroke) -> Self {
        Self(vec![stroke])
    }

    /// Create a chord from a keystroke sequence
    ///
    /// Returns `None` for an empty sequence.
    pub fn from_keystrokes(strokes: Vec<Keystroke>) -> Option<Self> {
        if strokes.is_empty() {
            None
        } else {
            Some(Self(strokes))
        }
    }

    /// The keystrokes in press order
    pub fn keystrokes(&self) -> &[Keystroke] {
        &self.0
    }

    /// Check if this is a multi-keystroke chord
    pub fn is_chorded(&self) -> bool {
        self.0.len() > 1
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|k| format!("{}", k)).collect();
        write!(f, "{}", parts.join(" "))
    }
}

impl FromStr for KeyChord {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_chord(s)
    }
}

/// Parse a chord source string like `"ctrl+shift+s"` or `"ctrl+k ctrl+c"`
///
/// Segments are separated by whitespace; each segment is modifiers plus one
/// key joined with `+`. The `cmd` modifier resolves to the platform command
/// key (Meta on macOS, Ctrl elsewhere).
pub fn parse_chord(source: &str) -> Result<KeyChord, ParseError> {
    let mut strokes = Vec::new();

    for segment in source.split_whitespace() {
        strokes.push(parse_segment(segment)?);
    }

    KeyChord::from_keystrokes(strokes).ok_or_else(|| ParseError::EmptyChord(source.to_string()))
}

/// Parse one chord segment like `"ctrl+shift+s"` into a Keystroke
fn parse_segment(segment: &str) -> Result<Keystroke, ParseError> {
    let mut mods = Modifiers::NONE;
    let mut key = None;

    for part in segment.split('+') {
        let part_lower = part.to_lowercase();
        match part_lower.as_str() {
            "cmd" => {
                // Platform command key
                mods = mods | Modifiers::cmd();
            }
            "ctrl" | "control" => {
                mods = mods | Modifiers::CTRL;
            }
            "shift" => {
                mods = mods | Modifiers::SHIFT;
            }
            "alt" | "option" | "opt" => {
                mods = mods | Modifiers::ALT;
            }
            "meta" | "super" | "win" => {
                mods = mods | Modifiers::META;
            }
            _ => {
                if key.is_some() {
                    return Err(ParseError::MultipleKeys(segment.to_string()));
                }
                key = Some(parse_key_code(&part_lower)?);
            }
        }
    }

    let key = key.ok_or_else(|| ParseError::MissingKey(segment.to_string()))?;

    Ok(Keystroke::new(key, mods))
}

/// Parse a key code from its config spelling
fn parse_key_code(key: &str) -> Result<KeyCode, ParseError> {
    // Single character
    if key.chars().count() == 1 {
        let c = key.chars().next().ok_or_else(|| ParseError::UnknownKey(key.to_string()))?;
        return Ok(KeyCode::Char(c.to_ascii_lowercase()));
    }

    // Named keys
    match key {
        "enter" | "return" => Ok(KeyCode::Enter),
        "escape" | "esc" => Ok(KeyCode::Escape),
        "tab" => Ok(KeyCode::Tab),
        "backspace" | "back" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "space" => Ok(KeyCode::Space),

        "up" | "arrowup" => Ok(KeyCode::Up),
        "down" | "arrowdown" => Ok(KeyCode::Down),
        "left" | "arrowleft" => Ok(KeyCode::Left),
        "right" | "arrowright" => Ok(KeyCode::Right),

        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdown" | "pgdn" => Ok(KeyCode::PageDown),
        "insert" | "ins" => Ok(KeyCode::Insert),

        "f1" => Ok(KeyCode::F(1)),
        "f2" => Ok(KeyCode::F(2)),
        "f3" => Ok(KeyCode::F(3)),
        "f4" => Ok(KeyCode::F(4)),
        "f5" => Ok(KeyCode::F(5)),
        "f6" => Ok(KeyCode::F(6)),
        "f7" => Ok(KeyCode::F(7)),
        "f8" => Ok(KeyCode::F(8)),
        "f9" => Ok(KeyCode::F(9)),
        "f10" => Ok(KeyCode::F(10)),
        "f11" => Ok(KeyCode::F(11)),
        "f12" => Ok(KeyCode::F(12)),

        _ => Err(ParseError::UnknownKey(key.to_string())),
    }
}

/// Errors that can occur when parsing a chord source string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    EmptyChord(String),
    UnknownKey(String),
    MultipleKeys(String),
    MissingKey(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyChord(s) => write!(f, "Empty chord: {:?}", s),
            ParseError::UnknownKey(k) => write!(f, "Unknown key: {}", k),
            ParseError::MultipleKeys(s) => write!(f, "Multiple keys in segment: {}", s),
            ParseError::MissingKey(s) => write!(f, "No key found in segment: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let chord = parse_chord("a").unwrap();
        assert_eq!(chord.keystrokes(), &[Keystroke::char('a')]);
        assert!(!chord.is_chorded());
    }

    #[test]
    fn test_parse_key_with_modifier() {
        let chord = parse_chord("ctrl+s").unwrap();
        let stroke = chord.keystrokes()[0];
        assert_eq!(stroke.key, KeyCode::Char('s'));
        assert!(stroke.mods.ctrl());
    }

    #[test]
    fn test_parse_key_with_multiple_modifiers() {
        let chord = parse_chord("ctrl+shift+s").unwrap();
        let stroke = chord.keystrokes()[0];
        assert!(stroke.mods.ctrl());
        assert!(stroke.mods.shift());
    }

    #[test]
    fn test_parse_cmd_modifier() {
        let chord = parse_chord("cmd+s").unwrap();
        let stroke = chord.keystrokes()[0];
        // cmd maps to META on macOS, CTRL elsewhere
        assert_eq!(stroke.mods, Modifiers::cmd());
    }

    #[test]
    fn test_parse_named_key() {
        assert_eq!(
            parse_chord("enter").unwrap().keystrokes()[0].key,
            KeyCode::Enter
        );
        assert_eq!(
            parse_chord("escape").unwrap().keystrokes()[0].key,
            KeyCode::Escape
        );
        assert_eq!(parse_chord("f5").unwrap().keystrokes()[0].key, KeyCode::F(5));
    }

    #[test]
    fn test_parse_two_stroke_chord() {
        let chord = parse_chord("ctrl+k ctrl+c").unwrap();
        assert!(chord.is_chorded());
        assert_eq!(chord.keystrokes().len(), 2);
        assert_eq!(chord.keystrokes()[0].key, KeyCode::Char('k'));
        assert_eq!(chord.keystrokes()[1].key, KeyCode::Char('c'));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_chord(""), Err(ParseError::EmptyChord(_))));
        assert!(matches!(parse_chord("   "), Err(ParseError::EmptyChord(_))));
        assert!(matches!(
            parse_chord("ctrl+bogus"),
            Err(ParseError::UnknownKey(_))
        ));
        assert!(matches!(
            parse_chord("ctrl+a+b"),
            Err(ParseError::MultipleKeys(_))
        ));
        assert!(matches!(
            parse_chord("ctrl+shift"),
            Err(ParseError::MissingKey(_))
        ));
    }

    #[test]
    fn test_chord_display_is_canonical() {
        let chord = parse_chord("ctrl+shift+s").unwrap();
        assert_eq!(format!("{}", chord), "Ctrl+Shift+S");

        let chord = parse_chord("ctrl+k ctrl+c").unwrap();
        assert_eq!(format!("{}", chord), "Ctrl+K Ctrl+C");
    }

    #[test]
    fn test_chord_equality_ignores_source_spelling() {
        assert_eq!(
            parse_chord("control+s").unwrap(),
            parse_chord("CTRL+S").unwrap()
        );
    }

    #[test]
    fn test_from_str() {
        let chord: KeyChord = "ctrl+s".parse().unwrap();
        assert_eq!(chord, parse_chord("ctrl+s").unwrap());
    }
}
