//! Surface-independent keystrokes.
//!
//! Surfaces translate their native key events into [`KeyEvent`] before handing them to the
//! editor or the sidebar, so the keystroke policy is written (and tested) once.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Delete,
    Escape,
    Left,
    Right,
    Home,
    End,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }

    pub fn char(c: char) -> Self {
        Self::new(Key::Char(c))
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        KeyEvent::new(key)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shift {
            f.write_str("shift+")?;
        }
        match self.key {
            Key::Enter => f.write_str("enter"),
            Key::Backspace => f.write_str("backspace"),
            Key::Delete => f.write_str("delete"),
            Key::Escape => f.write_str("escape"),
            Key::Left => f.write_str("left"),
            Key::Right => f.write_str("right"),
            Key::Home => f.write_str("home"),
            Key::End => f.write_str("end"),
            Key::Char(c) => write!(f, "char:{c}"),
        }
    }
}

impl FromStr for KeyEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(c) = s.strip_prefix("char:") {
            let mut chars = c.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyEvent::char(c)),
                _ => Err(format!("`{s}` must name exactly one character")),
            };
        }

        let lower = s.trim().to_ascii_lowercase();
        let (shift, name) = match lower.strip_prefix("shift+") {
            Some(rest) => (true, rest),
            None => (false, lower.as_str()),
        };
        let key = match name {
            "enter" | "return" => Key::Enter,
            "backspace" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "escape" | "esc" => Key::Escape,
            "left" => Key::Left,
            "right" => Key::Right,
            "home" => Key::Home,
            "end" => Key::End,
            other => return Err(format!("unknown key `{other}`")),
        };
        Ok(KeyEvent { key, shift })
    }
}

/// What a key handler did with a keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The handler consumed the key; the surface must not apply its default editing.
    Suppressed,
    /// The handler ignored the key; default text editing applies.
    Default,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_keys() {
        assert_eq!("enter".parse::<KeyEvent>().unwrap(), KeyEvent::new(Key::Enter));
        assert_eq!(
            "Shift+Enter".parse::<KeyEvent>().unwrap(),
            KeyEvent::shifted(Key::Enter)
        );
        assert_eq!("char:x".parse::<KeyEvent>().unwrap(), KeyEvent::char('x'));
        assert_eq!("char:X".parse::<KeyEvent>().unwrap(), KeyEvent::char('X'));
        assert!("char:xy".parse::<KeyEvent>().is_err());
        assert!("f13".parse::<KeyEvent>().is_err());
    }

    #[test]
    fn display_parses_back() {
        for key in [
            KeyEvent::new(Key::Backspace),
            KeyEvent::shifted(Key::Enter),
            KeyEvent::char('é'),
        ] {
            assert_eq!(key.to_string().parse::<KeyEvent>().unwrap(), key);
        }
    }
}
