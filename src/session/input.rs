use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a raw key press means to a typing session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Char(char),
    Delete,
    Ignored,
}

impl KeyAction {
    /// Classify a DOM-style key name: a single printable character types,
    /// `Backspace` deletes, and every other named key (`ArrowLeft`, `F5`,
    /// `Enter`, ...) is ignored.
    pub fn from_key_name(name: &str) -> Self {
        if name == "Backspace" {
            return KeyAction::Delete;
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if !ch.is_control() => KeyAction::Char(ch),
            _ => KeyAction::Ignored,
        }
    }
}

impl From<&KeyEvent> for KeyAction {
    fn from(key: &KeyEvent) -> Self {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return KeyAction::Ignored;
        }
        match key.code {
            KeyCode::Char(ch) if !ch.is_control() => KeyAction::Char(ch),
            KeyCode::Backspace => KeyAction::Delete,
            _ => KeyAction::Ignored,
        }
    }
}
