use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardLayout {
    pub name: String,
    pub rows: Vec<Vec<char>>,
}

impl KeyboardLayout {
    pub fn qwerty() -> Self {
        Self {
            name: "qwerty".to_string(),
            rows: vec![
                vec!['q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p'],
                vec!['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l', ';'],
                vec!['z', 'x', 'c', 'v', 'b', 'n', 'm', ',', '.', '/'],
            ],
        }
    }

    pub fn dvorak() -> Self {
        Self {
            name: "dvorak".to_string(),
            rows: vec![
                vec!['\'', ',', '.', 'p', 'y', 'f', 'g', 'c', 'r', 'l'],
                vec!['a', 'o', 'e', 'u', 'i', 'd', 'h', 't', 'n', 's'],
                vec![';', 'q', 'j', 'k', 'x', 'b', 'm', 'w', 'v', 'z'],
            ],
        }
    }

    pub fn colemak() -> Self {
        Self {
            name: "colemak".to_string(),
            rows: vec![
                vec!['q', 'w', 'f', 'p', 'g', 'j', 'l', 'u', 'y', ';'],
                vec!['a', 'r', 's', 't', 'd', 'h', 'n', 'e', 'i', 'o'],
                vec!['z', 'x', 'c', 'v', 'b', 'k', 'm', ',', '.', '/'],
            ],
        }
    }

    /// Layout by config name, case-insensitive. Unknown names get qwerty.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "dvorak" => Self::dvorak(),
            "colemak" => Self::colemak(),
            _ => Self::qwerty(),
        }
    }

    pub fn contains(&self, ch: char) -> bool {
        let ch = ch.to_ascii_lowercase();
        self.rows.iter().any(|row| row.contains(&ch))
    }
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::qwerty()
    }
}
