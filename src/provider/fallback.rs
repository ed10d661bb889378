pub const PRACTICE_TEXT: &str = "The quick brown fox jumps over the lazy dog.";

pub const COACHING_TIP: &str =
    "Great effort! Keep your eyes on the text, relax your hands, and let accuracy lead your speed.";

pub const PRACTICE_WORDS: [&str; 10] = [
    "neon", "cyber", "pixel", "rocket", "galaxy", "matrix", "vector", "signal", "future", "laser",
];

pub fn practice_text() -> String {
    PRACTICE_TEXT.to_string()
}

pub fn coaching_tip() -> String {
    COACHING_TIP.to_string()
}

pub fn practice_words() -> Vec<String> {
    PRACTICE_WORDS.iter().map(|w| w.to_string()).collect()
}
