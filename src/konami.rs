use std::collections::VecDeque;

pub const KONAMI_SEQUENCE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

pub const RAINBOW_STYLE_ID: &str = "rainbow-style";
pub const RAINBOW_ANIMATION: &str = "rainbow 2s linear infinite";
pub const RAINBOW_KEYFRAMES: &str = "@keyframes rainbow {\n    0% { filter: hue-rotate(0deg); }\n    100% { filter: hue-rotate(360deg); }\n}";

/// Rolling buffer of the most recent key presses.
#[derive(Debug, Default)]
pub struct KonamiDetector {
    recent: VecDeque<String>,
}

impl KonamiDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key and reports whether the buffer now spells the sequence.
    pub fn push(&mut self, key: &str) -> bool {
        self.recent.push_back(key.to_string());
        while self.recent.len() > KONAMI_SEQUENCE.len() {
            self.recent.pop_front();
        }

        self.recent.len() == KONAMI_SEQUENCE.len()
            && self
                .recent
                .iter()
                .zip(KONAMI_SEQUENCE)
                .all(|(pressed, expected)| pressed == expected)
    }

    pub fn buffered(&self) -> usize {
        self.recent.len()
    }
}
