//! Wake-word gate

use newtonian_core::WakeWordConfig;

const HEY: &str = "hey";

/// Outcome of checking a transcript for the wake word
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakeWordMatch {
    Absent,
    /// Wake word found; `rest` is the lower-cased text after it (may be empty)
    Present { rest: String },
}

#[derive(Debug, Clone)]
pub struct WakeWordGate {
    word: String,
    required: bool,
    allow_hey_prefix: bool,
}

impl WakeWordGate {
    pub fn new(config: &WakeWordConfig) -> Self {
        Self {
            word: config.word.trim().to_lowercase(),
            required: config.required,
            allow_hey_prefix: config.allow_hey_prefix,
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Check whether `text` opens with the wake word, tolerating an optional
    /// "hey" and punctuation around it.
    pub fn check(&self, text: &str) -> WakeWordMatch {
        let lowered = text.trim().to_lowercase();
        let mut rest = skip_separators(&lowered);

        if self.allow_hey_prefix && self.word != HEY {
            if let Some(after) = strip_word(rest, HEY) {
                rest = skip_separators(after);
            }
        }

        match strip_word(rest, &self.word) {
            Some(after) if !self.word.is_empty() => WakeWordMatch::Present {
                rest: skip_separators(after).trim_end().to_string(),
            },
            _ => WakeWordMatch::Absent,
        }
    }
}

/// Strip `word` from the front of `text` when it is a whole word
fn strip_word<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    let after = text.strip_prefix(word)?;
    match after.chars().next() {
        Some(c) if c.is_alphanumeric() => None,
        _ => Some(after),
    }
}

fn skip_separators(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
}
