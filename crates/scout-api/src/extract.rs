//! Heuristic subject extraction for the non-model endpoint variant.

use std::sync::OnceLock;

use regex::Regex;

/// Phrase patterns tried in order; the first capture wins. Kept permissive
/// on purpose: a wrong guess still produces a searchable string.
const PATTERNS: &[&str] = &[
    r"(?i)about\s+([a-z\s]+?)(\?|$|stats|info)",
    r"(?i)who\s+is\s+([a-z\s]+?)(\?|$)",
    r"(?i)tell\s+me\s+about\s+([a-z\s]+?)(\?|$)",
    r"(?i)info\s+about\s+([a-z\s]+?)(\?|$)",
    r"(?i)([a-z\s]+?)\s+stats",
    r"(?i)([a-z\s]+?)\s+info",
];

fn patterns() -> &'static [Regex] {
    static COMPILED: OnceLock<Vec<Regex>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("invalid subject pattern"))
            .collect()
    })
}

/// Guess which player a free-text message is asking about.
///
/// Falls back to the first three words longer than two characters, then to
/// the trimmed message itself, so the result is never empty for non-empty
/// input.
pub fn extract_subject(message: &str) -> String {
    for pattern in patterns() {
        if let Some(captures) = pattern.captures(message) {
            if let Some(name) = captures.get(1) {
                let name = name.as_str().trim();
                if !name.is_empty() {
                    return name.to_string();
                }
            }
        }
    }

    let words: Vec<&str> = message
        .split_whitespace()
        .filter(|word| word.len() > 2)
        .take(3)
        .collect();
    if !words.is_empty() {
        return words.join(" ");
    }

    message.trim().to_string()
}
