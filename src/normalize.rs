//! Text normalization applied to each paragraph before classification.
//!
//! Text is lowercased and a short list of stop words is removed to trim the
//! payload sent to the classifier. Removal is a plain substring replacement
//! of `" word "` by `" "`, one stop word after another, each pass running on
//! the output of the previous one.
//!
//! Because a match consumes the spaces on both of its sides, back-to-back
//! repeats of the same stop word share a space and only every other one is
//! removed: `"up to to gain"` becomes `"up to gain"`. Running [`normalize`]
//! again removes the survivor, so the function is not idempotent. Adjacent
//! *different* stop words (`"up is a gain"`) are both removed, since each
//! word gets its own pass.

/// Words removed by [`normalize`], in the order they are applied.
pub const STOP_WORDS: [&str; 14] = [
    "i", "the", "an", "and", "be", "so", "or", "at", "to", "a", "in", "its", "for", "is",
];

/// Lowercase `text` and strip space-delimited stop words.
pub fn normalize(text: &str) -> String {
    STOP_WORDS
        .iter()
        .fold(text.to_lowercase(), |acc, word| {
            acc.replace(&format!(" {word} "), " ")
        })
}
