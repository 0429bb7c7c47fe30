//! Strips lightweight markdown from model output before it reaches the chat
//! surface, which renders plain text only.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static UNDERLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_(.*?)_").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").unwrap());
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[^\S\n]*(?:#+[^\S\n]*)+").unwrap());
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Removes emphasis, inline code and heading markers while keeping the wrapped
/// words, collapses runs of blank lines to a single blank line, and trims.
///
/// Bullet characters such as `•` are left untouched.
pub fn clean_response_text(text: &str) -> String {
    let cleaned = BOLD.replace_all(text, "${1}");
    let cleaned = ITALIC.replace_all(&cleaned, "${1}");
    let cleaned = UNDERLINE.replace_all(&cleaned, "${1}");
    let cleaned = INLINE_CODE.replace_all(&cleaned, "${1}");
    let cleaned = HEADING.replace_all(&cleaned, "");
    let cleaned = BLANK_RUN.replace_all(&cleaned, "\n\n");
    cleaned.trim().to_string()
}
