use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Text pulled out of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Body text as it appears in the document, whitespace untouched.
    pub raw_text: String,
    /// `raw_text` with whitespace collapsed and trimmed.
    pub extracted_content: String,
}

impl ExtractedText {
    pub fn from_raw(raw_text: String) -> Self {
        let extracted_content = normalize_whitespace(&raw_text);
        Self {
            raw_text,
            extracted_content,
        }
    }
}

/// Collapses every whitespace run (including newlines and NBSP) to one space.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}
