//! Content classification for captured text
//!
//! Total and deterministic: every string maps to exactly one kind. Images never
//! reach this module, the capture loop tags them directly.

use std::sync::OnceLock;
use regex::Regex;

use crate::shared::types::EntryKind;

static LINK_PATTERN: OnceLock<Regex> = OnceLock::new();
static CODE_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn link_pattern() -> &'static Regex {
    LINK_PATTERN.get_or_init(|| {
        // Whole string: scheme, then host/path without any whitespace
        Regex::new(r"(?i)^(?:https?|ftp)://[^\s/$.?#][^\s]*$").expect("Invalid link regex")
    })
}

fn code_patterns() -> &'static Vec<Regex> {
    CODE_PATTERNS.get_or_init(|| {
        vec![
            // Statement keyword opening a line
            Regex::new(r"(?m)^[ \t]*(?:const|let|var|function|import|class)\s").expect("Invalid statement regex"),
            // HTML document root
            Regex::new(r"(?i)<!doctype\b|<html\b").expect("Invalid html regex"),
            // Block opened by a brace at the start of a line
            Regex::new(r"(?m)^[ \t]*\{").expect("Invalid brace regex"),
        ]
    })
}

/// Classify raw clipboard text. Links win over code.
pub fn classify(text: &str) -> EntryKind {
    if link_pattern().is_match(text.trim()) {
        return EntryKind::Link;
    }

    if code_patterns().iter().any(|pattern| pattern.is_match(text)) {
        return EntryKind::Code;
    }

    EntryKind::Text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links() {
        assert_eq!(classify("https://example.com/path"), EntryKind::Link);
        assert_eq!(classify("http://localhost:8080"), EntryKind::Link);
        assert_eq!(classify("ftp://files.example.org/pub/readme.txt"), EntryKind::Link);
        assert_eq!(classify("HTTPS://EXAMPLE.COM"), EntryKind::Link);
        assert_eq!(classify("  https://example.com/trailing\n"), EntryKind::Link);
    }

    #[test]
    fn test_not_links() {
        assert_eq!(classify("https://example.com/a b"), EntryKind::Text);
        assert_eq!(classify("see https://example.com"), EntryKind::Text);
        assert_eq!(classify("mailto:user@example.com"), EntryKind::Text);
        assert_eq!(classify("https://"), EntryKind::Text);
    }

    #[test]
    fn test_code() {
        assert_eq!(classify("const x = 1;"), EntryKind::Code);
        assert_eq!(classify("import React from 'react';"), EntryKind::Code);
        assert_eq!(classify("// helper\nfunction add(a, b) {\n  return a + b;\n}"), EntryKind::Code);
        assert_eq!(classify("    let y = 2;"), EntryKind::Code);
        assert_eq!(classify("<!DOCTYPE html>\n<html></html>"), EntryKind::Code);
        assert_eq!(classify("<html lang=\"en\">"), EntryKind::Code);
        assert_eq!(classify("{\n  \"key\": \"value\"\n}"), EntryKind::Code);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(classify("hello world"), EntryKind::Text);
        assert_eq!(classify("constant reminder"), EntryKind::Text);
        assert_eq!(classify("The class was great"), EntryKind::Text);
        assert_eq!(classify(""), EntryKind::Text);
        assert_eq!(classify("   \n\t"), EntryKind::Text);
    }

    #[test]
    fn test_keyword_led_prose_counts_as_code() {
        // The statement rule is keyword-at-line-start only; no syntax check follows
        assert_eq!(classify("let me know when you're free"), EntryKind::Code);
        assert_eq!(classify("Notes:\nimport duties rose"), EntryKind::Code);
        assert_eq!(classify("import os"), EntryKind::Code);
    }

    #[test]
    fn test_link_beats_code() {
        // Brace-free URL that also contains a code keyword in its path
        assert_eq!(classify("https://example.com/const/let"), EntryKind::Link);
    }

    #[test]
    fn test_deterministic() {
        let input = "https://example.com/path";
        assert_eq!(classify(input), classify(input));
    }
}
