// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Syntactic email validation for the registration and ticket flows.

use std::sync::OnceLock;

use regex::Regex;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Deliberately permissive: one @, no whitespace, a dot in the domain.
    // Deliverability is not checked here.
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex"))
}

/// True when `input` looks like an email address.
pub fn is_valid_email(input: &str) -> bool {
    email_regex().is_match(input.trim())
}

/// Normalizes an email for storage and comparison (trim + lowercase).
pub fn normalize_email(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(is_valid_email("  padded@example.com  "));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("bad-email"));
        assert!(!is_valid_email("no at.com"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("nodot@domain"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_email(" Ada@Example.COM "), "ada@example.com");
    }
}
