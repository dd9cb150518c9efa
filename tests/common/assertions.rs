//! Custom assertions for redaction tests.

use typed_model::RuleSet;

/// Asserts that sanitizing an already sanitized line changes nothing.
pub fn assert_idempotent(rules: &RuleSet, raw: &str) {
    let once = rules.sanitize_line(raw);
    let twice = rules.sanitize_line(&once);
    assert_eq!(
        once, twice,
        "sanitize_line is not idempotent for input {:?}",
        raw
    );
}

/// Asserts that none of `tokens` survives in `text`, ignoring case.
pub fn assert_no_leak(text: &str, tokens: &[&str]) {
    let lower = text.to_lowercase();
    for token in tokens {
        assert!(
            !lower.contains(&token.to_lowercase()),
            "sensitive token {:?} leaked into {:?}",
            token,
            text
        );
    }
}

/// Asserts that `text` contains no digit other than `0`.
pub fn assert_zero_digits_only(text: &str) {
    assert!(
        text.chars().all(|c| !c.is_ascii_digit() || c == '0'),
        "non-zero digit left in {:?}",
        text
    );
}
