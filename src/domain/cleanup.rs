//! Last two stages: the unconditional digit sweep and whitespace cleanup.

use super::{mask_digits, RedactionRule, Stage};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Replaces every remaining digit with `0`, keeping line length.
///
/// Runs after every pattern stage. Placeholders written earlier contain only
/// letters and zeros, so the sweep leaves them untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigitSweep;

impl RedactionRule for DigitSweep {
    fn name(&self) -> &str {
        "digit-sweep"
    }

    fn stage(&self) -> Stage {
        Stage::DigitSweep
    }

    fn apply<'a>(&self, line: &'a str) -> Cow<'a, str> {
        mask_digits(line)
    }
}

/// Collapses runs of two or more whitespace characters and trims the ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceNormalizer;

impl WhitespaceNormalizer {
    fn runs() -> &'static Regex {
        static PATTERN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\s{2,}").expect("Valid whitespace regex"));
        &PATTERN
    }
}

impl RedactionRule for WhitespaceNormalizer {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn stage(&self) -> Stage {
        Stage::Whitespace
    }

    fn apply<'a>(&self, line: &'a str) -> Cow<'a, str> {
        match Self::runs().replace_all(line, " ") {
            Cow::Borrowed(s) if s.len() == s.trim().len() => Cow::Borrowed(s),
            Cow::Borrowed(s) => Cow::Owned(s.trim().to_string()),
            Cow::Owned(s) => Cow::Owned(s.trim().to_string()),
        }
    }
}
