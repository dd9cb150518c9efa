//! Redaction rules: the matchers and replacement policies of each stage.
//!
//! Every rule implements [`RedactionRule`] and declares the [`Stage`] it
//! belongs to. A [`RuleSet`](crate::redaction::RuleSet) evaluates rules in
//! stage order; the ordering is what keeps placeholders written by earlier
//! stages from being corrupted by later ones.

pub mod cleanup;
pub mod denylist;
pub mod entity;
pub mod label;
pub mod token;

pub use cleanup::{DigitSweep, WhitespaceNormalizer};
pub use denylist::{builtin_denylist, FallbackTokenRule};
pub use entity::{builtin_entities, EntityEntry, EntityRule};
pub use label::{builtin_labels, LabelEntry, LabelRule, LabelScope};
pub use token::{StructuredTokenRule, TokenKind};

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;

/// Pipeline stage a rule belongs to, in evaluation order.
///
/// The blank-line short-circuit runs before every stage and is not a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Curated table of known names and entities
    Entity,
    /// Legal labels rewritten to canonical sentences
    Label,
    /// Emails, CPF/CNPJ, process numbers, dates, digit runs
    StructuredToken,
    /// Denylisted bare name tokens
    Fallback,
    /// Every remaining digit becomes `0`
    DigitSweep,
    /// Collapse whitespace and trim
    Whitespace,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Label => "label",
            Self::StructuredToken => "structured-token",
            Self::Fallback => "fallback",
            Self::DigitSweep => "digit-sweep",
            Self::Whitespace => "whitespace",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single match-and-replace step of the redaction chain.
pub trait RedactionRule: Send + Sync {
    /// Short identifier used in logs and ordering diagnostics.
    fn name(&self) -> &str;

    /// Stage this rule runs in.
    fn stage(&self) -> Stage;

    /// Applies the rule to one line.
    ///
    /// Returns `Cow::Borrowed` when nothing matched.
    fn apply<'a>(&self, line: &'a str) -> Cow<'a, str>;
}

/// How matched text is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Fixed placeholder text
    Literal(String),
    /// Keep length and separators, every digit becomes `0`
    MaskDigits,
}

impl Replacement {
    /// Replaces every match of `regex` in `line` according to this policy.
    pub fn replace_all<'a>(&self, regex: &Regex, line: &'a str) -> Cow<'a, str> {
        match self {
            // NoExpand: placeholders are plain text, never `$group` references
            Self::Literal(text) => regex.replace_all(line, regex::NoExpand(text)),
            Self::MaskDigits => {
                regex.replace_all(line, |caps: &regex::Captures| mask_digits(&caps[0]).into_owned())
            }
        }
    }
}

fn digit_pattern() -> &'static Regex {
    static PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("Valid digit regex"));
    &PATTERN
}

/// Shape-preserving zero fill: every digit becomes `0`.
pub fn mask_digits(text: &str) -> Cow<'_, str> {
    digit_pattern().replace_all(text, "0")
}

/// Compiles a near-literal phrase into a case-insensitive regex.
///
/// Each space in `phrase` matches any run of whitespace, so spacing
/// introduced by layout-preserving extraction does not defeat the match.
/// Everything else is kept as regex syntax, which lets tables express
/// accent variants such as `Canan[eé]a`.
pub fn near_literal(phrase: &str) -> Result<Regex, regex::Error> {
    let body = phrase
        .split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(r"\s+");
    Regex::new(&format!("(?i){}", body))
}
