//! Fallback sensitive-token substitution.
//!
//! A coarse safety net: bare first names, surnames and place names that
//! slipped past the entity table are replaced by a single placeholder token.
//! False positives are accepted; a leaked identity is not.

use super::{RedactionRule, Replacement, Stage};
use crate::error::{ModelError, ModelResult};
use regex::Regex;
use std::borrow::Cow;

/// Placeholder written for every denylisted token.
pub const TOKEN_PLACEHOLDER: &str = "PPPPP";

/// Built-in denylist. Entries are regex fragments matched as whole words.
pub fn builtin_denylist() -> Vec<String> {
    [
        "christine",
        "claudia",
        "mara",
        "francisca",
        "robson",
        "canan[eé]a",
        "mamanguape",
        "pianc[oó]",
        "studart",
        "socorro",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect()
}

/// Word-bounded, case-insensitive denylist matcher.
#[derive(Debug, Clone)]
pub struct FallbackTokenRule {
    regex: Option<Regex>,
    replacement: Replacement,
}

impl FallbackTokenRule {
    /// Compiles the denylist into a single alternation.
    ///
    /// An empty denylist yields a rule that never matches.
    pub fn compile(tokens: &[String]) -> ModelResult<Self> {
        let tokens: Vec<&str> = tokens
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();

        let regex = if tokens.is_empty() {
            None
        } else {
            let pattern = format!(r"(?i)\b(?:{})\b", tokens.join("|"));
            Some(Regex::new(&pattern).map_err(|e| ModelError::pattern(&pattern, e))?)
        };

        Ok(Self {
            regex,
            replacement: Replacement::Literal(TOKEN_PLACEHOLDER.to_string()),
        })
    }
}

impl RedactionRule for FallbackTokenRule {
    fn name(&self) -> &str {
        "fallback:denylist"
    }

    fn stage(&self) -> Stage {
        Stage::Fallback
    }

    fn apply<'a>(&self, line: &'a str) -> Cow<'a, str> {
        match &self.regex {
            Some(regex) => self.replacement.replace_all(regex, line),
            None => Cow::Borrowed(line),
        }
    }
}
