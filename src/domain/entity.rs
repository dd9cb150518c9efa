//! Explicit entity replacement.
//!
//! A curated table mapping known real names, institutions and places to
//! fixed placeholders. Generic token rules are too coarse for multi-word
//! proper names, so this table runs first and its placeholders contain only
//! letters that no later stage touches.

use super::{near_literal, RedactionRule, Replacement, Stage};
use crate::error::{ModelError, ModelResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Placeholder for experts and parties of type P.
pub const EXPERT_PLACEHOLDER: &str = "PPPPP PPPPP PPPPP PPPPP";
/// Placeholder for plaintiffs.
pub const PLAINTIFF_PLACEHOLDER: &str = "AAAAA AAAAAAA AAAAA AA";
/// Placeholder for defendants.
pub const DEFENDANT_PLACEHOLDER: &str = "BBBBB BBBBBBB BBBBB BB";
/// Placeholder for place names.
pub const PLACE_PLACEHOLDER: &str = "CCCCCCCC";
/// Placeholder for email addresses.
pub const EMAIL_PLACEHOLDER: &str = "ppppp@ppppp.ppp";

/// One row of the entity table, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityEntry {
    /// Near-literal phrase (spaces match any whitespace run)
    pub pattern: String,
    /// Placeholder written in place of the match
    pub replacement: String,
}

impl EntityEntry {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Built-in entity table, in evaluation order.
pub fn builtin_entities() -> Vec<EntityEntry> {
    vec![
        EntityEntry::new("Christine Maria Batista de Brito Lyra", EXPERT_PLACEHOLDER),
        EntityEntry::new("Claudia Cristina Studart Leal", EXPERT_PLACEHOLDER),
        EntityEntry::new("Mara do Socorro da Silva", PLAINTIFF_PLACEHOLDER),
        EntityEntry::new("Francisca Maria da Silva", DEFENDANT_PLACEHOLDER),
        EntityEntry::new("Jo[aã]o Batista de Oliveira", PLAINTIFF_PLACEHOLDER),
        EntityEntry::new("Instituto Nacional do Seguro Social", DEFENDANT_PLACEHOLDER),
        EntityEntry::new("Robson de Lima Canan[eé]a", "PPPPP PPPPP PPP PPPPPPP"),
        EntityEntry::new("Mamanguape", PLACE_PLACEHOLDER),
        EntityEntry::new("Pianc[oó]", PLACE_PLACEHOLDER),
        EntityEntry::new("Sousa", PLACE_PLACEHOLDER),
        EntityEntry::new(r"diesp@tjpb\.jus\.br", EMAIL_PLACEHOLDER),
    ]
}

/// Compiled entity table row.
#[derive(Debug, Clone)]
pub struct EntityRule {
    name: String,
    regex: Regex,
    replacement: Replacement,
}

impl EntityRule {
    /// Compiles one table row.
    pub fn compile(entry: &EntityEntry) -> ModelResult<Self> {
        let regex =
            near_literal(&entry.pattern).map_err(|e| ModelError::pattern(&entry.pattern, e))?;
        Ok(Self {
            name: format!("entity:{}", entry.pattern),
            regex,
            replacement: Replacement::Literal(entry.replacement.clone()),
        })
    }

    /// Compiles a whole table, preserving its order.
    pub fn compile_all(entries: &[EntityEntry]) -> ModelResult<Vec<Self>> {
        entries.iter().map(Self::compile).collect()
    }
}

impl RedactionRule for EntityRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn stage(&self) -> Stage {
        Stage::Entity
    }

    fn apply<'a>(&self, line: &'a str) -> Cow<'a, str> {
        self.replacement.replace_all(&self.regex, line)
    }
}
