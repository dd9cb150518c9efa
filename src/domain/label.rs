//! Label-based field redaction.
//!
//! Court documents introduce parties and venues with fixed legal labels
//! ("Requerente:", "movido por", "em face de", ...). Whatever follows such a
//! label is suppressed by rewriting it to a canonical sentence, so names the
//! entity table has never seen still do not survive.

use super::entity::{DEFENDANT_PLACEHOLDER, PLAINTIFF_PLACEHOLDER};
use super::{RedactionRule, Stage};
use crate::error::{ModelError, ModelResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Body of a [`LabelScope::Clause`] match.
///
/// A run of `;`, `,` or `.` closes the clause only when followed by
/// whitespace or the end of the line. Dots inside emails, abbreviations
/// and numbers stay part of the clause, so no tail of the payload can later
/// fuse with the template.
const CLAUSE_BODY: &str = r"(?:[^;,.]|[;,.]+[^;,.\s])*";

/// How much of the line a label rule rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelScope {
    /// The whole line becomes the template
    #[default]
    Line,
    /// From the label up to the next clause delimiter (`;`, `,` or `.`
    /// followed by whitespace) or end of line
    Clause,
}

/// One row of the label table, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub name: String,
    /// Case-insensitive regex locating the label anywhere in the line
    pub pattern: String,
    /// Canonical text written in place of the label and its payload
    pub template: String,
    #[serde(default)]
    pub scope: LabelScope,
}

impl LabelEntry {
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        template: impl Into<String>,
        scope: LabelScope,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            template: template.into(),
            scope,
        }
    }
}

/// Built-in label table, in evaluation order.
pub fn builtin_labels() -> Vec<LabelEntry> {
    vec![
        LabelEntry::new(
            "interessada",
            r"\binteressad[oa]:",
            "Interessada: PPPPP PPPPP PPPPP PPPPP - Perita Médica Neurologista",
            LabelScope::Line,
        ),
        LabelEntry::new(
            "movido-por",
            r"\bmovido\s+por\b",
            format!("movido por {}", PLAINTIFF_PLACEHOLDER),
            LabelScope::Clause,
        ),
        LabelEntry::new(
            "em-face-de",
            r"\bem\s+face(?:\s+de)?\b",
            format!("em face de {}", DEFENDANT_PLACEHOLDER),
            LabelScope::Clause,
        ),
        LabelEntry::new(
            "requerente",
            r"\brequerente:",
            "Requerente: Juízo da 0ª Vara da Comarca de CCCCCCCC",
            LabelScope::Line,
        ),
        LabelEntry::new(
            "perante-juizo",
            r"\bperante\b.*\bju[ií]zo\b",
            "perante o Juízo da 0ª Vara da Comarca de CCCCCCCC.",
            LabelScope::Line,
        ),
        LabelEntry::new(
            "local-data",
            r"\bjo[aã]o\s+pessoa\b.*\bde\b.*\bde\b",
            "João Pessoa, 00 de abril de 0000.",
            LabelScope::Line,
        ),
    ]
}

/// Compiled label table row.
#[derive(Debug, Clone)]
pub struct LabelRule {
    name: String,
    regex: Regex,
    template: String,
    scope: LabelScope,
}

impl LabelRule {
    /// Compiles one table row.
    pub fn compile(entry: &LabelEntry) -> ModelResult<Self> {
        let pattern = match entry.scope {
            LabelScope::Line => format!("(?i){}", entry.pattern),
            LabelScope::Clause => format!("(?i)(?:{}){}", entry.pattern, CLAUSE_BODY),
        };
        let regex = Regex::new(&pattern).map_err(|e| ModelError::pattern(&entry.pattern, e))?;
        Ok(Self {
            name: format!("label:{}", entry.name),
            regex,
            template: entry.template.clone(),
            scope: entry.scope,
        })
    }

    pub fn compile_all(entries: &[LabelEntry]) -> ModelResult<Vec<Self>> {
        entries.iter().map(Self::compile).collect()
    }
}

impl RedactionRule for LabelRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn stage(&self) -> Stage {
        Stage::Label
    }

    fn apply<'a>(&self, line: &'a str) -> Cow<'a, str> {
        match self.scope {
            LabelScope::Line if self.regex.is_match(line) => Cow::Owned(self.template.clone()),
            LabelScope::Line => Cow::Borrowed(line),
            LabelScope::Clause => self
                .regex
                .replace_all(line, regex::NoExpand(self.template.as_str())),
        }
    }
}
