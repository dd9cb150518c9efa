//! Ordered rule chain and the `sanitize_line` contract.

use crate::config::RulesConfig;
use crate::document::{Page, SanitizedPage};
use crate::domain::{
    DigitSweep, EntityRule, FallbackTokenRule, LabelRule, RedactionRule, Stage,
    StructuredTokenRule, WhitespaceNormalizer,
};
use crate::error::{ModelError, ModelResult};
use rayon::prelude::*;
use std::fmt;

/// The total ordered list of redaction rules.
///
/// Rules run in declaration order and their stages must never go backwards:
/// an entity rule placed after a digit rule would see zero-filled text and
/// miss, so such lists are rejected at construction.
pub struct RuleSet {
    rules: Vec<Box<dyn RedactionRule>>,
}

impl RuleSet {
    /// Builds a rule set, checking that stages are non-decreasing.
    pub fn new(rules: Vec<Box<dyn RedactionRule>>) -> ModelResult<Self> {
        for pair in rules.windows(2) {
            if pair[1].stage() < pair[0].stage() {
                return Err(ModelError::InvalidInput {
                    parameter: "rules".to_string(),
                    reason: format!(
                        "rule '{}' ({}) must not run after '{}' ({})",
                        pair[1].name(),
                        pair[1].stage(),
                        pair[0].name(),
                        pair[0].stage()
                    ),
                });
            }
        }
        Ok(Self { rules })
    }

    /// Rule set built from the built-in tables.
    pub fn standard() -> ModelResult<Self> {
        Self::from_tables(RulesConfig::default())
    }

    /// Rule set built from configured tables.
    pub fn from_config(config: &RulesConfig) -> ModelResult<Self> {
        Self::from_tables(config.clone())
    }

    fn from_tables(config: RulesConfig) -> ModelResult<Self> {
        let mut rules: Vec<Box<dyn RedactionRule>> = Vec::new();

        for rule in EntityRule::compile_all(&config.entities)? {
            rules.push(Box::new(rule));
        }
        for rule in LabelRule::compile_all(&config.labels)? {
            rules.push(Box::new(rule));
        }
        for rule in StructuredTokenRule::all() {
            rules.push(Box::new(rule));
        }
        rules.push(Box::new(FallbackTokenRule::compile(&config.denylist)?));
        rules.push(Box::new(DigitSweep));
        rules.push(Box::new(WhitespaceNormalizer));

        log::debug!(
            "Built rule set: {} entities, {} labels, {} denylist tokens",
            config.entities.len(),
            config.labels.len(),
            config.denylist.len()
        );

        Self::new(rules)
    }

    /// Sanitizes one raw line.
    ///
    /// Returns the empty string when the line is blank, which tells the
    /// renderer to suppress it. Never fails; unmatched text only goes
    /// through the digit sweep and whitespace cleanup.
    pub fn sanitize_line(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return String::new();
        }

        let mut line = raw.to_string();
        for rule in &self.rules {
            let next = match rule.apply(&line) {
                std::borrow::Cow::Owned(changed) => Some(changed),
                std::borrow::Cow::Borrowed(_) => None,
            };
            if let Some(changed) = next {
                log::trace!("{} rewrote line", rule.name());
                line = changed;
            }
        }
        line
    }

    /// Sanitizes every line of a page. Lines are independent, so they are
    /// processed in parallel; order is preserved.
    pub fn sanitize_page(&self, page: &Page) -> SanitizedPage {
        SanitizedPage {
            number: page.number,
            lines: page
                .lines
                .par_iter()
                .map(|line| self.sanitize_line(line))
                .collect(),
        }
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Stage of each rule in evaluation order.
    pub fn stages(&self) -> Vec<Stage> {
        self.rules.iter().map(|r| r.stage()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.rule_names())
            .finish()
    }
}
