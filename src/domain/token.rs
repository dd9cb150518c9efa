//! Structured-token redaction.
//!
//! Fixed-format identifiers are replaced by placeholders of the same shape:
//! punctuation stays where it was and every digit becomes `0`. These rules
//! run after the entity and label stages, so canonical placeholders already
//! in the line (`0000000-00.0000.0.00.0000`) are zero-filled onto themselves.

use super::entity::EMAIL_PLACEHOLDER;
use super::{RedactionRule, Replacement, Stage};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Placeholder for monetary amounts.
pub const CURRENCY_PLACEHOLDER: &str = "R$ 000,00";

/// Kinds of structured token recognised by this stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Email,
    /// Judicial process number, `NNNNNNN-DD.AAAA.J.TR.OOOO`
    JudicialProcess,
    /// Company taxpayer id, `00.000.000/0000-00`
    Cnpj,
    /// Individual taxpayer id, `000.000.000-00`
    Cpf,
    /// Administrative process number, `AAAA.NNN.NNN`
    AdministrativeProcess,
    /// `D/M/Y` with a 2 to 4 digit year
    Date,
    /// `R$` amounts
    Currency,
    /// Any bare run of 5 or more digits
    DigitRun,
}

impl TokenKind {
    /// All kinds, in evaluation order.
    pub const ALL: [TokenKind; 8] = [
        TokenKind::Email,
        TokenKind::JudicialProcess,
        TokenKind::Cnpj,
        TokenKind::Cpf,
        TokenKind::AdministrativeProcess,
        TokenKind::Date,
        TokenKind::Currency,
        TokenKind::DigitRun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::JudicialProcess => "judicial-process",
            Self::Cnpj => "cnpj",
            Self::Cpf => "cpf",
            Self::AdministrativeProcess => "administrative-process",
            Self::Date => "date",
            Self::Currency => "currency",
            Self::DigitRun => "digit-run",
        }
    }

    fn regex(&self) -> &'static Regex {
        static EMAIL: Lazy<Regex> = Lazy::new(|| {
            // The domain may swallow further `@` parts so that glued
            // addresses collapse into one placeholder
            Regex::new(r"[\w.%+\-]+@[\w.%+\-@]*\.\w{2,}")
                .expect("Valid email regex")
        });
        static JUDICIAL: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b\d{7}-\d{2}\.\d{4}\.\d\.\d{2}\.\d{4}\b")
                .expect("Valid judicial process regex")
        });
        static CNPJ: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}\b").expect("Valid CNPJ regex")
        });
        static CPF: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\b\d{3}\.\d{3}\.\d{3}-\d{2}\b").expect("Valid CPF regex"));
        static ADMINISTRATIVE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b\d{4}\.\d{3}\.\d{3}\b").expect("Valid administrative process regex")
        });
        static DATE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b").expect("Valid date regex")
        });
        static CURRENCY: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"R\$\s*\d{1,3}(?:\.\d{3})+(?:,\d{1,2})?|R\$\s*\d+(?:,\d{1,2})?")
                .expect("Valid currency regex")
        });
        static DIGIT_RUN: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\d{5,}").expect("Valid digit run regex"));

        match self {
            Self::Email => &EMAIL,
            Self::JudicialProcess => &JUDICIAL,
            Self::Cnpj => &CNPJ,
            Self::Cpf => &CPF,
            Self::AdministrativeProcess => &ADMINISTRATIVE,
            Self::Date => &DATE,
            Self::Currency => &CURRENCY,
            Self::DigitRun => &DIGIT_RUN,
        }
    }

    fn replacement(&self) -> Replacement {
        match self {
            Self::Email => Replacement::Literal(EMAIL_PLACEHOLDER.to_string()),
            Self::Currency => Replacement::Literal(CURRENCY_PLACEHOLDER.to_string()),
            _ => Replacement::MaskDigits,
        }
    }
}

/// One structured-token pattern with its replacement policy.
#[derive(Debug, Clone)]
pub struct StructuredTokenRule {
    kind: TokenKind,
    name: String,
    replacement: Replacement,
}

impl StructuredTokenRule {
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            name: format!("token:{}", kind.as_str()),
            replacement: kind.replacement(),
        }
    }

    /// One rule per [`TokenKind`], in evaluation order.
    pub fn all() -> Vec<Self> {
        TokenKind::ALL.iter().copied().map(Self::new).collect()
    }
}

impl RedactionRule for StructuredTokenRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn stage(&self) -> Stage {
        Stage::StructuredToken
    }

    fn apply<'a>(&self, line: &'a str) -> Cow<'a, str> {
        self.replacement.replace_all(self.kind.regex(), line)
    }
}
