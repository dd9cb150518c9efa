//! Common test utilities and helpers.
//!
//! Shared by the integration tests:
//! - Custom assertions over sanitized text
//! - Stub extractors and source-text builders
//! - PDF inspection helpers

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod pdf_helpers;

pub use assertions::*;
pub use fixtures::*;
pub use pdf_helpers::*;
