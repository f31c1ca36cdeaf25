//! Core library for template-driven form parsing.
//!
//! This crate provides:
//! - Template definitions (YAML/JSON) describing acceptance tests and fields
//! - Acceptance matching ("is this my document")
//! - Field extraction with modifiers, group concatenation and
//!   locale-aware float/date conversion
//! - A per-template diagnostic log

pub mod error;
pub mod models;
pub mod template;

pub use error::{ExtractionError, FormparseError, Result};
pub use models::config::{EngineConfig, OptionDefaults};
pub use models::definition::{FieldDefinition, OptionsDefinition, TemplateDefinition};
pub use models::result::{ExtractionResult, FieldValue, RawMatch};
pub use template::{
    AcceptancePattern, ExtractionOptions, FieldKind, FieldSpec, Modifier, ModifierSet, Template,
    TemplateSet,
};
