//! Checkform - the check-editor wizard engine.
//!
//! A check is a variant-typed value object: one of nine check types, each with
//! its own settings shape and validation rules. This crate turns a check into
//! an ordered set of wizard sections and keeps track of which sections the
//! user has seen and which of them have errors, including errors deep inside
//! repeatable lists such as "request 3, assertion 2".
//!
//! The pieces, leaves first:
//!
//! - [`path`]: building, matching and wildcarding dotted field paths
//! - [`variant`]: check type to schema, defaults, section and field order
//! - [`section`]: which fields each section owns
//! - [`aggregate`]: the debounced, flattened error list and its narrower views
//! - [`navigation`]: active section, visited set, submit state
//! - [`editor`]: [`CheckEditor`], which owns all of the above
//!
//! # Example
//!
//! ```
//! use checkform::prelude::*;
//!
//! let mut editor = CheckEditor::create(Some("multihttp"), EngineConfig::default()).unwrap();
//! editor.process_pending_tick();
//!
//! // Jumping ahead is never gated, and marks the sections in between visited.
//! editor.set_section_active(SectionId::Execution);
//! assert_eq!(editor.visited_sections().len(), 4);
//! ```

pub mod aggregate;
pub mod check;
pub mod config;
pub mod editor;
pub mod error;
pub mod navigation;
pub mod path;
pub mod prelude;
pub mod section;
pub mod validation;
pub mod variant;

pub use aggregate::ErrorAggregator;
pub use check::{Check, CheckSettings, CheckType, CheckTypeGroup};
pub use config::EngineConfig;
pub use editor::CheckEditor;
pub use error::{Error, Result};
pub use navigation::WizardNavigator;
pub use path::{FieldMatcher, FieldPath, WildcardRules};
pub use section::{SectionId, SectionRegistry};
pub use validation::{CheckSchema, ValidationContext, ValidationOutcome};
pub use variant::{VariantProfile, VariantResolver};

pub use checkform_core::{Property, Signal};
