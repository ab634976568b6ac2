//! Prelude module for Checkform.
//!
//! ```ignore
//! use checkform::prelude::*;
//! ```

// ============================================================================
// Editor
// ============================================================================

pub use crate::config::EngineConfig;
pub use crate::editor::CheckEditor;
pub use crate::error::{Error, Result};

// ============================================================================
// Check model
// ============================================================================

pub use crate::check::{Check, CheckSettings, CheckType, CheckTypeGroup, Label};

// ============================================================================
// Sections and paths
// ============================================================================

pub use crate::field_path;
pub use crate::path::{FieldMatcher, FieldPath, WildcardRules, create_path, normalize_index};
pub use crate::section::{SectionId, SectionRegistry};

// ============================================================================
// Validation
// ============================================================================

pub use crate::validation::{
    CheckSchema, FeatureFlags, Probe, TenantLimits, ValidationContext, ValidationIssue,
    ValidationOutcome,
};
pub use crate::variant::{VariantProfile, VariantResolver};

// ============================================================================
// Signals
// ============================================================================

pub use checkform_core::{ConnectionId, Signal};
