//! Logging facilities for Checkform.
//!
//! Checkform uses the `tracing` crate for instrumentation. The library never
//! installs a subscriber; applications do:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("checkform=debug,checkform_core=trace")
//!     .init();
//! ```

/// Span names used throughout Checkform.
pub mod span_names {
    /// Full-schema recomputation of the error list.
    pub const RECOMPUTE: &str = "checkform::recompute";
    /// Section-scoped validation behind `next()`.
    pub const SECTION_GATE: &str = "checkform::section_gate";
    /// Variant switch.
    pub const VARIANT_SWITCH: &str = "checkform::variant_switch";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "checkform_core::signal";
    /// Tick scheduling target.
    pub const TICK: &str = "checkform_core::tick";
    /// Variant resolution target.
    pub const VARIANT: &str = "checkform::variant";
    /// Section registry target.
    pub const REGISTRY: &str = "checkform::registry";
    /// Error aggregation target.
    pub const AGGREGATE: &str = "checkform::aggregate";
    /// Wizard navigation target.
    pub const NAVIGATION: &str = "checkform::navigation";
    /// Editor facade target.
    pub const EDITOR: &str = "checkform::editor";
    /// Configuration loading target.
    pub const CONFIG: &str = "checkform::config";
}

/// A guard that keeps a performance span entered until dropped.
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "checkform::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span_under_subscriber() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let _span = PerfSpan::new(span_names::RECOMPUTE);
            tracing::debug!(target: targets::AGGREGATE, errors = 0, "inside span");
        });
    }
}
