//! Logging facilities for toolstrip.
//!
//! toolstrip uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("toolstrip=debug")
//!     .init();
//! ```
//!
//! The constants below name the targets and spans used across the workspace,
//! so filters can select a single subsystem.

/// Span names used throughout toolstrip for tracing.
pub mod span_names {
    /// One complete layout pass.
    pub const PASS: &str = "toolstrip::pass";
    /// Stale representation eviction.
    pub const EVICTION: &str = "toolstrip::eviction";
}

/// Target names for log filtering.
pub mod targets {
    /// Performance span target.
    pub const PERF: &str = "toolstrip::perf";
    /// Signal emission target.
    pub const SIGNAL: &str = "toolstrip_core::signal";
    /// Timer target.
    pub const TIMER: &str = "toolstrip_core::timer";
    /// Layout pass target.
    pub const PASS: &str = "toolstrip::pass";
    /// Representation cache target.
    pub const CACHE: &str = "toolstrip::cache";
    /// Invalidation coalescer target.
    pub const COALESCER: &str = "toolstrip::coalescer";
    /// Configuration loading target.
    pub const CONFIG: &str = "toolstrip::config";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to measure the duration of layout passes and evictions.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
