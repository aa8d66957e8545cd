//! Error types for the tool strip.

use crate::action::ActionId;

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while building or loading a [`ToolStripConfig`](crate::ToolStripConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Spacing must be a finite, non-negative number.
    #[error("Invalid spacing {0}: must be finite and non-negative")]
    InvalidSpacing(f32),

    /// The TOML document could not be parsed.
    #[error("Failed to parse tool strip configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Why a layout pass declined to run.
///
/// These are not failures: the pass leaves every published value untouched and
/// a later invalidation (typically a readiness notification) retries it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Unready {
    /// No default representation template has been configured.
    #[error("no representation template configured")]
    TemplateNotConfigured,

    /// No template has been configured for the overflow indicator.
    #[error("no overflow indicator template configured")]
    IndicatorTemplateNotConfigured,

    /// The overflow indicator has been requested but is not created yet.
    #[error("overflow indicator is not ready")]
    IndicatorNotReady,

    /// A participating action's representation is still being created or measured.
    #[error("representation for {action} is not ready")]
    RepresentationPending {
        /// The first action found without a ready representation.
        action: ActionId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidSpacing(-2.0);
        assert_eq!(
            err.to_string(),
            "Invalid spacing -2: must be finite and non-negative"
        );
    }

    #[test]
    fn test_unready_display() {
        assert_eq!(
            Unready::TemplateNotConfigured.to_string(),
            "no representation template configured"
        );
        assert_eq!(
            Unready::IndicatorNotReady.to_string(),
            "overflow indicator is not ready"
        );
    }
}
