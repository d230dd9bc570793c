//! Configuration error types.
//!
//! The explosion itself never fails: degenerate inputs render nothing or skip
//! the completion timer.  Errors only arise while turning user configuration
//! (`assets/confetti.toml`) into an [`ExplosionRequest`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use confetti_burst::error::ConfettiResult;
//!
//! fn build() -> ConfettiResult<ExplosionRequest> {
//!     let config = read_config("assets/confetti.toml")?;
//!     config.to_request()
//! }
//! ```
//!
//! [`ExplosionRequest`]: crate::generator::ExplosionRequest

use std::fmt;

/// Top-level error enum for confetti configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfettiError {
    /// The config file exists but could not be read.
    ConfigRead {
        /// Path that was read.
        path: String,
        /// Underlying I/O error text.
        message: String,
    },

    /// The config file is not valid TOML for [`crate::config::ConfettiConfig`].
    ConfigParse {
        /// Path that was parsed.
        path: String,
        /// Parser error text.
        message: String,
    },

    /// A palette entry is not a hex colour.
    InvalidColor {
        /// The rejected string.
        value: String,
    },

    /// A numeric option is outside the range it is meaningful in.
    OptionOutOfRange {
        /// Name of the option (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the valid range.
        valid_range: &'static str,
    },
}

impl fmt::Display for ConfettiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfettiError::ConfigRead { path, message } => {
                write!(f, "failed to read '{}': {}", path, message)
            }
            ConfettiError::ConfigParse { path, message } => {
                write!(f, "failed to parse '{}': {}", path, message)
            }
            ConfettiError::InvalidColor { value } => write!(
                f,
                "invalid colour '{}': expected #RGB, #RRGGBB or #RRGGBBAA",
                value
            ),
            ConfettiError::OptionOutOfRange {
                name,
                value,
                valid_range,
            } => write!(
                f,
                "option '{}' = {} is outside valid range {}",
                name, value, valid_range
            ),
        }
    }
}

impl std::error::Error for ConfettiError {}

/// Convenience alias: a `Result` using `ConfettiError` as the error type.
pub type ConfettiResult<T> = Result<T, ConfettiError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `value` is not a probability.
pub fn validate_emoji_frequency(value: f32) -> ConfettiResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfettiError::OptionOutOfRange {
            name: "emoji_frequency",
            value,
            valid_range: "[0.0, 1.0]",
        })
    }
}

/// Returns an error if `value` is negative or not finite.
pub fn validate_non_negative(name: &'static str, value: f32) -> ConfettiResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfettiError::OptionOutOfRange {
            name,
            value,
            valid_range: "[0.0, ∞)",
        })
    }
}

/// Returns an error if `value` is NaN or infinite.
pub fn validate_finite(name: &'static str, value: f32) -> ConfettiResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfettiError::OptionOutOfRange {
            name,
            value,
            valid_range: "(-∞, ∞), finite",
        })
    }
}
