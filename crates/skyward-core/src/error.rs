//! Error taxonomy for the gameplay core.
//!
//! Only configuration problems are surfaced as errors. They are detected when
//! entities, tuning or level layouts are constructed, never in the middle of a
//! running level:
//!
//! - Degenerate behavior parameters (zero speed, zero flicker interval) are
//!   rejected with a [`ConfigError`].
//! - Inverted patrol limits are normalised rather than rejected.
//! - Contacts against unknown or already removed bodies are ignored by the
//!   contact table and never produce an error.

use thiserror::Error;

/// Errors raised while validating tuning values or level layouts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A behavior speed was zero, negative, NaN or infinite.
    #[error("{entity} speed must be positive and finite, got {speed}")]
    InvalidSpeed {
        /// The kind of entity the speed belongs to.
        entity: &'static str,
        /// The offending value.
        speed: f32,
    },

    /// A coordinate or limit was NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The offending value.
        value: f32,
    },

    /// A box shape had a non-positive or non-finite half extent.
    #[error("{entity} box extents must be positive and finite")]
    DegenerateShape {
        /// The kind of entity the shape belongs to.
        entity: &'static str,
    },

    /// The hazard flicker interval was zero.
    #[error("flicker interval must be at least one tick")]
    ZeroFlickerInterval,

    /// The hazard lifetime was shorter than one flicker interval.
    #[error("flicker duration ({duration} ticks) is shorter than the flicker interval ({interval} ticks)")]
    FlickerTooShort {
        /// Total armed lifetime in ticks.
        duration: u32,
        /// Ticks between visibility toggles.
        interval: u32,
    },

    /// A tuning value was outside of its allowed range.
    #[error("tuning value `{field}` is out of range: {reason}")]
    InvalidTuning {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// A configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias for fallible configuration paths.
pub type ConfigResult<T> = Result<T, ConfigError>;
