//! Error taxonomy for the cutting-stock engine.
//!
//! [`EngineError`] covers the recoverable/unrecoverable conditions the
//! engine and driver can hit at runtime (see spec §7). Builder-style
//! construction errors follow the teacher crate's convention of a plain
//! string-tagged struct rather than a full enum, since they only ever
//! report "which required field is missing".

use thiserror::Error;

/// Error returned when [`crate::config::GaConfigBuilder`] produces an invalid configuration.
/// Contains a descriptive message about what went wrong (e.g. population_size < 2).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TryFromConfigBuilderError(pub &'static str);

impl std::fmt::Display for TryFromConfigBuilderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for TryFromConfigBuilderError {}

/// Exhaustive error kinds for the optimization core (spec §7).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Configuration failed validation before the first generation ran.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// The sub-problem had no demand rows left after cleaning.
    #[error("demand is empty after cleaning")]
    DemandEmpty,

    /// A demanded piece is longer than every candidate bar (standard or scrap).
    /// Recorded, not fatal: the piece stays uncovered and surfaces via the
    /// completeness report and the missing-demand fitness penalty.
    #[error("no candidate bar fits piece of length {piece_length}m (order {order_id})")]
    NoBarFits {
        order_id: String,
        piece_length: f64,
    },

    /// A pattern constructor invariant was violated (internal bug signal).
    #[error("pattern overflow: cuts sum {used_length} exceeds source length {source_length}")]
    PatternOverflow {
        source_length: f64,
        used_length: f64,
    },

    /// The GA loop raised an uncaught condition; the driver falls back to
    /// the deterministic packer (spec §4.10) and keeps going.
    #[error("engine failure: {0}")]
    EngineFailure(String),
}
