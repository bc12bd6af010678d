//! The data model: [`Piece`](piece::PieceDemand), [`Bar`](bar::Bar),
//! [`Pattern`](pattern::Pattern) and [`Chromosome`](chromosome::Chromosome).
//! Pure value types, owned exclusively by whichever generation holds them
//! (spec §3, §9): a chromosome owns its patterns, a pattern owns its cuts,
//! no cycles, deep-copy on clone.
pub mod bar;
pub mod chromosome;
pub mod pattern;
pub mod piece;

pub use bar::{Bar, BarKind, BarPool};
pub use chromosome::Chromosome;
pub use pattern::{Cut, Pattern};
pub use piece::PieceDemand;

/// Opaque order identifier, e.g. a purchase-order or cartilla row key.
pub type OrderId = String;

/// Opaque diameter-class label, e.g. `"#3"`, `"#4"`.
pub type Diameter = String;

/// Rounds a length to three fractional digits, as required throughout the
/// data model (piece lengths on entry, pattern waste).
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Tolerance used when comparing derived floating point quantities
/// (waste recomputation, fitness round-trips).
pub const FLOAT_TOLERANCE: f64 = 1e-3;

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= FLOAT_TOLERANCE
}
