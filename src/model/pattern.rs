use super::{approx_eq, round3, BarKind, OrderId};
use crate::errors::EngineError;
use std::fmt;

/// One cut recorded within a pattern: a piece identity plus how many of it
/// this pattern produces.
#[derive(Clone, Debug, PartialEq)]
pub struct Cut {
    pub order_id: OrderId,
    pub piece_length: f64,
    pub count_in_pattern: u32,
}

impl Cut {
    pub fn new(order_id: impl Into<OrderId>, piece_length: f64, count_in_pattern: u32) -> Self {
        Self {
            order_id: order_id.into(),
            piece_length,
            count_in_pattern,
        }
    }

    pub fn total_length(&self) -> f64 {
        self.piece_length * self.count_in_pattern as f64
    }
}

/// One source bar together with the ordered multiset of pieces cut from it
/// (spec §3, a gene in the GA's chromosome representation).
///
/// `used_length` and `waste` are derived fields, cached at construction
/// time by [`make_pattern`] and kept in sync by every mutating helper below
/// — callers never hand-edit `waste` directly.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub source_length: f64,
    pub source_kind: BarKind,
    pub cuts: Vec<Cut>,
    used_length: f64,
    waste: f64,
    reusable: bool,
}

/// Minimum off-cut length (m) below which residual material is considered
/// unusable and not carried forward (spec GLOSSARY: MIN_REUSABLE).
pub const DEFAULT_MIN_REUSABLE: f64 = 0.5;

impl Pattern {
    pub fn used_length(&self) -> f64 {
        self.used_length
    }

    pub fn waste(&self) -> f64 {
        self.waste
    }

    pub fn reusable(&self) -> bool {
        self.reusable
    }

    /// A pattern is valid iff its cuts fit within the source bar.
    pub fn is_valid(&self) -> bool {
        self.waste >= 0.0
    }

    fn recompute(&mut self, min_reusable: f64) {
        let used: f64 = self.cuts.iter().map(Cut::total_length).sum();
        self.used_length = used;
        self.waste = round3(self.source_length - used);
        self.reusable = self.waste >= min_reusable;
    }

    /// Re-derives `waste`/`reusable` from `cuts` and compares against the
    /// cached values to within [`super::FLOAT_TOLERANCE`] (spec §4.1).
    /// Returns false on mismatch — a signal the pattern was hand-corrupted
    /// rather than built through [`make_pattern`]/the mutation operators.
    pub fn validate(&self, min_reusable: f64) -> bool {
        let used: f64 = self.cuts.iter().map(Cut::total_length).sum();
        let waste = round3(self.source_length - used);
        let reusable = waste >= min_reusable;
        approx_eq(used, self.used_length) && approx_eq(waste, self.waste) && reusable == self.reusable
    }

    /// Adds residual length back to the pattern (used by mutation's
    /// move-piece and adjust-count operators) without touching `cuts`
    /// directly; callers push/pop `cuts` then call this to resync.
    pub fn recompute_derived(&mut self, min_reusable: f64) {
        self.recompute(min_reusable);
    }

    /// Remaining length this pattern can still accept.
    pub fn residual(&self) -> f64 {
        self.source_length - self.used_length
    }
}

/// Builds a pattern from a source bar and its cuts, validating
/// `used_length <= source_length` (spec §4.1). Fails with
/// [`EngineError::PatternOverflow`] when the cuts overflow the bar — this
/// is the one place the spec forbids ever constructing an invalid pattern,
/// unlike the historical source implementation which occasionally admitted
/// negative waste (see spec §9 Open Questions; we deliberately do not
/// reproduce that bug).
pub fn make_pattern(
    source_length: f64,
    source_kind: BarKind,
    cuts: Vec<Cut>,
    min_reusable: f64,
) -> Result<Pattern, EngineError> {
    let used_length: f64 = cuts.iter().map(Cut::total_length).sum();
    if used_length > source_length + super::FLOAT_TOLERANCE {
        return Err(EngineError::PatternOverflow {
            source_length,
            used_length,
        });
    }
    let mut pattern = Pattern {
        source_length,
        source_kind,
        cuts,
        used_length: 0.0,
        waste: 0.0,
        reusable: false,
    };
    pattern.recompute(min_reusable);
    Ok(pattern)
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pattern: {} bar {:.3}m -> {} cuts, waste {:.3}m ({})",
            self.source_kind,
            self.source_length,
            self.cuts.len(),
            self.waste,
            if self.reusable { "reusable" } else { "scrap" }
        )
    }
}
