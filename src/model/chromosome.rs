use super::{BarKind, OrderId, Pattern, PieceDemand};
use rustc_hash::FxHashMap;
use std::fmt;

/// Key used by [`Chromosome::summary`] and [`completeness`]: an
/// `(order_id, piece_length)` pair. `piece_length` is stored rounded to
/// three digits (spec §3), so plain `f64` equality/hash is safe here —
/// every length entering the map has already passed through [`super::round3`].
pub type PieceKey = (OrderId, ordered_float::OrderedFloat<f64>);

/// A full plan for a single sub-problem: an ordered sequence of patterns.
/// No uniqueness constraint across patterns — duplicates are expected,
/// since the algorithm reuses many identical bars (spec §3).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chromosome {
    pub patterns: Vec<Pattern>,
}

impl Chromosome {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    pub fn empty() -> Self {
        Self { patterns: vec![] }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn total_waste(&self) -> f64 {
        self.patterns.iter().map(Pattern::waste).sum()
    }

    pub fn standard_used(&self) -> usize {
        self.patterns
            .iter()
            .filter(|p| matches!(p.source_kind, BarKind::Standard))
            .count()
    }

    pub fn scrap_used(&self) -> usize {
        self.patterns
            .iter()
            .filter(|p| matches!(p.source_kind, BarKind::Scrap))
            .count()
    }

    /// Total length of SCRAP bars consumed as pattern sources (the
    /// quantity the fitness reuse bonus is proportional to).
    pub fn scrap_source_length(&self) -> f64 {
        self.patterns
            .iter()
            .filter(|p| matches!(p.source_kind, BarKind::Scrap))
            .map(|p| p.source_length)
            .sum()
    }

    /// Lengths of every reusable off-cut this chromosome produces —
    /// candidate scrap for the *next* execution group (spec §4.11).
    pub fn reusable_scraps(&self) -> Vec<f64> {
        self.patterns
            .iter()
            .filter(|p| p.reusable())
            .map(Pattern::waste)
            .collect()
    }

    /// Mapping `(order_id, piece_length) -> total count produced`, the
    /// primary signal fed to fitness and completeness checks. O(sum of
    /// pattern cut counts).
    pub fn summary(&self) -> FxHashMap<PieceKey, u64> {
        let mut map: FxHashMap<PieceKey, u64> = FxHashMap::default();
        for pattern in &self.patterns {
            for cut in &pattern.cuts {
                let key = (
                    cut.order_id.clone(),
                    ordered_float::OrderedFloat(cut.piece_length),
                );
                *map.entry(key).or_insert(0) += cut.count_in_pattern as u64;
            }
        }
        map
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chromosome: {} patterns, total waste {:.3}m",
            self.patterns.len(),
            self.total_waste()
        )
    }
}

/// The multiset comparison between what a chromosome produces and what the
/// demand requires (spec §4.1, GLOSSARY "Completeness").
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Completeness {
    pub missing: FxHashMap<PieceKey, u64>,
    pub surplus: FxHashMap<PieceKey, u64>,
}

impl Completeness {
    /// Empty `missing` — every demanded piece is covered, possibly with extras.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Empty `missing` and empty `surplus` — exact match to demand.
    pub fn is_exact(&self) -> bool {
        self.missing.is_empty() && self.surplus.is_empty()
    }

    pub fn has_excess(&self) -> bool {
        !self.surplus.is_empty()
    }

    pub fn missing_length(&self) -> f64 {
        self.missing
            .iter()
            .map(|((_, length), count)| length.into_inner() * *count as f64)
            .sum()
    }

    pub fn surplus_length(&self) -> f64 {
        self.surplus
            .iter()
            .map(|((_, length), count)| length.into_inner() * *count as f64)
            .sum()
    }
}

/// Compares a chromosome's [`Chromosome::summary`] against `demand` and
/// returns the missing/surplus multisets (spec §4.1).
pub fn completeness(chromosome: &Chromosome, demand: &[PieceDemand]) -> Completeness {
    let produced = chromosome.summary();
    let mut missing = FxHashMap::default();
    let mut surplus = produced.clone();

    for piece in demand {
        let key: PieceKey = (
            piece.order_id.clone(),
            ordered_float::OrderedFloat(piece.piece_length),
        );
        let have = produced.get(&key).copied().unwrap_or(0);
        if have < piece.required_count {
            missing.insert(key.clone(), piece.required_count - have);
        }
        match surplus.get(&key).copied() {
            Some(have) if have > piece.required_count => {
                surplus.insert(key.clone(), have - piece.required_count);
            }
            _ => {
                surplus.remove(&key);
            }
        }
    }

    Completeness { missing, surplus }
}
