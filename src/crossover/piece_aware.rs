use super::Crossover;
use crate::model::pattern::Pattern;
use crate::model::Chromosome;
use rand::Rng;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;

/// Ranks each parent's patterns by material efficiency `1 - waste/source_length`
/// descending, then greedily assembles each child from the two ranked lists:
/// a pattern is kept if it introduces new `(order_id, piece_length)`
/// coverage or the child still has fewer than two patterns. Assembly stops
/// once the child reaches `max(|parent_a|, |parent_b|) + 2` patterns
/// (spec §4.6, §9 — the `+2` constant is preserved as-is, undocumented in
/// the source this was distilled from).
#[derive(Clone, Copy, Debug, Default)]
pub struct PieceAware;

fn efficiency(pattern: &Pattern) -> f64 {
    if pattern.source_length <= 0.0 {
        return 0.0;
    }
    1.0 - pattern.waste() / pattern.source_length
}

fn ranked(chromosome: &Chromosome) -> Vec<Pattern> {
    let mut patterns = chromosome.patterns.clone();
    patterns.sort_by(|a, b| efficiency(b).partial_cmp(&efficiency(a)).unwrap_or(Ordering::Equal));
    patterns
}

/// Interleaves two already-ranked lists, alternating starting with `first`.
fn interleave(first: &[Pattern], second: &[Pattern]) -> Vec<Pattern> {
    let mut merged = Vec::with_capacity(first.len() + second.len());
    let mut i = 0;
    let mut j = 0;
    let mut take_first = true;
    while i < first.len() || j < second.len() {
        if take_first && i < first.len() {
            merged.push(first[i].clone());
            i += 1;
        } else if !take_first && j < second.len() {
            merged.push(second[j].clone());
            j += 1;
        } else if i < first.len() {
            merged.push(first[i].clone());
            i += 1;
        } else if j < second.len() {
            merged.push(second[j].clone());
            j += 1;
        }
        take_first = !take_first;
    }
    merged
}

fn assemble(merged: &[Pattern], cap: usize) -> Chromosome {
    let mut covered: FxHashSet<(String, ordered_float::OrderedFloat<f64>)> = FxHashSet::default();
    let mut kept: Vec<Pattern> = Vec::new();

    for pattern in merged {
        if kept.len() >= cap {
            break;
        }
        let introduces_new = pattern
            .cuts
            .iter()
            .any(|cut| !covered.contains(&(cut.order_id.clone(), ordered_float::OrderedFloat(cut.piece_length))));

        if introduces_new || kept.len() < 2 {
            for cut in &pattern.cuts {
                covered.insert((cut.order_id.clone(), ordered_float::OrderedFloat(cut.piece_length)));
            }
            kept.push(pattern.clone());
        }
    }

    Chromosome::new(kept)
}

impl Crossover for PieceAware {
    fn cross(&self, parent_a: &Chromosome, parent_b: &Chromosome, _rng: &mut impl Rng) -> (Chromosome, Chromosome) {
        let ranked_a = ranked(parent_a);
        let ranked_b = ranked(parent_b);
        let cap = parent_a.len().max(parent_b.len()) + 2;

        let child_a = assemble(&interleave(&ranked_a, &ranked_b), cap);
        let child_b = assemble(&interleave(&ranked_b, &ranked_a), cap);

        (child_a, child_b)
    }
}
