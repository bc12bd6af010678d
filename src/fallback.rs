//! Deterministic fallback packer (spec §4.10), invoked by the driver when
//! the engine raises [`crate::errors::EngineError::EngineFailure`].
//! Concatenates SCRAP and STANDARD bars descending by length, expands
//! demand into individual pieces descending by length, and greedily bin
//! packs: each bar absorbs every still-unplaced piece that fits before
//! moving to the next. Always produces valid patterns, even when some
//! pieces remain unplaced (surfaced via completeness, not a panic).
use crate::model::pattern::make_pattern;
use crate::model::{BarPool, Chromosome, Cut, OrderId, Pattern, PieceDemand};

pub fn fallback_pack(demand: &[PieceDemand], pool: &BarPool, min_reusable: f64) -> Chromosome {
    let mut pieces: Vec<(OrderId, f64)> = crate::model::piece::expand_demand(demand);
    pieces.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    let mut bars = pool.candidates_scrap_first();
    bars.sort_by(|a, b| b.length.partial_cmp(&a.length).unwrap());
    if bars.is_empty() {
        return Chromosome::empty();
    }
    // STANDARD lengths are an unbounded multiset; cycle through them once
    // SCRAP (single-use) is exhausted so the bin-packing pass never runs
    // out of bars while pieces remain.
    let standard_cycle: Vec<_> = bars.iter().filter(|b| !b.is_scrap()).cloned().collect();

    let mut patterns: Vec<Pattern> = Vec::new();
    let mut bar_cursor = 0usize;

    while !pieces.is_empty() {
        let bar = if bar_cursor < bars.len() {
            bars[bar_cursor]
        } else if !standard_cycle.is_empty() {
            standard_cycle[(bar_cursor - bars.len()) % standard_cycle.len()]
        } else {
            // No candidate bar at all fits anything further; remaining
            // pieces stay unplaced and surface via completeness.
            break;
        };
        bar_cursor += 1;

        let mut residual = bar.length;
        let mut cuts: Vec<Cut> = Vec::new();
        let mut remaining: Vec<(OrderId, f64)> = Vec::with_capacity(pieces.len());

        for (order_id, length) in pieces.drain(..) {
            if length <= residual + crate::model::FLOAT_TOLERANCE {
                residual -= length;
                if let Some(existing) = cuts
                    .iter_mut()
                    .find(|cut| cut.order_id == order_id && (cut.piece_length - length).abs() <= crate::model::FLOAT_TOLERANCE)
                {
                    existing.count_in_pattern += 1;
                } else {
                    cuts.push(Cut::new(order_id, length, 1));
                }
            } else {
                remaining.push((order_id, length));
            }
        }
        pieces = remaining;

        if !cuts.is_empty() {
            if let Ok(pattern) = make_pattern(bar.length, bar.kind, cuts, min_reusable) {
                patterns.push(pattern);
            }
        } else if bar_cursor > bars.len() + standard_cycle.len().max(1) {
            // A full cycle produced no placement: every candidate is
            // smaller than the smallest remaining piece.
            break;
        }
    }

    Chromosome::new(patterns)
}
