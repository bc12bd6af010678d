use super::{round3, BarPool, OrderId, FLOAT_TOLERANCE};
use crate::errors::EngineError;
use rustc_hash::FxHashMap;

/// One row of a sub-problem's demand: `{order_id, piece_length, required_count}`
/// (spec §3). Lengths are rounded to three fractional digits on entry and
/// identical `(order_id, piece_length)` rows are consolidated by summing
/// counts.
#[derive(Clone, Debug, PartialEq)]
pub struct PieceDemand {
    pub order_id: OrderId,
    pub piece_length: f64,
    pub required_count: u64,
}

impl PieceDemand {
    pub fn new(order_id: impl Into<OrderId>, piece_length: f64, required_count: u64) -> Self {
        Self {
            order_id: order_id.into(),
            piece_length: round3(piece_length),
            required_count,
        }
    }

    /// Cleans and consolidates a raw set of demand rows: rounds lengths,
    /// drops non-positive count/length rows, and sums counts for rows that
    /// share `(order_id, piece_length)`.
    pub fn normalize(rows: impl IntoIterator<Item = PieceDemand>) -> Vec<PieceDemand> {
        let mut order: Vec<(OrderId, ordered_float::OrderedFloat<f64>)> = Vec::new();
        let mut counts: FxHashMap<(OrderId, ordered_float::OrderedFloat<f64>), u64> =
            FxHashMap::default();

        for row in rows {
            let length = round3(row.piece_length);
            if row.required_count == 0 || length <= 0.0 {
                continue;
            }
            let key = (row.order_id.clone(), ordered_float::OrderedFloat(length));
            if !counts.contains_key(&key) {
                order.push(key.clone());
            }
            *counts.entry(key).or_insert(0) += row.required_count;
        }

        order
            .into_iter()
            .map(|key @ (ref order_id, length)| {
                let count = counts[&key];
                PieceDemand::new(order_id.clone(), length.into_inner(), count)
            })
            .collect()
    }

    /// Expands this row into `required_count` individual unit-pieces, as
    /// FFD/BFD initialization and the fallback packer need (spec §4.3, §4.10).
    pub fn expand_one(&self) -> impl Iterator<Item = (OrderId, f64)> + '_ {
        std::iter::repeat((self.order_id.clone(), self.piece_length)).take(self.required_count as usize)
    }
}

/// Expands a whole demand slice into individual `(order_id, length)` pieces.
pub fn expand_demand(demand: &[PieceDemand]) -> Vec<(OrderId, f64)> {
    demand.iter().flat_map(|p| p.expand_one()).collect()
}

/// Total required count across a demand slice.
pub fn total_required_count(demand: &[PieceDemand]) -> u64 {
    demand.iter().map(|p| p.required_count).sum()
}

/// Demand rows no candidate bar (STANDARD or SCRAP) is long enough to ever
/// satisfy, independent of any particular pattern arrangement (spec §7:
/// [`EngineError::NoBarFits`] is "recorded... surfaced via the completeness
/// report"). Checked once up front rather than rediscovered per generation —
/// no amount of GA search fixes a piece longer than every candidate.
pub fn unfit_pieces(demand: &[PieceDemand], pool: &BarPool) -> Vec<EngineError> {
    let max_length = pool.max_length().unwrap_or(0.0);
    demand
        .iter()
        .filter(|piece| piece.piece_length > max_length + FLOAT_TOLERANCE)
        .map(|piece| EngineError::NoBarFits {
            order_id: piece.order_id.clone(),
            piece_length: piece.piece_length,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfit_pieces_flags_a_length_longer_than_every_candidate() {
        let demand = vec![PieceDemand::new("P1", 2.0, 3), PieceDemand::new("P2", 15.0, 1)];
        let pool = BarPool::new(vec![6.0, 9.0], vec![2.5]);
        let flagged = unfit_pieces(&demand, &pool);
        assert_eq!(flagged.len(), 1);
        assert!(matches!(
            &flagged[0],
            EngineError::NoBarFits { order_id, piece_length } if order_id == "P2" && (*piece_length - 15.0).abs() < 1e-9
        ));
    }

    #[test]
    fn unfit_pieces_is_empty_when_every_length_has_a_candidate() {
        let demand = vec![PieceDemand::new("P1", 2.0, 3), PieceDemand::new("P2", 5.9, 1)];
        let pool = BarPool::new(vec![6.0, 9.0], vec![]);
        assert!(unfit_pieces(&demand, &pool).is_empty());
    }

    #[test]
    fn unfit_pieces_with_an_empty_pool_flags_everything() {
        let demand = vec![PieceDemand::new("P1", 2.0, 1)];
        let pool = BarPool::new(vec![], vec![]);
        assert_eq!(unfit_pieces(&demand, &pool).len(), 1);
    }
}
