//! Homogeneous analyzer (spec §4.2): when demand collapses to one length
//! within tolerance, enumerate stock-bar mixes exhaustively and return the
//! best. Grounded in `examples/original_source/genetic_algorithm/optimal_analyzer.py`
//! (`calcular_solucion_optima_homogenea`/`analizar_casos_homogeneos`), whose
//! `itertools.product(*ranges)` enumeration this module reproduces with
//! `itertools::Itertools::multi_cartesian_product`.
use crate::model::{round3, PieceDemand};
use itertools::Itertools;

/// One candidate stock length's yield against a fixed piece length.
#[derive(Clone, Copy, Debug)]
struct BarYield {
    length: f64,
    pieces_per_bar: u64,
    residue: f64,
}

/// Best stock-bar mix found for a single homogeneous demand length.
#[derive(Clone, Debug, PartialEq)]
pub struct HomogeneousSolution {
    /// `(stock_length, bar_count)` pairs with `bar_count > 0`.
    pub bars: Vec<(f64, u64)>,
    pub pieces_produced: u64,
    pub pieces_excess: u64,
    pub total_waste: f64,
    pub total_bars: u64,
    /// `1 - waste / total stock length consumed` (original's `eficiencia`).
    pub efficiency: f64,
}

/// Tolerance within which demanded piece lengths collapse into a single
/// homogeneous length (spec §4.2).
pub const HOMOGENEITY_TOLERANCE: f64 = 0.01;

/// Groups `demand` by length within [`HOMOGENEITY_TOLERANCE`] and returns,
/// for every group whose aggregated count reaches `threshold`, the
/// `(piece_length, total_count, solution)` triple. Groups below the
/// threshold are omitted — callers fall through to the heuristic
/// initializer for those.
pub fn analyze_homogeneous_groups(
    demand: &[PieceDemand],
    standard_lengths: &[f64],
    threshold: u64,
) -> Vec<(f64, u64, HomogeneousSolution)> {
    let mut groups: Vec<(f64, u64)> = Vec::new();
    for piece in demand {
        if let Some(group) = groups
            .iter_mut()
            .find(|(length, _)| (piece.piece_length - *length).abs() <= HOMOGENEITY_TOLERANCE)
        {
            group.1 += piece.required_count;
        } else {
            groups.push((piece.piece_length, piece.required_count));
        }
    }

    groups
        .into_iter()
        .filter(|(_, count)| *count >= threshold)
        .filter_map(|(length, count)| {
            best_homogeneous_solution(length, count, standard_lengths)
                .map(|solution| (length, count, solution))
        })
        .collect()
}

/// Enumerates every non-negative integer combination of bar counts that
/// meets `required_count` and returns the one with minimum waste,
/// tie-breaking on fewest total bars (spec §4.2).
pub fn best_homogeneous_solution(
    piece_length: f64,
    required_count: u64,
    stock_lengths: &[f64],
) -> Option<HomogeneousSolution> {
    if piece_length <= 0.0 || required_count == 0 {
        return None;
    }

    let yields: Vec<BarYield> = stock_lengths
        .iter()
        .filter_map(|&length| {
            let pieces_per_bar = (length / piece_length).floor() as u64;
            if pieces_per_bar == 0 {
                return None;
            }
            let residue = length - pieces_per_bar as f64 * piece_length;
            Some(BarYield {
                length,
                pieces_per_bar,
                residue,
            })
        })
        .collect();

    if yields.is_empty() {
        return None;
    }

    let limits: Vec<u64> = yields
        .iter()
        .map(|y| div_ceil(required_count, y.pieces_per_bar))
        .collect();

    let mut best: Option<HomogeneousSolution> = None;
    let ranges: Vec<std::ops::RangeInclusive<u64>> =
        limits.iter().map(|&limit| 0..=limit).collect();

    for combination in ranges.into_iter().multi_cartesian_product() {
        let pieces_produced: u64 = combination
            .iter()
            .zip(&yields)
            .map(|(&n, y)| n * y.pieces_per_bar)
            .sum();
        if pieces_produced < required_count {
            continue;
        }
        let total_bars: u64 = combination.iter().sum();
        let pieces_excess = pieces_produced - required_count;
        let waste_from_residue: f64 = combination
            .iter()
            .zip(&yields)
            .map(|(&n, y)| n as f64 * y.residue)
            .sum();
        let total_waste = round3(waste_from_residue + pieces_excess as f64 * piece_length);

        let is_better = match &best {
            None => true,
            Some(current) => {
                total_waste < current.total_waste - 1e-9
                    || ((total_waste - current.total_waste).abs() <= 1e-9
                        && total_bars < current.total_bars)
            }
        };
        if is_better {
            let bars: Vec<(f64, u64)> = combination
                .iter()
                .zip(&yields)
                .filter(|(&n, _)| n > 0)
                .map(|(&n, y)| (y.length, n))
                .collect();
            let total_stock_length: f64 = bars.iter().map(|(len, n)| len * *n as f64).sum();
            let efficiency = if total_bars > 0 {
                1.0 - total_waste / total_stock_length
            } else {
                0.0
            };
            best = Some(HomogeneousSolution {
                bars,
                pieces_produced,
                pieces_excess,
                total_waste,
                total_bars,
                efficiency,
            });
        }
    }

    best
}

fn div_ceil(a: u64, b: u64) -> u64 {
    (a + b - 1) / b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_homogeneous_case_matches_known_optimum() {
        // spec §8 scenario 1
        let solution = best_homogeneous_solution(1.08, 459, &[6.0, 9.0, 12.0]).unwrap();
        assert_eq!(solution.total_bars, 42);
        assert!((solution.total_waste - 5.28).abs() < 1e-6);
        assert_eq!(solution.pieces_produced, 459);
    }

    #[test]
    fn below_threshold_groups_are_skipped() {
        let demand = vec![PieceDemand::new("P1", 1.08, 5)];
        let groups = analyze_homogeneous_groups(&demand, &[6.0, 9.0, 12.0], 10);
        assert!(groups.is_empty());
    }

    #[test]
    fn at_threshold_groups_fire() {
        let demand = vec![PieceDemand::new("P1", 1.08, 10)];
        let groups = analyze_homogeneous_groups(&demand, &[6.0, 9.0, 12.0], 10);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1, 10);
    }

    #[test]
    fn no_stock_bar_fits_returns_none() {
        assert!(best_homogeneous_solution(20.0, 5, &[6.0, 9.0]).is_none());
    }
}
