//! Crossover (spec §4.6), applied per parent pair with probability
//! `p_cross`; otherwise both parents are cloned unchanged. Follows the
//! teacher crate's `crossover` module layout: one file per scheme, a thin
//! dispatch enum on top.
mod one_point;
mod piece_aware;
mod two_point;

pub use one_point::OnePoint;
pub use piece_aware::PieceAware;
pub use two_point::TwoPoint;

use crate::config::CrossoverMethod;
use crate::model::{BarPool, Chromosome};
use rand::Rng;

pub trait Crossover {
    fn cross(&self, parent_a: &Chromosome, parent_b: &Chromosome, rng: &mut impl Rng) -> (Chromosome, Chromosome);
}

pub struct CrossoverDispatch {
    pub method: CrossoverMethod,
}

impl Crossover for CrossoverDispatch {
    fn cross(&self, parent_a: &Chromosome, parent_b: &Chromosome, rng: &mut impl Rng) -> (Chromosome, Chromosome) {
        match self.method {
            CrossoverMethod::OnePoint => OnePoint.cross(parent_a, parent_b, rng),
            CrossoverMethod::TwoPoint => TwoPoint.cross(parent_a, parent_b, rng),
            CrossoverMethod::PieceAware => PieceAware.cross(parent_a, parent_b, rng),
        }
    }
}

/// Applies crossover to one pair with probability `p_cross`, then re-packs
/// both children with BFD when `repair_children` is set and a bar pool is
/// available (spec §4.6's repair hook).
pub fn cross_pair(
    dispatch: &CrossoverDispatch,
    parent_a: &Chromosome,
    parent_b: &Chromosome,
    p_cross: f64,
    repair_children: bool,
    pool: Option<&BarPool>,
    min_reusable: f64,
    rng: &mut impl Rng,
) -> (Chromosome, Chromosome) {
    let (mut child_a, mut child_b) = if rng.gen_range(0.0..1.0) < p_cross {
        dispatch.cross(parent_a, parent_b, rng)
    } else {
        (parent_a.clone(), parent_b.clone())
    };

    if repair_children {
        if let Some(pool) = pool {
            child_a = repair(&child_a, pool, min_reusable);
            child_b = repair(&child_b, pool, min_reusable);
        }
    }

    (child_a, child_b)
}

/// Flattens a chromosome back to individual pieces and re-packs with BFD,
/// the repair step every crossover (and the random initializer) shares.
fn repair(chromosome: &Chromosome, pool: &BarPool, min_reusable: f64) -> Chromosome {
    let demand = crate::model::piece::PieceDemand::normalize(flatten_to_demand(chromosome));
    if demand.is_empty() {
        return Chromosome::empty();
    }
    crate::init::bfd(&demand, pool, min_reusable)
}

fn flatten_to_demand(chromosome: &Chromosome) -> Vec<crate::model::PieceDemand> {
    chromosome
        .patterns
        .iter()
        .flat_map(|pattern| pattern.cuts.iter())
        .map(|cut| crate::model::PieceDemand::new(cut.order_id.clone(), cut.piece_length, cut.count_in_pattern as u64))
        .collect()
}
