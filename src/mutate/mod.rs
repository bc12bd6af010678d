//! Mutation (spec §4.7). Grounded in
//! `examples/original_source/genetic_algorithm/mutation.py`: `mutar` ->
//! [`mutate`], and one function per operator (named in each submodule).
//! Any operation that cannot apply is a no-op; mutation never leaves a
//! chromosome structurally invalid.
mod chromosome_level;
mod per_pattern;

pub use chromosome_level::{adjust_count, merge, split};
pub use per_pattern::{change_source, move_piece, reoptimize};

use crate::config::MutationOp;
use crate::model::{BarPool, Chromosome, PieceDemand};
use rand::seq::SliceRandom;
use rand::Rng;

/// Base probabilities for the chromosome-level operations (spec §4.7:
/// "fixed low probabilities, default 0.05-0.1").
pub const P_ADJUST_COUNT: f64 = 0.1;
pub const P_SPLIT: f64 = 0.05;
pub const P_MERGE: f64 = 0.05;

/// Mutates `chromosome` with probability `p_mut_ind`; otherwise returns it
/// unchanged (spec §4.7, §8: `p_mut_ind = 0` is the identity).
#[allow(clippy::too_many_arguments)]
pub fn mutate(
    chromosome: &Chromosome,
    demand: &[PieceDemand],
    pool: &BarPool,
    p_mut_ind: f64,
    p_mut_gene: f64,
    ops: &[MutationOp],
    min_reusable: f64,
    rng: &mut impl Rng,
) -> Chromosome {
    if rng.gen_range(0.0..1.0) > p_mut_ind {
        return chromosome.clone();
    }

    let mut mutated = chromosome.clone();
    let per_pattern_ops: Vec<MutationOp> = ops
        .iter()
        .copied()
        .filter(|op| MutationOp::PER_PATTERN.contains(op))
        .collect();

    if !per_pattern_ops.is_empty() {
        for index in 0..mutated.len() {
            if rng.gen_range(0.0..1.0) > p_mut_gene {
                continue;
            }
            let op = *per_pattern_ops.choose(rng).unwrap();
            match op {
                MutationOp::ChangeSource => {
                    change_source(&mut mutated, index, pool, min_reusable, rng);
                }
                MutationOp::Reoptimize => {
                    reoptimize(&mut mutated, index, pool, min_reusable);
                }
                MutationOp::MovePiece => {
                    move_piece(&mut mutated, index, min_reusable, rng);
                }
                _ => unreachable!("filtered to per-pattern ops"),
            }
        }
    }

    if ops.contains(&MutationOp::AdjustCount) && rng.gen_range(0.0..1.0) < P_ADJUST_COUNT {
        adjust_count(&mut mutated, demand, min_reusable, rng);
    }
    if ops.contains(&MutationOp::Split) && rng.gen_range(0.0..1.0) < P_SPLIT {
        split(&mut mutated, pool, min_reusable, rng);
    }
    if ops.contains(&MutationOp::Merge) && rng.gen_range(0.0..1.0) < P_MERGE {
        merge(&mut mutated, pool, min_reusable, rng);
    }

    mutated
}
