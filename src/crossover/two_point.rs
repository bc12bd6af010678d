use super::Crossover;
use crate::model::Chromosome;
use rand::Rng;

/// Picks two ordered indices independently in each parent's pattern
/// sequence and swaps the middle segments (spec §4.6).
#[derive(Clone, Copy, Debug, Default)]
pub struct TwoPoint;

impl Crossover for TwoPoint {
    fn cross(&self, parent_a: &Chromosome, parent_b: &Chromosome, rng: &mut impl Rng) -> (Chromosome, Chromosome) {
        if parent_a.len() < 2 || parent_b.len() < 2 {
            return (parent_a.clone(), parent_b.clone());
        }

        let (a1, a2) = ordered_pair(parent_a.len(), rng);
        let (b1, b2) = ordered_pair(parent_b.len(), rng);

        let mut child_a = parent_a.patterns[..a1].to_vec();
        child_a.extend_from_slice(&parent_b.patterns[b1..b2]);
        child_a.extend_from_slice(&parent_a.patterns[a2..]);

        let mut child_b = parent_b.patterns[..b1].to_vec();
        child_b.extend_from_slice(&parent_a.patterns[a1..a2]);
        child_b.extend_from_slice(&parent_b.patterns[b2..]);

        (Chromosome::new(child_a), Chromosome::new(child_b))
    }
}

fn ordered_pair(len: usize, rng: &mut impl Rng) -> (usize, usize) {
    let i = rng.gen_range(0..=len);
    let j = rng.gen_range(0..=len);
    if i <= j {
        (i, j)
    } else {
        (j, i)
    }
}
