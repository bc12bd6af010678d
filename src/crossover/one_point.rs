use super::Crossover;
use crate::model::Chromosome;
use rand::Rng;

/// Picks a cut index independently in each parent's pattern sequence and
/// swaps tails (spec §4.6).
#[derive(Clone, Copy, Debug, Default)]
pub struct OnePoint;

impl Crossover for OnePoint {
    fn cross(&self, parent_a: &Chromosome, parent_b: &Chromosome, rng: &mut impl Rng) -> (Chromosome, Chromosome) {
        if parent_a.is_empty() || parent_b.is_empty() {
            return (parent_a.clone(), parent_b.clone());
        }
        let cut_a = rng.gen_range(0..=parent_a.len());
        let cut_b = rng.gen_range(0..=parent_b.len());

        let mut child_a = parent_a.patterns[..cut_a].to_vec();
        child_a.extend_from_slice(&parent_b.patterns[cut_b..]);

        let mut child_b = parent_b.patterns[..cut_b].to_vec();
        child_b.extend_from_slice(&parent_a.patterns[cut_a..]);

        (Chromosome::new(child_a), Chromosome::new(child_b))
    }
}
