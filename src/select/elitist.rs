use super::{Scored, Select};
use crate::model::Chromosome;
use rand::Rng;

/// Deterministic truncation: sort ascending by fitness, take the first
/// `count` (spec §4.5). Ties break on population index for reproducibility
/// (spec §5).
#[derive(Clone, Copy, Debug, Default)]
pub struct Elitist;

impl Select for Elitist {
    fn select(&self, population: &[Scored<'_>], count: usize, _rng: &mut impl Rng) -> Vec<Chromosome> {
        let mut ranked: Vec<&Scored<'_>> = population.iter().collect();
        ranked.sort_by(|a, b| a.fitness.partial_cmp(&b.fitness).unwrap().then(a.index.cmp(&b.index)));
        ranked.into_iter().take(count).map(|s| s.chromosome.clone()).collect()
    }
}
