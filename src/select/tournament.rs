use super::{Scored, Select};
use crate::model::Chromosome;
use rand::Rng;

/// Samples `tournament_size` indices with replacement across draws (but
/// without replacement within one draw) and keeps the lowest-fitness
/// competitor, `count` times (spec §4.5).
#[derive(Clone, Copy, Debug)]
pub struct Tournament {
    pub tournament_size: usize,
}

impl Select for Tournament {
    fn select(&self, population: &[Scored<'_>], count: usize, rng: &mut impl Rng) -> Vec<Chromosome> {
        if population.is_empty() {
            return Vec::new();
        }
        let tournament_size = self.tournament_size.min(population.len()).max(1);
        let mut winners = Vec::with_capacity(count);

        for _ in 0..count {
            let mut sampled: Vec<usize> = Vec::with_capacity(tournament_size);
            while sampled.len() < tournament_size {
                let candidate = rng.gen_range(0..population.len());
                if !sampled.contains(&candidate) {
                    sampled.push(candidate);
                }
            }
            let winner = sampled
                .into_iter()
                .map(|i| population[i])
                .min_by(|a, b| {
                    a.fitness
                        .partial_cmp(&b.fitness)
                        .unwrap()
                        .then(a.index.cmp(&b.index))
                })
                .unwrap();
            winners.push(winner.chromosome.clone());
        }
        winners
    }
}
