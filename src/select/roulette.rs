use super::{Scored, Select};
use crate::model::Chromosome;
use rand::Rng;

/// Fitness-proportionate selection over an inverted scale: aptitude
/// `a_i = max(f) - f_i + epsilon`, so lower fitness (better) gets a larger
/// share. Degrades to uniform sampling when every fitness value is equal
/// (spec §4.5, §8).
const EPSILON: f64 = 1e-3;

#[derive(Clone, Copy, Debug, Default)]
pub struct Roulette;

impl Select for Roulette {
    fn select(&self, population: &[Scored<'_>], count: usize, rng: &mut impl Rng) -> Vec<Chromosome> {
        if population.is_empty() {
            return Vec::new();
        }

        let max_fitness = population.iter().map(|s| s.fitness).fold(f64::MIN, f64::max);
        let min_fitness = population.iter().map(|s| s.fitness).fold(f64::MAX, f64::min);

        if (max_fitness - min_fitness).abs() <= f64::EPSILON {
            return (0..count)
                .map(|_| population[rng.gen_range(0..population.len())].chromosome.clone())
                .collect();
        }

        let mut aptitudes: Vec<f64> = population.iter().map(|s| max_fitness - s.fitness + EPSILON).collect();
        if aptitudes.iter().any(|&a| a <= 0.0) {
            let min_aptitude = aptitudes.iter().cloned().fold(f64::MAX, f64::min);
            for a in &mut aptitudes {
                *a = *a - min_aptitude + EPSILON;
            }
        }
        let total: f64 = aptitudes.iter().sum();

        (0..count)
            .map(|_| {
                let mut draw = rng.gen_range(0.0..total);
                let mut chosen = population.len() - 1;
                for (i, &aptitude) in aptitudes.iter().enumerate() {
                    if draw < aptitude {
                        chosen = i;
                        break;
                    }
                    draw -= aptitude;
                }
                population[chosen].chromosome.clone()
            })
            .collect()
    }
}
