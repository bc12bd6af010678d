//! Parent selection (spec §4.5). Mirrors the teacher crate's
//! `compete` module: a closed, tagged set of methods behind one
//! [`Select`] trait with a [`SelectDispatch`] wrapper, rather than open
//! polymorphism (spec §9).
mod elitist;
mod roulette;
mod tournament;

pub use elitist::Elitist;
pub use roulette::Roulette;
pub use tournament::Tournament;

use crate::config::SelectionMethod;
use crate::model::Chromosome;
use rand::Rng;

/// One scored individual, carrying its original population index as the
/// deterministic tie-break secondary key (spec §5).
#[derive(Clone, Copy, Debug)]
pub struct Scored<'a> {
    pub chromosome: &'a Chromosome,
    pub fitness: f64,
    pub index: usize,
}

pub trait Select {
    /// Draws `count` parents from `population`, cloning the winners.
    fn select(&self, population: &[Scored<'_>], count: usize, rng: &mut impl Rng) -> Vec<Chromosome>;
}

/// Tagged dispatch over the closed method set, carrying the one
/// method-specific parameter (`tournament_size`) inline like the teacher's
/// `CompeteDispatch(pub Competes, pub TournamentSize)`.
pub struct SelectDispatch {
    pub method: SelectionMethod,
    pub tournament_size: usize,
}

impl Select for SelectDispatch {
    fn select(&self, population: &[Scored<'_>], count: usize, rng: &mut impl Rng) -> Vec<Chromosome> {
        match self.method {
            SelectionMethod::Tournament => Tournament {
                tournament_size: self.tournament_size,
            }
            .select(population, count, rng),
            SelectionMethod::Roulette => Roulette.select(population, count, rng),
            SelectionMethod::Elitist => Elitist.select(population, count, rng),
        }
    }
}

/// Rough measure of how strongly a method favors high-fitness individuals
/// (supplements `calcular_presion_selectiva`, which the distilled spec
/// drops but which is useful as a reporter diagnostic).
pub fn selection_pressure(method: SelectionMethod, fitness_values: &[f64], tournament_size: usize) -> f64 {
    if fitness_values.is_empty() {
        return 0.0;
    }
    match method {
        SelectionMethod::Tournament => tournament_size as f64 / fitness_values.len() as f64,
        SelectionMethod::Roulette => {
            let mean = fitness_values.iter().sum::<f64>() / fitness_values.len() as f64;
            if mean == 0.0 {
                return 0.0;
            }
            let variance = fitness_values.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / fitness_values.len() as f64;
            variance.sqrt() / mean
        }
        SelectionMethod::Elitist => 1.0,
    }
}
