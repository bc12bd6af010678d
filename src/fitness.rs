//! Fitness evaluation (spec §4.4). Grounded in
//! `examples/original_source/genetic_algorithm/fitness.py`: `calcular_fitness`
//! -> [`fitness`], `analizar_componentes_fitness` -> [`FitnessBreakdown::of`].
//! Lower fitness is better; the separation between `missing` and `waste`
//! weights guarantees any infeasible chromosome is dominated by any feasible
//! one (spec §8, scenario 6).
use crate::config::FitnessWeights;
use crate::model::chromosome::completeness;
use crate::model::{Chromosome, PieceDemand};

/// Fitness broken down into its weighted components, for diagnostics and
/// reporting (supplements `analizar_componentes_fitness`, which the
/// distilled spec drops but the source exposes as a first-class report).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FitnessBreakdown {
    pub waste: f64,
    pub missing: f64,
    pub surplus: f64,
    pub bars: f64,
    pub reuse: f64,
    pub total: f64,
}

impl FitnessBreakdown {
    pub fn of(chromosome: &Chromosome, demand: &[PieceDemand], weights: &FitnessWeights) -> Self {
        let completeness = completeness(chromosome, demand);

        let waste = weights.waste * chromosome.total_waste();
        let missing = weights.missing * completeness.missing_length();
        let surplus = weights.surplus * completeness.surplus_length();
        let bars = weights.bars * chromosome.standard_used() as f64;
        let reuse = weights.reuse * chromosome.scrap_source_length();

        Self {
            waste,
            missing,
            surplus,
            bars,
            reuse,
            total: waste + missing + surplus + bars - reuse,
        }
    }
}

/// The single scalar the GA minimizes (spec §4.4).
pub fn fitness(chromosome: &Chromosome, demand: &[PieceDemand], weights: &FitnessWeights) -> f64 {
    FitnessBreakdown::of(chromosome, demand, weights).total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::pattern::make_pattern;
    use crate::model::{BarKind, Cut};

    fn demand() -> Vec<PieceDemand> {
        vec![PieceDemand::new("P1", 1.5, 2)]
    }

    #[test]
    fn exact_chromosome_has_no_missing_or_surplus_penalty() {
        let pattern = make_pattern(
            6.0,
            BarKind::Standard,
            vec![Cut::new("P1", 1.5, 2)],
            0.5,
        )
        .unwrap();
        let chromosome = Chromosome::new(vec![pattern]);
        let weights = FitnessWeights::default();
        let breakdown = FitnessBreakdown::of(&chromosome, &demand(), &weights);
        assert_eq!(breakdown.missing, 0.0);
        assert_eq!(breakdown.surplus, 0.0);
        assert!(breakdown.total > 0.0);
    }

    #[test]
    fn missing_demand_dominates_waste() {
        let chromosome = Chromosome::empty();
        let weights = FitnessWeights::default();
        let value = fitness(&chromosome, &demand(), &weights);
        let min_piece_length = 1.5;
        assert!(value > weights.missing * min_piece_length);
    }

    #[test]
    fn fitness_is_deterministic() {
        let pattern = make_pattern(6.0, BarKind::Standard, vec![Cut::new("P1", 1.5, 2)], 0.5).unwrap();
        let chromosome = Chromosome::new(vec![pattern]);
        let weights = FitnessWeights::default();
        let a = fitness(&chromosome, &demand(), &weights);
        let b = fitness(&chromosome, &demand(), &weights);
        assert_eq!(a, b);
    }

    #[test]
    fn scrap_reuse_lowers_fitness() {
        let on_scrap = make_pattern(2.0, BarKind::Scrap, vec![Cut::new("P1", 1.5, 1)], 0.5).unwrap();
        let on_standard = make_pattern(6.0, BarKind::Standard, vec![Cut::new("P1", 1.5, 1)], 0.5).unwrap();
        let weights = FitnessWeights::default();
        let demand_one = vec![PieceDemand::new("P1", 1.5, 1)];
        let fitness_scrap = fitness(&Chromosome::new(vec![on_scrap]), &demand_one, &weights);
        let fitness_standard = fitness(&Chromosome::new(vec![on_standard]), &demand_one, &weights);
        assert!(fitness_scrap < fitness_standard);
    }
}
