//! Generational GA loop, stopping criteria, and metrics recording (spec
//! §4.8, §4.9). Grounded in the teacher crate's `strategy::evolve::Evolve`
//! (`src/strategy/evolve.rs`): one `call` loop alternating
//! extension/crossover/mutate/fitness/compete, tracking `best_chromosome`
//! and checking ending conditions every generation. Unlike the teacher,
//! this engine isn't generic over a pluggable `Genotype` — the search
//! space here is fixed to cutting-stock chromosomes, so the loop is a
//! plain function rather than a generic struct.
use crate::config::GaConfig;
use crate::crossover::{cross_pair, CrossoverDispatch};
use crate::errors::EngineError;
use crate::fitness::{fitness, FitnessBreakdown};
use crate::homogeneous::analyze_homogeneous_groups;
use crate::init::{initialize_population, optimal_analysis_seed};
use crate::model::piece::{total_required_count, unfit_pieces};
use crate::model::{BarPool, Chromosome, PieceDemand};
use crate::mutate::mutate as apply_mutation;
use crate::reporter::{has_converged, GenerationStats, Reporter};
use crate::select::{Elitist, Scored, Select, SelectDispatch};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// What one call to [`run`] produces: the best chromosome found, its
/// fitness (broken down for diagnostics), and run metadata.
#[derive(Clone, Debug)]
pub struct EngineOutput {
    pub chromosome: Chromosome,
    pub fitness: f64,
    pub breakdown: FitnessBreakdown,
    pub generations_run: usize,
    /// True when the run ended via no-improvement convergence rather than
    /// generation/time/target exhaustion (spec §4.9).
    pub converged: bool,
}

/// Recognizes the homogeneous sub-case (spec §4.2, §4.8: "the engine must
/// also recognize and solve optimally the frequent homogeneous sub-case")
/// and short-circuits the GA entirely when the *whole* sub-problem demand
/// collapses to one length above `homogeneous_threshold`. A demand mixing
/// a dominant length with a handful of other lengths still goes through
/// the full GA — only a fully homogeneous sub-problem qualifies.
fn homogeneous_shortcut(demand: &[PieceDemand], pool: &BarPool, config: &GaConfig) -> Option<Chromosome> {
    let groups = analyze_homogeneous_groups(demand, &pool.standard_lengths, config.homogeneous_threshold);
    if groups.len() != 1 {
        return None;
    }
    let (_, group_count, _) = &groups[0];
    if *group_count != total_required_count(demand) {
        return None;
    }
    Some(optimal_analysis_seed(demand, pool, config.homogeneous_threshold, config.min_reusable))
}

/// Runs the genetic algorithm to completion for a single sub-problem
/// (spec §4.8). Returns [`EngineError::ConfigInvalid`] before the first
/// generation if `config` fails validation, and
/// [`EngineError::DemandEmpty`] immediately if `demand` is empty — callers
/// (the driver) treat the latter as a no-op rather than a failure.
pub fn run(demand: &[PieceDemand], pool: &BarPool, config: &GaConfig, reporter: &mut impl Reporter) -> Result<EngineOutput, EngineError> {
    config
        .validate()
        .map_err(|e| EngineError::ConfigInvalid(e.to_string()))?;
    if demand.is_empty() {
        return Err(EngineError::DemandEmpty);
    }
    for error in unfit_pieces(demand, pool) {
        log::warn!("{error}");
    }

    if let Some(chromosome) = homogeneous_shortcut(demand, pool, config) {
        let breakdown = FitnessBreakdown::of(&chromosome, demand, &config.fitness_weights);
        return Ok(EngineOutput {
            chromosome,
            fitness: breakdown.total,
            breakdown,
            generations_run: 0,
            converged: true,
        });
    }

    let mut rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let mut population = initialize_population(
        config.population_size,
        demand,
        pool,
        config.init_strategy,
        config.heuristic_ratio,
        config.homogeneous_threshold,
        config.min_reusable,
        &mut rng,
    );

    let select_dispatch = SelectDispatch {
        method: config.selection,
        tournament_size: config.tournament_size,
    };
    let crossover_dispatch = CrossoverDispatch { method: config.crossover };

    let start = Instant::now();
    let mut best: Option<(Chromosome, f64)> = None;
    let mut best_history: Vec<f64> = Vec::new();
    let mut generation = 0usize;
    let mut converged = false;

    loop {
        generation += 1;

        let fitness_values: Vec<f64> = evaluate_population(&population, demand, config);

        let scored: Vec<Scored<'_>> = population
            .iter()
            .zip(fitness_values.iter())
            .enumerate()
            .map(|(index, (chromosome, &fitness))| Scored { chromosome, fitness, index })
            .collect();

        let (best_index, &best_fitness) = fitness_values
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.partial_cmp(b.1).unwrap().then(a.0.cmp(&b.0)))
            .expect("population is never empty");
        let mean_fitness = fitness_values.iter().sum::<f64>() / fitness_values.len() as f64;
        let worst_fitness = fitness_values.iter().cloned().fold(f64::MIN, f64::max);

        reporter.report_generation(GenerationStats {
            generation,
            best_fitness,
            mean_fitness,
            worst_fitness,
            elapsed_seconds: start.elapsed().as_secs_f64(),
        });

        let improved = best.as_ref().map_or(true, |(_, f)| best_fitness < *f - 1e-12);
        if improved {
            best = Some((population[best_index].clone(), best_fitness));
            reporter.report_new_best(generation, best_fitness);
        }
        best_history.push(best.as_ref().expect("just set above").1);

        let time_exceeded = start.elapsed().as_secs_f64() >= config.time_limit_seconds;
        let target_hit = config.target_fitness.is_some_and(|t| best_fitness <= t);
        let generations_exhausted = generation >= config.max_generations;
        let no_improvement = has_converged(&best_history, config.convergence_window, 1e-3);

        if generations_exhausted || time_exceeded || target_hit || no_improvement {
            converged = no_improvement;
            break;
        }

        population = next_generation(&scored, &population, demand, pool, config, &select_dispatch, &crossover_dispatch, &mut rng);
    }

    let (chromosome, best_fitness) = best.expect("at least one generation always runs");
    let breakdown = FitnessBreakdown::of(&chromosome, demand, &config.fitness_weights);
    Ok(EngineOutput {
        chromosome,
        fitness: best_fitness,
        breakdown,
        generations_run: generation,
        converged,
    })
}

/// Fitness is pure, so parallel evaluation only ever writes scores back in
/// place without reordering the population vector — the ordering
/// requirement of spec §5 (deterministic tie-break via population index)
/// holds regardless of `multithreading`.
fn evaluate_population(population: &[Chromosome], demand: &[PieceDemand], config: &GaConfig) -> Vec<f64> {
    if config.multithreading {
        use rayon::prelude::*;
        population.par_iter().map(|c| fitness(c, demand, &config.fitness_weights)).collect()
    } else {
        population.iter().map(|c| fitness(c, demand, &config.fitness_weights)).collect()
    }
}

/// Selection -> pairing -> crossover -> mutation -> elitism, producing the
/// next generation (spec §4.8 steps 4-6). Elites are deep-copied (plain
/// `Clone`) so later mutation of offspring can never alias or corrupt them.
#[allow(clippy::too_many_arguments)]
fn next_generation(
    scored: &[Scored<'_>],
    population: &[Chromosome],
    demand: &[PieceDemand],
    pool: &BarPool,
    config: &GaConfig,
    select_dispatch: &SelectDispatch,
    crossover_dispatch: &CrossoverDispatch,
    rng: &mut impl Rng,
) -> Vec<Chromosome> {
    let elite_count = if config.elitism { config.elite_size } else { 0 };
    let offspring_count = config.population_size - elite_count;

    let mut parents = select_dispatch.select(scored, offspring_count, rng);
    parents.shuffle(rng);

    let mut offspring: Vec<Chromosome> = Vec::with_capacity(offspring_count);
    for pair in parents.chunks(2) {
        if pair.len() == 2 {
            let (child_a, child_b) = cross_pair(
                crossover_dispatch,
                &pair[0],
                &pair[1],
                config.p_cross,
                config.repair_children,
                Some(pool),
                config.min_reusable,
                rng,
            );
            offspring.push(child_a);
            offspring.push(child_b);
        } else {
            // Odd population: the unpaired parent is cloned directly into
            // the next generation (spec §4.5's pairing rule).
            offspring.push(pair[0].clone());
        }
    }
    offspring.truncate(offspring_count);
    while offspring.len() < offspring_count {
        // Selection yielded fewer parents than needed (degenerate
        // population sizes): clone survivors to fill out the generation
        // rather than shrink it (spec §4.8 step 5).
        let filler = population[rng.gen_range(0..population.len())].clone();
        offspring.push(filler);
    }

    let mutated: Vec<Chromosome> = offspring
        .iter()
        .map(|child| {
            apply_mutation(
                child,
                demand,
                pool,
                config.p_mut_ind,
                config.p_mut_gene,
                &config.mutation_ops,
                config.min_reusable,
                rng,
            )
        })
        .collect();

    let mut next = if elite_count > 0 {
        Elitist.select(scored, elite_count, rng)
    } else {
        Vec::new()
    };
    next.extend(mutated);
    next.truncate(config.population_size);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::NullReporter;

    fn pool() -> BarPool {
        BarPool::new(vec![6.0, 9.0, 12.0], vec![])
    }

    #[test]
    fn rejects_invalid_config_before_first_generation() {
        let demand = vec![PieceDemand::new("P1", 2.0, 3)];
        let config = GaConfig {
            population_size: 1,
            ..GaConfig::default()
        };
        let mut reporter = NullReporter;
        let result = run(&demand, &pool(), &config, &mut reporter);
        assert!(matches!(result, Err(EngineError::ConfigInvalid(_))));
    }

    #[test]
    fn empty_demand_is_an_error_the_driver_treats_as_no_op() {
        let config = GaConfig::default();
        let mut reporter = NullReporter;
        let result = run(&[], &pool(), &config, &mut reporter);
        assert!(matches!(result, Err(EngineError::DemandEmpty)));
    }

    #[test]
    fn homogeneous_dominant_case_short_circuits_without_running_generations() {
        // spec §8 scenario 1
        let demand = vec![PieceDemand::new("P1", 1.08, 459)];
        let config = GaConfig::default();
        let mut reporter = NullReporter;
        let output = run(&demand, &pool(), &config, &mut reporter).unwrap();
        assert_eq!(output.generations_run, 0);
        assert!(crate::model::chromosome::completeness(&output.chromosome, &demand).is_complete());
    }

    /// Same homogeneous case as scenario 1, but the 459 pieces are ordered
    /// under two different order ids. The shortcut must still fulfill both
    /// exactly rather than overproducing whichever order comes first.
    #[test]
    fn homogeneous_shortcut_splits_allocation_across_orders_sharing_a_length() {
        let demand = vec![PieceDemand::new("P1", 1.08, 300), PieceDemand::new("P2", 1.08, 159)];
        let config = GaConfig::default();
        let mut reporter = NullReporter;
        let output = run(&demand, &pool(), &config, &mut reporter).unwrap();
        assert_eq!(output.generations_run, 0);
        let completeness = crate::model::chromosome::completeness(&output.chromosome, &demand);
        assert!(completeness.is_exact(), "missing={:?} surplus={:?}", completeness.missing, completeness.surplus);
    }

    #[test]
    fn small_mixed_demand_is_covered_exactly() {
        // spec §8 scenario 2
        let demand = vec![
            PieceDemand::new("P001", 2.5, 3),
            PieceDemand::new("P002", 1.8, 2),
            PieceDemand::new("P003", 3.2, 1),
            PieceDemand::new("P004", 1.5, 4),
        ];
        let pool = BarPool::new(vec![6.0, 4.0, 8.0], vec![2.8, 1.9]);
        let config = GaConfig {
            population_size: 12,
            max_generations: 15,
            seed: Some(1),
            ..GaConfig::default()
        };
        let mut reporter = NullReporter;
        let output = run(&demand, &pool, &config, &mut reporter).unwrap();
        let completeness = crate::model::chromosome::completeness(&output.chromosome, &demand);
        assert!(completeness.is_exact(), "missing={:?} surplus={:?}", completeness.missing, completeness.surplus);
        for pattern in &output.chromosome.patterns {
            assert!(pattern.used_length() <= pattern.source_length + 1e-6);
        }
    }

    #[test]
    fn scrap_reuse_precedence_prefers_scrap_over_standard() {
        // spec §8 scenario 3
        let demand = vec![PieceDemand::new("P1", 1.5, 1)];
        let pool = BarPool::new(vec![6.0], vec![2.0]);
        let config = GaConfig {
            population_size: 10,
            max_generations: 20,
            seed: Some(7),
            ..GaConfig::default()
        };
        let mut reporter = NullReporter;
        let output = run(&demand, &pool, &config, &mut reporter).unwrap();
        assert_eq!(output.chromosome.scrap_used(), 1);
        assert_eq!(output.chromosome.standard_used(), 0);
        assert!((output.chromosome.total_waste() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn weight_dominance_makes_missing_demand_dominate_waste() {
        // spec §8 scenario 6
        let demand = vec![PieceDemand::new("P1", 20.0, 1)];
        let pool = BarPool::new(vec![6.0], vec![]);
        let config = GaConfig {
            population_size: 8,
            max_generations: 5,
            seed: Some(3),
            ..GaConfig::default()
        };
        let mut reporter = NullReporter;
        let output = run(&demand, &pool, &config, &mut reporter).unwrap();
        assert!(output.fitness > config.fitness_weights.missing * 20.0);
    }

    #[test]
    fn is_deterministic_for_a_fixed_seed() {
        let demand = vec![
            PieceDemand::new("P1", 2.5, 4),
            PieceDemand::new("P2", 1.3, 6),
        ];
        let pool = BarPool::new(vec![6.0, 9.0], vec![]);
        let config = GaConfig {
            population_size: 10,
            max_generations: 10,
            seed: Some(99),
            ..GaConfig::default()
        };
        let mut reporter_a = NullReporter;
        let mut reporter_b = NullReporter;
        let output_a = run(&demand, &pool, &config, &mut reporter_a).unwrap();
        let output_b = run(&demand, &pool, &config, &mut reporter_b).unwrap();
        assert_eq!(output_a.chromosome, output_b.chromosome);
        assert_eq!(output_a.fitness, output_b.fitness);
    }
}
