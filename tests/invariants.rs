//! Universal invariants, round-trip/idempotence properties, and boundary
//! behaviors from spec §8, exercised through the public API.
use rebar_cutting_ga::config::{CrossoverMethod, GaConfig};
use rebar_cutting_ga::crossover::{cross_pair, CrossoverDispatch};
use rebar_cutting_ga::engine;
use rebar_cutting_ga::fallback::fallback_pack;
use rebar_cutting_ga::fitness::fitness;
use rebar_cutting_ga::init::bfd;
use rebar_cutting_ga::model::chromosome::completeness;
use rebar_cutting_ga::model::{BarPool, Chromosome, PieceDemand};
use rebar_cutting_ga::mutate::mutate;
use rebar_cutting_ga::reporter::NullReporter;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn demand() -> Vec<PieceDemand> {
    vec![PieceDemand::new("P1", 2.3, 5), PieceDemand::new("P2", 1.1, 7)]
}

fn pool() -> BarPool {
    BarPool::new(vec![6.0, 9.0], vec![2.5])
}

/// For every pattern produced by any operator, cuts + waste == source
/// length (1e-3) and waste >= 0.
#[test]
fn every_pattern_from_every_operator_satisfies_the_length_identity() {
    let chromosomes = vec![
        bfd(&demand(), &pool(), 0.5),
        fallback_pack(&demand(), &pool(), 0.5),
        {
            let mut reporter = NullReporter;
            let config = GaConfig {
                population_size: 10,
                max_generations: 10,
                seed: Some(1),
                ..GaConfig::default()
            };
            engine::run(&demand(), &pool(), &config, &mut reporter).unwrap().chromosome
        },
    ];

    for chromosome in &chromosomes {
        for pattern in &chromosome.patterns {
            let used: f64 = pattern.cuts.iter().map(|c| c.piece_length * c.count_in_pattern as f64).sum();
            assert!((used + pattern.waste() - pattern.source_length).abs() < 1e-3);
            assert!(pattern.waste() >= -1e-9);
        }
    }
}

/// Fitness is deterministic: two evaluations of the same chromosome with
/// the same weights return identical values.
#[test]
fn fitness_is_deterministic_across_repeated_evaluation() {
    let chromosome = bfd(&demand(), &pool(), 0.5);
    let weights = GaConfig::default().fitness_weights;
    let a = fitness(&chromosome, &demand(), &weights);
    let b = fitness(&chromosome, &demand(), &weights);
    assert_eq!(a, b);
}

/// Running BFD twice on the same expanded piece list yields identical
/// patterns (no hidden nondeterminism in the heuristic).
#[test]
fn bfd_is_idempotent_on_the_same_input() {
    let a = bfd(&demand(), &pool(), 0.5);
    let b = bfd(&demand(), &pool(), 0.5);
    assert_eq!(a, b);
}

/// Mutation with p_mut_ind = 0 returns the input chromosome unchanged.
#[test]
fn mutation_with_zero_probability_is_the_identity() {
    let chromosome = bfd(&demand(), &pool(), 0.5);
    let mut rng = SmallRng::seed_from_u64(7);
    let config = GaConfig::default();
    let mutated = mutate(
        &chromosome,
        &demand(),
        &pool(),
        0.0,
        config.p_mut_gene,
        &config.mutation_ops,
        0.5,
        &mut rng,
    );
    assert_eq!(chromosome, mutated);
}

/// Crossover with p_cross = 0 returns clones of the parents.
#[test]
fn crossover_with_zero_probability_returns_clones() {
    let parent_a = bfd(&demand(), &pool(), 0.5);
    let parent_b = fallback_pack(&demand(), &pool(), 0.5);
    let mut rng = SmallRng::seed_from_u64(3);
    let dispatch = CrossoverDispatch { method: CrossoverMethod::OnePoint };
    let (child_a, child_b) = cross_pair(&dispatch, &parent_a, &parent_b, 0.0, false, None, 0.5, &mut rng);
    assert_eq!(child_a, parent_a);
    assert_eq!(child_b, parent_b);
}

/// Serializing a chromosome's summary and reconstructing patterns from it
/// yields a chromosome whose summary equals the original's (round-trip
/// through the demand-shaped view that crossover's repair step and
/// mutation's reoptimize both rely on).
#[test]
fn summary_round_trips_through_demand_reconstruction() {
    let chromosome = bfd(&demand(), &pool(), 0.5);
    let summary = chromosome.summary();

    let reconstructed_demand: Vec<PieceDemand> = summary
        .iter()
        .map(|((order_id, length), count)| PieceDemand::new(order_id.clone(), length.into_inner(), *count))
        .collect();
    let rebuilt = bfd(&reconstructed_demand, &pool(), 0.5);

    assert_eq!(chromosome.summary(), rebuilt.summary());
}

/// Empty demand: the engine reports it as an error the driver treats as a
/// no-op (spec §7); no panics, no patterns.
#[test]
fn empty_demand_produces_no_patterns_and_no_panic() {
    let chromosome = Chromosome::empty();
    assert!(chromosome.is_empty());
    assert!(chromosome.reusable_scraps().is_empty());

    let mut reporter = NullReporter;
    let config = GaConfig::default();
    let result = engine::run(&[], &pool(), &config, &mut reporter);
    assert!(result.is_err());
}

/// A single piece longer than every stock length: the fallback records it
/// as unplaced rather than panicking, and completeness shows it missing.
#[test]
fn oversized_piece_is_recorded_as_missing_not_a_panic() {
    let demand = vec![PieceDemand::new("P1", 15.0, 1)];
    let pool = BarPool::new(vec![6.0, 9.0], vec![]);
    let chromosome = fallback_pack(&demand, &pool, 0.5);
    let report = completeness(&chromosome, &demand);
    assert!(!report.is_complete());
    assert_eq!(report.missing_length(), 15.0);
}

/// A population of identical individuals: roulette degrades to uniform
/// sampling (never panics on a zero-spread fitness vector), and
/// tournament still completes.
#[test]
fn uniform_fitness_population_does_not_break_selection() {
    use rebar_cutting_ga::select::{Elitist, Roulette, Scored, Select, Tournament};

    let chromosome = bfd(&demand(), &pool(), 0.5);
    let population = vec![chromosome.clone(), chromosome.clone(), chromosome.clone()];
    let scored: Vec<Scored<'_>> = population
        .iter()
        .enumerate()
        .map(|(index, c)| Scored { chromosome: c, fitness: 100.0, index })
        .collect();
    let mut rng = SmallRng::seed_from_u64(9);

    let roulette_picks = Roulette.select(&scored, 5, &mut rng);
    assert_eq!(roulette_picks.len(), 5);

    let tournament_picks = Tournament { tournament_size: 2 }.select(&scored, 5, &mut rng);
    assert_eq!(tournament_picks.len(), 5);

    let elite_picks = Elitist.select(&scored, 2, &mut rng);
    assert_eq!(elite_picks.len(), 2);
}
