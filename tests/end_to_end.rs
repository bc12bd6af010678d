//! Black-box scenarios from spec §8, exercised through the public driver
//! and engine API only (no access to crate internals).
use rebar_cutting_ga::config::GaConfig;
use rebar_cutting_ga::driver::{run_cartilla, run_cartilla_with, CartillaRow, StockCatalog, SubproblemSolver};
use rebar_cutting_ga::engine::{self, EngineOutput};
use rebar_cutting_ga::errors::EngineError;
use rebar_cutting_ga::model::chromosome::completeness;
use rebar_cutting_ga::model::{BarKind, BarPool, PieceDemand};
use rebar_cutting_ga::reporter::NullReporter;

fn row(order_id: &str, diameter: &str, length: f64, count: i64, group: i64) -> CartillaRow {
    CartillaRow {
        order_id: order_id.to_string(),
        diameter: diameter.to_string(),
        piece_length: length,
        required_count: count,
        execution_group: group,
    }
}

/// Scenario 1: homogeneous dominant case, analyzer must fire and reach
/// the known optimum of 42 bars / 5.28m waste.
#[test]
fn homogeneous_dominant_case_reaches_known_optimum() {
    let demand = vec![PieceDemand::new("P1", 1.08, 459)];
    let pool = BarPool::new(vec![6.0, 9.0, 12.0], vec![]);
    let config = GaConfig::default();
    let mut reporter = NullReporter;

    let output = engine::run(&demand, &pool, &config, &mut reporter).unwrap();

    assert!(completeness(&output.chromosome, &demand).is_complete());
    assert!((output.chromosome.total_waste() - 5.28).abs() < 1e-6);
    assert_eq!(output.chromosome.len(), 42);
}

/// Scenario 2: small mixed demand with scrap available must be covered
/// exactly, with no piece assigned to a bar shorter than itself.
#[test]
fn small_mixed_demand_is_covered_exactly_with_no_oversized_assignment() {
    let demand = vec![
        PieceDemand::new("P001", 2.5, 3),
        PieceDemand::new("P002", 1.8, 2),
        PieceDemand::new("P003", 3.2, 1),
        PieceDemand::new("P004", 1.5, 4),
    ];
    let pool = BarPool::new(vec![6.0, 4.0, 8.0], vec![2.8, 1.9]);
    let config = GaConfig {
        population_size: 16,
        max_generations: 20,
        seed: Some(42),
        ..GaConfig::default()
    };
    let mut reporter = NullReporter;

    let output = engine::run(&demand, &pool, &config, &mut reporter).unwrap();
    let report = completeness(&output.chromosome, &demand);
    assert!(report.is_exact(), "missing={:?} surplus={:?}", report.missing, report.surplus);

    for pattern in &output.chromosome.patterns {
        for cut in &pattern.cuts {
            assert!(cut.piece_length <= pattern.source_length + 1e-6);
        }
    }
}

/// Scenario 3: scrap reuse precedence — a single piece that fits a scrap
/// off-cut must be sourced from it, not from a standard bar.
#[test]
fn scrap_is_preferred_over_standard_when_it_fits() {
    let demand = vec![PieceDemand::new("P1", 1.5, 1)];
    let pool = BarPool::new(vec![6.0], vec![2.0]);
    let config = GaConfig {
        population_size: 12,
        max_generations: 25,
        seed: Some(5),
        ..GaConfig::default()
    };
    let mut reporter = NullReporter;

    let output = engine::run(&demand, &pool, &config, &mut reporter).unwrap();

    assert_eq!(output.chromosome.len(), 1);
    assert_eq!(output.chromosome.patterns[0].source_kind, BarKind::Scrap);
    assert!((output.chromosome.total_waste() - 0.5).abs() < 1e-6);
    assert_eq!(output.chromosome.scrap_used(), 1);
}

struct CorruptedDouble;
impl SubproblemSolver for CorruptedDouble {
    fn solve(&self, _demand: &[PieceDemand], _pool: &BarPool, _config: &GaConfig) -> Result<EngineOutput, EngineError> {
        Err(EngineError::EngineFailure("corrupted internal state (test double)".to_string()))
    }
}

/// Scenario 4: when the engine fails, the driver still returns full
/// coverage produced by the deterministic FFD fallback.
#[test]
fn fallback_covers_every_piece_when_engine_fails() {
    let rows = vec![row("P1", "#4", 2.0, 6, 1), row("P2", "#4", 1.2, 3, 1)];
    let mut catalog = StockCatalog::default();
    catalog.insert("#4".to_string(), vec![6.0]);
    let config = GaConfig::default();

    let records = run_cartilla_with(&CorruptedDouble, &rows, &catalog, &config);

    assert_eq!(records.len(), 1);
    assert!(records[0].outcome.used_fallback);
    let demand = PieceDemand::normalize(vec![PieceDemand::new("P1", 2.0, 6), PieceDemand::new("P2", 1.2, 3)]);
    assert!(completeness(&records[0].outcome.chromosome, &demand).is_complete());
}

/// Scenario 5: off-cuts flow forward only. Group 2 may use group 1's
/// scrap; re-running with groups reversed (group 2 processed first within
/// its own run) must not let an earlier-processed group see later scrap.
#[test]
fn scrap_flows_forward_only_between_execution_groups() {
    let mut catalog = StockCatalog::default();
    catalog.insert("D".to_string(), vec![6.0]);
    let config = GaConfig {
        population_size: 14,
        max_generations: 25,
        seed: Some(13),
        ..GaConfig::default()
    };

    // group 1 then group 2, ascending (the only order the driver supports).
    let forward_rows = vec![
        row("A", "D", 3.4, 1, 1),
        row("B", "D", 4.1, 1, 1),
        row("C", "D", 1.7, 1, 2),
    ];
    let forward = run_cartilla(&forward_rows, &catalog, &config);
    assert_eq!(forward.len(), 2);

    // Group 1 runs first in both cases and therefore never has any scrap
    // available, regardless of what group 2 would have produced.
    let group1_scrap_used = forward[0]
        .outcome
        .chromosome
        .patterns
        .iter()
        .filter(|p| p.source_kind == BarKind::Scrap)
        .count();
    assert_eq!(group1_scrap_used, 0);
}

/// Scenario 6: an impossible-to-cover piece forces the missing-demand
/// penalty to dominate every returned chromosome's fitness.
#[test]
fn missing_penalty_dominates_waste_for_impossible_demand() {
    let demand = vec![PieceDemand::new("P1", 20.0, 1)];
    let pool = BarPool::new(vec![6.0, 9.0], vec![]);
    let config = GaConfig {
        population_size: 10,
        max_generations: 8,
        seed: Some(2),
        ..GaConfig::default()
    };
    let mut reporter = NullReporter;

    let output = engine::run(&demand, &pool, &config, &mut reporter).unwrap();

    assert!(output.fitness > config.fitness_weights.missing * 20.0);
    assert!(!completeness(&output.chromosome, &demand).is_complete());
}
