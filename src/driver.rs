//! Sequential driver (spec §4.11): iterates diameters in first-seen order
//! and, within each, execution groups ascending, threading leftover
//! off-cuts ("desperdicios") forward. Owns the per-diameter `carry_scrap`
//! list exclusively (spec §5) — no other component reaches into it.
//!
//! Grounded in `examples/original_source/genetic_algorithm/*` 's top-level
//! orchestration loop (the Python `procesar_cartilla` driver that calls the
//! GA once per `(diametro, grupo)` and threads `desperdicios_disponibles`
//! forward), reshaped into the teacher crate's plain sequential `call`
//! loop style (no async, no threads — spec §5 confines concurrency to
//! "one task per (diameter, group)" at most, which this single-threaded
//! driver leaves to an external caller to parallelize if it chooses).
use crate::config::GaConfig;
use crate::engine::{self, EngineOutput};
use crate::errors::EngineError;
use crate::fallback::fallback_pack;
use crate::fitness::fitness;
use crate::model::chromosome::completeness;
use crate::model::piece::unfit_pieces;
use crate::model::{BarKind, BarPool, Chromosome, Diameter, OrderId, PieceDemand};
use crate::reporter::NullReporter;
use rustc_hash::FxHashMap;

/// One cleaned demand row carrying the `(diameter, execution_group)`
/// fields the driver slices on (spec §6 "Demand input"). Produced by
/// [`crate::adapter::clean_cartilla_rows`]; the driver itself performs no
/// further type coercion.
#[derive(Clone, Debug, PartialEq)]
pub struct CartillaRow {
    pub order_id: OrderId,
    pub diameter: Diameter,
    pub piece_length: f64,
    pub required_count: i64,
    pub execution_group: i64,
}

/// Mapping from diameter label to its commercial STANDARD stock lengths
/// (spec §6 "Stock catalog").
pub type StockCatalog = FxHashMap<Diameter, Vec<f64>>;

/// Outcome of solving one `(diameter, execution_group)` sub-problem.
#[derive(Clone, Debug)]
pub struct SubproblemOutcome {
    pub chromosome: Chromosome,
    /// Reusable off-cuts this sub-problem produced, consolidated and
    /// sorted descending (spec §4.11's consolidation rule), *before*
    /// being merged with unconsumed inherited scrap by the driver.
    pub new_scrap: Vec<f64>,
    pub fitness: f64,
    pub used_fallback: bool,
}

impl SubproblemOutcome {
    fn empty() -> Self {
        Self {
            chromosome: Chromosome::empty(),
            new_scrap: Vec::new(),
            fitness: 0.0,
            used_fallback: false,
        }
    }
}

/// One driver record: a sub-problem's identity plus its outcome.
#[derive(Clone, Debug)]
pub struct DriverRecord {
    pub diameter: Diameter,
    pub execution_group: i64,
    pub outcome: SubproblemOutcome,
}

/// The collaborator the driver asks to solve each sub-problem. Production
/// code always uses [`GaEngineSolver`]; tests substitute a double that
/// returns [`EngineError::EngineFailure`] to exercise the fallback path
/// (spec §8 scenario 4) without needing to actually corrupt GA internals.
pub trait SubproblemSolver {
    fn solve(&self, demand: &[PieceDemand], pool: &BarPool, config: &GaConfig) -> Result<EngineOutput, EngineError>;
}

/// Default solver: runs the GA engine with a no-op reporter.
#[derive(Clone, Copy, Debug, Default)]
pub struct GaEngineSolver;

impl SubproblemSolver for GaEngineSolver {
    fn solve(&self, demand: &[PieceDemand], pool: &BarPool, config: &GaConfig) -> Result<EngineOutput, EngineError> {
        let mut reporter = NullReporter;
        engine::run(demand, pool, config, &mut reporter)
    }
}

/// Tolerance for deduplicating off-cuts carried between groups (spec §4.11
/// consolidation rule, `tau = 0.01 m`).
const SCRAP_DEDUPE_TOLERANCE: f64 = 0.01;

/// Drops off-cuts below `min_reusable`, then deduplicates entries within
/// [`SCRAP_DEDUPE_TOLERANCE`] keeping the first encountered once sorted
/// descending (spec §4.11).
fn consolidate_scrap(mut lengths: Vec<f64>, min_reusable: f64) -> Vec<f64> {
    lengths.retain(|&l| l >= min_reusable - crate::model::FLOAT_TOLERANCE);
    lengths.sort_by(|a, b| b.partial_cmp(a).unwrap());
    let mut out: Vec<f64> = Vec::with_capacity(lengths.len());
    for length in lengths {
        if !out.iter().any(|&kept| (kept - length).abs() <= SCRAP_DEDUPE_TOLERANCE) {
            out.push(length);
        }
    }
    out
}

/// Removes one matching entry from `available` per entry in `consumed`
/// (multiset subtraction), leaving whatever scrap the winning chromosome
/// didn't actually use as a source — it stays eligible for later groups
/// (spec §3: "SCRAP bars consumed as source... are removed from the
/// inventory that is passed forward").
fn subtract_consumed_scrap(available: &[f64], consumed: &[f64]) -> Vec<f64> {
    let mut remaining = available.to_vec();
    for &used in consumed {
        if let Some(position) = remaining.iter().position(|&a| (a - used).abs() <= crate::model::FLOAT_TOLERANCE) {
            remaining.remove(position);
        }
    }
    remaining
}

/// Solves one sub-problem: runs `solver`, falling back to the
/// deterministic packer (spec §4.10) on [`EngineError::EngineFailure`] (or
/// any other engine error, treated the same way — the driver never aborts
/// the overall run because one sub-problem failed, spec §7).
fn solve_subproblem(solver: &dyn SubproblemSolver, demand: &[PieceDemand], pool: &BarPool, config: &GaConfig) -> SubproblemOutcome {
    for error in unfit_pieces(demand, pool) {
        log::warn!("{error}");
    }

    let (chromosome, used_fallback) = match solver.solve(demand, pool, config) {
        Ok(output) => (output.chromosome, false),
        Err(error) => {
            log::warn!("engine failed ({error}); falling back to deterministic packer");
            (fallback_pack(demand, pool, config.min_reusable), true)
        }
    };

    let report = completeness(&chromosome, demand);
    if !report.is_complete() {
        log::warn!(
            "{} demanded piece kind(s) remain unplaced after solving sub-problem",
            report.missing.len()
        );
    }

    let fitness_value = fitness(&chromosome, demand, &config.fitness_weights);
    let new_scrap = consolidate_scrap(chromosome.reusable_scraps(), config.min_reusable);

    SubproblemOutcome {
        chromosome,
        new_scrap,
        fitness: fitness_value,
        used_fallback,
    }
}

/// Runs every `(diameter, execution_group)` sub-problem in a cartilla with
/// the default [`GaEngineSolver`] (spec §4.11).
pub fn run_cartilla(rows: &[CartillaRow], catalog: &StockCatalog, config: &GaConfig) -> Vec<DriverRecord> {
    run_cartilla_with(&GaEngineSolver, rows, catalog, config)
}

/// Same as [`run_cartilla`] but with an injectable [`SubproblemSolver`],
/// letting tests exercise the fallback path deterministically (spec §8
/// scenario 4).
pub fn run_cartilla_with(solver: &dyn SubproblemSolver, rows: &[CartillaRow], catalog: &StockCatalog, config: &GaConfig) -> Vec<DriverRecord> {
    let mut records = Vec::new();

    let mut diameters: Vec<Diameter> = Vec::new();
    for row in rows {
        if !diameters.contains(&row.diameter) {
            diameters.push(row.diameter.clone());
        }
    }

    for diameter in diameters {
        let Some(standard_lengths) = catalog.get(&diameter) else {
            log::warn!("diameter {diameter} absent from stock catalog; skipping its sub-problems");
            continue;
        };

        let mut groups: Vec<i64> = rows.iter().filter(|r| r.diameter == diameter).map(|r| r.execution_group).collect();
        groups.sort_unstable();
        groups.dedup();

        let mut carry_scrap: Vec<f64> = Vec::new();

        for group in groups {
            let demand_rows: Vec<PieceDemand> = rows
                .iter()
                .filter(|r| r.diameter == diameter && r.execution_group == group)
                .map(|r| PieceDemand::new(r.order_id.clone(), r.piece_length, r.required_count as u64))
                .collect();
            let demand = PieceDemand::normalize(demand_rows);

            if demand.is_empty() {
                // spec §7: DemandEmpty is a no-op, not an error.
                records.push(DriverRecord {
                    diameter: diameter.clone(),
                    execution_group: group,
                    outcome: SubproblemOutcome::empty(),
                });
                continue;
            }

            let pool = BarPool::new(standard_lengths.clone(), carry_scrap.clone());
            let outcome = solve_subproblem(solver, &demand, &pool, config);

            let consumed_scrap: Vec<f64> = outcome
                .chromosome
                .patterns
                .iter()
                .filter(|p| matches!(p.source_kind, BarKind::Scrap))
                .map(|p| p.source_length)
                .collect();
            let mut next_scrap = subtract_consumed_scrap(&carry_scrap, &consumed_scrap);
            next_scrap.extend(outcome.new_scrap.iter().copied());
            carry_scrap = consolidate_scrap(next_scrap, config.min_reusable);

            records.push(DriverRecord {
                diameter: diameter.clone(),
                execution_group: group,
                outcome,
            });
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(order_id: &str, diameter: &str, length: f64, count: i64, group: i64) -> CartillaRow {
        CartillaRow {
            order_id: order_id.to_string(),
            diameter: diameter.to_string(),
            piece_length: length,
            required_count: count,
            execution_group: group,
        }
    }

    #[test]
    fn skips_diameter_absent_from_catalog() {
        let rows = vec![row("P1", "#5", 1.5, 3, 1)];
        let catalog = StockCatalog::default();
        let config = GaConfig::default();
        let records = run_cartilla(&rows, &catalog, &config);
        assert!(records.is_empty());
    }

    #[test]
    fn empty_demand_group_produces_empty_no_error_record() {
        let rows = vec![row("P1", "#4", 0.0, 0, 1)];
        let mut catalog = StockCatalog::default();
        catalog.insert("#4".to_string(), vec![6.0]);
        let config = GaConfig::default();
        let records = run_cartilla(&rows, &catalog, &config);
        assert_eq!(records.len(), 1);
        assert!(records[0].outcome.chromosome.is_empty());
    }

    /// spec §8 scenario 5: scrap flows forward only, never backward.
    #[test]
    fn scrap_flows_forward_not_backward() {
        let rows = vec![
            row("A", "#4", 3.5, 1, 1),
            row("B", "#4", 4.2, 1, 1),
            row("C", "#4", 1.7, 1, 2),
        ];
        let mut catalog = StockCatalog::default();
        catalog.insert("#4".to_string(), vec![6.0]);
        let config = GaConfig {
            population_size: 10,
            max_generations: 15,
            seed: Some(11),
            ..GaConfig::default()
        };
        let records = run_cartilla(&rows, &catalog, &config);
        assert_eq!(records.len(), 2);
        let group1_scrap_used = records[0]
            .outcome
            .chromosome
            .patterns
            .iter()
            .filter(|p| matches!(p.source_kind, BarKind::Scrap))
            .count();
        assert_eq!(group1_scrap_used, 0, "group 1 runs first and has no scrap available yet");
    }

    struct AlwaysFails;
    impl SubproblemSolver for AlwaysFails {
        fn solve(&self, _demand: &[PieceDemand], _pool: &BarPool, _config: &GaConfig) -> Result<EngineOutput, EngineError> {
            Err(EngineError::EngineFailure("test double forcing fallback".to_string()))
        }
    }

    /// spec §8 scenario 4: a failing engine still yields full coverage via
    /// the deterministic FFD fallback.
    #[test]
    fn engine_failure_falls_back_to_deterministic_packer() {
        let rows = vec![row("P1", "#5", 2.0, 4, 1), row("P2", "#5", 1.0, 2, 1)];
        let mut catalog = StockCatalog::default();
        catalog.insert("#5".to_string(), vec![6.0]);
        let config = GaConfig::default();
        let records = run_cartilla_with(&AlwaysFails, &rows, &catalog, &config);
        assert_eq!(records.len(), 1);
        assert!(records[0].outcome.used_fallback);
        let demand = PieceDemand::normalize(vec![
            PieceDemand::new("P1", 2.0, 4),
            PieceDemand::new("P2", 1.0, 2),
        ]);
        assert!(completeness(&records[0].outcome.chromosome, &demand).is_complete());
    }
}
