//! Engine configuration (spec §6). The variant set for initialization
//! strategies, selection methods, crossover schemes and mutation operations
//! is closed and finite; each is represented as a tagged enum rather than
//! open polymorphism, matching the teacher crate's dispatch-wrapper
//! convention (`compete::dispatch`, `crossover::dispatch`, `mutate::dispatch`).
use crate::errors::TryFromConfigBuilderError;
use crate::model::pattern::DEFAULT_MIN_REUSABLE;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InitStrategy {
    Heuristic,
    Random,
    #[default]
    Hybrid,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SelectionMethod {
    #[default]
    Tournament,
    Roulette,
    Elitist,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum CrossoverMethod {
    #[default]
    OnePoint,
    TwoPoint,
    PieceAware,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MutationOp {
    ChangeSource,
    Reoptimize,
    MovePiece,
    AdjustCount,
    Split,
    Merge,
}

impl MutationOp {
    pub const PER_PATTERN: [MutationOp; 3] = [
        MutationOp::ChangeSource,
        MutationOp::Reoptimize,
        MutationOp::MovePiece,
    ];
    pub const CHROMOSOME_LEVEL: [MutationOp; 3] =
        [MutationOp::AdjustCount, MutationOp::Split, MutationOp::Merge];

    pub fn default_set() -> Vec<MutationOp> {
        Self::PER_PATTERN.to_vec()
    }
}

/// Weighted fitness components (spec §4.4). The large separation between
/// `missing` and `waste` guarantees any infeasible chromosome is dominated
/// by any feasible one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FitnessWeights {
    pub waste: f64,
    pub missing: f64,
    pub surplus: f64,
    pub bars: f64,
    pub reuse: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            waste: 10.0,
            missing: 10_000.0,
            surplus: 5_000.0,
            bars: 50.0,
            reuse: 30.0,
        }
    }
}

/// Full engine configuration. Built via [`GaConfigBuilder`] or one of the
/// named presets ([`GaConfig::fast`], [`GaConfig::balanced`],
/// [`GaConfig::intensive`]).
#[derive(Clone, Debug, PartialEq)]
pub struct GaConfig {
    pub population_size: usize,
    pub max_generations: usize,
    pub init_strategy: InitStrategy,
    pub heuristic_ratio: f64,
    pub selection: SelectionMethod,
    pub tournament_size: usize,
    pub p_cross: f64,
    pub crossover: CrossoverMethod,
    pub p_mut_ind: f64,
    pub p_mut_gene: f64,
    pub mutation_ops: Vec<MutationOp>,
    pub elitism: bool,
    pub elite_size: usize,
    pub convergence_window: usize,
    pub time_limit_seconds: f64,
    pub target_fitness: Option<f64>,
    pub repair_children: bool,
    pub seed: Option<u64>,
    pub fitness_weights: FitnessWeights,
    pub min_reusable: f64,
    pub homogeneous_threshold: u64,
    pub multithreading: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            max_generations: 50,
            init_strategy: InitStrategy::default(),
            heuristic_ratio: 0.6,
            selection: SelectionMethod::default(),
            tournament_size: 3,
            p_cross: 0.8,
            crossover: CrossoverMethod::default(),
            p_mut_ind: 0.2,
            p_mut_gene: 0.1,
            mutation_ops: MutationOp::default_set(),
            elitism: true,
            elite_size: 2,
            convergence_window: 20,
            time_limit_seconds: 300.0,
            target_fitness: None,
            repair_children: true,
            seed: None,
            fitness_weights: FitnessWeights::default(),
            min_reusable: DEFAULT_MIN_REUSABLE,
            homogeneous_threshold: 10,
            multithreading: false,
        }
    }
}

impl GaConfig {
    pub fn builder() -> GaConfigBuilder {
        GaConfigBuilder::new()
    }

    /// Quick, low-fidelity search for interactive use.
    pub fn fast() -> Self {
        Self {
            population_size: 20,
            max_generations: 25,
            time_limit_seconds: 30.0,
            convergence_window: 8,
            ..Self::default()
        }
    }

    /// The defaults, named for symmetry with [`GaConfig::fast`]/[`GaConfig::intensive`].
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Larger population and generation budget for final, offline runs.
    pub fn intensive() -> Self {
        Self {
            population_size: 80,
            max_generations: 200,
            elite_size: 4,
            convergence_window: 40,
            time_limit_seconds: 900.0,
            ..Self::default()
        }
    }

    /// Validates the configuration, rejecting the conditions spec §7 names.
    pub fn validate(&self) -> Result<(), TryFromConfigBuilderError> {
        if self.population_size < 2 {
            return Err(TryFromConfigBuilderError("population_size must be >= 2"));
        }
        if self.max_generations < 1 {
            return Err(TryFromConfigBuilderError("max_generations must be >= 1"));
        }
        for (name, rate) in [
            ("heuristic_ratio", self.heuristic_ratio),
            ("p_cross", self.p_cross),
            ("p_mut_ind", self.p_mut_ind),
            ("p_mut_gene", self.p_mut_gene),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(match name {
                    "heuristic_ratio" => TryFromConfigBuilderError("heuristic_ratio must be in [0,1]"),
                    "p_cross" => TryFromConfigBuilderError("p_cross must be in [0,1]"),
                    "p_mut_ind" => TryFromConfigBuilderError("p_mut_ind must be in [0,1]"),
                    _ => TryFromConfigBuilderError("p_mut_gene must be in [0,1]"),
                });
            }
        }
        if self.elitism && self.elite_size >= self.population_size {
            return Err(TryFromConfigBuilderError(
                "elite_size must be < population_size when elitism is enabled",
            ));
        }
        if self.elitism && self.elite_size < 1 {
            return Err(TryFromConfigBuilderError(
                "elite_size must be >= 1 when elitism is enabled",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for GaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ga_config:")?;
        writeln!(f, "  population_size: {}", self.population_size)?;
        writeln!(f, "  max_generations: {}", self.max_generations)?;
        writeln!(f, "  init_strategy: {:?}", self.init_strategy)?;
        writeln!(f, "  selection: {:?}", self.selection)?;
        writeln!(f, "  crossover: {:?}", self.crossover)?;
        write!(f, "  elitism: {} (size {})", self.elitism, self.elite_size)
    }
}

/// Builder for [`GaConfig`], following the teacher crate's `with_*` /
/// `build()` convention (`strategy::evolve::EvolveBuilder`).
#[derive(Clone, Debug, Default)]
pub struct GaConfigBuilder {
    config: GaConfig,
}

macro_rules! with_field {
    ($name:ident, $ty:ty) => {
        pub fn $name(mut self, value: $ty) -> Self {
            self.config.$name = value;
            self
        }
    };
}

impl GaConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GaConfig::default(),
        }
    }

    with_field!(population_size, usize);
    with_field!(max_generations, usize);
    with_field!(init_strategy, InitStrategy);
    with_field!(heuristic_ratio, f64);
    with_field!(selection, SelectionMethod);
    with_field!(tournament_size, usize);
    with_field!(p_cross, f64);
    with_field!(crossover, CrossoverMethod);
    with_field!(p_mut_ind, f64);
    with_field!(p_mut_gene, f64);
    with_field!(mutation_ops, Vec<MutationOp>);
    with_field!(elitism, bool);
    with_field!(elite_size, usize);
    with_field!(convergence_window, usize);
    with_field!(time_limit_seconds, f64);
    with_field!(repair_children, bool);
    with_field!(fitness_weights, FitnessWeights);
    with_field!(min_reusable, f64);
    with_field!(homogeneous_threshold, u64);
    with_field!(multithreading, bool);

    pub fn target_fitness(mut self, value: f64) -> Self {
        self.config.target_fitness = Some(value);
        self
    }

    pub fn seed(mut self, value: u64) -> Self {
        self.config.seed = Some(value);
        self
    }

    pub fn build(self) -> Result<GaConfig, TryFromConfigBuilderError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
