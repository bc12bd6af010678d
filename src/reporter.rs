//! Per-generation reporting (spec §4.8, "metrics recorder"). A passive
//! observer: it receives per-generation aggregates and never drives
//! engine behavior (spec §9). Grounded in
//! `examples/original_source/genetic_algorithm/metrics.py`'s
//! `RegistroEvolucion`, reshaped into the teacher crate's `Reporter` trait
//! (`strategy::evolve::reporter::Simple`) rather than a stateful recorder
//! object threaded by hand.
use std::fmt;

/// One generation's aggregate statistics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub worst_fitness: f64,
    pub elapsed_seconds: f64,
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation {}: best {:.3}, mean {:.3}, worst {:.3} ({:.3}s)",
            self.generation, self.best_fitness, self.mean_fitness, self.worst_fitness, self.elapsed_seconds
        )
    }
}

pub trait Reporter {
    fn report_generation(&mut self, stats: GenerationStats);
    fn report_new_best(&mut self, generation: usize, fitness: f64);
}

/// No-op reporter, the default when the caller doesn't need history.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report_generation(&mut self, _stats: GenerationStats) {}
    fn report_new_best(&mut self, _generation: usize, _fitness: f64) {}
}

/// Logs every generation at `trace` level and new bests at `debug`
/// (matching the teacher crate's periodic/new-best split), via the `log`
/// facade rather than bare `println!` (the source's `print` calls, gated
/// behind `logging_habilitado`, become structured log records here).
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report_generation(&mut self, stats: GenerationStats) {
        log::trace!("{stats}");
    }

    fn report_new_best(&mut self, generation: usize, fitness: f64) {
        log::debug!("new best - generation: {generation}, fitness: {fitness:.3}");
    }
}

/// Accumulates every generation's stats in memory, for tests and offline
/// analysis (supplements `RegistroEvolucion`'s full per-generation history,
/// which the distilled spec only mentions in passing).
#[derive(Clone, Debug, Default)]
pub struct VecReporter {
    pub generations: Vec<GenerationStats>,
    pub bests: Vec<(usize, f64)>,
}

impl Reporter for VecReporter {
    fn report_generation(&mut self, stats: GenerationStats) {
        self.generations.push(stats);
    }

    fn report_new_best(&mut self, generation: usize, fitness: f64) {
        self.bests.push((generation, fitness));
    }
}

impl VecReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full best-fitness-per-generation history, as the engine's
    /// convergence window needs (spec §4.9).
    pub fn best_fitness_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.best_fitness).collect()
    }
}

/// No-improvement convergence test over a sliding window (spec §4.9,
/// `detectar_convergencia`): true once `history` has at least `window`
/// entries and the oldest-vs-minimum improvement within the trailing
/// window falls below `threshold`.
pub fn has_converged(history: &[f64], window: usize, threshold: f64) -> bool {
    if window == 0 || history.len() < window {
        return false;
    }
    let tail = &history[history.len() - window..];
    let window_start = tail[0];
    let window_min = tail.iter().cloned().fold(f64::MAX, f64::min);
    window_start - window_min < threshold
}
