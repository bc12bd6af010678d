//! Population initializer (spec §4.3). Grounded in
//! `examples/original_source/genetic_algorithm/population.py`:
//! `generar_individuo_heuristico_ffd` -> [`ffd`], `generar_individuo_heuristico_bfd`
//! -> [`bfd`], `generar_individuo_aleatorio_con_reparacion` -> [`random_with_repair`],
//! `generar_individuo_con_analisis_optimo` -> [`optimal_analysis_seed`], and
//! `inicializar_poblacion` -> [`initialize_population`].
use crate::config::InitStrategy;
use crate::homogeneous::analyze_homogeneous_groups;
use crate::model::pattern::{make_pattern, DEFAULT_MIN_REUSABLE};
use crate::model::piece::expand_demand;
use crate::model::{Bar, BarKind, BarPool, Chromosome, Cut, OrderId, Pattern, PieceDemand};
use rand::seq::SliceRandom;
use rand::Rng;

/// A bar opened during FFD/BFD placement: its source and the cuts piled
/// onto it so far, tracked as a flat count-per-(order,length) map to avoid
/// one [`Cut`] per individual piece.
struct OpenBar {
    source_length: f64,
    source_kind: BarKind,
    residual: f64,
    cuts: Vec<(OrderId, f64, u32)>,
}

impl OpenBar {
    fn new(bar: Bar) -> Self {
        Self {
            source_length: bar.length,
            source_kind: bar.kind,
            residual: bar.length,
            cuts: Vec::new(),
        }
    }

    fn push(&mut self, order_id: &str, length: f64) {
        self.residual -= length;
        if let Some(existing) = self
            .cuts
            .iter_mut()
            .find(|(id, l, _)| id == order_id && (*l - length).abs() <= crate::model::FLOAT_TOLERANCE)
        {
            existing.2 += 1;
        } else {
            self.cuts.push((order_id.to_string(), length, 1));
        }
    }

    fn into_pattern(self, min_reusable: f64) -> Option<Pattern> {
        let cuts: Vec<Cut> = self
            .cuts
            .into_iter()
            .map(|(id, length, count)| Cut::new(id, length, count))
            .collect();
        if cuts.is_empty() {
            return None;
        }
        make_pattern(self.source_length, self.source_kind, cuts, min_reusable).ok()
    }
}

/// Sorts `demand` into individual pieces descending by length, as every
/// heuristic in this module requires (FFD/BFD placement order).
fn pieces_descending(demand: &[PieceDemand]) -> Vec<(OrderId, f64)> {
    let mut pieces = expand_demand(demand);
    pieces.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    pieces
}

/// First-Fit-Decreasing: each piece goes into the first open bar with
/// enough residual length; failing that, a new bar is opened at the
/// smallest candidate length that fits, consuming one SCRAP entry if that
/// candidate was SCRAP (spec §4.3).
pub fn ffd(demand: &[PieceDemand], pool: &BarPool, min_reusable: f64) -> Chromosome {
    place_decreasing(demand, pool, min_reusable, Fit::First)
}

/// Best-Fit-Decreasing: identical to FFD except placement prefers the open
/// bar whose residual minus the piece length is smallest (spec §4.3).
pub fn bfd(demand: &[PieceDemand], pool: &BarPool, min_reusable: f64) -> Chromosome {
    place_decreasing(demand, pool, min_reusable, Fit::Best)
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Fit {
    First,
    Best,
}

fn place_decreasing(demand: &[PieceDemand], pool: &BarPool, min_reusable: f64, fit: Fit) -> Chromosome {
    let pieces = pieces_descending(demand);
    let mut candidates = pool.candidates_scrap_first();
    let mut open: Vec<OpenBar> = Vec::new();

    for (order_id, length) in &pieces {
        let chosen = match fit {
            Fit::First => open.iter().position(|bar| bar.residual + crate::model::FLOAT_TOLERANCE >= *length),
            Fit::Best => open
                .iter()
                .enumerate()
                .filter(|(_, bar)| bar.residual + crate::model::FLOAT_TOLERANCE >= *length)
                .min_by(|(_, a), (_, b)| (a.residual - length).partial_cmp(&(b.residual - length)).unwrap())
                .map(|(i, _)| i),
        };

        if let Some(index) = chosen {
            open[index].push(order_id, *length);
            continue;
        }

        // No open bar fits: open the smallest unused candidate that does.
        let position = candidates
            .iter()
            .enumerate()
            .filter(|(_, bar)| bar.length + crate::model::FLOAT_TOLERANCE >= *length)
            .min_by(|(_, a), (_, b)| a.length.partial_cmp(&b.length).unwrap())
            .map(|(i, _)| i);

        match position {
            Some(index) => {
                let bar = candidates[index];
                if bar.is_scrap() {
                    candidates.remove(index);
                }
                let mut new_bar = OpenBar::new(bar);
                new_bar.push(order_id, *length);
                open.push(new_bar);
            }
            // Piece longer than every candidate bar: dropped here, the
            // completeness check and missing-demand penalty surface it
            // (spec §4.1, §4.4).
            None => continue,
        }
    }

    let patterns: Vec<Pattern> = open
        .into_iter()
        .filter_map(|bar| bar.into_pattern(min_reusable))
        .collect();
    Chromosome::new(patterns)
}

/// Randomly assigns each piece to a candidate bar (SCRAP entries single-use,
/// STANDARD lengths each replicated 1-5 times to bias toward spreading
/// pieces thin); unplaceable pieces fall back to the smallest STANDARD bar
/// that fits. The result is then re-packed with [`bfd`] to reclaim
/// efficiency — the "repair" step (spec §4.3).
pub fn random_with_repair(
    demand: &[PieceDemand],
    pool: &BarPool,
    min_reusable: f64,
    rng: &mut impl Rng,
) -> Chromosome {
    let mut pieces = expand_demand(demand);
    pieces.shuffle(rng);

    let mut candidates: Vec<Bar> = pool.scrap.iter().map(|&l| Bar::scrap(l)).collect();
    for &length in &pool.standard_lengths {
        let copies = rng.gen_range(1..=5);
        for _ in 0..copies {
            candidates.push(Bar::standard(length));
        }
    }
    candidates.shuffle(rng);

    let mut used_scrap = vec![false; candidates.len()];
    let mut placed: Vec<(OrderId, f64, Bar)> = Vec::with_capacity(pieces.len());

    for (order_id, length) in pieces {
        let max_attempts = candidates.len().max(1) * 2;
        let mut done = false;
        for _ in 0..max_attempts {
            if candidates.is_empty() {
                break;
            }
            let index = rng.gen_range(0..candidates.len());
            let bar = candidates[index];
            if bar.length + crate::model::FLOAT_TOLERANCE < length {
                continue;
            }
            if bar.is_scrap() {
                if used_scrap[index] {
                    continue;
                }
                used_scrap[index] = true;
            }
            placed.push((order_id.clone(), length, bar));
            done = true;
            break;
        }
        if !done {
            if let Some(bar) = pool
                .standard_lengths
                .iter()
                .filter(|&&l| l + crate::model::FLOAT_TOLERANCE >= length)
                .min_by(|a, b| a.partial_cmp(b).unwrap())
            {
                placed.push((order_id, length, Bar::standard(*bar)));
            }
        }
    }

    // Flatten back into a demand-shaped view so bfd can re-pack it; the
    // random assignment above only decided feasibility, not final patterns.
    let mut consolidated: Vec<PieceDemand> = Vec::new();
    for (order_id, length, _bar) in &placed {
        if let Some(existing) = consolidated
            .iter_mut()
            .find(|p| p.order_id == *order_id && (p.piece_length - length).abs() <= crate::model::FLOAT_TOLERANCE)
        {
            existing.required_count += 1;
        } else {
            consolidated.push(PieceDemand::new(order_id.clone(), *length, 1));
        }
    }

    bfd(&consolidated, pool, min_reusable)
}

/// Seeds a chromosome using the homogeneous analyzer's optimum where
/// demand groups reach `threshold`, falling back to [`ffd`] for whatever
/// remains (spec §4.2, §4.3).
pub fn optimal_analysis_seed(
    demand: &[PieceDemand],
    pool: &BarPool,
    threshold: u64,
    min_reusable: f64,
) -> Chromosome {
    let groups = analyze_homogeneous_groups(demand, &pool.standard_lengths, threshold);
    let mut patterns: Vec<Pattern> = Vec::new();
    let mut covered_length = std::collections::HashSet::new();

    for (piece_length, _count, solution) in &groups {
        covered_length.insert(ordered_float::OrderedFloat(*piece_length));
        let orders: Vec<&PieceDemand> = demand
            .iter()
            .filter(|p| (p.piece_length - piece_length).abs() <= crate::homogeneous::HOMOGENEITY_TOLERANCE)
            .collect();

        // Tracks how much of each order is still unallocated across every
        // bar in this group — must survive the bar loop below, since
        // `order.required_count` never decreases on its own and a length
        // shared by more than one order_id would otherwise let the first
        // order in `orders` consume every bar's capacity (spec §3, §4.2).
        let mut remaining_by_order: Vec<(OrderId, u64)> =
            orders.iter().map(|order| (order.order_id.clone(), order.required_count)).collect();

        for &(bar_length, bar_count) in &solution.bars {
            let pieces_per_bar = (bar_length / piece_length).floor() as u64;
            for _ in 0..bar_count {
                let mut remaining = pieces_per_bar;
                let mut cuts = Vec::new();
                for (order_id, order_remaining) in remaining_by_order.iter_mut() {
                    if remaining == 0 {
                        break;
                    }
                    let take = (*order_remaining).min(remaining);
                    if take > 0 {
                        cuts.push(Cut::new(order_id.clone(), *piece_length, take as u32));
                        remaining -= take;
                        *order_remaining -= take;
                    }
                }
                if !cuts.is_empty() {
                    if let Ok(pattern) = make_pattern(bar_length, BarKind::Standard, cuts, min_reusable) {
                        patterns.push(pattern);
                    }
                }
            }
        }
    }

    let remainder: Vec<PieceDemand> = demand
        .iter()
        .filter(|p| !covered_length.contains(&ordered_float::OrderedFloat(p.piece_length)))
        .cloned()
        .collect();

    if !remainder.is_empty() {
        patterns.extend(ffd(&remainder, pool, min_reusable).patterns);
    }

    Chromosome::new(patterns)
}

/// Builds the initial population per [`InitStrategy`] (spec §4.3).
///
/// `HYBRID` seeds up to `min(population_size/4, 3)` individuals from the
/// homogeneous analyzer, splits the remainder by `heuristic_ratio` between
/// FFD/BFD alternation and random-with-repair, then shuffles the whole
/// population so downstream selection sees no positional bias from how it
/// was built.
pub fn initialize_population(
    population_size: usize,
    demand: &[PieceDemand],
    pool: &BarPool,
    strategy: InitStrategy,
    heuristic_ratio: f64,
    homogeneous_threshold: u64,
    min_reusable: f64,
    rng: &mut impl Rng,
) -> Vec<Chromosome> {
    let mut population = Vec::with_capacity(population_size);

    match strategy {
        InitStrategy::Heuristic => {
            for i in 0..population_size {
                population.push(if i % 2 == 0 {
                    ffd(demand, pool, min_reusable)
                } else {
                    bfd(demand, pool, min_reusable)
                });
            }
        }
        InitStrategy::Random => {
            for _ in 0..population_size {
                population.push(random_with_repair(demand, pool, min_reusable, rng));
            }
        }
        InitStrategy::Hybrid => {
            let num_optimal = (population_size / 4).min(3);
            let num_heuristic = ((population_size - num_optimal) as f64 * heuristic_ratio) as usize;
            let num_random = population_size - num_optimal - num_heuristic;

            for _ in 0..num_optimal {
                population.push(optimal_analysis_seed(demand, pool, homogeneous_threshold, min_reusable));
            }
            for i in 0..num_heuristic {
                population.push(if i % 2 == 0 {
                    ffd(demand, pool, min_reusable)
                } else {
                    bfd(demand, pool, min_reusable)
                });
            }
            for _ in 0..num_random {
                population.push(random_with_repair(demand, pool, min_reusable, rng));
            }
        }
    }

    population.shuffle(rng);
    population
}
