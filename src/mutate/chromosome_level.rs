use crate::model::chromosome::completeness;
use crate::model::pattern::make_pattern;
use crate::model::{BarPool, Chromosome, Cut, PieceDemand};
use rand::seq::SliceRandom;
use rand::Rng;

/// *Adjust counts*: closes a missing/surplus gap against `demand`. Prefers
/// repairing a missing piece (probability 0.7, matching
/// `mutacion_ajustar_cantidad_piezas`'s bias) by adding it to any pattern
/// with residual room; otherwise drops one unit of a surplus piece from a
/// pattern that holds it. No-op if the chromosome is already exact or no
/// pattern can accommodate the fix.
pub fn adjust_count(chromosome: &mut Chromosome, demand: &[PieceDemand], min_reusable: f64, rng: &mut impl Rng) {
    let report = completeness(chromosome, demand);
    if report.missing.is_empty() && report.surplus.is_empty() {
        return;
    }

    let prefer_missing = !report.missing.is_empty() && rng.gen_range(0.0..1.0) < 0.7;

    if prefer_missing || report.surplus.is_empty() {
        let entries: Vec<_> = report.missing.keys().collect();
        let Some(&(ref order_id, length)) = entries.choose(rng).copied() else {
            return;
        };
        let length = length.into_inner();
        for pattern in &mut chromosome.patterns {
            if pattern.residual() + crate::model::FLOAT_TOLERANCE < length {
                continue;
            }
            let mut cuts = pattern.cuts.clone();
            if let Some(existing) = cuts
                .iter_mut()
                .find(|cut| cut.order_id == *order_id && (cut.piece_length - length).abs() <= crate::model::FLOAT_TOLERANCE)
            {
                existing.count_in_pattern += 1;
            } else {
                cuts.push(Cut::new(order_id.clone(), length, 1));
            }
            if let Ok(rebuilt) = make_pattern(pattern.source_length, pattern.source_kind, cuts, min_reusable) {
                *pattern = rebuilt;
                return;
            }
        }
    } else {
        let entries: Vec<_> = report.surplus.keys().collect();
        let Some(&(ref order_id, length)) = entries.choose(rng).copied() else {
            return;
        };
        let length = length.into_inner();
        for pattern in &mut chromosome.patterns {
            let Some(cut_index) = pattern
                .cuts
                .iter()
                .position(|cut| cut.order_id == *order_id && (cut.piece_length - length).abs() <= crate::model::FLOAT_TOLERANCE)
            else {
                continue;
            };
            let mut cuts = pattern.cuts.clone();
            if cuts[cut_index].count_in_pattern > 1 {
                cuts[cut_index].count_in_pattern -= 1;
            } else {
                cuts.remove(cut_index);
            }
            if let Ok(rebuilt) = make_pattern(pattern.source_length, pattern.source_kind, cuts, min_reusable) {
                *pattern = rebuilt;
                return;
            }
        }
    }
}

/// *Split*: partitions a random pattern's cuts at a random point into two
/// groups and re-sources each with the smallest candidate bar that fits
/// (`mutacion_dividir_patron`). No-op on patterns with fewer than two
/// distinct cut entries, or if no bar fits one of the two groups.
pub fn split(chromosome: &mut Chromosome, pool: &BarPool, min_reusable: f64, rng: &mut impl Rng) {
    if chromosome.is_empty() {
        return;
    }
    let index = rng.gen_range(0..chromosome.len());
    let cuts = chromosome.patterns[index].cuts.clone();
    if cuts.len() < 2 {
        return;
    }

    let mut shuffled = cuts;
    shuffled.shuffle(rng);
    let split_point = rng.gen_range(1..shuffled.len());
    let (group_a, group_b) = shuffled.split_at(split_point);

    let length_a: f64 = group_a.iter().map(|c| c.total_length()).sum();
    let length_b: f64 = group_b.iter().map(|c| c.total_length()).sum();

    let Some(bar_a) = smallest_fitting(pool, length_a) else {
        return;
    };
    let Some(bar_b) = smallest_fitting(pool, length_b) else {
        return;
    };

    let (Ok(pattern_a), Ok(pattern_b)) = (
        make_pattern(bar_a.length, bar_a.kind, group_a.to_vec(), min_reusable),
        make_pattern(bar_b.length, bar_b.kind, group_b.to_vec(), min_reusable),
    ) else {
        return;
    };

    chromosome.patterns[index] = pattern_a;
    chromosome.patterns.insert(index + 1, pattern_b);
}

/// *Merge*: pools two random patterns' cuts (summing counts for shared
/// pieces) and re-sources the pooled total with the smallest candidate bar
/// that accommodates it (`mutacion_combinar_patrones`). No-op if fewer
/// than two patterns exist or no bar fits the pooled total.
pub fn merge(chromosome: &mut Chromosome, pool: &BarPool, min_reusable: f64, rng: &mut impl Rng) {
    if chromosome.len() < 2 {
        return;
    }
    let mut indices: Vec<usize> = (0..chromosome.len()).collect();
    indices.shuffle(rng);
    let (first, second) = (indices[0], indices[1]);

    let mut pooled = chromosome.patterns[first].cuts.clone();
    for cut in &chromosome.patterns[second].cuts {
        if let Some(existing) = pooled
            .iter_mut()
            .find(|c| c.order_id == cut.order_id && (c.piece_length - cut.piece_length).abs() <= crate::model::FLOAT_TOLERANCE)
        {
            existing.count_in_pattern += cut.count_in_pattern;
        } else {
            pooled.push(cut.clone());
        }
    }

    let total_length: f64 = pooled.iter().map(|c| c.total_length()).sum();
    let Some(bar) = smallest_fitting(pool, total_length) else {
        return;
    };
    let Ok(merged) = make_pattern(bar.length, bar.kind, pooled, min_reusable) else {
        return;
    };

    let (keep, drop) = if first < second { (first, second) } else { (second, first) };
    chromosome.patterns.remove(drop);
    chromosome.patterns[keep] = merged;
}

fn smallest_fitting(pool: &BarPool, length: f64) -> Option<crate::model::Bar> {
    pool.candidates_scrap_first()
        .into_iter()
        .filter(|bar| bar.length + crate::model::FLOAT_TOLERANCE >= length)
        .min_by(|a, b| a.length.partial_cmp(&b.length).unwrap())
}
