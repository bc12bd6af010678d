use crate::model::pattern::make_pattern;
use crate::model::{BarPool, Chromosome, Cut};
use rand::seq::SliceRandom;
use rand::Rng;

/// *Change source*: replaces pattern `index`'s source bar with any
/// candidate of length >= its current used length (`mutacion_cambiar_origen_patron`).
/// No-op if no candidate fits.
pub fn change_source(chromosome: &mut Chromosome, index: usize, pool: &BarPool, min_reusable: f64, rng: &mut impl Rng) {
    let Some(pattern) = chromosome.patterns.get(index) else {
        return;
    };
    let needed = pattern.used_length();
    let candidates: Vec<_> = pool
        .candidates_scrap_first()
        .into_iter()
        .filter(|bar| bar.length + crate::model::FLOAT_TOLERANCE >= needed)
        .collect();
    let Some(bar) = candidates.choose(rng) else {
        return;
    };
    let cuts = chromosome.patterns[index].cuts.clone();
    if let Ok(rebuilt) = make_pattern(bar.length, bar.kind, cuts, min_reusable) {
        chromosome.patterns[index] = rebuilt;
    }
}

/// *Re-optimize*: rebuilds pattern `index` by running BFD on just the
/// pieces it currently holds (`mutacion_reoptimizar_patron`).
pub fn reoptimize(chromosome: &mut Chromosome, index: usize, pool: &BarPool, min_reusable: f64) {
    let Some(pattern) = chromosome.patterns.get(index) else {
        return;
    };
    if pattern.cuts.is_empty() {
        return;
    }
    let demand: Vec<_> = pattern
        .cuts
        .iter()
        .map(|cut| crate::model::PieceDemand::new(cut.order_id.clone(), cut.piece_length, cut.count_in_pattern as u64))
        .collect();
    let rebuilt = crate::init::bfd(&demand, pool, min_reusable);
    if let Some(first) = rebuilt.patterns.into_iter().next() {
        chromosome.patterns[index] = first;
    }
}

/// *Move piece*: picks a random piece from pattern `index`, a different
/// destination pattern with enough residual length, and transfers one unit
/// (`mutacion_mover_pieza`). No-op if the chromosome has fewer than two
/// patterns, the source is empty, or no destination has room.
pub fn move_piece(chromosome: &mut Chromosome, index: usize, min_reusable: f64, rng: &mut impl Rng) {
    if chromosome.len() < 2 {
        return;
    }
    let Some(source) = chromosome.patterns.get(index) else {
        return;
    };
    if source.cuts.is_empty() {
        return;
    }
    let cut_index = rng.gen_range(0..source.cuts.len());
    let (order_id, length) = {
        let cut = &source.cuts[cut_index];
        (cut.order_id.clone(), cut.piece_length)
    };

    let destinations: Vec<usize> = (0..chromosome.len())
        .filter(|&j| j != index && chromosome.patterns[j].residual() + crate::model::FLOAT_TOLERANCE >= length)
        .collect();
    let Some(&dest_index) = destinations.choose(rng) else {
        return;
    };

    {
        let source = &mut chromosome.patterns[index];
        let mut cuts = source.cuts.clone();
        if cuts[cut_index].count_in_pattern > 1 {
            cuts[cut_index].count_in_pattern -= 1;
        } else {
            cuts.remove(cut_index);
        }
        if let Ok(rebuilt) = make_pattern(source.source_length, source.source_kind, cuts, min_reusable) {
            *source = rebuilt;
        } else {
            return;
        }
    }

    let dest = &mut chromosome.patterns[dest_index];
    let mut cuts = dest.cuts.clone();
    if let Some(existing) = cuts
        .iter_mut()
        .find(|cut| cut.order_id == order_id && (cut.piece_length - length).abs() <= crate::model::FLOAT_TOLERANCE)
    {
        existing.count_in_pattern += 1;
    } else {
        cuts.push(Cut::new(order_id, length, 1));
    }
    if let Ok(rebuilt) = make_pattern(dest.source_length, dest.source_kind, cuts, min_reusable) {
        *dest = rebuilt;
    }
}
