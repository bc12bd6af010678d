//! Thin, in-memory normalization layer between external record streams
//! and the core (spec §6, §9: "the core sees only a finite ordered
//! sequence of records with the five named fields"). This module does
//! **not** parse CSV/JSON or talk to a network — that belongs to the
//! consuming binary (spec §1 Non-goals); it only coerces already-parsed
//! rows into the core's strict types and serializes engine output back
//! into plain, transport-agnostic records.
use crate::driver::CartillaRow;
use crate::model::{round3, Chromosome, Diameter, OrderId};

/// A demand row as it might arrive from an external source: looser types
/// (counts and groups as `f64`, matching a generic tabular column) than
/// the core's [`CartillaRow`] (spec §6 "Demand input").
#[derive(Clone, Debug, PartialEq)]
pub struct RawCartillaRow {
    pub order_id: OrderId,
    pub diameter: Diameter,
    pub piece_length: f64,
    pub required_count: f64,
    pub execution_group: f64,
}

/// Coerces raw rows into clean [`CartillaRow`]s: rounds lengths to three
/// fractional digits, coerces counts/groups to integers, and drops rows
/// with non-positive count or length (spec §6).
pub fn clean_cartilla_rows(rows: impl IntoIterator<Item = RawCartillaRow>) -> Vec<CartillaRow> {
    rows.into_iter()
        .filter_map(|row| {
            let piece_length = round3(row.piece_length);
            let required_count = row.required_count.round() as i64;
            if required_count <= 0 || piece_length <= 0.0 {
                return None;
            }
            Some(CartillaRow {
                order_id: row.order_id,
                diameter: row.diameter,
                piece_length,
                required_count,
                execution_group: row.execution_group.round() as i64,
            })
        })
        .collect()
}

/// One cut serialized for output: an individual piece's identity (spec §6
/// "Engine output").
#[derive(Clone, Debug, PartialEq)]
pub struct PieceOutput {
    pub order_id: OrderId,
    pub piece_length: f64,
}

/// One pattern serialized for output. `cuts` and `pieces` always have
/// equal length (`|cuts| == |pieces|`) and `cuts.iter().sum() + waste ==
/// source_length` to 1e-3, as spec §6 requires.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternOutput {
    pub source_length: f64,
    pub cuts: Vec<f64>,
    pub pieces: Vec<PieceOutput>,
    pub waste: f64,
}

/// Formats a chromosome into the engine-output shape spec §6 names: an
/// ordered list of patterns plus the list of newly produced reusable
/// off-cut lengths.
pub fn format_output(chromosome: &Chromosome) -> (Vec<PatternOutput>, Vec<f64>) {
    let patterns = chromosome
        .patterns
        .iter()
        .map(|pattern| {
            let mut cuts = Vec::new();
            let mut pieces = Vec::new();
            for cut in &pattern.cuts {
                for _ in 0..cut.count_in_pattern {
                    cuts.push(cut.piece_length);
                    pieces.push(PieceOutput {
                        order_id: cut.order_id.clone(),
                        piece_length: cut.piece_length,
                    });
                }
            }
            PatternOutput {
                source_length: pattern.source_length,
                cuts,
                pieces,
                waste: pattern.waste(),
            }
        })
        .collect();
    (patterns, chromosome.reusable_scraps())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_non_positive_count_and_length_rows() {
        let raw = vec![
            RawCartillaRow {
                order_id: "P1".to_string(),
                diameter: "#4".to_string(),
                piece_length: 1.2345,
                required_count: 3.0,
                execution_group: 1.0,
            },
            RawCartillaRow {
                order_id: "P2".to_string(),
                diameter: "#4".to_string(),
                piece_length: 0.0,
                required_count: 5.0,
                execution_group: 1.0,
            },
            RawCartillaRow {
                order_id: "P3".to_string(),
                diameter: "#4".to_string(),
                piece_length: 2.0,
                required_count: -1.0,
                execution_group: 1.0,
            },
        ];
        let cleaned = clean_cartilla_rows(raw);
        assert_eq!(cleaned.len(), 1);
        assert!((cleaned[0].piece_length - 1.235).abs() < 1e-9);
    }

    #[test]
    fn format_output_keeps_cuts_and_pieces_aligned() {
        use crate::model::pattern::make_pattern;
        use crate::model::{BarKind, Cut};
        let pattern = make_pattern(6.0, BarKind::Standard, vec![Cut::new("P1", 2.0, 2)], 0.5).unwrap();
        let chromosome = Chromosome::new(vec![pattern]);
        let (outputs, _) = format_output(&chromosome);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].cuts.len(), outputs[0].pieces.len());
        let total: f64 = outputs[0].cuts.iter().sum();
        assert!((total + outputs[0].waste - outputs[0].source_length).abs() < 1e-3);
    }
}
