use std::fmt;

/// A STANDARD bar is drawn from an unbounded commercial-length inventory;
/// a SCRAP bar is a single-use off-cut carried forward from an earlier
/// execution group of the same diameter (spec §3).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BarKind {
    Standard,
    Scrap,
}

impl fmt::Display for BarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarKind::Standard => write!(f, "standard"),
            BarKind::Scrap => write!(f, "scrap"),
        }
    }
}

/// A candidate bar a pattern can be sourced from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub length: f64,
    pub kind: BarKind,
}

impl Bar {
    pub fn standard(length: f64) -> Self {
        Self {
            length,
            kind: BarKind::Standard,
        }
    }

    pub fn scrap(length: f64) -> Self {
        Self {
            length,
            kind: BarKind::Scrap,
        }
    }

    pub fn is_scrap(&self) -> bool {
        matches!(self.kind, BarKind::Scrap)
    }
}

impl fmt::Display for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:.3}m", self.kind, self.length)
    }
}

/// The candidate-bar pool for a single sub-problem: an unbounded multiset
/// of STANDARD lengths plus a finite, single-use multiset of SCRAP
/// off-cuts inherited from earlier groups.
#[derive(Clone, Debug, Default)]
pub struct BarPool {
    pub standard_lengths: Vec<f64>,
    pub scrap: Vec<f64>,
}

impl BarPool {
    pub fn new(standard_lengths: Vec<f64>, scrap: Vec<f64>) -> Self {
        Self {
            standard_lengths,
            scrap,
        }
    }

    /// All candidate bars, SCRAP entries first (each single-use) followed
    /// by STANDARD lengths sorted longest-first — the ordering FFD/BFD
    /// placement (spec §4.3) opens new bars from.
    pub fn candidates_scrap_first(&self) -> Vec<Bar> {
        let mut scrap: Vec<Bar> = self.scrap.iter().map(|&l| Bar::scrap(l)).collect();
        scrap.sort_by(|a, b| b.length.partial_cmp(&a.length).unwrap());
        let mut standard: Vec<Bar> = self
            .standard_lengths
            .iter()
            .map(|&l| Bar::standard(l))
            .collect();
        standard.sort_by(|a, b| b.length.partial_cmp(&a.length).unwrap());
        scrap.extend(standard);
        scrap
    }

    pub fn is_empty(&self) -> bool {
        self.standard_lengths.is_empty() && self.scrap.is_empty()
    }

    /// Largest candidate length available, used to size-check demand up front.
    pub fn max_length(&self) -> Option<f64> {
        self.standard_lengths
            .iter()
            .chain(self.scrap.iter())
            .cloned()
            .fold(None, |acc, l| Some(acc.map_or(l, |m: f64| m.max(l))))
    }
}
