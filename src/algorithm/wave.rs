//! Per-cell possibility sets with incrementally maintained entropy

use crate::model::pattern::PatternModel;
use bitvec::prelude::*;

/// Running frequency sums for one cell
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EntropyValues {
    /// Sum of frequencies of possible patterns
    pub sum: f64,
    /// Sum of `f * ln f` over possible patterns
    pub plogp_sum: f64,
}

impl EntropyValues {
    /// Shannon entropy of the normalised frequency distribution
    pub fn entropy(&self) -> f64 {
        if self.sum <= 0.0 {
            0.0
        } else {
            self.sum.ln() - self.plogp_sum / self.sum
        }
    }

    fn remove(&mut self, frequency: f64, plogp: f64) {
        self.sum -= frequency;
        self.plogp_sum -= plogp;
    }

    fn restore(&mut self, frequency: f64, plogp: f64) {
        self.sum += frequency;
        self.plogp_sum += plogp;
    }
}

/// Possibility bit per `(cell, pattern)` with per-cell counts and entropy sums
///
/// Bits are stored cell-major. Every cell starts with every pattern possible.
#[derive(Clone, Debug)]
pub struct Wave {
    possibilities: BitVec,
    counts: Vec<usize>,
    entropy: Vec<EntropyValues>,
    frequencies: Vec<f64>,
    plogp: Vec<f64>,
    pattern_count: usize,
}

impl Wave {
    /// Create a fully undecided wave over `cell_count` cells
    pub fn new(frequencies: &[f64], cell_count: usize) -> Self {
        let pattern_count = frequencies.len();
        let plogp: Vec<f64> = frequencies
            .iter()
            .map(|&f| if f > 0.0 { f * f.ln() } else { 0.0 })
            .collect();
        let initial = EntropyValues {
            sum: frequencies.iter().sum(),
            plogp_sum: plogp.iter().sum(),
        };

        Self {
            possibilities: bitvec![1; cell_count * pattern_count],
            counts: vec![pattern_count; cell_count],
            entropy: vec![initial; cell_count],
            frequencies: frequencies.to_vec(),
            plogp,
            pattern_count,
        }
    }

    /// Create a fully undecided wave for a model
    pub fn for_model(model: &PatternModel, cell_count: usize) -> Self {
        Self::new(model.frequencies(), cell_count)
    }

    /// Number of cells
    pub const fn cell_count(&self) -> usize {
        self.counts.len()
    }

    /// Number of patterns
    pub const fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Whether `pattern` is still possible at `cell`
    pub fn get(&self, cell: usize, pattern: usize) -> bool {
        if pattern >= self.pattern_count {
            return false;
        }
        self.possibilities
            .get(cell * self.pattern_count + pattern)
            .as_deref()
            == Some(&true)
    }

    /// Remove a possibility, returning true if the cell is left with none
    ///
    /// Removing an absent possibility changes nothing and returns false.
    pub fn ban(&mut self, cell: usize, pattern: usize) -> bool {
        if !self.get(cell, pattern) {
            return false;
        }
        self.possibilities
            .set(cell * self.pattern_count + pattern, false);
        let frequency = self.frequencies.get(pattern).copied().unwrap_or(0.0);
        let plogp = self.plogp.get(pattern).copied().unwrap_or(0.0);
        if let Some(values) = self.entropy.get_mut(cell) {
            values.remove(frequency, plogp);
        }
        self.counts.get_mut(cell).is_some_and(|count| {
            *count -= 1;
            *count == 0
        })
    }

    /// Put back a possibility removed by `ban`
    pub fn unban(&mut self, cell: usize, pattern: usize) {
        if pattern >= self.pattern_count || cell >= self.cell_count() || self.get(cell, pattern) {
            return;
        }
        self.possibilities
            .set(cell * self.pattern_count + pattern, true);
        let frequency = self.frequencies.get(pattern).copied().unwrap_or(0.0);
        let plogp = self.plogp.get(pattern).copied().unwrap_or(0.0);
        if let Some(values) = self.entropy.get_mut(cell) {
            values.restore(frequency, plogp);
        }
        if let Some(count) = self.counts.get_mut(cell) {
            *count += 1;
        }
    }

    /// Number of patterns still possible at `cell`
    pub fn possible_count(&self, cell: usize) -> usize {
        self.counts.get(cell).copied().unwrap_or(0)
    }

    /// Frequency sums for `cell`
    pub fn entropy_values(&self, cell: usize) -> EntropyValues {
        self.entropy.get(cell).copied().unwrap_or_default()
    }

    /// Entropy of `cell`
    pub fn entropy(&self, cell: usize) -> f64 {
        self.entropy_values(cell).entropy()
    }

    /// Possible patterns at `cell` in ascending order
    pub fn possible_patterns(&self, cell: usize) -> impl Iterator<Item = usize> + '_ {
        let start = (cell * self.pattern_count).min(self.possibilities.len());
        let end = (start + self.pattern_count).min(self.possibilities.len());
        self.possibilities
            .get(start..end)
            .into_iter()
            .flat_map(|row| row.iter_ones())
    }

    /// The single remaining pattern at `cell`, if decided
    pub fn decided_pattern(&self, cell: usize) -> Option<usize> {
        if self.possible_count(cell) == 1 {
            self.possible_patterns(cell).next()
        } else {
            None
        }
    }
}
