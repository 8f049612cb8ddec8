//! Immutable pattern weights and directional compatibility

use crate::io::error::{Result, invalid_model};

/// Per-pattern frequency and per-label tolerated neighbours
///
/// `compatible(p, label)` lists the patterns that `p` accepts on the far side
/// of an edge carrying `label`. The table is never mutated once built.
#[derive(Clone, Debug)]
pub struct PatternModel {
    frequencies: Vec<f64>,
    propagator: Vec<Vec<Vec<usize>>>,
    /// `support[label][p]` counts the patterns `q` with `p` in `compatible(q, label)`
    support: Vec<Vec<usize>>,
}

impl PatternModel {
    /// Validate and index a model
    ///
    /// Compatible lists are sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns `InvalidModel` if:
    /// - `frequencies` and `propagator` differ in length, or are empty
    /// - Any frequency is negative or non-finite, or all frequencies sum to zero
    /// - Propagator rows disagree on the number of labels
    /// - A compatible id is not a pattern
    pub fn new(frequencies: Vec<f64>, mut propagator: Vec<Vec<Vec<usize>>>) -> Result<Self> {
        let pattern_count = frequencies.len();
        if pattern_count == 0 {
            return Err(invalid_model(&"model has no patterns"));
        }
        if propagator.len() != pattern_count {
            return Err(invalid_model(&format!(
                "{pattern_count} frequencies but {} propagator rows",
                propagator.len()
            )));
        }
        if let Some((pattern, frequency)) = frequencies
            .iter()
            .enumerate()
            .find(|(_, frequency)| !frequency.is_finite() || **frequency < 0.0)
        {
            return Err(invalid_model(&format!(
                "pattern {pattern} has frequency {frequency}"
            )));
        }
        if frequencies.iter().sum::<f64>() <= 0.0 {
            return Err(invalid_model(&"frequencies sum to zero"));
        }

        let label_count = propagator.first().map_or(0, Vec::len);
        for (pattern, row) in propagator.iter_mut().enumerate() {
            if row.len() != label_count {
                return Err(invalid_model(&format!(
                    "pattern {pattern} has {} labels, expected {label_count}",
                    row.len()
                )));
            }
            for compatible in row.iter_mut() {
                compatible.sort_unstable();
                compatible.dedup();
                if let Some(&bad) = compatible.iter().find(|&&q| q >= pattern_count) {
                    return Err(invalid_model(&format!(
                        "pattern {pattern} lists unknown pattern {bad}"
                    )));
                }
            }
        }

        let mut support = vec![vec![0; pattern_count]; label_count];
        for row in &propagator {
            for (label, compatible) in row.iter().enumerate() {
                if let Some(counts) = support.get_mut(label) {
                    for &p in compatible {
                        if let Some(count) = counts.get_mut(p) {
                            *count += 1;
                        }
                    }
                }
            }
        }

        Ok(Self {
            frequencies,
            propagator,
            support,
        })
    }

    /// Number of patterns
    pub const fn pattern_count(&self) -> usize {
        self.frequencies.len()
    }

    /// Number of edge labels each pattern has a column for
    pub fn label_count(&self) -> usize {
        self.propagator.first().map_or(0, Vec::len)
    }

    /// Weight of a pattern, 0 if out of range
    pub fn frequency(&self, pattern: usize) -> f64 {
        self.frequencies.get(pattern).copied().unwrap_or(0.0)
    }

    /// All pattern weights
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Patterns `pattern` tolerates across an edge labelled `label`
    pub fn compatible(&self, pattern: usize, label: usize) -> &[usize] {
        self.propagator
            .get(pattern)
            .and_then(|row| row.get(label))
            .map_or(&[], Vec::as_slice)
    }

    /// Number of patterns that tolerate `pattern` across `label`
    pub fn support(&self, label: usize, pattern: usize) -> usize {
        self.support
            .get(label)
            .and_then(|counts| counts.get(pattern))
            .copied()
            .unwrap_or(0)
    }
}
