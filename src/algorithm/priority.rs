//! Per-cell weight sets with priority tiers
//!
//! Every cell names one weight set. A weight set gives each pattern a weight
//! and a priority, and groups patterns into tiers of descending priority.
//! Only the highest tier that still has a possible pattern at a cell counts:
//! lower tiers are ignored until every pattern above them is banned there.

use crate::algorithm::random::RandomSource;
use crate::algorithm::wave::{EntropyValues, Wave};
use crate::io::configuration::ENTROPY_EPSILON;
use crate::io::error::{Result, invalid_parameter};
use bitvec::prelude::*;
use std::cmp::Reverse;

/// Weight and priority of one pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityWeight {
    /// Higher tiers are considered first
    pub priority: i32,
    /// Relative frequency within the tier
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct Tier {
    patterns: Vec<usize>,
    // Normalised over the whole tier
    frequencies: Vec<f64>,
}

impl Tier {
    fn possible<'a>(&'a self, wave: &'a Wave, cell: usize) -> impl Iterator<Item = (usize, f64)> + 'a {
        self.patterns
            .iter()
            .copied()
            .zip(self.frequencies.iter().copied())
            .filter(move |&(pattern, _)| wave.get(cell, pattern))
    }
}

/// Patterns grouped into tiers of descending priority
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSet {
    tiers: Vec<Tier>,
    pattern_count: usize,
}

impl WeightSet {
    /// Group `entries`, indexed by pattern id, into tiers
    ///
    /// # Errors
    ///
    /// Returns an error if any weight is negative or non-finite
    pub fn new(entries: &[PriorityWeight]) -> Result<Self> {
        if let Some((pattern, entry)) = entries
            .iter()
            .enumerate()
            .find(|(_, entry)| !entry.weight.is_finite() || entry.weight < 0.0)
        {
            return Err(invalid_parameter(
                "weight",
                &entry.weight,
                &format!("pattern {pattern} needs a finite, non-negative weight"),
            ));
        }

        let mut priorities: Vec<i32> = entries.iter().map(|entry| entry.priority).collect();
        priorities.sort_unstable_by_key(|&priority| Reverse(priority));
        priorities.dedup();

        let tiers = priorities
            .into_iter()
            .map(|priority| {
                let members: Vec<(usize, f64)> = entries
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.priority == priority)
                    .map(|(pattern, entry)| (pattern, entry.weight))
                    .collect();
                let total: f64 = members.iter().map(|&(_, weight)| weight).sum();
                Tier {
                    patterns: members.iter().map(|&(pattern, _)| pattern).collect(),
                    frequencies: members
                        .iter()
                        .map(|&(_, weight)| if total > 0.0 { weight / total } else { 0.0 })
                        .collect(),
                }
            })
            .collect();

        Ok(Self {
            tiers,
            pattern_count: entries.len(),
        })
    }

    /// A single tier with the given weights
    ///
    /// # Errors
    ///
    /// Returns an error if any weight is negative or non-finite
    pub fn from_weights(weights: &[f64]) -> Result<Self> {
        let entries: Vec<PriorityWeight> = weights
            .iter()
            .map(|&weight| PriorityWeight {
                priority: 0,
                weight,
            })
            .collect();
        Self::new(&entries)
    }

    /// Number of patterns covered
    pub const fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Number of distinct priorities
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    fn active_tier(&self, wave: &Wave, cell: usize) -> Option<(usize, &Tier)> {
        self.tiers.iter().enumerate().find(|(_, tier)| {
            tier.patterns
                .iter()
                .any(|&pattern| wave.get(cell, pattern))
        })
    }

    /// Rank of the active tier at `cell` (0 is the highest) and its entropy
    ///
    /// `None` when no pattern of any tier is possible.
    pub fn rank(&self, wave: &Wave, cell: usize) -> Option<(usize, f64)> {
        let (rank, tier) = self.active_tier(wave, cell)?;
        let mut values = EntropyValues::default();
        for (_, frequency) in tier.possible(wave, cell) {
            values.sum += frequency;
            if frequency > 0.0 {
                values.plogp_sum += frequency * frequency.ln();
            }
        }
        Some((rank, values.entropy()))
    }

    /// Frequency-weighted choice within the active tier at `cell`
    ///
    /// Falls back to a uniform choice when the tier's possible patterns all
    /// have zero weight.
    pub fn pick_pattern(&self, wave: &Wave, cell: usize, random: &mut RandomSource) -> Option<usize> {
        let (_, tier) = self.active_tier(wave, cell)?;
        let possible: Vec<(usize, f64)> = tier.possible(wave, cell).collect();
        let total: f64 = possible.iter().map(|&(_, frequency)| frequency).sum();
        if total <= 0.0 {
            return possible
                .get(random.below(possible.len()))
                .map(|&(pattern, _)| pattern);
        }

        let mut remaining = random.next_f64() * total;
        for &(pattern, frequency) in &possible {
            remaining -= frequency;
            if remaining <= 0.0 {
                return Some(pattern);
            }
        }
        possible.last().map(|&(pattern, _)| pattern)
    }
}

/// Which weight set each cell uses
#[derive(Debug, Clone, PartialEq)]
pub struct CellWeights {
    sets: Vec<WeightSet>,
    by_cell: Vec<usize>,
}

impl CellWeights {
    /// Assign `sets[by_cell[cell]]` to every cell
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A cell names a set that doesn't exist
    /// - The sets disagree on the number of patterns
    pub fn new(sets: Vec<WeightSet>, by_cell: Vec<usize>) -> Result<Self> {
        if let Some((cell, &set)) = by_cell
            .iter()
            .enumerate()
            .find(|&(_, &set)| set >= sets.len())
        {
            return Err(invalid_parameter(
                "weight_set",
                &set,
                &format!("cell {cell} names one of only {} sets", sets.len()),
            ));
        }
        if let Some(first) = sets.first()
            && let Some(other) = sets
                .iter()
                .find(|set| set.pattern_count() != first.pattern_count())
        {
            return Err(invalid_parameter(
                "weight_set",
                &other.pattern_count(),
                &format!("sets must all cover {} patterns", first.pattern_count()),
            ));
        }
        Ok(Self { sets, by_cell })
    }

    /// One weight set shared by every cell
    pub fn uniform(set: WeightSet, cell_count: usize) -> Self {
        Self {
            sets: vec![set],
            by_cell: vec![0; cell_count],
        }
    }

    /// Weight set used at `cell`
    pub fn set(&self, cell: usize) -> Option<&WeightSet> {
        self.by_cell.get(cell).and_then(|&set| self.sets.get(set))
    }

    /// Check the assignment covers the solver's cells and patterns
    ///
    /// # Errors
    ///
    /// Returns an error if the cell or pattern count differs
    pub fn validate(&self, cell_count: usize, pattern_count: usize) -> Result<()> {
        if self.by_cell.len() != cell_count {
            return Err(invalid_parameter(
                "cell_weights",
                &self.by_cell.len(),
                &format!("topology has {cell_count} cells"),
            ));
        }
        if let Some(set) = self
            .sets
            .iter()
            .find(|set| set.pattern_count() != pattern_count)
        {
            return Err(invalid_parameter(
                "cell_weights",
                &set.pattern_count(),
                &format!("model has {pattern_count} patterns"),
            ));
        }
        Ok(())
    }
}

/// Minimum-entropy scan that ranks cells by tier before entropy
///
/// Entropy is recomputed from the wave on every pick, so nothing needs
/// updating when patterns are banned or restored.
#[derive(Clone, Debug)]
pub struct PriorityEntropyTracker {
    eligible: BitVec,
    weights: CellWeights,
}

impl PriorityEntropyTracker {
    /// Track the cells whose bit is set in `eligible`
    pub const fn new(eligible: BitVec, weights: CellWeights) -> Self {
        Self { eligible, weights }
    }

    /// Weight sets in use
    pub const fn weights(&self) -> &CellWeights {
        &self.weights
    }

    /// Undecided cell with the highest tier, then the lowest entropy
    ///
    /// Ties are broken uniformly by reservoir sampling. Cells outside
    /// `within`, when given, are skipped.
    pub fn pick(
        &self,
        wave: &Wave,
        random: &mut RandomSource,
        within: Option<&BitSlice>,
    ) -> Option<usize> {
        let mut selected = None;
        let mut best = (usize::MAX, f64::INFINITY);
        let mut ties = 0;

        for cell in self.eligible.iter_ones() {
            if within.is_some_and(|filter| filter.get(cell).as_deref() != Some(&true))
                || wave.possible_count(cell) <= 1
            {
                continue;
            }
            let Some((rank, entropy)) = self.weights.set(cell).and_then(|set| set.rank(wave, cell))
            else {
                continue;
            };
            if rank < best.0 || (rank == best.0 && entropy < best.1 - ENTROPY_EPSILON) {
                best = (rank, entropy);
                selected = Some(cell);
                ties = 1;
            } else if rank == best.0 && (entropy - best.1).abs() <= ENTROPY_EPSILON {
                ties += 1;
                if random.below(ties) == 0 {
                    selected = Some(cell);
                }
            }
        }

        selected
    }
}
