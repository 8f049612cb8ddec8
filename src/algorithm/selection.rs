//! Cell and pattern selection policies

use crate::algorithm::entropy::{HeapEntropyTracker, LinearEntropyTracker};
use crate::algorithm::priority::{CellWeights, PriorityEntropyTracker};
use crate::algorithm::random::RandomSource;
use crate::algorithm::wave::Wave;
use crate::io::configuration::{IndexPickerKind, PatternPickerKind, SolverOptions};
use crate::io::error::{Result, check_cell, invalid_parameter};
use crate::model::pattern::PatternModel;
use crate::topology::Topology;
use bitvec::prelude::*;

/// Chooses the next cell to decide
#[derive(Clone, Debug)]
pub enum IndexPicker {
    /// Linear minimum-entropy scan
    MinEntropy(LinearEntropyTracker),
    /// Heap-backed minimum entropy
    HeapMinEntropy(HeapEntropyTracker),
    /// First undecided cell in a fixed order
    Ordered {
        /// Eligible cells in visiting order
        order: Vec<usize>,
    },
    /// Weight-set tier first, then minimum entropy
    ArrayPriorityMinEntropy(PriorityEntropyTracker),
}

impl IndexPicker {
    /// Build the picker `options` ask for; masked-out cells are never eligible
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The index order names a cell outside the topology
    /// - The array-priority picker has no cell weights
    pub fn new(
        options: &SolverOptions,
        topology: &Topology,
        wave: &Wave,
        random: &mut RandomSource,
    ) -> Result<Self> {
        let eligible: BitVec = (0..topology.cell_count())
            .map(|cell| topology.contains(cell))
            .collect();
        Ok(match options.index_picker {
            IndexPickerKind::MinEntropy => Self::MinEntropy(LinearEntropyTracker::new(eligible)),
            IndexPickerKind::HeapMinEntropy => {
                Self::HeapMinEntropy(HeapEntropyTracker::new(wave, eligible, random))
            }
            IndexPickerKind::Ordered => Self::Ordered {
                order: visiting_order(options.index_order.as_deref(), &eligible)?,
            },
            IndexPickerKind::ArrayPriorityMinEntropy => {
                let weights = options.cell_weights.clone().ok_or_else(|| {
                    invalid_parameter(
                        "cell_weights",
                        &"None",
                        &"array-priority pickers need per-cell weights",
                    )
                })?;
                Self::ArrayPriorityMinEntropy(PriorityEntropyTracker::new(eligible, weights))
            }
        })
    }

    /// Inform the picker which cells changed since the last sync
    pub fn sync(&mut self, wave: &Wave, touched: &[usize]) {
        if let Self::HeapMinEntropy(tracker) = self {
            tracker.update(wave, touched);
        }
    }

    /// Next cell to decide, or `None` when every eligible cell is decided
    pub fn pick(&mut self, wave: &Wave, random: &mut RandomSource) -> Option<usize> {
        match self {
            Self::MinEntropy(tracker) => tracker.pick(wave, random),
            Self::HeapMinEntropy(tracker) => tracker.pick(wave),
            Self::Ordered { order } => order
                .iter()
                .copied()
                .find(|&cell| wave.possible_count(cell) > 1),
            Self::ArrayPriorityMinEntropy(tracker) => tracker.pick(wave, random, None),
        }
    }

    /// Next cell to decide among those set in `within`
    pub fn pick_within(
        &self,
        wave: &Wave,
        random: &mut RandomSource,
        within: &BitSlice,
    ) -> Option<usize> {
        match self {
            Self::MinEntropy(tracker) => tracker.pick_within(wave, random, within),
            Self::HeapMinEntropy(tracker) => tracker.pick_within(wave, random, within),
            Self::Ordered { order } => order.iter().copied().find(|&cell| {
                within.get(cell).as_deref() == Some(&true) && wave.possible_count(cell) > 1
            }),
            Self::ArrayPriorityMinEntropy(tracker) => tracker.pick(wave, random, Some(within)),
        }
    }
}

/// Eligible cells of `order` first, then every other eligible cell by index
fn visiting_order(order: Option<&[usize]>, eligible: &BitSlice) -> Result<Vec<usize>> {
    let Some(order) = order else {
        return Ok(eligible.iter_ones().collect());
    };
    let mut listed = bitvec![0; eligible.len()];
    let mut cells = Vec::with_capacity(eligible.count_ones());
    for &cell in order {
        check_cell(cell, eligible.len())?;
        if eligible.get(cell).as_deref() == Some(&true) && listed.get(cell).as_deref() == Some(&false) {
            listed.set(cell, true);
            cells.push(cell);
        }
    }
    cells.extend(eligible.iter_ones().filter(|&cell| listed.get(cell).as_deref() == Some(&false)));
    Ok(cells)
}

/// Choose a pattern for `cell` among those still possible
///
/// The array-priority picker draws from `weights`, falling back to model
/// frequencies for cells without a weight set.
pub fn pick_pattern(
    kind: PatternPickerKind,
    wave: &Wave,
    model: &PatternModel,
    weights: Option<&CellWeights>,
    cell: usize,
    random: &mut RandomSource,
) -> Option<usize> {
    match kind {
        PatternPickerKind::Ordered => wave.possible_patterns(cell).next(),
        PatternPickerKind::Weighted => weighted_pattern(wave, model, cell, random),
        PatternPickerKind::ArrayPriority => match weights.and_then(|weights| weights.set(cell)) {
            Some(set) => set.pick_pattern(wave, cell, random),
            None => weighted_pattern(wave, model, cell, random),
        },
    }
}

/// Frequency-weighted choice over the possible patterns at `cell`
///
/// Falls back to a uniform choice when every possible pattern has zero weight.
pub fn weighted_pattern(
    wave: &Wave,
    model: &PatternModel,
    cell: usize,
    random: &mut RandomSource,
) -> Option<usize> {
    let total: f64 = wave
        .possible_patterns(cell)
        .map(|pattern| model.frequency(pattern))
        .sum();
    if total <= 0.0 {
        let count = wave.possible_count(cell);
        return wave.possible_patterns(cell).nth(random.below(count));
    }

    let mut remaining = random.next_f64() * total;
    let mut last = None;
    for pattern in wave.possible_patterns(cell) {
        remaining -= model.frequency(pattern);
        if remaining <= 0.0 {
            return Some(pattern);
        }
        last = Some(pattern);
    }
    last
}
