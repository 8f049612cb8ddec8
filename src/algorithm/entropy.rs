//! Minimum-entropy cell trackers
//!
//! Both trackers only propose cells with more than one possible pattern.
//! They differ in cost and in how ties are broken.

use crate::algorithm::random::RandomSource;
use crate::algorithm::wave::Wave;
use crate::io::configuration::{ENTROPY_EPSILON, HEAP_COMPACTION_FACTOR};
use bitvec::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Full scan for the lowest-entropy undecided cell
///
/// Equal minima are resolved by reservoir sampling, so each tied cell is
/// chosen with equal probability.
#[derive(Clone, Debug)]
pub struct LinearEntropyTracker {
    eligible: BitVec,
}

impl LinearEntropyTracker {
    /// Track the cells whose bit is set in `eligible`
    pub const fn new(eligible: BitVec) -> Self {
        Self { eligible }
    }

    /// Track every cell
    pub fn for_cells(cell_count: usize) -> Self {
        Self::new(bitvec![1; cell_count])
    }

    /// Lowest-entropy undecided cell, or `None` if every tracked cell is decided
    pub fn pick(&self, wave: &Wave, random: &mut RandomSource) -> Option<usize> {
        min_entropy_cell(self.eligible.iter_ones(), wave, random)
    }

    /// Like `pick`, restricted to cells set in `within`
    pub fn pick_within(
        &self,
        wave: &Wave,
        random: &mut RandomSource,
        within: &BitSlice,
    ) -> Option<usize> {
        min_entropy_cell(filtered(&self.eligible, within), wave, random)
    }
}

fn filtered<'a>(eligible: &'a BitSlice, within: &'a BitSlice) -> impl Iterator<Item = usize> + 'a {
    eligible
        .iter_ones()
        .filter(move |&cell| within.get(cell).as_deref() == Some(&true))
}

/// Scan `cells` for the lowest entropy among undecided ones
fn min_entropy_cell(
    cells: impl Iterator<Item = usize>,
    wave: &Wave,
    random: &mut RandomSource,
) -> Option<usize> {
    let mut selected = None;
    let mut min = f64::INFINITY;
    let mut ties = 0;

    for cell in cells {
        if wave.possible_count(cell) <= 1 {
            continue;
        }
        let entropy = wave.entropy(cell);
        if entropy < min - ENTROPY_EPSILON {
            min = entropy;
            selected = Some(cell);
            ties = 1;
        } else if (entropy - min).abs() <= ENTROPY_EPSILON {
            ties += 1;
            if random.below(ties) == 0 {
                selected = Some(cell);
            }
        }
    }

    selected
}

#[derive(Clone, Copy, Debug)]
struct HeapEntry {
    entropy: f64,
    tiebreak: f64,
    cell: usize,
    version: u32,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap yields the smallest entropy first
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .entropy
            .total_cmp(&self.entropy)
            .then_with(|| other.tiebreak.total_cmp(&self.tiebreak))
            .then_with(|| other.cell.cmp(&self.cell))
            .then_with(|| other.version.cmp(&self.version))
    }
}

/// Priority queue of cells keyed by entropy
///
/// Entries go stale when a cell changes. Instead of re-keying, a changed cell
/// gets a new version and a fresh entry; stale entries are discarded when
/// they reach the top. Each cell has a fixed random tiebreak drawn at
/// construction.
#[derive(Clone, Debug)]
pub struct HeapEntropyTracker {
    heap: BinaryHeap<HeapEntry>,
    versions: Vec<u32>,
    tiebreaks: Vec<f64>,
    eligible: BitVec,
}

impl HeapEntropyTracker {
    /// Build the queue from the current wave
    pub fn new(wave: &Wave, eligible: BitVec, random: &mut RandomSource) -> Self {
        let tiebreaks = (0..wave.cell_count()).map(|_| random.next_f64()).collect();
        let mut tracker = Self {
            heap: BinaryHeap::new(),
            versions: vec![0; wave.cell_count()],
            tiebreaks,
            eligible,
        };
        tracker.rebuild(wave);
        tracker
    }

    /// Track every cell
    pub fn for_cells(wave: &Wave, random: &mut RandomSource) -> Self {
        Self::new(wave, bitvec![1; wave.cell_count()], random)
    }

    /// Record that `cells` changed since the last sync
    ///
    /// Rebuilds from scratch when more than half the cells changed.
    pub fn update(&mut self, wave: &Wave, cells: &[usize]) {
        if cells.len() * 2 > self.versions.len() {
            self.rebuild(wave);
            return;
        }
        for &cell in cells {
            if let Some(version) = self.versions.get_mut(cell) {
                *version = version.wrapping_add(1);
            }
            self.push(wave, cell);
        }
        if self.heap.len() > HEAP_COMPACTION_FACTOR * self.versions.len().max(1) {
            self.rebuild(wave);
        }
    }

    /// Lowest-entropy undecided cell, discarding stale entries on the way
    pub fn pick(&mut self, wave: &Wave) -> Option<usize> {
        while let Some(top) = self.heap.peek() {
            let current = self.versions.get(top.cell).copied();
            if current == Some(top.version) && wave.possible_count(top.cell) > 1 {
                return Some(top.cell);
            }
            self.heap.pop();
        }
        None
    }

    /// Lowest-entropy undecided cell among those set in `within`
    ///
    /// The heap is keyed over every cell, so a restricted pick falls back to
    /// a linear scan.
    pub fn pick_within(
        &self,
        wave: &Wave,
        random: &mut RandomSource,
        within: &BitSlice,
    ) -> Option<usize> {
        min_entropy_cell(filtered(&self.eligible, within), wave, random)
    }

    /// Number of queued entries, stale ones included
    pub fn queued(&self) -> usize {
        self.heap.len()
    }

    fn rebuild(&mut self, wave: &Wave) {
        self.heap.clear();
        for version in &mut self.versions {
            *version = version.wrapping_add(1);
        }
        for cell in 0..wave.cell_count() {
            self.push(wave, cell);
        }
    }

    fn push(&mut self, wave: &Wave, cell: usize) {
        if self.eligible.get(cell).as_deref() != Some(&true) || wave.possible_count(cell) <= 1 {
            return;
        }
        let (Some(&version), Some(&tiebreak)) = (self.versions.get(cell), self.tiebreaks.get(cell))
        else {
            return;
        };
        self.heap.push(HeapEntry {
            entropy: wave.entropy(cell),
            tiebreak,
            cell,
            version,
        });
    }
}
