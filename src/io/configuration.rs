//! Solver constants and runtime configuration defaults

use crate::algorithm::priority::CellWeights;
use crate::io::error::{Result, invalid_parameter};

// Entropy comparisons
/// Entropies closer than this are treated as tied
pub const ENTROPY_EPSILON: f64 = 1e-9;

/// Heap entries allowed per cell before the heap tracker is rebuilt
pub const HEAP_COMPACTION_FACTOR: usize = 4;

// Patience backjumping
/// Failed backtracks tolerated before the first backjump
pub const PATIENCE_BASE_TIMEOUT: u64 = 10;
/// Choice points unwound by the first backjump level
pub const PATIENCE_BASE_JUMP: usize = 4;

// Demo binary defaults
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 42;
/// Default grid width for demo scenarios
pub const DEFAULT_WIDTH: usize = 20;
/// Default grid height for demo scenarios
pub const DEFAULT_HEIGHT: usize = 20;
/// Steps between progress refreshes
pub const PROGRESS_REFRESH_STEPS: usize = 64;

/// How the next cell to decide is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexPickerKind {
    /// Linear scan for minimum entropy with random tie-breaking
    #[default]
    MinEntropy,
    /// Lazily updated binary heap keyed by entropy
    HeapMinEntropy,
    /// First undecided cell in `SolverOptions::index_order`, or by index
    Ordered,
    /// Highest weight-set tier first, then minimum entropy
    ArrayPriorityMinEntropy,
}

/// How a pattern is chosen for the picked cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatternPickerKind {
    /// Random, proportional to frequency
    #[default]
    Weighted,
    /// Lowest possible pattern id
    Ordered,
    /// Random within the cell's highest live weight-set tier
    ArrayPriority,
}

/// What to do on contradiction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BacktrackKind {
    /// Contradiction is final
    None,
    /// Undo the most recent choice
    #[default]
    Backtrack,
    /// Patience backjumping: escalate to longer jumps after repeated failures
    Backjump,
    /// Always unwind this many choice points
    Constant(usize),
}

/// Search configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolverOptions {
    /// Cell selection policy
    pub index_picker: IndexPickerKind,
    /// Pattern selection policy
    pub pattern_picker: PatternPickerKind,
    /// Contradiction recovery policy
    pub backtrack: BacktrackKind,
    /// Choice points retained for unwinding; older ones are forgotten
    pub max_backtrack_depth: Option<usize>,
    /// Total backtracks allowed before giving up
    pub max_backtracks: Option<usize>,
    /// Visiting order for the ordered picker; unlisted cells follow by index
    pub index_order: Option<Vec<usize>>,
    /// Per-cell weights and priorities for the array-priority pickers
    pub cell_weights: Option<CellWeights>,
}

impl SolverOptions {
    /// Check option values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A cap is zero or a constant backjump is zero
    /// - An array-priority picker has no cell weights
    /// - The array-priority index picker is paired with ordered patterns
    pub fn validate(&self) -> Result<()> {
        if self.backtrack == BacktrackKind::Constant(0) {
            return Err(invalid_parameter(
                "backtrack",
                &"Constant(0)",
                &"use BacktrackKind::None to disable backtracking",
            ));
        }
        if self.max_backtrack_depth == Some(0) {
            return Err(invalid_parameter(
                "max_backtrack_depth",
                &0,
                &"must be positive when set",
            ));
        }
        if self.max_backtracks == Some(0) {
            return Err(invalid_parameter(
                "max_backtracks",
                &0,
                &"must be positive when set",
            ));
        }
        let priority_picker = self.index_picker == IndexPickerKind::ArrayPriorityMinEntropy
            || self.pattern_picker == PatternPickerKind::ArrayPriority;
        if priority_picker && self.cell_weights.is_none() {
            return Err(invalid_parameter(
                "cell_weights",
                &"None",
                &"array-priority pickers need per-cell weights",
            ));
        }
        if self.index_picker == IndexPickerKind::ArrayPriorityMinEntropy
            && self.pattern_picker == PatternPickerKind::Ordered
        {
            return Err(invalid_parameter(
                "pattern_picker",
                &"Ordered",
                &"ArrayPriorityMinEntropy picks patterns from its weight sets",
            ));
        }
        Ok(())
    }

    /// Pattern picker actually used, given the index picker
    pub fn resolved_pattern_picker(&self) -> PatternPickerKind {
        if self.index_picker == IndexPickerKind::ArrayPriorityMinEntropy {
            PatternPickerKind::ArrayPriority
        } else {
            self.pattern_picker
        }
    }

    /// Whether choices need to be recorded at all
    pub fn records_choices(&self) -> bool {
        self.backtrack != BacktrackKind::None
    }
}
