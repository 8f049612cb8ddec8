//! Auxiliary rules that take part in the search through a narrow facade
//!
//! Constraints are called in registration order. `init` runs once before the
//! search starts; `check` runs after every propagation fixpoint. Constraints
//! only ever remove possibilities, so re-running them after a backtrack is safe.

/// Boundary restrictions
pub mod border;
/// Occurrence count bounds
pub mod count;
/// Fixed placements
pub mod fixed;
/// Run-length limits along grid axes
pub mod max_consecutive;
/// Reflection symmetry
pub mod mirror;
/// Path connectivity, loops, cycles, and parity
pub mod path;
/// Neighbourhood-exclusion constraints
pub mod separation;

use crate::algorithm::bitset::PatternSet;
use crate::algorithm::propagation::{Propagator, TrailCursor};
use crate::algorithm::random::RandomSource;
use crate::algorithm::wave::Wave;
use crate::io::error::{Result, check_cell, check_pattern, topology_mismatch};
use crate::model::pattern::PatternModel;
use crate::topology::Topology;
use crate::topology::grid::GridTopology;
use path::PathSpec;
use tracing::debug;

/// How a cell relates to a pattern set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tristate {
    /// No pattern of the set is possible
    No,
    /// Some but not all possible patterns are in the set
    Maybe,
    /// Every possible pattern is in the set
    Yes,
}

impl Tristate {
    /// How the possible patterns at `cell` relate to `set`
    pub fn of(wave: &Wave, cell: usize, set: &PatternSet) -> Self {
        let total = wave.possible_count(cell);
        let selected = wave
            .possible_patterns(cell)
            .filter(|&pattern| set.contains(pattern))
            .count();
        if selected == 0 {
            Self::No
        } else if selected == total {
            Self::Yes
        } else {
            Self::Maybe
        }
    }

    /// Yes or Maybe
    pub const fn is_possible(self) -> bool {
        matches!(self, Self::Yes | Self::Maybe)
    }

    /// Committed to the set
    pub const fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }

    /// Undetermined
    pub const fn is_maybe(self) -> bool {
        matches!(self, Self::Maybe)
    }

    /// Excluded from the set
    pub const fn is_no(self) -> bool {
        matches!(self, Self::No)
    }
}

/// Search-time rule with one-off and repeated hooks
pub trait Constraint {
    /// Install unconditional restrictions before the search starts
    ///
    /// # Errors
    ///
    /// Returns an error if the constraint's parameters don't fit the model or topology
    fn init(&mut self, context: &mut ConstraintContext<'_>) -> Result<()>;

    /// Inspect the current wave and ban, select, or flag a contradiction
    ///
    /// # Errors
    ///
    /// Returns an error only for caller mistakes; unsatisfiability goes through
    /// `ConstraintContext::set_contradiction`
    fn check(&mut self, context: &mut ConstraintContext<'_>) -> Result<()>;

    /// Path the search should grow from its committed cells, if any
    ///
    /// The solver follows the first constraint that returns one.
    fn path_heuristic(&self) -> Option<&PathSpec> {
        None
    }
}

/// Facade through which constraints observe and modify the wave
///
/// Every modification propagates immediately.
pub struct ConstraintContext<'a> {
    model: &'a PatternModel,
    topology: &'a Topology,
    propagator: &'a mut Propagator,
    random: &'a mut RandomSource,
}

impl<'a> ConstraintContext<'a> {
    /// Wrap solver state for one constraint call
    pub const fn new(
        model: &'a PatternModel,
        topology: &'a Topology,
        propagator: &'a mut Propagator,
        random: &'a mut RandomSource,
    ) -> Self {
        Self {
            model,
            topology,
            propagator,
            random,
        }
    }

    /// Pattern model being solved
    pub const fn model(&self) -> &'a PatternModel {
        self.model
    }

    /// Topology being solved
    pub const fn topology(&self) -> &'a Topology {
        self.topology
    }

    /// The topology as a grid
    ///
    /// # Errors
    ///
    /// Returns `TopologyMismatch` for graph topologies
    pub fn grid(&self) -> Result<&'a GridTopology> {
        self.topology
            .as_grid()
            .ok_or_else(|| topology_mismatch(&"constraint requires a grid topology"))
    }

    /// Current possibilities
    pub const fn wave(&self) -> &Wave {
        self.propagator.wave()
    }

    /// Number of patterns
    pub const fn pattern_count(&self) -> usize {
        self.model.pattern_count()
    }

    /// Whether `pattern` is possible at `cell`
    pub fn is_possible(&self, cell: usize, pattern: usize) -> bool {
        self.wave().get(cell, pattern)
    }

    /// How `cell` relates to `set`
    pub fn tristate(&self, cell: usize, set: &PatternSet) -> Tristate {
        Tristate::of(self.wave(), cell, set)
    }

    /// Remove `pattern` at `cell`; already-banned patterns are left alone
    ///
    /// # Errors
    ///
    /// Returns an error if the cell or pattern is out of range
    pub fn ban(&mut self, cell: usize, pattern: usize) -> Result<()> {
        check_cell(cell, self.topology.cell_count())?;
        check_pattern(pattern, self.model.pattern_count())?;
        self.propagator.ban(cell, pattern);
        self.propagator.propagate(self.model, self.topology);
        Ok(())
    }

    /// Remove every pattern of `set` at `cell`
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is out of range
    pub fn ban_set(&mut self, cell: usize, set: &PatternSet) -> Result<()> {
        check_cell(cell, self.topology.cell_count())?;
        for pattern in set.iter() {
            self.propagator.ban(cell, pattern);
        }
        self.propagator.propagate(self.model, self.topology);
        Ok(())
    }

    /// Remove every pattern outside `set` at `cell`
    ///
    /// Selecting a set with nothing possible empties the cell, which is a
    /// contradiction rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is out of range
    pub fn select_set(&mut self, cell: usize, set: &PatternSet) -> Result<()> {
        check_cell(cell, self.topology.cell_count())?;
        for pattern in 0..self.model.pattern_count() {
            if !set.contains(pattern) {
                self.propagator.ban(cell, pattern);
            }
        }
        self.propagator.propagate(self.model, self.topology);
        Ok(())
    }

    /// Keep only `pattern` at `cell`
    ///
    /// # Errors
    ///
    /// Returns an error if out of range or if `pattern` is already banned
    pub fn select(&mut self, cell: usize, pattern: usize) -> Result<()> {
        check_cell(cell, self.topology.cell_count())?;
        check_pattern(pattern, self.model.pattern_count())?;
        self.propagator
            .select(cell, pattern, self.model, self.topology)
    }

    /// Declare the current state unsatisfiable
    pub fn set_contradiction(&mut self, reason: &str) {
        debug!(reason, "constraint contradiction");
        self.propagator.mark_contradiction();
    }

    /// Whether the state is currently contradictory
    pub const fn is_contradiction(&self) -> bool {
        self.propagator.is_contradiction()
    }

    /// Uniform index below `bound`
    pub fn random_below(&mut self, bound: usize) -> usize {
        self.random.below(bound)
    }

    /// Cells with bans since `cursor` last read, in first-change order
    pub fn changed_cells(&self, cursor: &mut TrailCursor) -> Vec<usize> {
        let mut seen = std::collections::BTreeSet::new();
        self.propagator
            .changes_since(cursor)
            .iter()
            .filter_map(|&(cell, _)| seen.insert(cell).then_some(cell))
            .collect()
    }
}
