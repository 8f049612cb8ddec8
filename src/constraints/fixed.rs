//! Pins a pattern set to one cell

use crate::algorithm::bitset::PatternSet;
use crate::constraints::{Constraint, ConstraintContext};
use crate::io::error::{Result, check_cell};

/// Selects `patterns` at a given cell, or at a random cell that still allows them
#[derive(Debug, Clone)]
pub struct FixedTileConstraint {
    patterns: PatternSet,
    cell: Option<usize>,
}

impl FixedTileConstraint {
    /// Pin `patterns` at `cell`
    pub const fn at(patterns: PatternSet, cell: usize) -> Self {
        Self {
            patterns,
            cell: Some(cell),
        }
    }

    /// Pin `patterns` at a cell chosen during `init`
    pub const fn anywhere(patterns: PatternSet) -> Self {
        Self {
            patterns,
            cell: None,
        }
    }

    /// Cell chosen or given, once `init` has run
    pub const fn cell(&self) -> Option<usize> {
        self.cell
    }
}

impl Constraint for FixedTileConstraint {
    fn init(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        let cell = if let Some(cell) = self.cell {
            check_cell(cell, context.topology().cell_count())?;
            cell
        } else {
            let topology = context.topology();
            let candidates: Vec<usize> = (0..topology.cell_count())
                .filter(|&cell| {
                    topology.contains(cell) && context.tristate(cell, &self.patterns).is_possible()
                })
                .collect();
            if candidates.is_empty() {
                context.set_contradiction("no legal placement for fixed patterns");
                return Ok(());
            }
            let index = context.random_below(candidates.len());
            let Some(&cell) = candidates.get(index) else {
                return Ok(());
            };
            self.cell = Some(cell);
            cell
        };
        context.select_set(cell, &self.patterns)
    }

    fn check(&mut self, _context: &mut ConstraintContext<'_>) -> Result<()> {
        Ok(())
    }
}
