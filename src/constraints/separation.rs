//! Minimum-distance rules between occurrences of pattern sets
//!
//! Distance is counted in edges, so on a square grid it is the manhattan distance.

use crate::algorithm::bitset::PatternSet;
use crate::algorithm::propagation::TrailCursor;
use crate::constraints::{Constraint, ConstraintContext};
use crate::io::error::{Result, invalid_parameter};
use crate::topology::Topology;
use bitvec::prelude::*;
use std::collections::VecDeque;

/// Cells within `min_distance - 1` steps of `origin`, excluding `origin`
pub fn nearby_cells(topology: &Topology, origin: usize, min_distance: usize) -> Vec<usize> {
    let reach = min_distance.saturating_sub(1);
    let mut visited = bitvec![0; topology.cell_count()];
    let mut queue = VecDeque::from([(origin, 0)]);
    let mut found = Vec::new();
    visited.set(origin, true);

    while let Some((cell, distance)) = queue.pop_front() {
        if distance >= reach {
            continue;
        }
        for (_, neighbor) in topology.neighbors(cell) {
            if visited.get(neighbor.cell).as_deref() == Some(&false) {
                visited.set(neighbor.cell, true);
                found.push(neighbor.cell);
                queue.push_back((neighbor.cell, distance + 1));
            }
        }
    }
    found
}

fn check_distance(min_distance: usize) -> Result<()> {
    if min_distance == 0 {
        return Err(invalid_parameter(
            "min_distance",
            &min_distance,
            &"must be at least 1",
        ));
    }
    Ok(())
}

/// Keeps cells holding `patterns` at least `min_distance` apart
#[derive(Debug, Clone)]
pub struct SeparationConstraint {
    patterns: PatternSet,
    min_distance: usize,
    cursor: TrailCursor,
}

impl SeparationConstraint {
    /// Separate every pair of cells committed to `patterns`
    pub fn new(patterns: PatternSet, min_distance: usize) -> Self {
        Self {
            patterns,
            min_distance,
            cursor: TrailCursor::default(),
        }
    }

    fn exclude_around(&self, context: &mut ConstraintContext<'_>, cells: &[usize]) -> Result<()> {
        for &cell in cells {
            if !context.tristate(cell, &self.patterns).is_yes() {
                continue;
            }
            for nearby in nearby_cells(context.topology(), cell, self.min_distance) {
                context.ban_set(nearby, &self.patterns)?;
            }
        }
        Ok(())
    }
}

impl Constraint for SeparationConstraint {
    fn init(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        check_distance(self.min_distance)?;
        let all: Vec<usize> = (0..context.topology().cell_count()).collect();
        self.exclude_around(context, &all)
    }

    fn check(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        let changed = context.changed_cells(&mut self.cursor);
        self.exclude_around(context, &changed)
    }
}

/// Keeps cells holding `first` at least `min_distance` from cells holding `second`
#[derive(Debug, Clone)]
pub struct PairSeparationConstraint {
    first: PatternSet,
    second: PatternSet,
    min_distance: usize,
    cursor: TrailCursor,
}

impl PairSeparationConstraint {
    /// Separate the two sets from each other; each set may still cluster with itself
    pub fn new(first: PatternSet, second: PatternSet, min_distance: usize) -> Self {
        Self {
            first,
            second,
            min_distance,
            cursor: TrailCursor::default(),
        }
    }

    fn exclude_around(&self, context: &mut ConstraintContext<'_>, cells: &[usize]) -> Result<()> {
        for &cell in cells {
            let first_here = context.tristate(cell, &self.first).is_yes();
            let second_here = context.tristate(cell, &self.second).is_yes();
            if !first_here && !second_here {
                continue;
            }
            for nearby in nearby_cells(context.topology(), cell, self.min_distance) {
                if first_here {
                    context.ban_set(nearby, &self.second)?;
                }
                if second_here {
                    context.ban_set(nearby, &self.first)?;
                }
            }
        }
        Ok(())
    }
}

impl Constraint for PairSeparationConstraint {
    fn init(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        check_distance(self.min_distance)?;
        let all: Vec<usize> = (0..context.topology().cell_count()).collect();
        self.exclude_around(context, &all)
    }

    fn check(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        let changed = context.changed_cells(&mut self.cursor);
        self.exclude_around(context, &changed)
    }
}
