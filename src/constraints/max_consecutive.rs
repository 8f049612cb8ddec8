//! Run-length limits along grid axes

use crate::algorithm::bitset::PatternSet;
use crate::constraints::{Constraint, ConstraintContext, Tristate};
use crate::io::error::{Result, invalid_parameter, topology_mismatch};
use crate::topology::directions::DirectionSet;
use crate::topology::grid::GridTopology;

/// Grid axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Along x
    X,
    /// Along y
    Y,
    /// Along z
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Initial,
    InRun,
    JustAfterRun,
}

/// Online scanner over one line of cells
///
/// Two situations call for a ban:
/// - a run of exactly `max` committed cells: the cells at either end must not join it
/// - two runs separated by one undetermined cell whose lengths sum to `max`:
///   the separating cell must not join them
///
/// Periodic lines are scanned once more over the first `max` cells without
/// resetting, so runs that wrap around are caught.
#[derive(Debug, Clone)]
pub struct RunStateMachine {
    periodic: bool,
    length: usize,
    max: usize,
    state: RunState,
    run_count: usize,
    run_start: usize,
    previous_run_count: usize,
}

impl RunStateMachine {
    /// Scanner for a line of `length` cells
    pub const fn new(periodic: bool, length: usize, max: usize) -> Self {
        Self {
            periodic,
            length,
            max,
            state: RunState::Initial,
            run_count: 0,
            run_start: 0,
            previous_run_count: 0,
        }
    }

    /// Start a new line
    pub const fn reset(&mut self) {
        self.state = RunState::Initial;
        self.run_count = 0;
        self.run_start = 0;
        self.previous_run_count = 0;
    }

    /// Consume the cell at `index`, pushing line positions to ban
    ///
    /// Returns true if a run already exceeds `max`.
    pub fn next(&mut self, index: usize, selected: Tristate, bans: &mut Vec<usize>) -> bool {
        match self.state {
            RunState::Initial => {
                if selected.is_yes() {
                    self.start_run(index);
                }
                false
            }
            RunState::JustAfterRun => {
                if selected.is_yes() {
                    self.start_run(index);
                    self.check_joined_runs(bans);
                } else {
                    self.state = RunState::Initial;
                    self.previous_run_count = 0;
                    self.run_count = 0;
                }
                false
            }
            RunState::InRun => {
                if selected.is_yes() {
                    self.run_count += 1;
                    if self.run_count > self.max {
                        return true;
                    }
                    self.check_joined_runs(bans);
                } else {
                    if self.run_count == self.max && selected.is_possible() {
                        bans.push(index);
                    }
                    self.state = RunState::JustAfterRun;
                    self.previous_run_count = self.run_count;
                    self.run_count = 0;
                }
                false
            }
        }
    }

    const fn start_run(&mut self, index: usize) {
        self.state = RunState::InRun;
        self.run_count = 1;
        self.run_start = index;
    }

    fn check_joined_runs(&self, bans: &mut Vec<usize>) {
        if self.previous_run_count + self.run_count != self.max {
            return;
        }
        if self.run_start == 0 {
            if self.periodic {
                bans.push(self.length - 1);
            }
        } else {
            bans.push(self.run_start - 1);
        }
    }
}

/// Forbids more than `max` consecutive cells holding `patterns` along the chosen axes
#[derive(Debug, Clone)]
pub struct MaxConsecutiveConstraint {
    patterns: PatternSet,
    max: usize,
    axes: Vec<Axis>,
}

impl MaxConsecutiveConstraint {
    /// Limit runs along every axis of the grid
    pub fn new(patterns: PatternSet, max: usize) -> Self {
        Self::with_axes(patterns, max, vec![Axis::X, Axis::Y, Axis::Z])
    }

    /// Limit runs along the given axes only
    pub const fn with_axes(patterns: PatternSet, max: usize, axes: Vec<Axis>) -> Self {
        Self {
            patterns,
            max,
            axes,
        }
    }

    fn check_axis(&self, context: &mut ConstraintContext<'_>, axis: Axis) -> Result<()> {
        let (lines, periodic) = axis_lines(context.grid()?, axis);
        let mut bans = Vec::new();

        for line in lines {
            let mut machine = RunStateMachine::new(periodic, line.len(), self.max);
            let wrap = if periodic { self.max.min(line.len()) } else { 0 };
            for position in (0..line.len()).chain(0..wrap) {
                let Some(&cell) = line.get(position) else {
                    continue;
                };
                let selected = context.tristate(cell, &self.patterns);
                if machine.next(position, selected, &mut bans) {
                    context.set_contradiction("max consecutive run exceeded");
                    return Ok(());
                }
                for banned in bans.drain(..) {
                    if let Some(&target) = line.get(banned) {
                        context.ban_set(target, &self.patterns)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Cell indices of every line parallel to `axis`, and whether that axis wraps
fn axis_lines(grid: &GridTopology, axis: Axis) -> (Vec<Vec<usize>>, bool) {
    let (width, height, depth) = (grid.width(), grid.height(), grid.depth());
    let [periodic_x, periodic_y, periodic_z] = grid.periodic();
    let mut lines = Vec::new();
    match axis {
        Axis::X => {
            for z in 0..depth {
                for y in 0..height {
                    lines.push((0..width).filter_map(|x| grid.index(x, y, z)).collect());
                }
            }
            (lines, periodic_x)
        }
        Axis::Y => {
            for z in 0..depth {
                for x in 0..width {
                    lines.push((0..height).filter_map(|y| grid.index(x, y, z)).collect());
                }
            }
            (lines, periodic_y)
        }
        Axis::Z => {
            for y in 0..height {
                for x in 0..width {
                    lines.push((0..depth).filter_map(|z| grid.index(x, y, z)).collect());
                }
            }
            (lines, periodic_z)
        }
    }
}

impl Constraint for MaxConsecutiveConstraint {
    fn init(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        let grid = context.grid()?;
        if grid.directions() == DirectionSet::Hexagonal2d {
            return Err(topology_mismatch(
                &"max consecutive needs a cartesian grid",
            ));
        }
        if self.max == 0 {
            return Err(invalid_parameter("max", &self.max, &"must be positive"));
        }
        Ok(())
    }

    fn check(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        for axis in self.axes.clone() {
            self.check_axis(context, axis)?;
            if context.is_contradiction() {
                break;
            }
        }
        Ok(())
    }
}
