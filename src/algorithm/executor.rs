//! Search loop: propagate, check constraints, pick, select, backtrack

use crate::algorithm::backtrack::{BacktrackPolicy, ChoicePoint, ChoiceStack};
use crate::algorithm::bitset::PatternSet;
use crate::algorithm::propagation::Propagator;
use crate::algorithm::random::RandomSource;
use crate::algorithm::selection::{IndexPicker, pick_pattern};
use crate::algorithm::wave::Wave;
use crate::constraints::path::connected::PathFollower;
use crate::constraints::{Constraint, ConstraintContext};
use crate::io::configuration::SolverOptions;
use crate::io::error::{Result, SolverError, check_cell, check_pattern, topology_mismatch};
use crate::model::pattern::PatternModel;
use crate::topology::Topology;
use ndarray::Array3;
use tracing::{debug, info, trace};

/// Global state of a solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Search can continue
    Undecided,
    /// Every cell holds exactly one pattern
    Decided,
    /// Some cell has no possible pattern and no choice is left to undo
    Contradiction,
}

/// Constraint-propagating, backtracking tile solver
///
/// Owns the wave and all search state. Drive it with `run`, or one decision
/// at a time with `step`.
pub struct Solver {
    model: PatternModel,
    topology: Topology,
    options: SolverOptions,
    propagator: Propagator,
    constraints: Vec<Box<dyn Constraint>>,
    index_picker: IndexPicker,
    follower: Option<PathFollower>,
    random: RandomSource,
    choices: ChoiceStack,
    policy: BacktrackPolicy,
    status: Resolution,
    backtrack_count: usize,
    step_count: usize,
    needs_check: bool,
}

impl Solver {
    /// Prepare a solve: build counters, ban unsupported patterns, run constraint `init`
    ///
    /// An input that is unsatisfiable from the start yields a solver whose
    /// status is already `Contradiction`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Options fail validation
    /// - Cell weights or the index order don't fit the topology and model
    /// - The model has fewer edge labels than the topology uses
    /// - A constraint rejects its parameters during `init`
    pub fn new(
        model: PatternModel,
        topology: impl Into<Topology>,
        constraints: Vec<Box<dyn Constraint>>,
        options: SolverOptions,
        mut random: RandomSource,
    ) -> Result<Self> {
        let topology = topology.into();
        options.validate()?;
        if model.label_count() < topology.label_count() {
            return Err(topology_mismatch(&format!(
                "model has {} labels but topology uses {}",
                model.label_count(),
                topology.label_count()
            )));
        }

        if let Some(weights) = &options.cell_weights {
            weights.validate(topology.cell_count(), model.pattern_count())?;
        }

        let mut propagator = Propagator::new(&model, &topology);
        propagator.ban_unsupported(&model, &topology);
        let index_picker = IndexPicker::new(&options, &topology, propagator.wave(), &mut random)?;
        let follower = constraints
            .iter()
            .find_map(|constraint| constraint.path_heuristic())
            .map(|spec| {
                PathFollower::new(spec, model.pattern_count(), topology.direction_count())
            });

        let mut solver = Self {
            choices: ChoiceStack::new(options.max_backtrack_depth),
            policy: BacktrackPolicy::from_kind(options.backtrack),
            model,
            topology,
            options,
            propagator,
            constraints,
            index_picker,
            follower,
            random,
            status: Resolution::Undecided,
            backtrack_count: 0,
            step_count: 0,
            needs_check: true,
        };
        solver.init_constraints()?;
        if solver.propagator.is_contradiction() {
            debug!("contradiction before search");
            solver.status = Resolution::Contradiction;
        }
        Ok(solver)
    }

    /// Step until the solve is decided or contradictory
    ///
    /// # Errors
    ///
    /// Returns an error if a constraint reports a caller mistake
    pub fn run(&mut self) -> Result<Resolution> {
        while self.status == Resolution::Undecided {
            self.step()?;
        }
        info!(
            resolution = ?self.status,
            steps = self.step_count,
            backtracks = self.backtrack_count,
            "solve finished"
        );
        Ok(self.status)
    }

    /// Make one decision, or recover from a pending contradiction
    ///
    /// # Errors
    ///
    /// Returns an error if a constraint reports a caller mistake
    pub fn step(&mut self) -> Result<Resolution> {
        if self.status != Resolution::Undecided {
            return Ok(self.status);
        }
        if self.needs_check {
            self.settle()?;
            self.needs_check = false;
        }
        if self.propagator.is_contradiction() {
            self.recover()?;
            return Ok(self.status);
        }

        let touched = self.propagator.take_touched();
        self.index_picker.sync(self.propagator.wave(), &touched);
        let wave = self.propagator.wave();
        let picked = match &self.follower {
            Some(follower) => {
                follower.pick(&self.index_picker, wave, &self.topology, &mut self.random)
            }
            None => self.index_picker.pick(wave, &mut self.random),
        };
        let Some(cell) = picked else {
            self.status = Resolution::Decided;
            return Ok(self.status);
        };
        let Some(pattern) = pick_pattern(
            self.options.resolved_pattern_picker(),
            self.propagator.wave(),
            &self.model,
            self.options.cell_weights.as_ref(),
            cell,
            &mut self.random,
        ) else {
            self.propagator.mark_contradiction();
            self.recover()?;
            return Ok(self.status);
        };

        trace!(cell, pattern, depth = self.choices.depth(), "choice");
        if self.options.records_choices() {
            self.choices.push(ChoicePoint {
                trail_len: self.propagator.trail_len(),
                cell,
                pattern,
            });
            self.policy.on_choice(self.choices.depth());
        }
        self.step_count += 1;
        self.propagator
            .select(cell, pattern, &self.model, &self.topology)?;
        self.settle()?;
        if self.propagator.is_contradiction() {
            self.recover()?;
        }
        Ok(self.status)
    }

    /// Remove a possibility from outside the search and propagate
    ///
    /// # Errors
    ///
    /// Returns an error if the cell or pattern is out of range
    pub fn ban(&mut self, cell: usize, pattern: usize) -> Result<Resolution> {
        check_cell(cell, self.topology.cell_count())?;
        check_pattern(pattern, self.model.pattern_count())?;
        self.propagator.ban(cell, pattern);
        self.propagator.propagate(&self.model, &self.topology);
        Ok(self.after_external_change())
    }

    /// Remove every pattern of `set` at `cell` from outside the search
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is out of range
    pub fn ban_set(&mut self, cell: usize, set: &PatternSet) -> Result<Resolution> {
        check_cell(cell, self.topology.cell_count())?;
        for pattern in set.iter() {
            self.propagator.ban(cell, pattern);
        }
        self.propagator.propagate(&self.model, &self.topology);
        Ok(self.after_external_change())
    }

    /// Fix `cell` to `pattern` from outside the search
    ///
    /// External selections are not choice points. Made before the first
    /// choice they are permanent; made later they join the current trail
    /// segment and are undone whenever the search unwinds past it.
    ///
    /// # Errors
    ///
    /// Returns an error if out of range or if `pattern` is already banned at `cell`
    pub fn select(&mut self, cell: usize, pattern: usize) -> Result<Resolution> {
        check_cell(cell, self.topology.cell_count())?;
        check_pattern(pattern, self.model.pattern_count())?;
        self.propagator
            .select(cell, pattern, &self.model, &self.topology)?;
        Ok(self.after_external_change())
    }

    /// Restrict `cell` to the patterns in `set` from outside the search
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is out of range
    pub fn select_set(&mut self, cell: usize, set: &PatternSet) -> Result<Resolution> {
        check_cell(cell, self.topology.cell_count())?;
        for pattern in 0..self.model.pattern_count() {
            if !set.contains(pattern) {
                self.propagator.ban(cell, pattern);
            }
        }
        self.propagator.propagate(&self.model, &self.topology);
        Ok(self.after_external_change())
    }

    /// Current resolution
    pub const fn status(&self) -> Resolution {
        if matches!(self.status, Resolution::Undecided) && self.propagator.is_contradiction() {
            Resolution::Contradiction
        } else {
            self.status
        }
    }

    /// Number of choice points undone so far
    pub const fn backtrack_count(&self) -> usize {
        self.backtrack_count
    }

    /// Number of decisions made so far
    pub const fn step_count(&self) -> usize {
        self.step_count
    }

    /// Open choice points
    pub fn choice_depth(&self) -> usize {
        self.choices.depth()
    }

    /// Current possibilities
    pub const fn wave(&self) -> &Wave {
        self.propagator.wave()
    }

    /// Counters and trail, for inspection
    pub const fn propagator(&self) -> &Propagator {
        &self.propagator
    }

    /// Model being solved
    pub const fn model(&self) -> &PatternModel {
        &self.model
    }

    /// Topology being solved
    pub const fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Whether `pattern` is still possible at `cell`
    pub fn is_possible(&self, cell: usize, pattern: usize) -> bool {
        self.propagator.wave().get(cell, pattern)
    }

    /// Possible patterns at `cell`
    pub fn possible_patterns(&self, cell: usize) -> Vec<usize> {
        self.propagator.wave().possible_patterns(cell).collect()
    }

    /// The pattern at `cell` once decided
    pub fn decided_pattern(&self, cell: usize) -> Option<usize> {
        self.propagator.wave().decided_pattern(cell)
    }

    /// Decided pattern per cell, `None` where undecided, contradictory, or masked
    pub fn decided_patterns(&self) -> Vec<Option<usize>> {
        (0..self.topology.cell_count())
            .map(|cell| {
                self.topology
                    .contains(cell)
                    .then(|| self.decided_pattern(cell))
                    .flatten()
            })
            .collect()
    }

    /// Decided patterns laid out as `[z, y, x]` for grid topologies
    ///
    /// # Errors
    ///
    /// Returns `TopologyMismatch` for graph topologies
    pub fn to_array(&self) -> Result<Array3<Option<usize>>> {
        let grid = self
            .topology
            .as_grid()
            .ok_or_else(|| topology_mismatch(&"array view requires a grid topology"))?;
        let decided = self.decided_patterns();
        Array3::from_shape_vec((grid.depth(), grid.height(), grid.width()), decided).map_err(
            |error| SolverError::TopologyMismatch {
                reason: error.to_string(),
            },
        )
    }

    fn after_external_change(&mut self) -> Resolution {
        self.needs_check = true;
        if self.status == Resolution::Decided {
            self.status = Resolution::Undecided;
        }
        self.status()
    }

    fn init_constraints(&mut self) -> Result<()> {
        for constraint in &mut self.constraints {
            if self.propagator.is_contradiction() {
                break;
            }
            let mut context = ConstraintContext::new(
                &self.model,
                &self.topology,
                &mut self.propagator,
                &mut self.random,
            );
            constraint.init(&mut context)?;
        }
        Ok(())
    }

    /// Re-run constraint checks until a full round bans nothing
    fn settle(&mut self) -> Result<()> {
        loop {
            if self.propagator.is_contradiction() {
                return Ok(());
            }
            let before = self.propagator.trail_len();
            for constraint in &mut self.constraints {
                let mut context = ConstraintContext::new(
                    &self.model,
                    &self.topology,
                    &mut self.propagator,
                    &mut self.random,
                );
                constraint.check(&mut context)?;
                if self.propagator.is_contradiction() {
                    return Ok(());
                }
            }
            if self.propagator.trail_len() == before {
                return Ok(());
            }
        }
    }

    /// Unwind choice points until the state is consistent again, or give up
    fn recover(&mut self) -> Result<()> {
        while self.propagator.is_contradiction() {
            if self
                .options
                .max_backtracks
                .is_some_and(|max| self.backtrack_count >= max)
            {
                debug!(backtracks = self.backtrack_count, "backtrack budget spent");
                self.status = Resolution::Contradiction;
                return Ok(());
            }

            let jump = self.policy.backjump(self.choices.depth());
            let mut refuted = None;
            for _ in 0..jump {
                let Some(point) = self.choices.pop() else {
                    break;
                };
                self.policy.on_backtrack();
                refuted = Some(point);
            }
            let Some(point) = refuted else {
                debug!(
                    backtracks = self.backtrack_count,
                    forgotten = self.choices.forgotten(),
                    "no choice left to undo"
                );
                self.status = Resolution::Contradiction;
                return Ok(());
            };

            self.propagator
                .undo_to(point.trail_len, &self.model, &self.topology);
            self.backtrack_count += 1;
            debug!(
                cell = point.cell,
                pattern = point.pattern,
                jump,
                depth = self.choices.depth(),
                "backtrack"
            );

            // The refuted choice now belongs to the enclosing segment
            self.propagator.ban(point.cell, point.pattern);
            self.propagator.propagate(&self.model, &self.topology);
            self.settle()?;
        }
        Ok(())
    }
}
