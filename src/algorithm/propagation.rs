//! Directional support counters and the ban worklist
//!
//! `compat[cell, p, d]` counts the patterns still possible across edge `d` of
//! `cell` that support `p` there. A counter reaching zero is exactly the
//! trigger to ban `p` at `cell`.

use crate::algorithm::wave::Wave;
use crate::io::error::{Result, SolverError};
use crate::model::pattern::PatternModel;
use crate::topology::Topology;
use bitvec::prelude::*;
use ndarray::Array3;

/// Wave plus the derived state that keeps it arc-consistent
///
/// Every ban is appended to the trail, so any suffix can be replayed in
/// reverse to restore an earlier state exactly.
#[derive(Clone, Debug)]
pub struct Propagator {
    wave: Wave,
    compat: Array3<i32>,
    worklist: Vec<(usize, usize)>,
    trail: Vec<(usize, usize)>,
    contradiction: bool,
    touched: Vec<usize>,
    touched_flags: BitVec,
    undo_count: usize,
    undo_floors: Vec<(usize, usize)>,
}

/// Read position into the trail that survives undo
///
/// After an undo the position is pulled back to the undo target, so entries
/// appended later are never skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrailCursor {
    position: usize,
    undos_seen: usize,
}

impl Propagator {
    /// Build counters for a fully undecided wave
    ///
    /// Patterns with no support on some edge are not banned yet; call
    /// `ban_unsupported` for that.
    pub fn new(model: &PatternModel, topology: &Topology) -> Self {
        let cell_count = topology.cell_count();
        let pattern_count = model.pattern_count();
        let mut compat = Array3::zeros((cell_count, pattern_count, topology.direction_count()));

        for cell in 0..cell_count {
            for (_, neighbor) in topology.neighbors(cell) {
                for pattern in 0..pattern_count {
                    if let Some(count) =
                        compat.get_mut((neighbor.cell, pattern, neighbor.inverse_direction))
                    {
                        *count = model.support(neighbor.label, pattern) as i32;
                    }
                }
            }
        }

        Self {
            wave: Wave::for_model(model, cell_count),
            compat,
            worklist: Vec::new(),
            trail: Vec::new(),
            contradiction: false,
            touched: Vec::new(),
            touched_flags: bitvec![0; cell_count],
            undo_count: 0,
            undo_floors: Vec::new(),
        }
    }

    /// Ban every pattern lacking support across some real edge, then propagate
    pub fn ban_unsupported(&mut self, model: &PatternModel, topology: &Topology) {
        for cell in 0..topology.cell_count() {
            for (direction, _) in topology.neighbors(cell) {
                for pattern in 0..model.pattern_count() {
                    if self.compat(cell, pattern, direction) == 0 && self.ban(cell, pattern) {
                        return;
                    }
                }
            }
        }
        self.propagate(model, topology);
    }

    /// Current possibilities
    pub const fn wave(&self) -> &Wave {
        &self.wave
    }

    /// Support counter for `(cell, pattern, direction)`
    pub fn compat(&self, cell: usize, pattern: usize, direction: usize) -> i32 {
        self.compat
            .get((cell, pattern, direction))
            .copied()
            .unwrap_or(0)
    }

    /// Whether some cell has run out of patterns, or a contradiction was flagged
    pub const fn is_contradiction(&self) -> bool {
        self.contradiction
    }

    /// Flag the current state as unsatisfiable
    pub const fn mark_contradiction(&mut self) {
        self.contradiction = true;
    }

    /// Length of the trail
    pub const fn trail_len(&self) -> usize {
        self.trail.len()
    }

    /// Remove one possibility without propagating
    ///
    /// Returns true if this ban emptied the cell. Banning an absent pattern is a no-op.
    pub fn ban(&mut self, cell: usize, pattern: usize) -> bool {
        if !self.wave.get(cell, pattern) {
            return false;
        }
        let emptied = self.wave.ban(cell, pattern);
        self.worklist.push((cell, pattern));
        self.trail.push((cell, pattern));
        self.touch(cell);
        if emptied {
            self.contradiction = true;
        }
        emptied
    }

    /// Keep only `pattern` at `cell`, then propagate
    ///
    /// # Errors
    ///
    /// Returns `PatternAlreadyBanned` if `pattern` is no longer possible at `cell`
    pub fn select(
        &mut self,
        cell: usize,
        pattern: usize,
        model: &PatternModel,
        topology: &Topology,
    ) -> Result<()> {
        if !self.wave.get(cell, pattern) {
            return Err(SolverError::PatternAlreadyBanned { cell, pattern });
        }
        for other in 0..model.pattern_count() {
            if other != pattern {
                self.ban(cell, other);
            }
        }
        self.propagate(model, topology);
        Ok(())
    }

    /// Drain the worklist to a fixpoint, stopping early on contradiction
    ///
    /// Each popped ban is applied to every neighbour before the contradiction
    /// flag is rechecked, so the counters always match the trail.
    pub fn propagate(&mut self, model: &PatternModel, topology: &Topology) {
        while !self.contradiction {
            let Some((cell, pattern)) = self.worklist.pop() else {
                break;
            };
            for (_, neighbor) in topology.neighbors(cell) {
                for &other in model.compatible(pattern, neighbor.label) {
                    let Some(count) =
                        self.compat
                            .get_mut((neighbor.cell, other, neighbor.inverse_direction))
                    else {
                        continue;
                    };
                    *count -= 1;
                    if *count == 0 {
                        self.ban(neighbor.cell, other);
                    }
                }
            }
        }
    }

    /// Replay the trail backwards until it has `len` entries
    ///
    /// Bans still waiting on the worklist never touched the counters, so they
    /// are only popped. Clears the contradiction flag.
    pub fn undo_to(&mut self, len: usize, model: &PatternModel, topology: &Topology) {
        while self.trail.len() > len {
            let Some((cell, pattern)) = self.trail.pop() else {
                break;
            };
            self.wave.unban(cell, pattern);
            self.touch(cell);

            if self.worklist.last() == Some(&(cell, pattern)) {
                self.worklist.pop();
                continue;
            }
            for (_, neighbor) in topology.neighbors(cell) {
                for &other in model.compatible(pattern, neighbor.label) {
                    if let Some(count) =
                        self.compat
                            .get_mut((neighbor.cell, other, neighbor.inverse_direction))
                    {
                        *count += 1;
                    }
                }
            }
        }
        self.worklist.clear();
        self.contradiction = false;
        self.push_undo_floor(len);
    }

    /// Trail entries appended since `cursor` last read, advancing it
    pub fn changes_since(&self, cursor: &mut TrailCursor) -> &[(usize, usize)] {
        // Floors are ordered by both sequence and target, so the first unseen one is the lowest
        let floor = self
            .undo_floors
            .iter()
            .find(|&&(sequence, _)| sequence > cursor.undos_seen);
        if let Some(&(_, floor)) = floor {
            cursor.position = cursor.position.min(floor);
        }
        cursor.undos_seen = self.undo_count;
        let start = cursor.position.min(self.trail.len());
        cursor.position = self.trail.len();
        self.trail.get(start..).unwrap_or(&[])
    }

    /// Cells whose possibilities changed since the last call, in first-touch order
    pub fn take_touched(&mut self) -> Vec<usize> {
        for &cell in &self.touched {
            self.touched_flags.set(cell, false);
        }
        std::mem::take(&mut self.touched)
    }

    /// First `(cell, pattern, direction)` where a possible pattern has a zero counter
    ///
    /// `None` means the arc-consistency invariant holds.
    pub fn find_unsupported(
        &self,
        model: &PatternModel,
        topology: &Topology,
    ) -> Option<(usize, usize, usize)> {
        (0..topology.cell_count()).find_map(|cell| {
            topology.neighbors(cell).find_map(|(direction, _)| {
                self.wave
                    .possible_patterns(cell)
                    .find(|&pattern| {
                        pattern < model.pattern_count() && self.compat(cell, pattern, direction) == 0
                    })
                    .map(|pattern| (cell, pattern, direction))
            })
        })
    }

    /// Record an undo to `len`, dropping floors it makes redundant
    ///
    /// A floor at or above `len` can never be the lowest for any cursor that
    /// also sees this undo, so the stack stays strictly increasing and no
    /// deeper than the nesting of undos.
    fn push_undo_floor(&mut self, len: usize) {
        self.undo_count += 1;
        while self
            .undo_floors
            .last()
            .is_some_and(|&(_, target)| target >= len)
        {
            self.undo_floors.pop();
        }
        self.undo_floors.push((self.undo_count, len));
    }

    fn touch(&mut self, cell: usize) {
        if self.touched_flags.get(cell).as_deref() == Some(&false) {
            self.touched_flags.set(cell, true);
            self.touched.push(cell);
        }
    }
}
