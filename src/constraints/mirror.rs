//! Reflection symmetry across the centre of a grid axis

use crate::algorithm::bitset::PatternSet;
use crate::algorithm::propagation::TrailCursor;
use crate::constraints::{Constraint, ConstraintContext};
use crate::io::error::{Result, invalid_parameter, topology_mismatch};
use crate::topology::directions::DirectionSet;
use crate::topology::grid::GridTopology;

/// Axis the reflection flips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirrorAxis {
    /// `x -> width - 1 - x`
    X,
    /// `y -> height - 1 - y`
    Y,
}

/// Keeps each cell consistent with its reflected counterpart
///
/// `reflections[p]` is the pattern that `p` becomes when mirrored, or `None`
/// if `p` has no mirror image. Whenever a pattern is banned at a cell, its
/// reflection is banned at the mirrored cell.
#[derive(Debug, Clone)]
pub struct MirrorConstraint {
    axis: MirrorAxis,
    reflections: Vec<Option<usize>>,
    cursor: TrailCursor,
}

impl MirrorConstraint {
    /// Mirror across `axis` using a pattern reflection table
    pub fn new(axis: MirrorAxis, reflections: Vec<Option<usize>>) -> Self {
        Self {
            axis,
            reflections,
            cursor: TrailCursor::default(),
        }
    }

    fn mirror_cell(&self, grid: &GridTopology, cell: usize) -> Option<usize> {
        let (x, y, z) = grid.coords(cell);
        let mirrored = match self.axis {
            MirrorAxis::X => grid.index(grid.width() - 1 - x, y, z),
            MirrorAxis::Y => grid.index(x, grid.height() - 1 - y, z),
        }?;
        grid.contains(mirrored).then_some(mirrored)
    }

    fn reflection(&self, pattern: usize) -> Option<usize> {
        self.reflections.get(pattern).copied().flatten()
    }

    /// Patterns allowed on the central line(s) of the axis
    ///
    /// Odd extents need self-symmetric patterns on the centre line. Even
    /// extents need the cell before the centre to accept its own reflection
    /// on the far side.
    fn central_patterns(&self, context: &ConstraintContext<'_>, extent: usize) -> PatternSet {
        let model = context.model();
        let toward_centre = match self.axis {
            MirrorAxis::X => DirectionSet::X_PLUS,
            MirrorAxis::Y => DirectionSet::Y_PLUS,
        };
        PatternSet::from_patterns(
            model.pattern_count(),
            (0..model.pattern_count()).filter(|&pattern| {
                self.reflection(pattern).is_some_and(|reflected| {
                    if extent % 2 == 1 {
                        reflected == pattern
                    } else {
                        model
                            .compatible(pattern, toward_centre)
                            .contains(&reflected)
                    }
                })
            }),
        )
    }
}

impl Constraint for MirrorConstraint {
    fn init(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        let pattern_count = context.pattern_count();
        if self.reflections.len() != pattern_count {
            return Err(invalid_parameter(
                "reflections",
                &self.reflections.len(),
                &format!("expected one entry per pattern ({pattern_count})"),
            ));
        }
        if let Some(bad) = self
            .reflections
            .iter()
            .flatten()
            .find(|&&reflected| reflected >= pattern_count)
        {
            return Err(invalid_parameter(
                "reflections",
                bad,
                &"not a pattern id",
            ));
        }
        let grid = context.grid()?.clone();
        if grid.directions() == DirectionSet::Hexagonal2d {
            return Err(topology_mismatch(&"mirror needs a cartesian grid"));
        }

        let reflectable = PatternSet::from_patterns(
            pattern_count,
            (0..pattern_count).filter(|&pattern| self.reflection(pattern).is_some()),
        );
        for cell in (0..grid.cell_count()).filter(|&cell| grid.contains(cell)) {
            if self.mirror_cell(&grid, cell).is_some() {
                context.select_set(cell, &reflectable)?;
            }
        }

        let extent = match self.axis {
            MirrorAxis::X => grid.width(),
            MirrorAxis::Y => grid.height(),
        };
        let central = self.central_patterns(context, extent);
        let centre = if extent % 2 == 1 {
            extent / 2
        } else {
            (extent / 2).saturating_sub(1)
        };
        for cell in (0..grid.cell_count()).filter(|&cell| grid.contains(cell)) {
            let (x, y, _) = grid.coords(cell);
            let position = match self.axis {
                MirrorAxis::X => x,
                MirrorAxis::Y => y,
            };
            if position == centre && self.mirror_cell(&grid, cell).is_some() {
                context.select_set(cell, &central)?;
            }
        }
        Ok(())
    }

    fn check(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        let grid = context.grid()?.clone();
        for cell in context.changed_cells(&mut self.cursor) {
            let Some(mirrored) = self.mirror_cell(&grid, cell) else {
                continue;
            };
            for pattern in 0..context.pattern_count() {
                let Some(reflected) = self.reflection(pattern) else {
                    continue;
                };
                if !context.is_possible(cell, pattern) && context.is_possible(mirrored, reflected) {
                    context.ban(mirrored, reflected)?;
                }
            }
        }
        Ok(())
    }
}
