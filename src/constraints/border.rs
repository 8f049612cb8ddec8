//! Restrictions on cells along the grid boundary

use crate::algorithm::bitset::PatternSet;
use crate::constraints::{Constraint, ConstraintContext};
use crate::io::error::Result;
use std::ops::BitOr;

/// Set of grid faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BorderSides(u8);

impl BorderSides {
    /// No faces
    pub const NONE: Self = Self(0);
    /// x = 0
    pub const X_MIN: Self = Self(0x01);
    /// x = width - 1
    pub const X_MAX: Self = Self(0x02);
    /// y = 0
    pub const Y_MIN: Self = Self(0x04);
    /// y = height - 1
    pub const Y_MAX: Self = Self(0x08);
    /// z = 0
    pub const Z_MIN: Self = Self(0x10);
    /// z = depth - 1
    pub const Z_MAX: Self = Self(0x20);
    /// Every face
    pub const ALL: Self = Self(0x3F);

    /// Whether every face in `other` is in `self`
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether a cell touching the flagged faces lies on any face in `self`
    const fn touches(self, on: [bool; 6]) -> bool {
        let faces = [
            Self::X_MIN,
            Self::X_MAX,
            Self::Y_MIN,
            Self::Y_MAX,
            Self::Z_MIN,
            Self::Z_MAX,
        ];
        let mut i = 0;
        while i < faces.len() {
            if on[i] && self.contains(faces[i]) {
                return true;
            }
            i += 1;
        }
        false
    }
}

impl BitOr for BorderSides {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Forces or forbids `patterns` on the selected faces of the grid
///
/// Applied once in `init`; `check` does nothing.
#[derive(Debug, Clone)]
pub struct BorderConstraint {
    patterns: PatternSet,
    sides: BorderSides,
    exclude_sides: BorderSides,
    invert_area: bool,
    ban: bool,
}

impl BorderConstraint {
    /// Select `patterns` on every face
    pub const fn new(patterns: PatternSet) -> Self {
        Self {
            patterns,
            sides: BorderSides::ALL,
            exclude_sides: BorderSides::NONE,
            invert_area: false,
            ban: false,
        }
    }

    /// Restrict to these faces
    #[must_use]
    pub const fn sides(mut self, sides: BorderSides) -> Self {
        self.sides = sides;
        self
    }

    /// Skip cells on these faces, even where they meet an included face
    #[must_use]
    pub const fn exclude_sides(mut self, sides: BorderSides) -> Self {
        self.exclude_sides = sides;
        self
    }

    /// Apply to every cell not matched instead
    #[must_use]
    pub const fn invert_area(mut self) -> Self {
        self.invert_area = true;
        self
    }

    /// Ban the patterns instead of selecting them
    #[must_use]
    pub const fn ban(mut self) -> Self {
        self.ban = true;
        self
    }
}

impl Constraint for BorderConstraint {
    fn init(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        let grid = context.grid()?;
        // Flat grids have no z faces
        let layered = grid.depth() > 1;
        for cell in (0..grid.cell_count()).filter(|&cell| grid.contains(cell)) {
            let (x, y, z) = grid.coords(cell);
            let on = [
                x == 0,
                x + 1 == grid.width(),
                y == 0,
                y + 1 == grid.height(),
                layered && z == 0,
                layered && z + 1 == grid.depth(),
            ];
            let matched =
                (self.sides.touches(on) && !self.exclude_sides.touches(on)) != self.invert_area;
            if !matched {
                continue;
            }
            if self.ban {
                context.ban_set(cell, &self.patterns)?;
            } else {
                context.select_set(cell, &self.patterns)?;
            }
        }
        Ok(())
    }

    fn check(&mut self, _context: &mut ConstraintContext<'_>) -> Result<()> {
        Ok(())
    }
}
