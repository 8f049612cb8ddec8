//! Regular grid topology with per-axis wraparound and an optional mask

use crate::io::error::{Result, invalid_parameter, topology_mismatch};
use crate::topology::directions::DirectionSet;
use bitvec::prelude::*;

/// Rectangular (or hexagonal) grid of `width * height * depth` cells
///
/// Cells are indexed `x + y * width + z * width * height`. Masked-out cells
/// keep their index but have no edges, are never picked, and do not count
/// toward a decided result.
#[derive(Clone, Debug)]
pub struct GridTopology {
    directions: DirectionSet,
    width: usize,
    height: usize,
    depth: usize,
    periodic: [bool; 3],
    mask: Option<BitVec>,
}

impl GridTopology {
    /// Create a bounded grid
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is zero, or if `depth > 1` with a 2d direction set
    pub fn new(
        directions: DirectionSet,
        width: usize,
        height: usize,
        depth: usize,
    ) -> Result<Self> {
        for (parameter, value) in [("width", width), ("height", height), ("depth", depth)] {
            if value == 0 {
                return Err(invalid_parameter(parameter, &value, &"must be positive"));
            }
        }
        if depth > 1 && !directions.is_3d() {
            return Err(topology_mismatch(&format!(
                "depth {depth} requires a 3d direction set, got {directions:?}"
            )));
        }

        Ok(Self {
            directions,
            width,
            height,
            depth,
            periodic: [false; 3],
            mask: None,
        })
    }

    /// Create a square-celled 2d grid, optionally wrapping on both axes
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero
    pub fn cartesian_2d(width: usize, height: usize, periodic: bool) -> Result<Self> {
        Ok(Self::new(DirectionSet::Cartesian2d, width, height, 1)?.with_periodic(
            periodic, periodic, false,
        ))
    }

    /// Set wraparound per axis
    #[must_use]
    pub const fn with_periodic(mut self, x: bool, y: bool, z: bool) -> Self {
        self.periodic = [x, y, z];
        self
    }

    /// Restrict the grid to cells whose mask bit is set
    ///
    /// # Errors
    ///
    /// Returns an error if the mask length differs from the cell count
    pub fn with_mask(mut self, mask: BitVec) -> Result<Self> {
        if mask.len() != self.cell_count() {
            return Err(invalid_parameter(
                "mask",
                &mask.len(),
                &format!("expected {} entries", self.cell_count()),
            ));
        }
        self.mask = Some(mask);
        Ok(self)
    }

    /// Direction set of the grid
    pub const fn directions(&self) -> DirectionSet {
        self.directions
    }

    /// Width (x extent)
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height (y extent)
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Depth (z extent)
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Wraparound flags for x, y and z
    pub const fn periodic(&self) -> [bool; 3] {
        self.periodic
    }

    /// Total number of cell indices, masked or not
    pub const fn cell_count(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Cell index for a coordinate, if inside the grid
    pub const fn index(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        if x < self.width && y < self.height && z < self.depth {
            Some(x + y * self.width + z * self.width * self.height)
        } else {
            None
        }
    }

    /// Coordinate of a cell index
    pub const fn coords(&self, cell: usize) -> (usize, usize, usize) {
        let x = cell % self.width;
        let y = (cell / self.width) % self.height;
        let z = cell / (self.width * self.height);
        (x, y, z)
    }

    /// Whether the cell exists and is not masked out
    pub fn contains(&self, cell: usize) -> bool {
        if cell >= self.cell_count() {
            return false;
        }
        self.mask
            .as_ref()
            .is_none_or(|mask| mask.get(cell).as_deref() == Some(&true))
    }

    /// Step from `cell` in `direction`, returning the neighbour and the direction back
    pub fn try_move(&self, cell: usize, direction: usize) -> Option<(usize, usize)> {
        if !self.contains(cell) {
            return None;
        }
        let (dx, dy, dz) = self.directions.offset(direction)?;
        let (x, y, z) = self.coords(cell);

        let x2 = step_axis(x, dx, self.width, self.periodic[0])?;
        let y2 = step_axis(y, dy, self.height, self.periodic[1])?;
        let z2 = step_axis(z, dz, self.depth, self.periodic[2])?;

        let neighbor = self.index(x2, y2, z2)?;
        self.contains(neighbor)
            .then_some((neighbor, DirectionSet::inverse(direction)))
    }
}

fn step_axis(position: usize, delta: i64, extent: usize, periodic: bool) -> Option<usize> {
    let extent = extent as i64;
    let moved = position as i64 + delta;
    if periodic {
        Some(moved.rem_euclid(extent) as usize)
    } else if (0..extent).contains(&moved) {
        Some(moved as usize)
    } else {
        None
    }
}
