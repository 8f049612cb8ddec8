//! Fixed direction sets for regular grids
//!
//! Directions come in opposing pairs, so the inverse of direction `d` is always `d ^ 1`.

/// Offset table for one direction set, as `(dx, dy, dz)` per direction
type Offsets = &'static [(i64, i64, i64)];

const CARTESIAN_2D: Offsets = &[(1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0)];

const CARTESIAN_3D: Offsets = &[
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

// Axial coordinates: the last pair is the diagonal shared by neighbouring rows
const HEXAGONAL_2D: Offsets = &[
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (1, 1, 0),
    (-1, -1, 0),
];

/// Neighbourhood shape of a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionSet {
    /// X+, X-, Y+, Y-
    Cartesian2d,
    /// X+, X-, Y+, Y-, Z+, Z-
    Cartesian3d,
    /// Six axial hex neighbours
    Hexagonal2d,
}

impl DirectionSet {
    /// X+ in every direction set
    pub const X_PLUS: usize = 0;
    /// X- in every direction set
    pub const X_MINUS: usize = 1;
    /// Y+ in every direction set
    pub const Y_PLUS: usize = 2;
    /// Y- in every direction set
    pub const Y_MINUS: usize = 3;
    /// Z+ for `Cartesian3d`
    pub const Z_PLUS: usize = 4;
    /// Z- for `Cartesian3d`
    pub const Z_MINUS: usize = 5;

    /// Number of directions in the set
    pub const fn count(self) -> usize {
        self.offsets().len()
    }

    /// Opposite of `direction`
    pub const fn inverse(direction: usize) -> usize {
        direction ^ 1
    }

    /// Grid offset for `direction`, or `None` if out of range
    pub fn offset(self, direction: usize) -> Option<(i64, i64, i64)> {
        self.offsets().get(direction).copied()
    }

    /// Direction whose offset equals `(dx, dy, dz)`
    pub fn from_offset(self, dx: i64, dy: i64, dz: i64) -> Option<usize> {
        self.offsets()
            .iter()
            .position(|&offset| offset == (dx, dy, dz))
    }

    /// Whether the set spans the z axis
    pub const fn is_3d(self) -> bool {
        matches!(self, Self::Cartesian3d)
    }

    const fn offsets(self) -> Offsets {
        match self {
            Self::Cartesian2d => CARTESIAN_2D,
            Self::Cartesian3d => CARTESIAN_3D,
            Self::Hexagonal2d => HEXAGONAL_2D,
        }
    }
}
