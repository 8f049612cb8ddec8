//! Cell adjacency shared by the propagator, pickers, and constraints

/// Fixed direction sets for regular grids
pub mod directions;
/// Explicit neighbour-table topology with edge labels
pub mod graph;
/// Regular grids with wraparound and masks
pub mod grid;

use crate::topology::graph::GraphTopology;
use crate::topology::grid::GridTopology;

/// One outgoing edge of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Neighbor {
    /// Cell on the far side of the edge
    pub cell: usize,
    /// Direction slot at `cell` that leads back
    pub inverse_direction: usize,
    /// Compatibility label selecting the propagator column
    pub label: usize,
}

/// Adjacency over indexed cells
#[derive(Clone, Debug)]
pub enum Topology {
    /// Regular grid; edge label equals the direction
    Grid(GridTopology),
    /// Explicit graph with per-edge labels
    Graph(GraphTopology),
}

impl Topology {
    /// Number of cell indices
    pub const fn cell_count(&self) -> usize {
        match self {
            Self::Grid(grid) => grid.cell_count(),
            Self::Graph(graph) => graph.cell_count(),
        }
    }

    /// Direction slots per cell
    pub const fn direction_count(&self) -> usize {
        match self {
            Self::Grid(grid) => grid.directions().count(),
            Self::Graph(graph) => graph.direction_count(),
        }
    }

    /// Number of distinct edge labels the model must provide columns for
    pub const fn label_count(&self) -> usize {
        match self {
            Self::Grid(grid) => grid.directions().count(),
            Self::Graph(graph) => graph.label_count(),
        }
    }

    /// Whether the cell takes part in the solve
    pub fn contains(&self, cell: usize) -> bool {
        match self {
            Self::Grid(grid) => grid.contains(cell),
            Self::Graph(graph) => cell < graph.cell_count(),
        }
    }

    /// Follow one edge, or `None` at a boundary or masked cell
    pub fn try_move(&self, cell: usize, direction: usize) -> Option<Neighbor> {
        match self {
            Self::Grid(grid) => grid
                .try_move(cell, direction)
                .map(|(neighbor, inverse_direction)| Neighbor {
                    cell: neighbor,
                    inverse_direction,
                    label: direction,
                }),
            Self::Graph(graph) => graph.try_move(cell, direction),
        }
    }

    /// Every edge leaving `cell` as `(direction, neighbor)`
    pub fn neighbors(&self, cell: usize) -> impl Iterator<Item = (usize, Neighbor)> + '_ {
        (0..self.direction_count())
            .filter_map(move |direction| Some((direction, self.try_move(cell, direction)?)))
    }

    /// Grid view, if this is a grid
    pub const fn as_grid(&self) -> Option<&GridTopology> {
        match self {
            Self::Grid(grid) => Some(grid),
            Self::Graph(_) => None,
        }
    }
}

impl From<GridTopology> for Topology {
    fn from(grid: GridTopology) -> Self {
        Self::Grid(grid)
    }
}

impl From<GraphTopology> for Topology {
    fn from(graph: GraphTopology) -> Self {
        Self::Graph(graph)
    }
}
