//! Arbitrary adjacency graphs with per-edge compatibility labels

use crate::io::error::{Result, invalid_parameter, topology_mismatch};
use crate::topology::Neighbor;

/// Topology given explicitly as a neighbour table
///
/// Each cell has up to `direction_count` outgoing slots. A slot may be empty,
/// which behaves like a grid boundary. The inverse slot and the edge label are
/// read from the table rather than computed.
#[derive(Clone, Debug)]
pub struct GraphTopology {
    neighbors: Vec<Vec<Option<Neighbor>>>,
    direction_count: usize,
    label_count: usize,
}

impl GraphTopology {
    /// Build from `neighbors[cell][direction]`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Rows have differing lengths
    /// - An entry points outside the cell range or uses an inverse slot out of range
    /// - An edge's inverse slot does not point back to its source
    pub fn new(neighbors: Vec<Vec<Option<Neighbor>>>) -> Result<Self> {
        let direction_count = neighbors.first().map_or(0, Vec::len);
        let cell_count = neighbors.len();
        let mut label_count = 0;

        for (cell, row) in neighbors.iter().enumerate() {
            if row.len() != direction_count {
                return Err(invalid_parameter(
                    "neighbors",
                    &row.len(),
                    &format!("cell {cell} has a different slot count than cell 0"),
                ));
            }
            for (direction, entry) in row.iter().enumerate() {
                let Some(neighbor) = entry else { continue };
                if neighbor.cell >= cell_count || neighbor.inverse_direction >= direction_count {
                    return Err(topology_mismatch(&format!(
                        "edge ({cell}, {direction}) points outside the graph"
                    )));
                }
                let back = neighbors
                    .get(neighbor.cell)
                    .and_then(|target| target.get(neighbor.inverse_direction))
                    .copied()
                    .flatten();
                if back.map(|edge| edge.cell) != Some(cell) {
                    return Err(topology_mismatch(&format!(
                        "edge ({cell}, {direction}) has no matching inverse edge"
                    )));
                }
                label_count = label_count.max(neighbor.label + 1);
            }
        }

        Ok(Self {
            neighbors,
            direction_count,
            label_count,
        })
    }

    /// Number of cells
    pub const fn cell_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Slots per cell
    pub const fn direction_count(&self) -> usize {
        self.direction_count
    }

    /// One more than the largest edge label in use
    pub const fn label_count(&self) -> usize {
        self.label_count
    }

    /// Neighbour in slot `direction` of `cell`
    pub fn try_move(&self, cell: usize, direction: usize) -> Option<Neighbor> {
        self.neighbors.get(cell)?.get(direction).copied().flatten()
    }
}
