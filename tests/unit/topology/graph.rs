//! Tests for neighbour-table topologies

#[cfg(test)]
mod tests {
    use wavetile::SolverError;
    use wavetile::topology::Neighbor;
    use wavetile::topology::graph::GraphTopology;

    fn edge(cell: usize, inverse_direction: usize, label: usize) -> Option<Neighbor> {
        Some(Neighbor {
            cell,
            inverse_direction,
            label,
        })
    }

    // Verifies a consistent triangle is accepted with empty slots as boundaries
    // Verified by treating empty slots as errors
    #[test]
    fn test_valid_graph() {
        let graph = GraphTopology::new(vec![
            vec![edge(1, 1, 0), None],
            vec![edge(2, 1, 0), edge(0, 0, 1)],
            vec![None, edge(1, 0, 1)],
        ])
        .expect("valid graph");
        assert_eq!(graph.cell_count(), 3);
        assert_eq!(graph.direction_count(), 2);
        assert_eq!(graph.label_count(), 2);
        assert_eq!(graph.try_move(0, 1), None);
        assert_eq!(graph.try_move(1, 0).map(|n| n.cell), Some(2));
    }

    // Tests ragged rows are rejected
    // Verified by only checking the first row
    #[test]
    fn test_ragged_rows() {
        let result = GraphTopology::new(vec![vec![None, None], vec![None]]);
        assert!(matches!(result, Err(SolverError::InvalidParameter { .. })));
    }

    // Tests edges without a matching back edge are rejected
    // Verified by skipping the inverse lookup
    #[test]
    fn test_missing_inverse() {
        let dangling = GraphTopology::new(vec![vec![edge(1, 0, 0)], vec![None]]);
        assert!(matches!(dangling, Err(SolverError::TopologyMismatch { .. })));
        let outside = GraphTopology::new(vec![vec![edge(4, 0, 0)]]);
        assert!(matches!(outside, Err(SolverError::TopologyMismatch { .. })));
    }
}
