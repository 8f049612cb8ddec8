//! Tests for the iterative cut-vertex search

#[cfg(test)]
mod tests {
    use wavetile::constraints::path::articulation::{SimpleGraph, articulation_points};

    fn line(length: usize) -> SimpleGraph {
        SimpleGraph::new(
            (0..length)
                .map(|node| {
                    let mut edges = Vec::new();
                    if node > 0 {
                        edges.push(node - 1);
                    }
                    if node + 1 < length {
                        edges.push(node + 1);
                    }
                    edges
                })
                .collect(),
        )
    }

    // Verifies inner nodes of a line are cut vertices and its ends are not
    // Verified by marking the root whenever it has one child
    #[test]
    fn test_line() {
        let info = articulation_points(&line(3), &[true; 3], None);
        assert_eq!(info.is_articulation, vec![false, true, false]);
        assert_eq!(info.component_count, 1);
    }

    // Tests a cycle has no cut vertices
    // Verified by ignoring back edges when computing low
    #[test]
    fn test_cycle() {
        let graph = SimpleGraph::new(vec![vec![1, 3], vec![0, 2], vec![1, 3], vec![2, 0]]);
        let info = articulation_points(&graph, &[true; 4], None);
        assert_eq!(info.is_articulation, vec![false; 4]);
    }

    // Tests a node only separating irrelevant nodes is not a cut vertex
    // Verified by counting every child subtree as relevant
    #[test]
    fn test_relevance() {
        let relevant = [true, false, true, false];
        let info = articulation_points(&line(4), &[true; 4], Some(&relevant));
        assert_eq!(info.is_articulation, vec![false, true, false, false]);
    }

    // Tests unwalkable nodes split components and are never reached
    // Verified by walking through unwalkable nodes
    #[test]
    fn test_components() {
        let info = articulation_points(&line(3), &[true, false, true], None);
        assert_eq!(info.component_count, 2);
        assert_eq!(info.component, vec![Some(0), None, Some(1)]);
    }

    // Tests edges leaving the graph are ignored even if the walkable slice covers them
    // Verified by checking walkable alone before indexing
    #[test]
    fn test_dangling_edge() {
        let graph = SimpleGraph::new(vec![vec![1, 5], vec![0]]);
        let info = articulation_points(&graph, &[true; 8], None);
        assert_eq!(info.is_articulation, vec![false, false]);
        assert_eq!(info.component, vec![Some(0), Some(0)]);
        assert_eq!(info.component_count, 1);
    }

    // Tests components without a relevant node are skipped
    // Verified by rooting searches at irrelevant nodes
    #[test]
    fn test_irrelevant_component_skipped() {
        let relevant = [true, false, false];
        let info = articulation_points(&line(3), &[true, false, true], Some(&relevant));
        assert_eq!(info.component_count, 1);
        assert_eq!(info.component.get(2), Some(&None));
    }

    // Tests a long line does not exhaust the call stack
    // Verified by recursing per node
    #[test]
    fn test_deep_graph() {
        let length = 200_000;
        let info = articulation_points(&line(length), &vec![true; length], None);
        assert_eq!(info.is_articulation.iter().filter(|&&cut| cut).count(), length - 2);
    }
}
