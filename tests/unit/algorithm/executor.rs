//! Tests for the search loop and the solver's public surface

#[cfg(test)]
mod tests {
    use wavetile::SolverError;
    use wavetile::algorithm::bitset::PatternSet;
    use wavetile::algorithm::executor::{Resolution, Solver};
    use wavetile::algorithm::priority::{CellWeights, PriorityWeight, WeightSet};
    use wavetile::algorithm::random::RandomSource;
    use wavetile::io::configuration::{
        BacktrackKind, IndexPickerKind, PatternPickerKind, SolverOptions,
    };
    use wavetile::model::builder::AdjacencyBuilder;
    use wavetile::model::pattern::PatternModel;
    use wavetile::topology::directions::DirectionSet;
    use wavetile::topology::graph::GraphTopology;
    use wavetile::topology::grid::GridTopology;
    use wavetile::topology::{Neighbor, Topology};

    fn chessboard() -> PatternModel {
        let mut builder = AdjacencyBuilder::new(DirectionSet::Cartesian2d, 2);
        for direction in 0..4 {
            builder.allow(0, 1, direction).expect("valid rule");
        }
        builder.build().expect("valid model")
    }

    fn solver(width: usize, height: usize, periodic: bool, options: SolverOptions) -> Solver {
        let grid = GridTopology::cartesian_2d(width, height, periodic).expect("valid grid");
        Solver::new(chessboard(), grid, Vec::new(), options, RandomSource::seeded(5))
            .expect("valid solver")
    }

    // Verifies an even torus solves to alternating patterns
    // Verified by selecting without propagating
    #[test]
    fn test_run_decides_chessboard() {
        let mut solver = solver(4, 4, true, SolverOptions::default());
        assert_eq!(solver.run(), Ok(Resolution::Decided));
        assert_eq!(solver.status(), Resolution::Decided);

        let decided = solver.decided_patterns();
        assert!(decided.iter().all(Option::is_some));
        let first = decided.first().copied().flatten();
        assert_eq!(decided.get(1).copied().flatten(), first.map(|p| 1 - p));
        assert_eq!(decided.get(5).copied().flatten(), first);
    }

    // Tests an odd torus ends in contradiction after exhausting choices
    // Verified by treating an empty choice stack as decided
    #[test]
    fn test_run_odd_torus_contradiction() {
        let mut solver = solver(3, 3, true, SolverOptions::default());
        assert_eq!(solver.run(), Ok(Resolution::Contradiction));
        assert_eq!(solver.backtrack_count(), 1);
        assert_eq!(solver.choice_depth(), 0);
    }

    // Tests disabling backtracking stops at the first contradiction
    // Verified by recording choices when backtracking is off
    #[test]
    fn test_no_backtracking() {
        let options = SolverOptions {
            backtrack: BacktrackKind::None,
            ..SolverOptions::default()
        };
        let mut solver = solver(3, 3, true, options);
        assert_eq!(solver.run(), Ok(Resolution::Contradiction));
        assert_eq!(solver.backtrack_count(), 0);
    }

    // Tests step makes one decision at a time
    // Verified by running to completion inside step
    #[test]
    fn test_step_single_decision() {
        let options = SolverOptions {
            index_picker: IndexPickerKind::Ordered,
            ..SolverOptions::default()
        };
        let mut solver = solver(4, 1, false, options);
        assert_eq!(solver.step(), Ok(Resolution::Undecided));
        assert_eq!(solver.step_count(), 1);
        assert_eq!(solver.choice_depth(), 1);
        // One choice decides a path graph of alternating patterns
        assert_eq!(solver.step(), Ok(Resolution::Decided));
    }

    // Tests external bans propagate and report the resolution
    // Verified by skipping propagate after an external ban
    #[test]
    fn test_external_ban_and_select() {
        let mut solver = solver(2, 1, false, SolverOptions::default());
        assert_eq!(solver.ban(0, 0), Ok(Resolution::Undecided));
        assert_eq!(solver.decided_pattern(1), Some(0));
        assert_eq!(solver.possible_patterns(0), vec![1]);
        assert!(!solver.is_possible(1, 1));

        assert_eq!(
            solver.select(0, 0),
            Err(SolverError::PatternAlreadyBanned {
                cell: 0,
                pattern: 0
            })
        );
        assert_eq!(
            solver.ban(7, 0),
            Err(SolverError::CellOutOfRange {
                cell: 7,
                cell_count: 2
            })
        );
    }

    // Tests an external selection made after a choice is unwound with that choice
    // Verified by restoring only the choice's own bans on undo
    #[test]
    fn test_external_select_joins_choice_segment() {
        let model = AdjacencyBuilder::new(DirectionSet::Cartesian2d, 2)
            .allow_all()
            .build()
            .expect("valid model");
        let grid = GridTopology::cartesian_2d(2, 1, false).expect("valid grid");
        let options = SolverOptions {
            index_picker: IndexPickerKind::Ordered,
            pattern_picker: PatternPickerKind::Ordered,
            ..SolverOptions::default()
        };
        let mut solver = Solver::new(model, grid, Vec::new(), options, RandomSource::seeded(0))
            .expect("valid solver");

        assert_eq!(solver.step(), Ok(Resolution::Undecided));
        assert_eq!(solver.decided_pattern(0), Some(0));
        assert_eq!(solver.select(1, 1), Ok(Resolution::Undecided));
        assert_eq!(solver.ban(0, 0), Ok(Resolution::Contradiction));

        assert_eq!(solver.step(), Ok(Resolution::Undecided));
        assert_eq!(solver.backtrack_count(), 1);
        assert_eq!(solver.possible_patterns(0), vec![1]);
        assert_eq!(solver.possible_patterns(1), vec![0, 1]);
    }

    // Tests selecting an impossible set yields contradiction rather than an error
    // Verified by returning an error for an empty intersection
    #[test]
    fn test_select_set_contradiction() {
        let mut solver = solver(2, 1, false, SolverOptions::default());
        solver.ban(0, 0).expect("in range");
        let result = solver.select_set(0, &PatternSet::from_patterns(2, [0]));
        assert_eq!(result, Ok(Resolution::Contradiction));
    }

    // Tests invalid options are rejected at construction
    // Verified by skipping option validation in new
    #[test]
    fn test_invalid_options() {
        let options = SolverOptions {
            backtrack: BacktrackKind::Constant(0),
            ..SolverOptions::default()
        };
        let grid = GridTopology::cartesian_2d(2, 2, false).expect("valid grid");
        let result = Solver::new(chessboard(), grid, Vec::new(), options, RandomSource::seeded(0));
        assert!(matches!(result, Err(SolverError::InvalidParameter { .. })));
    }

    // Tests the ordered picker follows an explicit index order
    // Verified by ignoring the index order option
    #[test]
    fn test_index_order_option() {
        let model = AdjacencyBuilder::new(DirectionSet::Cartesian2d, 2)
            .allow_all()
            .build()
            .expect("valid model");
        let grid = GridTopology::cartesian_2d(3, 1, false).expect("valid grid");
        let options = SolverOptions {
            index_picker: IndexPickerKind::Ordered,
            pattern_picker: PatternPickerKind::Ordered,
            index_order: Some(vec![2, 1, 0]),
            ..SolverOptions::default()
        };
        let mut solver = Solver::new(model, grid, Vec::new(), options, RandomSource::seeded(0))
            .expect("valid solver");

        assert_eq!(solver.step(), Ok(Resolution::Undecided));
        assert_eq!(solver.decided_pattern(2), Some(0));
        assert_eq!(solver.decided_pattern(0), None);
    }

    // Tests the array-priority pickers solve toward the top tier
    // Verified by ranking tiers in ascending priority
    #[test]
    fn test_array_priority_solve() {
        let model = AdjacencyBuilder::new(DirectionSet::Cartesian2d, 2)
            .allow_all()
            .build()
            .expect("valid model");
        let grid = GridTopology::cartesian_2d(3, 2, false).expect("valid grid");
        let preferred = WeightSet::new(&[
            PriorityWeight {
                priority: 0,
                weight: 9.0,
            },
            PriorityWeight {
                priority: 1,
                weight: 1.0,
            },
        ])
        .expect("valid weights");
        let options = SolverOptions {
            index_picker: IndexPickerKind::ArrayPriorityMinEntropy,
            cell_weights: Some(CellWeights::uniform(preferred, 6)),
            ..SolverOptions::default()
        };
        let mut solver = Solver::new(model, grid, Vec::new(), options, RandomSource::seeded(2))
            .expect("valid solver");

        assert_eq!(solver.run(), Ok(Resolution::Decided));
        assert!(solver.decided_patterns().iter().all(|&pattern| pattern == Some(1)));
    }

    // Tests cell weights sized for another topology are rejected
    // Verified by skipping the weight validation in new
    #[test]
    fn test_cell_weights_mismatch() {
        let weights = CellWeights::uniform(
            WeightSet::from_weights(&[1.0, 1.0]).expect("valid weights"),
            3,
        );
        let options = SolverOptions {
            pattern_picker: PatternPickerKind::ArrayPriority,
            cell_weights: Some(weights),
            ..SolverOptions::default()
        };
        let grid = GridTopology::cartesian_2d(2, 2, false).expect("valid grid");
        let result = Solver::new(chessboard(), grid, Vec::new(), options, RandomSource::seeded(0));
        assert!(matches!(result, Err(SolverError::InvalidParameter { .. })));
    }

    // Tests a model with too few labels is rejected
    // Verified by removing the label count comparison
    #[test]
    fn test_label_mismatch() {
        let model = PatternModel::new(vec![1.0], vec![vec![vec![0]; 2]]).expect("valid model");
        let grid = GridTopology::cartesian_2d(2, 2, false).expect("valid grid");
        let result = Solver::new(
            model,
            grid,
            Vec::new(),
            SolverOptions::default(),
            RandomSource::seeded(0),
        );
        assert!(matches!(result, Err(SolverError::TopologyMismatch { .. })));
    }

    // Tests the array view is laid out as depth, height, width
    // Verified by swapping the width and height axes
    #[test]
    fn test_to_array_shape() {
        let mut solver = solver(4, 2, false, SolverOptions::default());
        solver.run().expect("solvable");
        let array = solver.to_array().expect("grid topology");
        assert_eq!(array.shape(), &[1, 2, 4]);
        assert_eq!(array[[0, 1, 3]], solver.decided_pattern(7));
    }

    // Tests graph topologies solve and refuse the grid array view
    // Verified by using the direction instead of the edge label
    #[test]
    fn test_graph_topology() {
        // Two cells joined by one edge with label 0 in both directions
        let edge = |cell| {
            Some(Neighbor {
                cell,
                inverse_direction: 0,
                label: 0,
            })
        };
        let graph = GraphTopology::new(vec![vec![edge(1)], vec![edge(0)]]).expect("valid graph");
        let model =
            PatternModel::new(vec![1.0, 1.0], vec![vec![vec![1]], vec![vec![0]]]).expect("model");
        let mut solver = Solver::new(
            model,
            Topology::Graph(graph),
            Vec::new(),
            SolverOptions::default(),
            RandomSource::seeded(0),
        )
        .expect("valid solver");

        assert_eq!(solver.run(), Ok(Resolution::Decided));
        assert_ne!(solver.decided_pattern(0), solver.decided_pattern(1));
        assert!(matches!(
            solver.to_array(),
            Err(SolverError::TopologyMismatch { .. })
        ));
    }
}
