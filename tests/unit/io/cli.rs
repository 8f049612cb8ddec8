//! Tests for argument parsing, built-in tilesets and text rendering

#[cfg(test)]
mod tests {
    use clap::Parser;
    use wavetile::algorithm::executor::{Resolution, Solver};
    use wavetile::algorithm::random::RandomSource;
    use wavetile::io::cli::{
        Cli, Scenario, WANG_TILES, build_scenario, chessboard_model, pipe_exits, pipe_model,
        render, wang_model,
    };
    use wavetile::io::configuration::{
        BacktrackKind, DEFAULT_HEIGHT, DEFAULT_SEED, DEFAULT_WIDTH, IndexPickerKind,
    };
    use wavetile::topology::directions::DirectionSet;

    // Tests CLI parsing with no arguments
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_minimal_args() {
        let cli = Cli::parse_from(["program"]);

        assert_eq!(cli.scenario, Scenario::Chessboard);
        assert_eq!(cli.width, DEFAULT_WIDTH);
        assert_eq!(cli.height, DEFAULT_HEIGHT);
        assert_eq!(cli.seed, DEFAULT_SEED);
        assert!(!cli.periodic);
        assert!(cli.should_show_progress());
        assert_eq!(cli.options().backtrack, BacktrackKind::Backtrack);
    }

    // Tests CLI parsing with all available arguments
    // Verified by swapping the picker mapping in options
    #[test]
    fn test_cli_parse_all_args() {
        let cli = Cli::parse_from([
            "program",
            "wang",
            "-w",
            "8",
            "-H",
            "6",
            "-s",
            "7",
            "--periodic",
            "--picker",
            "heap",
            "--backtrack",
            "backjump",
            "--follow-path",
            "--quiet",
            "--verbose",
        ]);

        assert_eq!(cli.scenario, Scenario::Wang);
        assert_eq!((cli.width, cli.height, cli.seed), (8, 6, 7));
        assert!(cli.periodic && cli.verbose && cli.follow_path);
        assert!(!cli.should_show_progress());
        let options = cli.options();
        assert_eq!(options.index_picker, IndexPickerKind::HeapMinEntropy);
        assert_eq!(options.backtrack, BacktrackKind::Backjump);
    }

    // Tests the chessboard model only allows alternating neighbours
    // Verified by allowing a pattern next to itself
    #[test]
    fn test_chessboard_model() {
        let model = chessboard_model().expect("valid model");
        assert_eq!(model.pattern_count(), 2);
        for direction in 0..4 {
            assert_eq!(model.compatible(0, direction), &[1]);
            assert_eq!(model.compatible(1, direction), &[0]);
        }
    }

    // Tests Wang tiles match right edges to left edges and bottoms to tops
    // Verified by comparing the right edge against the right edge
    #[test]
    fn test_wang_model() {
        let model = wang_model().expect("valid model");
        assert_eq!(model.pattern_count(), WANG_TILES.len());
        // "rrrg" has a red right edge; "rggg" has a green left edge
        assert!(!model.compatible(0, DirectionSet::X_PLUS).contains(&2));
        // "brwr" has a red left edge
        assert!(model.compatible(0, DirectionSet::X_PLUS).contains(&8));
        // "wbrb" bottom is r; "rrrg" top is r
        assert!(model.compatible(3, DirectionSet::Y_PLUS).contains(&0));
    }

    // Tests pipe exits line up across every allowed pair
    // Verified by ignoring the neighbour's exit in the model
    #[test]
    fn test_pipe_model() {
        let model = pipe_model().expect("valid model");
        let exits = pipe_exits();
        let has_exit = |pattern: usize, direction: usize| {
            exits
                .get(&pattern)
                .is_some_and(|directions| directions.contains(&direction))
        };
        for pattern in 0..model.pattern_count() {
            for direction in 0..4 {
                for &other in model.compatible(pattern, direction) {
                    assert_eq!(
                        has_exit(pattern, direction),
                        has_exit(other, DirectionSet::inverse(direction))
                    );
                }
            }
        }
    }

    // Tests every scenario builds and the chessboard renders row by row
    // Verified by rendering columns instead of rows
    #[test]
    fn test_build_and_render() {
        for scenario in [Scenario::Chessboard, Scenario::Wang, Scenario::Path] {
            let setup = build_scenario(scenario, 4, 3, false, false).expect("valid scenario");
            assert_eq!(setup.glyphs.len(), setup.model.pattern_count());
        }

        let setup = build_scenario(Scenario::Chessboard, 4, 2, true, false).expect("valid scenario");
        let mut solver = Solver::new(
            setup.model,
            setup.topology,
            setup.constraints,
            Cli::parse_from(["program"]).options(),
            RandomSource::seeded(1),
        )
        .expect("valid solver");
        let fresh = render(&solver, &setup.glyphs).expect("grid topology");
        assert_eq!(fresh, "????\n????\n");

        assert_eq!(solver.run(), Ok(Resolution::Decided));
        let text = render(&solver, &setup.glyphs).expect("grid topology");
        assert!(text == "#.#.\n.#.#\n" || text == ".#.#\n#.#.\n");
    }

    // Tests the path scenario asks for the pick heuristic only when told to
    // Verified by ignoring the follow-path flag
    #[test]
    fn test_follow_path_scenario() {
        let follows = |follow_path| {
            build_scenario(Scenario::Path, 4, 4, false, follow_path)
                .expect("valid scenario")
                .constraints
                .iter()
                .any(|constraint| constraint.path_heuristic().is_some())
        };
        assert!(follows(true));
        assert!(!follows(false));
    }

    // Tests zero-sized grids are rejected
    // Verified by defaulting zero dimensions to one
    #[test]
    fn test_build_scenario_rejects_empty_grid() {
        assert!(build_scenario(Scenario::Chessboard, 0, 4, false, false).is_err());
    }
}
