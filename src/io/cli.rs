//! Command-line demo: solve a built-in tileset and print it as text

use crate::algorithm::executor::{Resolution, Solver};
use crate::algorithm::random::RandomSource;
use crate::constraints::Constraint;
use crate::constraints::path::PathSpec;
use crate::constraints::path::connected::ConnectedConstraint;
use crate::constraints::path::looped::LoopConstraint;
use crate::io::configuration::{
    BacktrackKind, DEFAULT_HEIGHT, DEFAULT_SEED, DEFAULT_WIDTH, IndexPickerKind,
    PROGRESS_REFRESH_STEPS, PatternPickerKind, SolverOptions,
};
use crate::io::error::Result;
use crate::io::progress::ProgressReporter;
use crate::model::builder::AdjacencyBuilder;
use crate::model::pattern::PatternModel;
use crate::topology::directions::DirectionSet;
use crate::topology::grid::GridTopology;
use clap::{Parser, ValueEnum};
use std::collections::BTreeMap;

/// Wang tile edge colours, clockwise from the top
pub const WANG_TILES: [&str; 11] = [
    "rrrg", "brbg", "rggg", "wbrb", "bbwb", "wwrw", "rgbw", "bwbr", "brwr", "ggbr", "rwrg",
];

// Pipe pieces as (glyph, exits); y grows downwards
const PIPES: [(char, &[usize]); 7] = [
    (' ', &[]),
    ('─', &[DirectionSet::X_PLUS, DirectionSet::X_MINUS]),
    ('│', &[DirectionSet::Y_PLUS, DirectionSet::Y_MINUS]),
    ('┌', &[DirectionSet::X_PLUS, DirectionSet::Y_PLUS]),
    ('┐', &[DirectionSet::X_MINUS, DirectionSet::Y_PLUS]),
    ('└', &[DirectionSet::X_PLUS, DirectionSet::Y_MINUS]),
    ('┘', &[DirectionSet::X_MINUS, DirectionSet::Y_MINUS]),
];

/// Built-in tilesets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Two colours that may never touch themselves
    Chessboard,
    /// Eleven Wang tiles matched by edge colour
    Wang,
    /// Pipe pieces closed into one loop
    Path,
}

/// Cell picker choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PickerArg {
    /// Linear minimum-entropy scan
    MinEntropy,
    /// Heap-backed minimum entropy
    Heap,
    /// First undecided cell
    Ordered,
}

/// Contradiction recovery choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BacktrackArg {
    /// Stop at the first contradiction
    None,
    /// Undo the latest choice
    Backtrack,
    /// Patience backjumping
    Backjump,
}

#[derive(Parser)]
#[command(name = "wavetile")]
#[command(
    author,
    version,
    about = "Solve a tiling by constraint propagation and backtracking"
)]
/// Command-line arguments for the demo solver
// Each flag toggles an independent demo feature
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Tileset to solve
    #[arg(value_enum, default_value_t = Scenario::Chessboard)]
    pub scenario: Scenario,

    /// Grid width in cells
    #[arg(short = 'w', long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Grid height in cells
    #[arg(short = 'H', long, default_value_t = DEFAULT_HEIGHT)]
    pub height: usize,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Wrap the grid around in both axes
    #[arg(short, long)]
    pub periodic: bool,

    /// How the next cell is chosen
    #[arg(long, value_enum, default_value_t = PickerArg::MinEntropy)]
    pub picker: PickerArg,

    /// What happens on contradiction
    #[arg(short, long, value_enum, default_value_t = BacktrackArg::Backtrack)]
    pub backtrack: BacktrackArg,

    /// Grow the path scenario outwards from cells already on it
    #[arg(long)]
    pub follow_path: bool,

    /// Log solver decisions at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress the progress spinner
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Solver options matching the flags
    pub const fn options(&self) -> SolverOptions {
        SolverOptions {
            index_picker: match self.picker {
                PickerArg::MinEntropy => IndexPickerKind::MinEntropy,
                PickerArg::Heap => IndexPickerKind::HeapMinEntropy,
                PickerArg::Ordered => IndexPickerKind::Ordered,
            },
            pattern_picker: PatternPickerKind::Weighted,
            backtrack: match self.backtrack {
                BacktrackArg::None => BacktrackKind::None,
                BacktrackArg::Backtrack => BacktrackKind::Backtrack,
                BacktrackArg::Backjump => BacktrackKind::Backjump,
            },
            max_backtrack_depth: None,
            max_backtracks: None,
            index_order: None,
            cell_weights: None,
        }
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Everything needed to start a solve for one tileset
pub struct ScenarioSetup {
    /// Adjacency model
    pub model: PatternModel,
    /// Grid to fill
    pub topology: GridTopology,
    /// Extra rules
    pub constraints: Vec<Box<dyn Constraint>>,
    /// Character drawn for each pattern
    pub glyphs: Vec<char>,
}

/// Two patterns, each only allowed next to the other
///
/// # Errors
///
/// Returns an error if the model fails validation
pub fn chessboard_model() -> Result<PatternModel> {
    let mut builder = AdjacencyBuilder::new(DirectionSet::Cartesian2d, 2);
    for direction in 0..DirectionSet::Cartesian2d.count() {
        builder.allow(0, 1, direction)?;
    }
    builder.build()
}

/// Wang tiles whose touching edges share a colour
///
/// # Errors
///
/// Returns an error if the model fails validation
pub fn wang_model() -> Result<PatternModel> {
    let edges: Vec<Vec<char>> = WANG_TILES.iter().map(|t| t.chars().collect()).collect();
    let side = |tile: &Vec<char>, index: usize| tile.get(index).copied();
    let mut builder = AdjacencyBuilder::new(DirectionSet::Cartesian2d, edges.len());
    for (a, first) in edges.iter().enumerate() {
        for (b, second) in edges.iter().enumerate() {
            // right of a against left of b
            if side(first, 1) == side(second, 3) {
                builder.allow(a, b, DirectionSet::X_PLUS)?;
            }
            // bottom of a against top of b
            if side(first, 2) == side(second, 0) {
                builder.allow(a, b, DirectionSet::Y_PLUS)?;
            }
        }
    }
    builder.build()
}

/// Exits of every pipe piece, keyed by pattern
pub fn pipe_exits() -> BTreeMap<usize, Vec<usize>> {
    PIPES
        .iter()
        .enumerate()
        .filter(|(_, (_, exits))| !exits.is_empty())
        .map(|(pattern, (_, exits))| (pattern, exits.to_vec()))
        .collect()
}

/// Pipe pieces whose exits line up across every edge
///
/// # Errors
///
/// Returns an error if the model fails validation
pub fn pipe_model() -> Result<PatternModel> {
    let mut builder = AdjacencyBuilder::new(DirectionSet::Cartesian2d, PIPES.len());
    // Keep the map mostly empty
    builder.set_frequency(0, 4.0)?;
    for (a, (_, first)) in PIPES.iter().enumerate() {
        for (b, (_, second)) in PIPES.iter().enumerate() {
            for direction in [DirectionSet::X_PLUS, DirectionSet::Y_PLUS] {
                let inverse = DirectionSet::inverse(direction);
                if first.contains(&direction) == second.contains(&inverse) {
                    builder.allow(a, b, direction)?;
                }
            }
        }
    }
    builder.build()
}

/// Model, grid, and constraints for `scenario`
///
/// # Errors
///
/// Returns an error if the grid dimensions are invalid
pub fn build_scenario(
    scenario: Scenario,
    width: usize,
    height: usize,
    periodic: bool,
    follow_path: bool,
) -> Result<ScenarioSetup> {
    let topology = GridTopology::cartesian_2d(width, height, periodic)?;
    let setup = match scenario {
        Scenario::Chessboard => ScenarioSetup {
            model: chessboard_model()?,
            topology,
            constraints: Vec::new(),
            glyphs: vec!['#', '.'],
        },
        Scenario::Wang => ScenarioSetup {
            model: wang_model()?,
            topology,
            constraints: Vec::new(),
            glyphs: "0123456789A".chars().collect(),
        },
        Scenario::Path => {
            let spec = PathSpec::edged(pipe_exits());
            let connected = ConnectedConstraint::new(spec.clone());
            let connected = if follow_path {
                connected.with_pick_heuristic()
            } else {
                connected
            };
            ScenarioSetup {
                model: pipe_model()?,
                topology,
                constraints: vec![
                    Box::new(LoopConstraint::new(spec.clone())),
                    Box::new(connected),
                ],
                glyphs: PIPES.iter().map(|(glyph, _)| *glyph).collect(),
            }
        }
    };
    Ok(setup)
}

/// Draw a solved or partial grid, one text row per grid row
///
/// Undecided and masked cells show as `?`.
///
/// # Errors
///
/// Returns an error if the solver's topology is not a grid
pub fn render(solver: &Solver, glyphs: &[char]) -> Result<String> {
    let grid = solver.to_array()?;
    let mut out = String::new();
    for layer in grid.outer_iter() {
        for row in layer.outer_iter() {
            for cell in row {
                out.push(match cell {
                    Some(pattern) => glyphs.get(*pattern).copied().unwrap_or('?'),
                    None => '?',
                });
            }
            out.push('\n');
        }
    }
    Ok(out)
}

/// Solves the scenario selected on the command line
pub struct DemoRunner {
    cli: Cli,
    progress: Option<ProgressReporter>,
}

impl DemoRunner {
    /// Create a runner for the given arguments
    pub fn new(cli: Cli) -> Self {
        let progress = cli.should_show_progress().then(ProgressReporter::new);
        Self { cli, progress }
    }

    /// Solve and print the grid
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario or options are invalid
    // Printing the grid is the point of the demo
    #[allow(clippy::print_stdout)]
    pub fn run(&mut self) -> Result<Resolution> {
        let setup = build_scenario(
            self.cli.scenario,
            self.cli.width,
            self.cli.height,
            self.cli.periodic,
            self.cli.follow_path,
        )?;
        let mut solver = Solver::new(
            setup.model,
            setup.topology,
            setup.constraints,
            self.cli.options(),
            RandomSource::seeded(self.cli.seed),
        )?;

        let mut status = solver.status();
        while status == Resolution::Undecided {
            status = solver.step()?;
            if let Some(progress) = &self.progress
                && solver.step_count() % PROGRESS_REFRESH_STEPS == 0
            {
                progress.update(solver.step_count(), solver.backtrack_count());
            }
        }
        if let Some(progress) = &self.progress {
            progress.finish(status, solver.step_count(), solver.backtrack_count());
        }

        print!("{}", render(&solver, &setup.glyphs)?);
        println!("{status:?}");
        Ok(status)
    }
}
