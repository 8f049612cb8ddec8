//! Path specifications and the graph views path constraints reason over
//!
//! A plain spec marks a set of path patterns; neighbouring path cells are
//! connected. An edged spec also lists the exits of every path pattern, and
//! two cells connect only through an exit on both sides. Edged views give
//! every cell one centre node plus one node per direction.

/// Iterative cut-vertex search
pub mod articulation;
/// Forbid cycles among committed path cells
pub mod acyclic;
/// Keep relevant path cells in one component
pub mod connected;
/// Every committed path cell has exactly two path neighbours
pub mod looped;
/// Exit-count parity over undecided regions
pub mod parity;

use crate::algorithm::bitset::PatternSet;
use crate::constraints::{ConstraintContext, Tristate};
use crate::io::error::{Result, check_cell, check_pattern, invalid_parameter};
use crate::topology::Topology;
use articulation::SimpleGraph;
use std::collections::BTreeMap;

/// Which patterns form a path and what counts as an endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    kind: PathKind,
    relevant_cells: Vec<usize>,
    relevant_patterns: Option<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathKind {
    Tiles(Vec<usize>),
    Edged(BTreeMap<usize, Vec<usize>>),
}

impl PathSpec {
    /// Cells holding any of `patterns` are path, joined to every path neighbour
    pub fn tiles(patterns: impl IntoIterator<Item = usize>) -> Self {
        Self {
            kind: PathKind::Tiles(patterns.into_iter().collect()),
            relevant_cells: Vec::new(),
            relevant_patterns: None,
        }
    }

    /// Path patterns with the directions they exit through
    pub const fn edged(exits: BTreeMap<usize, Vec<usize>>) -> Self {
        Self {
            kind: PathKind::Edged(exits),
            relevant_cells: Vec::new(),
            relevant_patterns: None,
        }
    }

    /// Cells that must end up on the path
    #[must_use]
    pub fn with_relevant_cells(mut self, cells: impl IntoIterator<Item = usize>) -> Self {
        self.relevant_cells = cells.into_iter().collect();
        self
    }

    /// Patterns that mark an endpoint wherever they appear
    #[must_use]
    pub fn with_relevant_patterns(mut self, patterns: impl IntoIterator<Item = usize>) -> Self {
        self.relevant_patterns = Some(patterns.into_iter().collect());
        self
    }

    /// Whether exits are tracked per direction
    pub const fn is_edged(&self) -> bool {
        matches!(self.kind, PathKind::Edged(_))
    }

    /// Exits of each path pattern, for edged specs
    pub const fn exits(&self) -> Option<&BTreeMap<usize, Vec<usize>>> {
        match &self.kind {
            PathKind::Edged(exits) => Some(exits),
            PathKind::Tiles(_) => None,
        }
    }

    /// Every pattern that lies on the path
    pub fn path_patterns(&self, pattern_count: usize) -> PatternSet {
        match &self.kind {
            PathKind::Tiles(patterns) => {
                PatternSet::from_patterns(pattern_count, patterns.iter().copied())
            }
            PathKind::Edged(exits) => PatternSet::from_patterns(pattern_count, exits.keys().copied()),
        }
    }

    /// Patterns exiting through each direction, for edged specs
    pub fn exit_sets(&self, pattern_count: usize, direction_count: usize) -> Option<Vec<PatternSet>> {
        self.exits().map(|exits| {
            (0..direction_count)
                .map(|direction| {
                    PatternSet::from_patterns(
                        pattern_count,
                        exits
                            .iter()
                            .filter(|(_, dirs)| dirs.contains(&direction))
                            .map(|(&pattern, _)| pattern),
                    )
                })
                .collect()
        })
    }

    /// Check every pattern, direction, and cell against the solver
    ///
    /// # Errors
    ///
    /// Returns an error if anything is out of range
    pub fn validate(&self, context: &ConstraintContext<'_>) -> Result<()> {
        let pattern_count = context.pattern_count();
        let direction_count = context.topology().direction_count();
        match &self.kind {
            PathKind::Tiles(patterns) => {
                for &pattern in patterns {
                    check_pattern(pattern, pattern_count)?;
                }
            }
            PathKind::Edged(exits) => {
                for (&pattern, directions) in exits {
                    check_pattern(pattern, pattern_count)?;
                    if let Some(&bad) = directions.iter().find(|&&d| d >= direction_count) {
                        return Err(invalid_parameter(
                            "exit",
                            &bad,
                            &format!("topology has {direction_count} directions"),
                        ));
                    }
                }
            }
        }
        for &cell in &self.relevant_cells {
            check_cell(cell, context.topology().cell_count())?;
        }
        for &pattern in self.relevant_patterns.iter().flatten() {
            check_pattern(pattern, pattern_count)?;
        }
        Ok(())
    }

    /// Build the node graph and sets for this spec
    ///
    /// # Errors
    ///
    /// Returns an error if the spec doesn't fit the solver
    pub fn view(&self, context: &ConstraintContext<'_>) -> Result<PathView> {
        self.validate(context)?;
        let topology = context.topology();
        let pattern_count = context.pattern_count();

        let exit_sets = self.exit_sets(pattern_count, topology.direction_count());
        let graph = exit_sets
            .as_ref()
            .map_or_else(|| cell_graph(topology), |_| edged_graph(topology));
        let nodes_per_cell = exit_sets.as_ref().map_or(1, |sets| 1 + sets.len());
        let node_count = graph.node_count();

        let mut relevant_cell_flags = vec![false; topology.cell_count()];
        for &cell in &self.relevant_cells {
            if let Some(flag) = relevant_cell_flags.get_mut(cell) {
                *flag = true;
            }
        }

        Ok(PathView {
            graph,
            nodes_per_cell,
            path_set: self.path_patterns(pattern_count),
            exit_sets,
            relevant_set: self
                .relevant_patterns
                .as_ref()
                .map(|patterns| PatternSet::from_patterns(pattern_count, patterns.iter().copied())),
            relevant_cells: relevant_cell_flags,
            has_endpoints: !self.relevant_cells.is_empty() || self.relevant_patterns.is_some(),
            could_be_path: vec![false; node_count],
            must_be_path: vec![false; node_count],
            could_be_relevant: vec![false; node_count],
            must_be_relevant: vec![false; node_count],
        })
    }
}

/// One node per cell, joined along every edge
pub fn cell_graph(topology: &Topology) -> SimpleGraph {
    SimpleGraph::new(
        (0..topology.cell_count())
            .map(|cell| {
                topology
                    .neighbors(cell)
                    .map(|(_, neighbor)| neighbor.cell)
                    .collect()
            })
            .collect(),
    )
}

/// A centre node per cell plus a node per direction
///
/// Node `cell * (1 + D)` is the centre and `cell * (1 + D) + 1 + d` the exit
/// towards `d`. An exit node joins its centre and the facing exit of the
/// neighbour, if there is one.
pub fn edged_graph(topology: &Topology) -> SimpleGraph {
    let direction_count = topology.direction_count();
    let stride = 1 + direction_count;
    let mut neighbors = Vec::with_capacity(topology.cell_count() * stride);

    for cell in 0..topology.cell_count() {
        let center = cell * stride;
        if !topology.contains(cell) {
            neighbors.extend((0..stride).map(|_| Vec::new()));
            continue;
        }
        neighbors.push((1..stride).map(|offset| center + offset).collect());
        for direction in 0..direction_count {
            let mut edges = vec![center];
            if let Some(neighbor) = topology.try_move(cell, direction) {
                edges.push(neighbor.cell * stride + 1 + neighbor.inverse_direction);
            }
            neighbors.push(edges);
        }
    }
    SimpleGraph::new(neighbors)
}

/// Per-node path and relevance state, refreshed from the wave
#[derive(Debug, Clone)]
pub struct PathView {
    graph: SimpleGraph,
    nodes_per_cell: usize,
    path_set: PatternSet,
    exit_sets: Option<Vec<PatternSet>>,
    relevant_set: Option<PatternSet>,
    relevant_cells: Vec<bool>,
    has_endpoints: bool,
    /// Node may still be on the path
    pub could_be_path: Vec<bool>,
    /// Node is committed to the path
    pub must_be_path: Vec<bool>,
    /// Node may still be an endpoint
    pub could_be_relevant: Vec<bool>,
    /// Node is committed to being an endpoint
    pub must_be_relevant: Vec<bool>,
}

impl PathView {
    /// Node graph
    pub const fn graph(&self) -> &SimpleGraph {
        &self.graph
    }

    /// Nodes per cell: 1 for plain views, `1 + D` for edged ones
    pub const fn nodes_per_cell(&self) -> usize {
        self.nodes_per_cell
    }

    /// Patterns on the path
    pub const fn path_set(&self) -> &PatternSet {
        &self.path_set
    }

    /// Patterns exiting through `direction`, for edged views
    pub fn exit_set(&self, direction: usize) -> Option<&PatternSet> {
        self.exit_sets.as_ref().and_then(|sets| sets.get(direction))
    }

    /// Cell and optional direction behind `node`
    pub const fn split_node(&self, node: usize) -> (usize, Option<usize>) {
        let cell = node / self.nodes_per_cell;
        match node % self.nodes_per_cell {
            0 => (cell, None),
            offset => (cell, Some(offset - 1)),
        }
    }

    /// Recompute every node's state from the wave
    pub fn update(&mut self, context: &ConstraintContext<'_>) {
        let topology = context.topology();
        for cell in 0..topology.cell_count() {
            let masked = !topology.contains(cell);
            let center = cell * self.nodes_per_cell;
            let state = if masked {
                Tristate::No
            } else {
                context.tristate(cell, &self.path_set)
            };
            self.set_path(center, state);

            for offset in 1..self.nodes_per_cell {
                let state = match self.exit_set(offset - 1) {
                    Some(set) if !masked => context.tristate(cell, set),
                    _ => Tristate::No,
                };
                self.set_path(center + offset, state);
            }

            if !self.has_endpoints {
                continue;
            }
            let fixed = self.relevant_cells.get(cell).copied().unwrap_or(false) && !masked;
            let by_pattern = match &self.relevant_set {
                Some(set) if !masked => context.tristate(cell, set),
                _ => Tristate::No,
            };
            if let Some(flag) = self.could_be_relevant.get_mut(center) {
                *flag = fixed || by_pattern.is_possible();
            }
            if let Some(flag) = self.must_be_relevant.get_mut(center) {
                *flag = fixed || by_pattern.is_yes();
            }
        }

        if !self.has_endpoints {
            self.could_be_relevant.clone_from(&self.could_be_path);
            self.must_be_relevant.clone_from(&self.must_be_path);
        }
    }

    fn set_path(&mut self, node: usize, state: Tristate) {
        if let Some(flag) = self.could_be_path.get_mut(node) {
            *flag = state.is_possible();
        }
        if let Some(flag) = self.must_be_path.get_mut(node) {
            *flag = state.is_yes();
        }
    }

    /// Force `node` onto the path
    ///
    /// # Errors
    ///
    /// Returns an error if the node is out of range
    pub fn select_path(&self, context: &mut ConstraintContext<'_>, node: usize) -> Result<()> {
        match self.split_node(node) {
            (cell, None) => context.select_set(cell, &self.path_set),
            (cell, Some(direction)) => {
                if self.must_be_path.get(node).copied().unwrap_or(false) {
                    return Ok(());
                }
                match self.exit_set(direction) {
                    Some(set) => context.select_set(cell, set),
                    None => Ok(()),
                }
            }
        }
    }

    /// Force `node` off the path
    ///
    /// # Errors
    ///
    /// Returns an error if the node is out of range
    pub fn ban_path(&self, context: &mut ConstraintContext<'_>, node: usize) -> Result<()> {
        match self.split_node(node) {
            (cell, None) => context.ban_set(cell, &self.path_set),
            (cell, Some(direction)) => match self.exit_set(direction) {
                Some(set) => context.ban_set(cell, set),
                None => Ok(()),
            },
        }
    }

    /// Stop `node` from becoming an endpoint; exit nodes are left alone
    ///
    /// # Errors
    ///
    /// Returns an error if the node is out of range
    pub fn ban_relevant(&self, context: &mut ConstraintContext<'_>, node: usize) -> Result<()> {
        match self.split_node(node) {
            (cell, None) => {
                context.ban_set(cell, self.relevant_set.as_ref().unwrap_or(&self.path_set))
            }
            (_, Some(_)) => Ok(()),
        }
    }
}
