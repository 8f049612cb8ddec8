//! Keep every endpoint of the path reachable from every other

use crate::algorithm::bitset::PatternSet;
use crate::algorithm::random::RandomSource;
use crate::algorithm::selection::IndexPicker;
use crate::algorithm::wave::Wave;
use crate::constraints::path::articulation::articulation_points;
use crate::constraints::path::{PathSpec, PathView};
use crate::constraints::{Constraint, ConstraintContext, Tristate};
use crate::io::error::Result;
use crate::topology::Topology;
use bitvec::prelude::*;

/// Path cells touching an endpoint must form one connected component
///
/// Cut vertices of the "could be path" graph that separate endpoints are
/// forced onto the path, and cells that can no longer reach the component
/// lose their endpoint patterns.
#[derive(Debug, Clone)]
pub struct ConnectedConstraint {
    spec: PathSpec,
    view: Option<PathView>,
    follow: bool,
}

impl ConnectedConstraint {
    /// Connect the path described by `spec`
    pub const fn new(spec: PathSpec) -> Self {
        Self {
            spec,
            view: None,
            follow: false,
        }
    }

    /// Have the solver decide cells on or next to the path first
    #[must_use]
    pub const fn with_pick_heuristic(mut self) -> Self {
        self.follow = true;
        self
    }
}

impl Constraint for ConnectedConstraint {
    fn init(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        let mut view = self.spec.view(context)?;
        view.update(context);
        for node in 0..view.graph().node_count() {
            if view.must_be_relevant.get(node).copied().unwrap_or(false) {
                view.select_path(context, node)?;
            }
        }
        self.view = Some(view);
        Ok(())
    }

    fn check(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        let Some(view) = self.view.as_mut() else {
            return Ok(());
        };
        view.update(context);
        let info = articulation_points(
            view.graph(),
            &view.could_be_path,
            Some(&view.must_be_relevant),
        );

        if info.component_count > 1 {
            context.set_contradiction("path endpoints are disconnected");
            return Ok(());
        }

        for (node, &cut) in info.is_articulation.iter().enumerate() {
            if cut && !view.must_be_path.get(node).copied().unwrap_or(false) {
                view.select_path(context, node)?;
            }
        }

        if info.component_count > 0 {
            for (node, component) in info.component.iter().enumerate() {
                if component.is_none() && view.could_be_relevant.get(node).copied().unwrap_or(false)
                {
                    view.ban_relevant(context, node)?;
                }
            }
        }
        Ok(())
    }

    fn path_heuristic(&self) -> Option<&PathSpec> {
        self.follow.then_some(&self.spec)
    }
}

/// Cell tiers for growing a path outwards from its committed cells
///
/// Cells already committed to the path come first. Next are undecided cells
/// that a committed neighbour leads into: through a matching exit for edged
/// specs, or by simply being path for plain ones. Everything else is last.
#[derive(Debug, Clone)]
pub struct PathFollower {
    path_set: PatternSet,
    exit_sets: Option<Vec<PatternSet>>,
}

impl PathFollower {
    /// Follow the path of `spec`
    pub fn new(spec: &PathSpec, pattern_count: usize, direction_count: usize) -> Self {
        Self {
            path_set: spec.path_patterns(pattern_count),
            exit_sets: spec.exit_sets(pattern_count, direction_count),
        }
    }

    /// Committed, led-into, and remaining cells, in that order
    pub fn tiers(&self, wave: &Wave, topology: &Topology) -> [BitVec; 3] {
        let cell_count = topology.cell_count();
        let mut tiers: [BitVec; 3] = std::array::from_fn(|_| bitvec![0; cell_count]);
        for cell in (0..cell_count).filter(|&cell| topology.contains(cell)) {
            let tier = match Tristate::of(wave, cell, &self.path_set) {
                Tristate::Yes => 0,
                Tristate::Maybe if self.led_into(wave, topology, cell) => 1,
                Tristate::Maybe | Tristate::No => 2,
            };
            if let Some(tier) = tiers.get_mut(tier) {
                tier.set(cell, true);
            }
        }
        tiers
    }

    fn led_into(&self, wave: &Wave, topology: &Topology, cell: usize) -> bool {
        topology.neighbors(cell).any(|(_, neighbor)| {
            let leading = match &self.exit_sets {
                Some(sets) => sets.get(neighbor.inverse_direction),
                None => Some(&self.path_set),
            };
            leading.is_some_and(|set| Tristate::of(wave, neighbor.cell, set).is_yes())
        })
    }

    /// Let `picker` choose from the first tier with an undecided cell
    pub fn pick(
        &self,
        picker: &IndexPicker,
        wave: &Wave,
        topology: &Topology,
        random: &mut RandomSource,
    ) -> Option<usize> {
        self.tiers(wave, topology)
            .iter()
            .find_map(|tier| picker.pick_within(wave, random, tier))
    }
}
