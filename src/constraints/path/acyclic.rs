//! Forbid cycles among committed path cells

use crate::constraints::path::articulation::SimpleGraph;
use crate::constraints::path::{PathSpec, PathView};
use crate::constraints::{Constraint, ConstraintContext};
use crate::io::error::Result;
use bitvec::prelude::*;

/// Committed path nodes must form a forest
///
/// Only committed nodes are inspected, so a cycle is reported as soon as it
/// closes rather than anticipated.
#[derive(Debug, Clone)]
pub struct AcyclicConstraint {
    spec: PathSpec,
    view: Option<PathView>,
}

impl AcyclicConstraint {
    /// Keep the path described by `spec` free of cycles
    pub const fn new(spec: PathSpec) -> Self {
        Self { spec, view: None }
    }
}

/// Whether the nodes flagged in `committed` contain a cycle
pub fn has_cycle(graph: &SimpleGraph, committed: &[bool]) -> bool {
    let is_committed = |node: usize| committed.get(node).copied().unwrap_or(false);
    let mut visited = bitvec![0; graph.node_count()];

    for root in 0..graph.node_count() {
        if !is_committed(root) || visited.get(root).as_deref() == Some(&true) {
            continue;
        }
        let mut stack = vec![(None, root)];
        while let Some((previous, node)) = stack.pop() {
            if visited.get(node).as_deref() == Some(&true) {
                return true;
            }
            visited.set(node, true);
            for &next in graph.neighbors(node) {
                if Some(next) != previous && is_committed(next) {
                    stack.push((Some(node), next));
                }
            }
        }
    }
    false
}

impl Constraint for AcyclicConstraint {
    fn init(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        self.view = Some(self.spec.view(context)?);
        Ok(())
    }

    fn check(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        let Some(view) = self.view.as_mut() else {
            return Ok(());
        };
        view.update(context);
        if has_cycle(view.graph(), &view.must_be_path) {
            context.set_contradiction("committed path contains a cycle");
        }
        Ok(())
    }
}
