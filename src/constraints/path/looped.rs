//! Every committed path node has exactly two path neighbours

use crate::constraints::path::{PathSpec, PathView};
use crate::constraints::{Constraint, ConstraintContext};
use crate::io::error::Result;

/// The path must decompose into closed loops
///
/// On edged specs the rule runs over exit nodes too, so a committed exit
/// must face a matching exit and every path tile needs exactly two exits.
#[derive(Debug, Clone)]
pub struct LoopConstraint {
    spec: PathSpec,
    view: Option<PathView>,
}

impl LoopConstraint {
    /// Close the path described by `spec` into loops
    pub const fn new(spec: PathSpec) -> Self {
        Self { spec, view: None }
    }
}

impl Constraint for LoopConstraint {
    fn init(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        self.view = Some(self.spec.view(context)?);
        Ok(())
    }

    fn check(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        let Some(view) = self.view.as_mut() else {
            return Ok(());
        };
        view.update(context);
        let view: &PathView = view;
        let could = |node: usize| view.could_be_path.get(node).copied().unwrap_or(false);
        let must = |node: usize| view.must_be_path.get(node).copied().unwrap_or(false);

        for node in 0..view.graph().node_count() {
            if !must(node) {
                continue;
            }
            let neighbors = view.graph().neighbors(node);
            let possible: Vec<usize> = neighbors.iter().copied().filter(|&n| could(n)).collect();
            let committed = neighbors.iter().filter(|&&n| must(n)).count();

            if possible.len() < 2 {
                context.set_contradiction("path node has fewer than two path neighbours");
                return Ok(());
            }
            if committed > 2 {
                context.set_contradiction("path node has more than two path neighbours");
                return Ok(());
            }

            if possible.len() == 2 {
                for &other in &possible {
                    if !must(other) {
                        view.select_path(context, other)?;
                    }
                }
            } else if committed == 2 {
                for &other in &possible {
                    if !must(other) {
                        view.ban_path(context, other)?;
                    }
                }
            }
            if context.is_contradiction() {
                return Ok(());
            }
        }
        Ok(())
    }
}
