//! Exit-count parity lookahead for edged paths
//!
//! If exits are symmetric, every region of cells joined by undecided exits
//! must hold an even number of exits in total. A region with one undecided
//! spot is fixed right away; a region with none and odd parity is a dead end.

use crate::algorithm::bitset::PatternSet;
use crate::constraints::path::PathSpec;
use crate::constraints::{Constraint, ConstraintContext, Tristate};
use crate::io::error::{Result, invalid_parameter};
use bitvec::prelude::*;

/// Parity guidance for tilesets made mostly of even-exit tiles
#[derive(Debug, Clone)]
pub struct ParityConstraint {
    spec: PathSpec,
    odd_tiles: Option<PatternSet>,
    exit_sets: Vec<PatternSet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ambiguity {
    None,
    One(usize, Option<usize>),
    Many,
}

impl Ambiguity {
    const fn add(self, cell: usize, direction: Option<usize>) -> Self {
        match self {
            Self::None => Self::One(cell, direction),
            Self::One(..) | Self::Many => Self::Many,
        }
    }
}

impl ParityConstraint {
    /// Guide the edged path described by `spec`
    pub const fn new(spec: PathSpec) -> Self {
        Self {
            spec,
            odd_tiles: None,
            exit_sets: Vec::new(),
        }
    }

    fn odd_state(&self, context: &ConstraintContext<'_>, cell: usize) -> Tristate {
        self.odd_tiles
            .as_ref()
            .map_or(Tristate::No, |set| context.tristate(cell, set))
    }

    fn visit_region(
        &self,
        context: &mut ConstraintContext<'_>,
        start: usize,
        visited: &mut BitVec,
    ) -> Result<()> {
        let topology = context.topology();
        let mut parity = 0_usize;
        let mut ambiguity = Ambiguity::None;
        let mut stack = vec![start];

        while let Some(cell) = stack.pop() {
            if visited.get(cell).as_deref() != Some(&false) {
                continue;
            }
            visited.set(cell, true);

            match self.odd_state(context, cell) {
                Tristate::Yes => parity += 1,
                Tristate::Maybe => ambiguity = ambiguity.add(cell, None),
                Tristate::No => {}
            }

            for (direction, set) in self.exit_sets.iter().enumerate() {
                match context.tristate(cell, set) {
                    Tristate::Yes => parity += 1,
                    Tristate::Maybe => match topology.try_move(cell, direction) {
                        Some(neighbor) => {
                            if visited.get(neighbor.cell).as_deref() == Some(&false) {
                                stack.push(neighbor.cell);
                            }
                        }
                        // Nothing on the far side to balance this exit
                        None => ambiguity = ambiguity.add(cell, Some(direction)),
                    },
                    Tristate::No => {}
                }
            }
        }

        let even = parity % 2 == 0;
        match ambiguity {
            Ambiguity::Many => Ok(()),
            Ambiguity::One(cell, direction) => {
                let set = match direction {
                    None => self.odd_tiles.as_ref(),
                    Some(direction) => self.exit_sets.get(direction),
                };
                match set {
                    Some(set) if even => context.ban_set(cell, set),
                    Some(set) => context.select_set(cell, set),
                    None => Ok(()),
                }
            }
            Ambiguity::None => {
                if !even {
                    context.set_contradiction("region has odd exit parity");
                }
                Ok(())
            }
        }
    }
}

impl Constraint for ParityConstraint {
    fn init(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        let Some(exits) = self.spec.exits() else {
            return Err(invalid_parameter(
                "spec",
                &"tiles",
                &"parity needs an edged path spec",
            ));
        };
        let view = self.spec.view(context)?;
        self.exit_sets = (0..context.topology().direction_count())
            .filter_map(|direction| view.exit_set(direction).cloned())
            .collect();

        let odd: Vec<usize> = exits
            .iter()
            .filter(|(_, directions)| directions.len() % 2 == 1)
            .map(|(&pattern, _)| pattern)
            .collect();
        self.odd_tiles =
            (!odd.is_empty()).then(|| PatternSet::from_patterns(context.pattern_count(), odd));
        Ok(())
    }

    fn check(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        let topology = context.topology();
        let mut visited = bitvec![0; topology.cell_count()];
        for cell in 0..topology.cell_count() {
            if !topology.contains(cell) {
                continue;
            }
            self.visit_region(context, cell, &mut visited)?;
            if context.is_contradiction() {
                break;
            }
        }
        Ok(())
    }
}
