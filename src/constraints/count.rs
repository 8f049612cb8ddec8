//! Bounds on how many cells hold a pattern from a set

use crate::algorithm::bitset::PatternSet;
use crate::constraints::{Constraint, ConstraintContext, Tristate};
use crate::io::error::Result;

/// Direction of a count bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// At least `count` cells
    AtLeast,
    /// At most `count` cells
    AtMost,
    /// Exactly `count` cells
    Exactly,
}

impl Comparison {
    const fn bounds_above(self) -> bool {
        matches!(self, Self::AtMost | Self::Exactly)
    }

    const fn bounds_below(self) -> bool {
        matches!(self, Self::AtLeast | Self::Exactly)
    }
}

#[derive(Debug, Default)]
struct Tally {
    yes: usize,
    maybe: Vec<usize>,
}

/// Limits the number of cells committed to `patterns`
///
/// Once the committed count reaches an upper bound every undetermined cell is
/// banned; once committed plus undetermined reaches a lower bound every
/// undetermined cell is selected.
///
/// In eager mode `init` additionally makes random commitments up front until
/// the bound is tight. This can make a satisfiable problem unsatisfiable when
/// counted patterns only ever occur in correlated groups; that is left as is.
#[derive(Debug, Clone)]
pub struct CountConstraint {
    patterns: PatternSet,
    comparison: Comparison,
    count: usize,
    eager: bool,
}

impl CountConstraint {
    /// Bound the cells holding `patterns`
    pub const fn new(patterns: PatternSet, comparison: Comparison, count: usize) -> Self {
        Self {
            patterns,
            comparison,
            count,
            eager: false,
        }
    }

    /// Commit early in `init`
    #[must_use]
    pub const fn eager(mut self) -> Self {
        self.eager = true;
        self
    }

    fn tally(&self, context: &ConstraintContext<'_>) -> Tally {
        let topology = context.topology();
        let mut tally = Tally::default();
        for cell in (0..topology.cell_count()).filter(|&cell| topology.contains(cell)) {
            match context.tristate(cell, &self.patterns) {
                Tristate::Yes => tally.yes += 1,
                Tristate::Maybe => tally.maybe.push(cell),
                Tristate::No => {}
            }
        }
        tally
    }

    fn eager_init(&self, context: &mut ConstraintContext<'_>) -> Result<()> {
        loop {
            if context.is_contradiction() {
                return Ok(());
            }
            let tally = self.tally(context);
            let maybe_count = tally.maybe.len();

            if self.comparison == Comparison::AtMost {
                if tally.yes > self.count {
                    context.set_contradiction("eager count found too many committed cells");
                    return Ok(());
                }
                if tally.yes == self.count || maybe_count == 0 {
                    return self.enforce(context);
                }
                let index = context.random_below(maybe_count);
                if let Some(&cell) = tally.maybe.get(index) {
                    context.select_set(cell, &self.patterns)?;
                }
            } else {
                if tally.yes + maybe_count < self.count {
                    context.set_contradiction("eager count found too few possible cells");
                    return Ok(());
                }
                if tally.yes + maybe_count == self.count || maybe_count == 0 {
                    return self.enforce(context);
                }
                let index = context.random_below(maybe_count);
                if let Some(&cell) = tally.maybe.get(index) {
                    context.ban_set(cell, &self.patterns)?;
                }
            }
        }
    }

    fn enforce(&self, context: &mut ConstraintContext<'_>) -> Result<()> {
        let tally = self.tally(context);
        let maybe_count = tally.maybe.len();

        if self.comparison.bounds_above() {
            if tally.yes > self.count {
                context.set_contradiction("count found too many committed cells");
                return Ok(());
            }
            if tally.yes == self.count && maybe_count > 0 {
                for &cell in &tally.maybe {
                    if context.tristate(cell, &self.patterns).is_maybe() {
                        context.ban_set(cell, &self.patterns)?;
                    }
                }
            }
        }
        if self.comparison.bounds_below() {
            if tally.yes + maybe_count < self.count {
                context.set_contradiction("count found too few possible cells");
                return Ok(());
            }
            if tally.yes + maybe_count == self.count && maybe_count > 0 {
                for &cell in &tally.maybe {
                    if context.tristate(cell, &self.patterns).is_maybe() {
                        context.select_set(cell, &self.patterns)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl Constraint for CountConstraint {
    fn init(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        if self.eager {
            self.eager_init(context)
        } else {
            Ok(())
        }
    }

    fn check(&mut self, context: &mut ConstraintContext<'_>) -> Result<()> {
        self.enforce(context)
    }
}
