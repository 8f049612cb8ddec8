//! Tests for count bounds, including eager commitment

#[cfg(test)]
mod tests {
    use wavetile::algorithm::bitset::PatternSet;
    use wavetile::algorithm::propagation::Propagator;
    use wavetile::algorithm::random::RandomSource;
    use wavetile::constraints::count::{Comparison, CountConstraint};
    use wavetile::constraints::{Constraint, ConstraintContext};
    use wavetile::model::builder::AdjacencyBuilder;
    use wavetile::model::pattern::PatternModel;
    use wavetile::topology::Topology;
    use wavetile::topology::directions::DirectionSet;
    use wavetile::topology::grid::GridTopology;

    fn free_model() -> PatternModel {
        AdjacencyBuilder::new(DirectionSet::Cartesian2d, 2)
            .allow_all()
            .build()
            .expect("valid model")
    }

    fn row(width: usize) -> Topology {
        GridTopology::cartesian_2d(width, 1, false)
            .expect("valid grid")
            .into()
    }

    // Verifies reaching an upper bound bans the set everywhere else
    // Verified by comparing against count + 1
    #[test]
    fn test_at_most_bans_rest() {
        let model = free_model();
        let topology = row(5);
        let mut propagator = Propagator::new(&model, &topology);
        let mut random = RandomSource::seeded(0);
        let mut context = ConstraintContext::new(&model, &topology, &mut propagator, &mut random);
        let mut constraint =
            CountConstraint::new(PatternSet::from_patterns(2, [1]), Comparison::AtMost, 1);

        constraint.init(&mut context).expect("valid");
        context.select(2, 1).expect("possible");
        constraint.check(&mut context).expect("valid");

        for cell in [0, 1, 3, 4] {
            assert_eq!(context.wave().decided_pattern(cell), Some(0));
        }
        assert!(!context.is_contradiction());
    }

    // Tests a lower bound equal to the available cells selects them all
    // Verified by selecting only when strictly fewer cells remain
    #[test]
    fn test_at_least_selects_all() {
        let model = free_model();
        let topology = row(4);
        let mut propagator = Propagator::new(&model, &topology);
        let mut random = RandomSource::seeded(0);
        let mut context = ConstraintContext::new(&model, &topology, &mut propagator, &mut random);
        let mut constraint =
            CountConstraint::new(PatternSet::from_patterns(2, [1]), Comparison::AtLeast, 3);

        context.ban(0, 1).expect("in range");
        constraint.check(&mut context).expect("valid");
        for cell in 1..4 {
            assert_eq!(context.wave().decided_pattern(cell), Some(1));
        }
    }

    // Tests too many committed cells is a contradiction
    // Verified by ignoring the committed count in the upper bound
    #[test]
    fn test_exactly_overflow_contradicts() {
        let model = free_model();
        let topology = row(3);
        let mut propagator = Propagator::new(&model, &topology);
        let mut random = RandomSource::seeded(0);
        let mut context = ConstraintContext::new(&model, &topology, &mut propagator, &mut random);
        let mut constraint =
            CountConstraint::new(PatternSet::from_patterns(2, [0]), Comparison::Exactly, 1);

        context.select(0, 0).expect("possible");
        context.select(1, 0).expect("possible");
        constraint.check(&mut context).expect("valid");
        assert!(context.is_contradiction());
    }

    // Tests eager mode commits exactly the bound during init
    // Verified by stopping eager selection one short of the bound
    #[test]
    fn test_eager_at_most() {
        let model = free_model();
        let topology = row(6);
        let mut propagator = Propagator::new(&model, &topology);
        let mut random = RandomSource::seeded(11);
        let mut context = ConstraintContext::new(&model, &topology, &mut propagator, &mut random);
        let mut constraint =
            CountConstraint::new(PatternSet::from_patterns(2, [1]), Comparison::AtMost, 2).eager();

        constraint.init(&mut context).expect("valid");
        let ones = (0..6)
            .filter(|&cell| context.wave().decided_pattern(cell) == Some(1))
            .count();
        let zeros = (0..6)
            .filter(|&cell| context.wave().decided_pattern(cell) == Some(0))
            .count();
        assert_eq!(ones, 2);
        assert_eq!(zeros, 4);
    }

    // Tests eager lower bounds ban down to the bound
    // Verified by selecting instead of banning in eager AtLeast
    #[test]
    fn test_eager_at_least() {
        let model = free_model();
        let topology = row(5);
        let mut propagator = Propagator::new(&model, &topology);
        let mut random = RandomSource::seeded(4);
        let mut context = ConstraintContext::new(&model, &topology, &mut propagator, &mut random);
        let mut constraint =
            CountConstraint::new(PatternSet::from_patterns(2, [1]), Comparison::AtLeast, 3).eager();

        constraint.init(&mut context).expect("valid");
        let ones = (0..5)
            .filter(|&cell| context.wave().decided_pattern(cell) == Some(1))
            .count();
        assert_eq!(ones, 3);
    }
}
