//! Tests for pinned pattern sets

#[cfg(test)]
mod tests {
    use wavetile::SolverError;
    use wavetile::algorithm::bitset::PatternSet;
    use wavetile::algorithm::propagation::Propagator;
    use wavetile::algorithm::random::RandomSource;
    use wavetile::constraints::fixed::FixedTileConstraint;
    use wavetile::constraints::{Constraint, ConstraintContext};
    use wavetile::model::builder::AdjacencyBuilder;
    use wavetile::model::pattern::PatternModel;
    use wavetile::topology::Topology;
    use wavetile::topology::directions::DirectionSet;
    use wavetile::topology::grid::GridTopology;

    fn setup() -> (PatternModel, Topology) {
        let model = AdjacencyBuilder::new(DirectionSet::Cartesian2d, 2)
            .allow_all()
            .build()
            .expect("valid model");
        let topology = GridTopology::cartesian_2d(3, 1, false)
            .expect("valid grid")
            .into();
        (model, topology)
    }

    // Verifies a given cell is selected during init
    // Verified by selecting the complement instead
    #[test]
    fn test_fixed_cell() {
        let (model, topology) = setup();
        let mut propagator = Propagator::new(&model, &topology);
        let mut random = RandomSource::seeded(0);
        let mut context = ConstraintContext::new(&model, &topology, &mut propagator, &mut random);
        let mut constraint = FixedTileConstraint::at(PatternSet::from_patterns(2, [1]), 1);

        constraint.init(&mut context).expect("valid");
        assert_eq!(context.wave().decided_pattern(1), Some(1));
        assert_eq!(constraint.cell(), Some(1));
    }

    // Tests a random placement only considers cells that still allow the set
    // Verified by drawing from every cell
    #[test]
    fn test_fixed_anywhere() {
        let (model, topology) = setup();
        let mut propagator = Propagator::new(&model, &topology);
        let mut random = RandomSource::seeded(5);
        let mut context = ConstraintContext::new(&model, &topology, &mut propagator, &mut random);
        context.ban(0, 1).expect("in range");
        context.ban(2, 1).expect("in range");
        let mut constraint = FixedTileConstraint::anywhere(PatternSet::from_patterns(2, [1]));

        constraint.init(&mut context).expect("valid");
        assert_eq!(constraint.cell(), Some(1));
        assert_eq!(context.wave().decided_pattern(1), Some(1));
    }

    // Tests no legal placement is a contradiction, not an error
    // Verified by returning an error when candidates are empty
    #[test]
    fn test_no_placement() {
        let (model, topology) = setup();
        let mut propagator = Propagator::new(&model, &topology);
        let mut random = RandomSource::seeded(0);
        let mut context = ConstraintContext::new(&model, &topology, &mut propagator, &mut random);
        for cell in 0..3 {
            context.ban(cell, 1).expect("in range");
        }
        let mut constraint = FixedTileConstraint::anywhere(PatternSet::from_patterns(2, [1]));

        constraint.init(&mut context).expect("valid");
        assert!(context.is_contradiction());
        assert_eq!(constraint.cell(), None);
    }

    // Tests an out of range cell is rejected
    // Verified by skipping the range check
    #[test]
    fn test_out_of_range() {
        let (model, topology) = setup();
        let mut propagator = Propagator::new(&model, &topology);
        let mut random = RandomSource::seeded(0);
        let mut context = ConstraintContext::new(&model, &topology, &mut propagator, &mut random);
        let mut constraint = FixedTileConstraint::at(PatternSet::from_patterns(2, [1]), 3);
        assert!(matches!(
            constraint.init(&mut context),
            Err(SolverError::CellOutOfRange { .. })
        ));
    }
}
