//! Tests for model validation and derived tables

#[cfg(test)]
mod tests {
    use wavetile::SolverError;
    use wavetile::model::pattern::PatternModel;

    // Verifies support counts how many patterns accept each pattern per label
    // Verified by counting by source pattern instead of target
    #[test]
    fn test_support_counts() {
        // Label 0: pattern 0 accepts {0, 1}, pattern 1 accepts {1}
        let model = PatternModel::new(
            vec![1.0, 1.0],
            vec![vec![vec![0, 1], vec![]], vec![vec![1], vec![0]]],
        )
        .expect("valid model");

        assert_eq!(model.support(0, 0), 1);
        assert_eq!(model.support(0, 1), 2);
        assert_eq!(model.support(1, 0), 1);
        assert_eq!(model.support(1, 1), 0);
        assert_eq!(model.label_count(), 2);
    }

    // Tests compatible lists are sorted and deduplicated
    // Verified by skipping dedup
    #[test]
    fn test_compatible_normalized() {
        let model = PatternModel::new(vec![1.0, 2.0], vec![vec![vec![1, 0, 1]], vec![vec![]]])
            .expect("valid model");
        assert_eq!(model.compatible(0, 0), &[0, 1]);
        assert!(model.compatible(1, 0).is_empty());
        assert!(model.compatible(5, 0).is_empty());
    }

    // Tests frequency lookup keeps weights and reads 0 out of range
    // Verified by normalising weights on construction
    #[test]
    fn test_frequency_lookup() {
        let model = PatternModel::new(vec![0.0, std::f64::consts::E], vec![vec![], vec![]])
            .expect("valid model");
        let close = |a: f64, b: f64| (a - b).abs() < 1e-12;
        assert!(close(model.frequency(0), 0.0));
        assert!(close(model.frequency(1), std::f64::consts::E));
        assert!(close(model.frequency(9), 0.0));
    }

    // Tests malformed models are rejected
    // Verified by removing each validation in turn
    #[test]
    fn test_invalid_models() {
        let cases = [
            PatternModel::new(Vec::new(), Vec::new()),
            PatternModel::new(vec![1.0], vec![vec![], vec![]]),
            PatternModel::new(vec![-1.0, 2.0], vec![vec![], vec![]]),
            PatternModel::new(vec![f64::NAN], vec![vec![]]),
            PatternModel::new(vec![0.0, 0.0], vec![vec![], vec![]]),
            PatternModel::new(vec![1.0, 1.0], vec![vec![vec![]], vec![]]),
            PatternModel::new(vec![1.0], vec![vec![vec![3]]]),
        ];
        for result in cases {
            assert!(matches!(result, Err(SolverError::InvalidModel { .. })));
        }
    }
}
