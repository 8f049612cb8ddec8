//! Tests for `PatternSet` membership and set operations

#[cfg(test)]
mod tests {
    use wavetile::algorithm::bitset::PatternSet;

    // Verifies a new set is empty with count 0
    // Verified by initializing the set with all bits set
    #[test]
    fn test_new_set_is_empty() {
        let set = PatternSet::new(10);
        assert_eq!(set.count(), 0);
        assert!(set.is_empty());
        assert_eq!(set.pattern_count(), 10);
    }

    // Tests insertion, removal and containment
    // Verified by removing the bit-setting logic from insert
    #[test]
    fn test_insert_remove_contains() {
        let mut set = PatternSet::new(10);
        set.insert(5);
        assert!(set.contains(5));
        assert!(!set.contains(3));
        set.remove(5);
        assert!(!set.contains(5));
        assert!(set.is_empty());
    }

    // Tests out-of-range ids are ignored rather than growing the set
    // Verified by dropping the range check in insert
    #[test]
    fn test_out_of_range_ignored() {
        let set = PatternSet::from_patterns(4, [1, 3, 7]);
        assert_eq!(set.to_vec(), vec![1, 3]);
        assert!(!set.contains(7));
        assert_eq!(set.pattern_count(), 4);
    }

    // Tests intersection keeps only shared ids
    // Verified by changing intersection to union
    #[test]
    fn test_intersection() {
        let first = PatternSet::from_patterns(10, [1, 3, 5]);
        let second = PatternSet::from_patterns(10, [3, 5, 7]);
        assert_eq!(first.intersection(&second).to_vec(), vec![3, 5]);

        let disjoint = PatternSet::from_patterns(10, [0, 2]);
        assert!(first.intersection(&disjoint).is_empty());
    }

    // Tests complement stays within the set's capacity
    // Verified by complementing a wider bit vector
    #[test]
    fn test_complement() {
        let set = PatternSet::from_patterns(5, [0, 2]);
        let complement = set.complement();
        assert_eq!(complement.to_vec(), vec![1, 3, 4]);
        assert_eq!(PatternSet::all(5).complement().count(), 0);
    }

    // Tests display lists the members
    // Verified by omitting the id list from the message
    #[test]
    fn test_display() {
        let set = PatternSet::from_patterns(4, [2]);
        let message = set.to_string();
        assert!(message.contains("1 patterns"));
        assert!(message.contains("[2]"));
    }
}
