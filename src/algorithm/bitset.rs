use bitvec::prelude::*;
use std::fmt;

/// Fixed-size set of pattern ids
///
/// Constraints describe the tiles they care about with a `PatternSet`;
/// membership tests are O(1).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PatternSet {
    bits: BitVec,
}

impl PatternSet {
    /// Create a set with no patterns present
    pub fn new(pattern_count: usize) -> Self {
        Self {
            bits: bitvec![0; pattern_count],
        }
    }

    /// Create a set containing every pattern
    pub fn all(pattern_count: usize) -> Self {
        Self {
            bits: bitvec![1; pattern_count],
        }
    }

    /// Create a set from pattern ids, ignoring ids out of range
    pub fn from_patterns(pattern_count: usize, patterns: impl IntoIterator<Item = usize>) -> Self {
        let mut set = Self::new(pattern_count);
        for pattern in patterns {
            set.insert(pattern);
        }
        set
    }

    /// Capacity the set was created with
    pub fn pattern_count(&self) -> usize {
        self.bits.len()
    }

    /// Insert a pattern id
    pub fn insert(&mut self, pattern: usize) {
        if pattern < self.bits.len() {
            self.bits.set(pattern, true);
        }
    }

    /// Remove a pattern id
    pub fn remove(&mut self, pattern: usize) {
        if pattern < self.bits.len() {
            self.bits.set(pattern, false);
        }
    }

    /// Test pattern membership
    pub fn contains(&self, pattern: usize) -> bool {
        self.bits.get(pattern).as_deref() == Some(&true)
    }

    /// Intersect this set with another in-place
    pub fn intersect_with(&mut self, other: &Self) {
        self.bits &= &other.bits;
    }

    /// Create a new set containing the intersection
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    /// Create the complement within `0..pattern_count`
    #[must_use]
    pub fn complement(&self) -> Self {
        Self {
            bits: !self.bits.clone(),
        }
    }

    /// Test if no patterns are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count patterns in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Iterate pattern ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Extract all pattern ids as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatternSet({} patterns: {:?})", self.count(), self.to_vec())
    }
}
