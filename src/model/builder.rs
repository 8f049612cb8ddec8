//! Small adjacency-list collaborator for building symmetric grid models

use crate::io::error::{Result, check_pattern, invalid_parameter};
use crate::model::pattern::PatternModel;
use crate::topology::directions::DirectionSet;
use bitvec::prelude::*;

/// Accumulates symmetric adjacency rules for a fixed direction set
///
/// Every `allow(a, b, d)` also records `b` accepting `a` in the inverse of `d`,
/// so the resulting model is consistent in both directions.
#[derive(Clone, Debug)]
pub struct AdjacencyBuilder {
    directions: DirectionSet,
    frequencies: Vec<f64>,
    allowed: Vec<Vec<BitVec>>,
}

impl AdjacencyBuilder {
    /// Start with `pattern_count` patterns of weight 1 and no adjacencies
    pub fn new(directions: DirectionSet, pattern_count: usize) -> Self {
        Self {
            directions,
            frequencies: vec![1.0; pattern_count],
            allowed: vec![vec![bitvec![0; pattern_count]; directions.count()]; pattern_count],
        }
    }

    /// Set the weight of one pattern
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is out of range
    pub fn set_frequency(&mut self, pattern: usize, frequency: f64) -> Result<&mut Self> {
        check_pattern(pattern, self.frequencies.len())?;
        if let Some(slot) = self.frequencies.get_mut(pattern) {
            *slot = frequency;
        }
        Ok(self)
    }

    /// Allow `b` to sit in `direction` from `a`
    ///
    /// # Errors
    ///
    /// Returns an error if either pattern or the direction is out of range
    pub fn allow(&mut self, a: usize, b: usize, direction: usize) -> Result<&mut Self> {
        let pattern_count = self.frequencies.len();
        check_pattern(a, pattern_count)?;
        check_pattern(b, pattern_count)?;
        if direction >= self.directions.count() {
            return Err(invalid_parameter(
                "direction",
                &direction,
                &format!("{:?} has {} directions", self.directions, self.directions.count()),
            ));
        }
        self.set(a, direction, b);
        self.set(b, DirectionSet::inverse(direction), a);
        Ok(self)
    }

    /// Allow every pattern next to every other in every direction
    pub fn allow_all(&mut self) -> &mut Self {
        for row in &mut self.allowed {
            for bits in row.iter_mut() {
                bits.fill(true);
            }
        }
        self
    }

    /// Freeze into a validated model
    ///
    /// # Errors
    ///
    /// Returns an error if the weights are invalid
    pub fn build(&self) -> Result<PatternModel> {
        let propagator = self
            .allowed
            .iter()
            .map(|row| row.iter().map(|bits| bits.iter_ones().collect()).collect())
            .collect();
        PatternModel::new(self.frequencies.clone(), propagator)
    }

    fn set(&mut self, pattern: usize, direction: usize, other: usize) {
        if let Some(bits) = self
            .allowed
            .get_mut(pattern)
            .and_then(|row| row.get_mut(direction))
        {
            bits.set(other, true);
        }
    }
}
