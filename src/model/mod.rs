//! Pattern models consumed by the solver

/// Symmetric adjacency builder for grid models
pub mod builder;
/// Validated frequency and compatibility tables
pub mod pattern;
