//! Constraint-propagating, backtracking tile solver in the wave function collapse family
//!
//! A `PatternModel` says which patterns may sit next to each other across each
//! edge label. The `Solver` keeps every cell's set of possible patterns
//! arc-consistent, repeatedly decides the least certain cell, and unwinds
//! earlier choices when it runs into a contradiction. Constraints plug into
//! the search through a narrow facade.

#![forbid(unsafe_code)]

/// Wave, propagation, pickers, backtracking, and the search loop
pub mod algorithm;
/// Global rules layered on top of adjacency
pub mod constraints;
/// Configuration, errors, and the demo command line
pub mod io;
/// Adjacency models and their builder
pub mod model;
/// Grids and graphs the wave lives on
pub mod topology;

pub use io::error::{Result, SolverError};
