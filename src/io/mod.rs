/// Demo command-line interface and built-in tilesets
pub mod cli;
/// Solver options and tuning constants
pub mod configuration;
/// Error types and parameter checks
pub mod error;
/// Progress display for the demo binary
pub mod progress;
