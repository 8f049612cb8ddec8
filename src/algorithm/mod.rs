/// Choice points and contradiction recovery policies
pub mod backtrack;
/// Fixed-width pattern sets
pub mod bitset;
/// Minimum-entropy cell trackers
pub mod entropy;
/// Search loop and public solver surface
pub mod executor;
/// Per-cell weight sets with priority tiers
pub mod priority;
/// Support counters, worklist, and undo trail
pub mod propagation;
/// Injected randomness
pub mod random;
/// Cell and pattern pickers
pub mod selection;
/// Per-cell pattern possibilities and entropy sums
pub mod wave;
