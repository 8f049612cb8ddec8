pub mod bitset;
pub mod executor;
