//! Unit tests mirroring the `src` tree

mod algorithm;
mod topology;
