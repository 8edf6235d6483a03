//! Synthetic dataset generation.

mod sample;

pub use sample::*;
