//! Shared domain types.
//!
//! Everything downstream (fitting, mapping, persistence, plotting) works in
//! terms of these types, so they live in one dependency-free module.

mod types;

pub use types::*;
