//! Lattice basis reduction.

mod lll;

pub use lll::{LllConfig, LLL};
