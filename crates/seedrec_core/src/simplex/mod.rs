//! Exact-rational linear programming: constraints, a builder that reduces
//! free variables out, and a two-phase revised simplex.

mod builder;
mod constraint;
mod program;

pub use builder::LinearProgramBuilder;
pub use constraint::{ConstraintType, LinearConstraint};
pub use program::LinearProgram;
