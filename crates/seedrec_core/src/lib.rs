//! seedrec core library
//!
//! Recovers the possible initial states (seeds) of a linear-congruential
//! RNG from a transcript of partially observed outputs.
//!
//! # Overview
//!
//! Each bounded observation pins the post-update state at a known index to
//! a window. Those windows form a box around an integer lattice given by
//! the affine relation `state_i = a^i * seed + o_i (mod m)`; enumerating the
//! lattice points inside the box and replay-validating them yields every
//! consistent seed. All arithmetic from the LCG composition through LLL and
//! the simplex is exact rational.
//!
//! # Key components
//!
//! - [`rational`] - Exact rational number type
//! - [`vector`] / [`matrix`] - Dense exact linear algebra with strided views
//! - [`gauss_jordan`] - Row reduction over augmented matrices
//! - [`lattice`] - LLL basis reduction
//! - [`simplex`] - Exact two-phase linear programming
//! - [`lcg`] - LCG model and RNG cursor
//! - [`calls`] - The observable call family and its Java-style encodings
//! - [`enumeration`] - Parallel branch-and-bound lattice enumeration
//! - [`reverser`] - The solve pipeline
//!
//! # Example
//!
//! ```
//! use seedrec_core::{IntCall, JavaRandom, Reverser};
//!
//! // Observe two outputs of an unknown generator.
//! let mut unknown = JavaRandom::new(0x1234_5678_9ABC);
//! let first = unknown.next_int();
//! let second = unknown.next_int();
//!
//! // Recover every initial state consistent with the observations.
//! let mut reverser = Reverser::new();
//! reverser.add_call(IntCall::exact(first));
//! reverser.add_call(IntCall::exact(second));
//!
//! let seeds: Vec<u64> = reverser.solve_java().unwrap().collect();
//! assert!(seeds.contains(&0x1234_5678_9ABC));
//! ```

pub mod augmented;
pub mod calls;
pub mod enumeration;
pub mod error;
pub mod gauss_jordan;
pub mod lattice;
pub mod lcg;
pub mod matrix;
pub mod rational;
pub mod reverser;
pub mod simplex;
pub mod vector;

pub use augmented::AugmentedMatrix;
pub use calls::java::{
    BooleanCall, DoubleCall, FloatCall, IntCall, IntRangeCall, JavaRandom, LongCall,
};
pub use calls::{RandomCall, SeedCall};
pub use enumeration::{TreeNode, VertexIter};
pub use error::{Result, SolveError};
pub use gauss_jordan::GaussJordan;
pub use lattice::{LllConfig, LLL};
pub use lcg::{Lcg, Random};
pub use matrix::Matrix;
pub use rational::Rational;
pub use reverser::{Reverser, Solutions, SolveStats};
pub use simplex::{ConstraintType, LinearConstraint, LinearProgram, LinearProgramBuilder};
pub use vector::{Vector, VectorRead, VectorView, VectorViewMut, VectorWrite};
