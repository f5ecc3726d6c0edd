//! Collects linear constraints and assembles the two-phase simplex tables.

use crate::augmented::AugmentedMatrix;
use crate::error::{Result, SolveError};
use crate::gauss_jordan::GaussJordan;
use crate::matrix::Matrix;
use crate::rational::Rational;
use crate::simplex::constraint::{ConstraintType, LinearConstraint};
use crate::simplex::program::LinearProgram;
use crate::vector::{Vector, VectorRead};
use std::fmt;

/// Accumulates constraints for a [`LinearProgram`].
///
/// The problem dimension is fixed by the first constraint added. The
/// original variables are free (they may be negative), so `build` first
/// eliminates every variable it can express through the constraint rows via
/// Gauss-Jordan, and splits each remaining free variable into a difference
/// of two sign-constrained slacks.
#[derive(Debug, Clone, Default)]
pub struct LinearProgramBuilder {
    size: Option<usize>,
    constraints: Vec<LinearConstraint>,
}

impl LinearProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `gradient • x == value`.
    pub fn add_equality(&mut self, gradient: Vector, value: Rational) {
        self.add_constraint(gradient, ConstraintType::Equal, value);
    }

    /// Adds `gradient • x >= value`.
    pub fn add_min(&mut self, gradient: Vector, value: Rational) {
        self.add_constraint(gradient, ConstraintType::GreaterEqual, value);
    }

    /// Adds `gradient • x <= value`.
    pub fn add_max(&mut self, gradient: Vector, value: Rational) {
        self.add_constraint(gradient, ConstraintType::LessEqual, value);
    }

    /// Adds `min <= gradient • x <= max` as a pair of constraints.
    pub fn add_bounds(&mut self, min: Rational, gradient: Vector, max: Rational) {
        self.add_min(gradient.clone(), min);
        self.add_max(gradient, max);
    }

    /// Adds `min[i] <= row_i(basis) • x <= max[i]` for every row of `basis`.
    pub fn add_bounded_basis(&mut self, min: &Vector, basis: &Matrix, max: &Vector) {
        let height = basis.height();
        assert!(
            min.len() == height && max.len() == height,
            "the bounding vectors must be of the same height as the basis"
        );

        for i in 0..height {
            self.add_bounds(
                min.get(i).clone(),
                basis.row(i).to_vector(),
                max.get(i).clone(),
            );
        }
    }

    /// Dimension fixed by the first constraint, if any.
    pub fn size(&self) -> Option<usize> {
        self.size
    }

    fn add_constraint(&mut self, gradient: Vector, constraint_type: ConstraintType, value: Rational) {
        let size = *self.size.get_or_insert(gradient.len());
        assert_eq!(gradient.len(), size, "all constraints must be of the same size");

        self.constraints
            .push(LinearConstraint::new(gradient, constraint_type, value));
    }

    /// Assemble the phase-II tableau.
    ///
    /// With no constraints collected the unconstrained program is returned,
    /// whose every optimization yields the origin.
    pub fn build(&self) -> Result<LinearProgram> {
        let size = match self.size {
            Some(size) => size,
            None => return Ok(LinearProgram::unconstrained()),
        };
        let num_constraints = self.constraints.len();
        let rows = size + num_constraints;

        // Real-variable coefficients on the left, then one identity-style
        // column per base slack, room for 2·size splitting slacks, and the
        // RHS value column last.
        let reals = Matrix::new(size, rows);
        let slacks = Matrix::new(num_constraints + 2 * size + 1, rows);
        let mut combined = AugmentedMatrix::new(reals, vec![slacks]);

        let value_col = num_constraints + 2 * size;
        let mut slack_idx = 0;

        for (row, constraint) in self.constraints.iter().enumerate() {
            combined.main_mut().set_row(row, constraint.gradient());
            combined.others_mut()[0].set(value_col, row, constraint.value().clone());

            match constraint.constraint_type() {
                ConstraintType::LessEqual => {
                    combined.others_mut()[0].set(slack_idx, row, Rational::one());
                    slack_idx += 1;
                }
                ConstraintType::GreaterEqual => {
                    combined.others_mut()[0].set(slack_idx, row, -Rational::one());
                    slack_idx += 1;
                }
                ConstraintType::Equal => {}
            }
        }

        // Eliminate the free reals that the constraint rows can express.
        let pivots = GaussJordan::reduce(&mut combined);

        // Whatever real survived gets split as r = r⁺ − r⁻ on a fresh row.
        let mut constraint_idx = num_constraints;
        for col in 0..size {
            if pivots[col].is_some() {
                continue;
            }

            combined.main_mut().set(col, constraint_idx, Rational::one());
            combined.others_mut()[0].set(slack_idx, constraint_idx, Rational::one());
            slack_idx += 1;
            combined.others_mut()[0].set(slack_idx, constraint_idx, -Rational::one());
            slack_idx += 1;

            constraint_idx += 1;
        }

        // This time reduce across the slack columns too.
        GaussJordan::reduce_all(&mut combined);

        if constraint_idx == size {
            return Err(SolveError::Infeasible);
        }

        let (_, mut others) = combined.into_parts();
        let slacks = others.remove(0);

        // The first `size` rows express the reals through the slacks; the
        // rest become the simplex table. One extra column carries the RHS.
        let mut transform = Matrix::new(slack_idx + 1, size);
        let mut table = Matrix::new(slack_idx + 1, constraint_idx - size);

        for row in 0..size {
            for col in 0..slack_idx {
                transform.set(col, row, slacks.get(col, row).clone());
            }
            transform.set(slack_idx, row, slacks.get(value_col, row).clone());
        }

        for row in size..constraint_idx {
            for col in 0..slack_idx {
                table.set(col, row - size, slacks.get(col, row).clone());
            }
            table.set(slack_idx, row - size, slacks.get(value_col, row).clone());
        }

        LinearProgram::from_tables(transform, table)
    }
}

impl fmt::Display for LinearProgramBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, constraint) in self.constraints.iter().enumerate() {
            if i != 0 {
                writeln!(f)?;
            }
            write!(f, "{constraint}")?;
        }
        Ok(())
    }
}
