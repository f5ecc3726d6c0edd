//! Two-phase revised simplex over exact rationals.
//!
//! A program holds two tables. The *transform* maps slack-space coordinates
//! back to the original free variables and is shared (behind an `Arc`)
//! between a program and every program derived from it via
//! [`LinearProgram::with_equality`]. The *table* is the simplex tableau:
//! one column per non-basic variable plus the RHS column last, one row per
//! constraint plus the cost row last.
//!
//! Pivoting picks the largest positive reduced cost and the smallest
//! positive ratio, tie-broken by index; when any basic row has a zero RHS
//! the first positive reduced cost is taken instead. Everything is exact,
//! there is no epsilon anywhere.

use crate::error::{Result, SolveError};
use crate::matrix::Matrix;
use crate::rational::Rational;
use crate::vector::{Vector, VectorRead, VectorWrite};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    transform: Arc<Matrix>,
    table: Matrix,
    basics: Vec<usize>,
    non_basics: Vec<usize>,
    /// Count of non-artificial variables; indices at or above it are
    /// artificial and never survive phase I.
    num_reals: usize,
}

impl LinearProgram {
    /// Program with no constraints; any optimization returns the origin.
    pub(crate) fn unconstrained() -> Self {
        Self {
            transform: Arc::new(Matrix::new(0, 0)),
            table: Matrix::new(0, 0),
            basics: Vec::new(),
            non_basics: Vec::new(),
            num_reals: 0,
        }
    }

    fn is_unconstrained(&self) -> bool {
        self.transform.height() == 0 && self.table.height() == 0
    }

    /// Number of original variables; gradients must have this size.
    pub fn size(&self) -> usize {
        self.transform.height()
    }

    /// Build from the tables the builder assembled: detect an initial basis,
    /// normalize it, then run phase I against the artificial variables.
    pub(crate) fn from_tables(transform: Matrix, mut table: Matrix) -> Result<Self> {
        let constraints = table.height();
        let variables = table.width() - 1;

        // Flip constraints with negative values.
        for row in 0..constraints {
            if table.get(variables, row).signum() < 0 {
                table.row_mut(row).negate_assign();
            }
        }

        // Columns already in basic form (a single positive entry in a row
        // not yet claimed) become the starting basis.
        let mut basics: Vec<Option<usize>> = vec![None; constraints];
        let mut non_basic_list: Vec<usize> = Vec::new();

        for col in 0..variables {
            let mut count = 0;
            let mut index = 0;
            for row in 0..constraints {
                if table.get(col, row).is_zero() {
                    continue;
                }
                count += 1;
                index = row;
            }

            if count == 1 && basics[index].is_none() && table.get(col, index).signum() > 0 {
                let divisor = table.get(col, index).clone();
                table.row_mut(index).div_assign(&divisor);
                basics[index] = Some(col);
            } else {
                non_basic_list.push(col);
            }
        }

        // Rows without a basic variable receive an artificial one.
        let mut artificials = 0;
        let basics: Vec<usize> = basics
            .into_iter()
            .map(|basic| {
                basic.unwrap_or_else(|| {
                    let index = variables + artificials;
                    artificials += 1;
                    index
                })
            })
            .collect();

        // Eliminate basic columns from the other rows, then keep only the
        // non-basic columns (plus RHS, plus an empty cost row).
        let non_basic_count = variables - constraints + artificials;
        let mut new_table = Matrix::new(non_basic_count + 1, constraints + 1);

        for row in 0..constraints {
            for basic_row in 0..constraints {
                if row == basic_row || basics[basic_row] >= variables {
                    continue;
                }
                let scale = table.get(basics[basic_row], row).clone();
                if scale.is_zero() {
                    continue;
                }
                let scaled = table.row(basic_row).scaled(&scale);
                table.row_mut(row).sub_assign(&scaled);
            }

            for col in 0..non_basic_count {
                new_table.set(col, row, table.get(non_basic_list[col], row).clone());
            }
            new_table.set(non_basic_count, row, table.get(variables, row).clone());
        }

        Self::init(
            Arc::new(transform),
            new_table,
            basics,
            non_basic_list,
            artificials,
            variables,
        )
    }

    /// Phase I: drive the artificial variables out of the basis. Fails with
    /// [`SolveError::Infeasible`] when their sum cannot reach zero.
    fn init(
        transform: Arc<Matrix>,
        mut table: Matrix,
        basics: Vec<usize>,
        non_basics: Vec<usize>,
        num_artificials: usize,
        num_reals: usize,
    ) -> Result<Self> {
        let width = table.width();
        let height = table.height();

        // The phase-I objective is the sum of the artificial rows.
        for row in 0..height - 1 {
            if basics[row] < num_reals {
                continue;
            }
            let artificial_row = table.row(row).to_vector();
            table.row_mut(height - 1).add_assign(&artificial_row);
        }

        let mut program = Self {
            transform,
            table,
            basics,
            non_basics,
            num_reals,
        };
        program.optimize();

        if program.table.get(width - 1, height - 1).signum() != 0 {
            return Err(SolveError::Infeasible);
        }

        // Pivot any artificial still sitting in the basis out of it. An
        // artificial with no pivot left marks a redundant constraint whose
        // row reduced to zero; that row is dropped below.
        for row in 0..height - 1 {
            if program.basics[row] < num_reals {
                continue;
            }
            for col in 0..width - 1 {
                if program.non_basics[col] >= num_reals
                    || program.table.get(col, row).is_zero()
                {
                    continue;
                }
                program.pivot(col, row);
                break;
            }
        }

        let kept: Vec<usize> = (0..height - 1)
            .filter(|&row| program.basics[row] < num_reals)
            .collect();
        let dropped_rows = (height - 1) - kept.len();

        // Drop the artificial columns (and any redundant rows).
        let compact_width = width - (num_artificials - dropped_rows);
        let mut compact = Matrix::new(compact_width, kept.len() + 1);
        let mut compact_non_basics = vec![0; compact_width - 1];
        let mut source = 0;
        for col in 0..compact_width - 1 {
            while program.non_basics[source] >= num_reals {
                source += 1;
            }
            for (new_row, &row) in kept.iter().enumerate() {
                compact.set(col, new_row, program.table.get(source, row).clone());
            }
            compact_non_basics[col] = program.non_basics[source];
            source += 1;
        }
        for (new_row, &row) in kept.iter().enumerate() {
            compact.set(
                compact_width - 1,
                new_row,
                program.table.get(width - 1, row).clone(),
            );
        }

        program.basics = kept.iter().map(|&row| program.basics[row]).collect();
        program.table = compact;
        program.non_basics = compact_non_basics;
        Ok(program)
    }

    /// Vertex maximizing `gradient • x`; its dot with the gradient is the
    /// optimum. Panics if the objective is unbounded over the constraints.
    pub fn maximize(&self, gradient: &Vector) -> Vector {
        if self.is_unconstrained() {
            return Vector::zero(gradient.len());
        }
        self.clone().maximize_internal(gradient)
    }

    /// Vertex minimizing `gradient • x`.
    pub fn minimize(&self, gradient: &Vector) -> Vector {
        if self.is_unconstrained() {
            return Vector::zero(gradient.len());
        }
        self.clone().maximize_internal(&gradient.negated())
    }

    /// A new program with `gradient • x == value` appended. The receiver is
    /// not modified; the transform is shared structurally.
    pub fn with_equality(&self, gradient: &Vector, value: Rational) -> Result<Self> {
        assert!(
            !self.is_unconstrained(),
            "cannot attach an equality to the unconstrained program"
        );

        let width = self.table.width();
        let height = self.table.height();

        let mut new_table = Matrix::new(width, height + 1);
        for row in 0..height - 1 {
            let source = self.table.row(row).to_vector();
            new_table.set_row(row, &source);
        }
        new_table.set_row(height - 1, &self.transform_constraint(gradient, value));

        if new_table.get(width - 1, height - 1).signum() < 0 {
            new_table.row_mut(height - 1).negate_assign();
        }

        let mut new_basics = self.basics.clone();
        new_basics.push(self.num_reals);

        Self::init(
            Arc::clone(&self.transform),
            new_table,
            new_basics,
            self.non_basics.clone(),
            1,
            self.num_reals,
        )
    }

    fn maximize_internal(mut self, gradient: &Vector) -> Vector {
        assert_eq!(
            gradient.len(),
            self.size(),
            "the gradient must be of the same size as the program"
        );

        // Transformed gradient becomes the cost row.
        let cost_row = self.transform_constraint(gradient, Rational::zero());
        let height = self.table.height();
        self.table.set_row(height - 1, &cost_row);

        self.optimize();

        // Result offset lives in the last column of the transform; subtract
        // each basic row's contribution.
        let mut vertex = self.transform.column(self.transform.width() - 1).to_vector();
        for row in 0..self.table.height() - 1 {
            let scale = self.table.get(self.table.width() - 1, row).clone();
            let contribution = self.transform.column(self.basics[row]).scaled(&scale);
            vertex.sub_assign(&contribution);
        }

        vertex
    }

    /// The simplex loop: pivot until no positive reduced cost remains.
    fn optimize(&mut self) {
        let width = self.table.width();
        let height = self.table.height();

        loop {
            // Degeneracy: with a zero RHS anywhere, any positive delta works.
            let pick_any_delta = (0..height - 1)
                .any(|row| self.table.get(width - 1, row).is_zero());

            let mut entering = None;
            let mut largest_delta = Rational::zero();
            for col in 0..width - 1 {
                let delta = self.table.get(col, height - 1);
                if delta.signum() <= 0 || (entering.is_some() && *delta <= largest_delta) {
                    continue;
                }
                largest_delta = delta.clone();
                entering = Some(col);
                if pick_any_delta {
                    break;
                }
            }

            let Some(entering) = entering else {
                break;
            };

            let mut exiting = None;
            let mut smallest_ratio = Rational::zero();
            for row in 0..height - 1 {
                let value = self.table.get(entering, row);
                if value.signum() <= 0 {
                    continue;
                }
                let ratio = self.table.get(width - 1, row) / value;
                if exiting.is_some() && ratio >= smallest_ratio {
                    continue;
                }
                smallest_ratio = ratio;
                exiting = Some(row);
            }

            let exiting = exiting.expect("the objective is unbounded over the constraint set");
            self.pivot(entering, exiting);
        }
    }

    fn pivot(&mut self, entering: usize, exiting: usize) {
        let pivot_value = self.table.get(entering, exiting).clone();

        // Divide the pivot row by the pivot value, but put the inverse in
        // the pivot cell itself.
        let mut pivot_row = self.table.row(exiting).to_vector();
        pivot_row.div_assign(&pivot_value);
        self.table.set_row(exiting, &pivot_row);
        self.table.set(entering, exiting, pivot_value.inverse());

        // Eliminate the entering column from every other row; its cell
        // becomes the negated scale over the pivot.
        for row in 0..self.table.height() {
            if row == exiting {
                continue;
            }

            let scale = self.table.get(entering, row).clone();
            let scaled = pivot_row.scaled(&scale);
            self.table.row_mut(row).sub_assign(&scaled);
            self.table.set(entering, row, -(&scale / &pivot_value));
        }

        std::mem::swap(
            &mut self.basics[exiting],
            &mut self.non_basics[entering],
        );
    }

    /// Express a constraint over the original variables in terms of the
    /// current non-basic variables, eliminating the basic contributions.
    fn transform_constraint(&self, gradient: &Vector, value: Rational) -> Vector {
        let transform_width = self.transform.width();
        let table_width = self.table.width();

        let mut transformed = Vector::zero(transform_width);
        transformed.set(transform_width - 1, value);

        for row in 0..self.size() {
            let scale = gradient.get(row).clone();
            let scaled = self.transform.row(row).scaled(&scale);
            transformed.sub_assign(&scaled);
        }

        let mut eliminated = Vector::zero(table_width);
        for col in 0..table_width - 1 {
            eliminated.set(col, transformed.get(self.non_basics[col]).clone());
        }
        eliminated.set(table_width - 1, transformed.get(transform_width - 1).clone());

        for row in 0..self.table.height() - 1 {
            let scale = transformed.get(self.basics[row]).clone();
            let scaled = self.table.row(row).scaled(&scale);
            eliminated.sub_assign(&scaled);
        }

        eliminated
    }
}
