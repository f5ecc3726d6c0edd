//! Augmented matrix: elementary row operations broadcast over several
//! matrices of equal height.
//!
//! The logical column range spans the main matrix first, then each secondary
//! matrix in order. Row reduction of `[M | I]` and the simplex builder both
//! work through this type so every associated matrix stays in lockstep.

use crate::matrix::Matrix;
use crate::rational::Rational;
use crate::vector::{VectorRead, VectorWrite};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentedMatrix {
    main: Matrix,
    others: Vec<Matrix>,
}

impl AugmentedMatrix {
    pub fn new(main: Matrix, others: Vec<Matrix>) -> Self {
        let height = main.height();
        assert!(
            others.iter().all(|other| other.height() == height),
            "all secondary matrices must be of the same height as the main one"
        );

        Self { main, others }
    }

    pub fn main(&self) -> &Matrix {
        &self.main
    }

    pub fn main_mut(&mut self) -> &mut Matrix {
        &mut self.main
    }

    pub fn others(&self) -> &[Matrix] {
        &self.others
    }

    pub fn others_mut(&mut self) -> &mut [Matrix] {
        &mut self.others
    }

    pub fn into_parts(self) -> (Matrix, Vec<Matrix>) {
        (self.main, self.others)
    }

    /// Total width across the main and all secondary matrices.
    pub fn width(&self) -> usize {
        self.main.width() + self.others.iter().map(Matrix::width).sum::<usize>()
    }

    pub fn height(&self) -> usize {
        self.main.height()
    }

    fn resolve(&self, col: usize) -> (&Matrix, usize) {
        let mut col = col;
        if col < self.main.width() {
            return (&self.main, col);
        }
        col -= self.main.width();

        for other in &self.others {
            if col < other.width() {
                return (other, col);
            }
            col -= other.width();
        }

        panic!("column index is out of bounds");
    }

    pub fn get(&self, col: usize, row: usize) -> &Rational {
        let (matrix, local) = self.resolve(col);
        matrix.get(local, row)
    }

    pub fn set(&mut self, col: usize, row: usize, value: Rational) {
        let mut col = col;
        if col < self.main.width() {
            self.main.set(col, row, value);
            return;
        }
        col -= self.main.width();

        for other in &mut self.others {
            if col < other.width() {
                other.set(col, row, value);
                return;
            }
            col -= other.width();
        }

        panic!("column index is out of bounds");
    }

    fn matrices_mut(&mut self) -> impl Iterator<Item = &mut Matrix> {
        std::iter::once(&mut self.main).chain(self.others.iter_mut())
    }

    pub fn swap_rows(&mut self, first: usize, second: usize) {
        for matrix in self.matrices_mut() {
            matrix.swap_rows(first, second);
        }
    }

    /// Normalize the pivot row so the pivot cell becomes 1, then zero the
    /// rest of the pivot column by subtracting scaled multiples of that row.
    pub fn pivot_cell(&mut self, col: usize, row: usize) {
        let divisor = self.get(col, row).clone();
        for matrix in self.matrices_mut() {
            matrix.row_mut(row).div_assign(&divisor);
        }

        for i in 0..self.height() {
            if i == row {
                continue;
            }
            let scale = -self.get(col, i);
            self.add_scaled_row(i, row, &scale);
        }
    }

    pub fn add_scaled_row(&mut self, dst: usize, src: usize, scale: &Rational) {
        for matrix in self.matrices_mut() {
            let scaled = matrix.row(src).scaled(scale);
            matrix.row_mut(dst).add_assign(&scaled);
        }
    }
}
