//! Column-major rational matrix.
//!
//! Storage is one flat array of `width * height` rationals; cell `(col, row)`
//! lives at `col * height + row`. Columns are contiguous (stride 1), rows are
//! strided by the height, the diagonal by height + 1. Row and column accessors
//! hand out [`VectorView`]s over that storage, so matrix algorithms get O(1)
//! row/column access with mutation visible through the matrix itself.

use crate::augmented::AugmentedMatrix;
use crate::gauss_jordan::GaussJordan;
use crate::rational::Rational;
use crate::vector::{Vector, VectorRead, VectorView, VectorViewMut, VectorWrite};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    data: Vec<Rational>,
    width: usize,
    height: usize,
}

impl Matrix {
    /// Zero matrix of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![Rational::zero(); width * height],
            width,
            height,
        }
    }

    /// Build a matrix cell by cell; the generator receives `(col, row)`.
    pub fn from_fn<F: FnMut(usize, usize) -> Rational>(
        width: usize,
        height: usize,
        mut generator: F,
    ) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for col in 0..width {
            for row in 0..height {
                data.push(generator(col, row));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Build from integer rows; the outer slice is the list of rows.
    pub fn from_rows(rows: &[Vec<i64>]) -> Self {
        let height = rows.len();
        let width = if height == 0 { 0 } else { rows[0].len() };
        assert!(
            rows.iter().all(|row| row.len() == width),
            "all rows must be of the same length"
        );

        Self::from_fn(width, height, |col, row| Rational::from_int(rows[row][col]))
    }

    pub fn identity(size: usize) -> Self {
        Self::from_fn(size, size, |col, row| {
            if col == row {
                Rational::one()
            } else {
                Rational::zero()
            }
        })
    }

    pub fn of_column<V: VectorRead + ?Sized>(column: &V) -> Self {
        Self::from_fn(1, column.len(), |_, row| column.get(row).clone())
    }

    pub fn of_row<V: VectorRead + ?Sized>(row: &V) -> Self {
        Self::from_fn(row.len(), 1, |col, _| row.get(col).clone())
    }

    pub fn of_diagonal<V: VectorRead + ?Sized>(diagonal: &V) -> Self {
        let size = diagonal.len();
        Self::from_fn(size, size, |col, row| {
            if col == row {
                diagonal.get(col).clone()
            } else {
                Rational::zero()
            }
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    fn cell_index(&self, col: usize, row: usize) -> usize {
        assert!(col < self.width, "column index must fall within [0, width)");
        assert!(row < self.height, "row index must fall within [0, height)");
        col * self.height + row
    }

    pub fn get(&self, col: usize, row: usize) -> &Rational {
        &self.data[self.cell_index(col, row)]
    }

    pub fn set(&mut self, col: usize, row: usize, value: Rational) {
        let index = self.cell_index(col, row);
        self.data[index] = value;
    }

    pub fn swap_cells(&mut self, first_col: usize, first_row: usize, second_col: usize, second_row: usize) {
        let first = self.cell_index(first_col, first_row);
        let second = self.cell_index(second_col, second_row);
        self.data.swap(first, second);
    }

    /// Column view; columns are contiguous in memory.
    pub fn column(&self, index: usize) -> VectorView<'_> {
        assert!(index < self.width, "column index must fall within [0, width)");
        VectorView::new(&self.data, self.height, 1, self.height * index)
    }

    pub fn column_mut(&mut self, index: usize) -> VectorViewMut<'_> {
        assert!(index < self.width, "column index must fall within [0, width)");
        VectorViewMut::new(&mut self.data, self.height, 1, self.height * index)
    }

    /// Row view; rows are strided by the matrix height.
    pub fn row(&self, index: usize) -> VectorView<'_> {
        assert!(index < self.height, "row index must fall within [0, height)");
        VectorView::new(&self.data, self.width, self.height, index)
    }

    pub fn row_mut(&mut self, index: usize) -> VectorViewMut<'_> {
        assert!(index < self.height, "row index must fall within [0, height)");
        VectorViewMut::new(&mut self.data, self.width, self.height, index)
    }

    pub fn diagonal(&self) -> VectorView<'_> {
        VectorView::new(&self.data, self.width, self.height + 1, 0)
    }

    pub fn diagonal_mut(&mut self) -> VectorViewMut<'_> {
        VectorViewMut::new(&mut self.data, self.width, self.height + 1, 0)
    }

    pub fn set_column<V: VectorRead + ?Sized>(&mut self, index: usize, column: &V) {
        assert_eq!(
            self.height,
            column.len(),
            "the column vector must be of the same size as the matrix height"
        );
        let copy = column.to_vector();
        self.column_mut(index).assign(&copy);
    }

    pub fn set_row<V: VectorRead + ?Sized>(&mut self, index: usize, row: &V) {
        assert_eq!(
            self.width,
            row.len(),
            "the row vector must be of the same size as the matrix width"
        );
        let copy = row.to_vector();
        self.row_mut(index).assign(&copy);
    }

    pub fn swap_columns(&mut self, first: usize, second: usize) {
        for row in 0..self.height {
            let a = self.cell_index(first, row);
            let b = self.cell_index(second, row);
            self.data.swap(a, b);
        }
    }

    pub fn swap_rows(&mut self, first: usize, second: usize) {
        for col in 0..self.width {
            let a = self.cell_index(col, first);
            let b = self.cell_index(col, second);
            self.data.swap(a, b);
        }
    }

    /// Determinant by cofactor expansion along row 0.
    ///
    /// The empty matrix has determinant 1 (the empty product), so that
    /// `identity(0)` behaves like every other identity.
    pub fn determinant(&self) -> Rational {
        assert!(self.is_square(), "the matrix must be square");

        if self.width == 0 {
            return Rational::one();
        }
        if self.width == 1 {
            return self.get(0, 0).clone();
        }

        let mut determinant = Rational::zero();

        for excluded in 0..self.width {
            let minor = Self::from_fn(self.width - 1, self.height - 1, |col, row| {
                let original_col = if col < excluded { col } else { col + 1 };
                self.get(original_col, row + 1).clone()
            });

            let term = &minor.determinant() * self.get(excluded, 0);
            determinant = if excluded % 2 == 0 {
                &determinant + &term
            } else {
                &determinant - &term
            };
        }

        determinant
    }

    pub fn mul(&self, other: &Matrix) -> Matrix {
        assert_eq!(
            self.width, other.height,
            "the width of the first matrix must equal the height of the second"
        );

        Self::from_fn(other.width, self.height, |col, row| {
            self.row(row).dot(&other.column(col))
        })
    }

    pub fn mul_vector<V: VectorRead + ?Sized>(&self, vector: &V) -> Vector {
        assert_eq!(
            self.width,
            vector.len(),
            "the vector must be of the same size as the matrix width"
        );

        Vector::from_fn(self.height, |row| self.row(row).dot(vector))
    }

    pub fn transpose(&self) -> Matrix {
        Self::from_fn(self.height, self.width, |col, row| self.get(row, col).clone())
    }

    /// Inverse via Gauss-Jordan on `[M | I]`. A singular input yields the
    /// partially reduced right side.
    pub fn inverse(&self) -> Matrix {
        let mut augmented =
            AugmentedMatrix::new(self.clone(), vec![Matrix::identity(self.height)]);
        GaussJordan::reduce(&mut augmented);
        let (_, mut others) = augmented.into_parts();
        others.remove(0)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            if row != 0 {
                writeln!(f)?;
            }
            for col in 0..self.width {
                if col != 0 {
                    write!(f, " | ")?;
                }
                write!(f, "{}", self.get(col, row))?;
            }
        }
        Ok(())
    }
}
