//! Gauss-Jordan elimination over an augmented matrix.

use crate::augmented::AugmentedMatrix;

pub struct GaussJordan;

impl GaussJordan {
    /// Row-reduce considering only the main matrix's columns for pivots.
    ///
    /// Returns the pivot map: `pivots[col]` is the pivot row of `col`, or
    /// `None` for columns that could not be pivoted.
    pub fn reduce(matrix: &mut AugmentedMatrix) -> Vec<Option<usize>> {
        Self::run(matrix, false)
    }

    /// Row-reduce considering every column, secondary matrices included.
    pub fn reduce_all(matrix: &mut AugmentedMatrix) -> Vec<Option<usize>> {
        Self::run(matrix, true)
    }

    fn run(matrix: &mut AugmentedMatrix, reduce_others: bool) -> Vec<Option<usize>> {
        let width = if reduce_others {
            matrix.width()
        } else {
            matrix.main().width()
        };
        let height = matrix.height();

        let mut pivots = vec![None; width];
        let mut col = 0;
        let mut row = 0;

        while col < width && row < height {
            if let Some(pivot_row) = Self::find_pivot_row(matrix, col, row) {
                matrix.swap_rows(row, pivot_row);
                matrix.pivot_cell(col, row);

                pivots[col] = Some(row);
                row += 1;
            }
            col += 1;
        }

        pivots
    }

    /// First row at or below `row` with a nonzero entry in `col`.
    fn find_pivot_row(matrix: &AugmentedMatrix, col: usize, row: usize) -> Option<usize> {
        (row..matrix.height()).find(|&i| !matrix.get(col, i).is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;
    use crate::rational::Rational;
    use crate::vector::VectorRead;

    #[test]
    fn solves_linear_system() {
        // 2x + y = 5, x + 3y = 10 has the solution x = 1, y = 3.
        let main = Matrix::from_rows(&[vec![2, 1], vec![1, 3]]);
        let rhs = Matrix::from_rows(&[vec![5], vec![10]]);
        let mut augmented = AugmentedMatrix::new(main, vec![rhs]);

        let pivots = GaussJordan::reduce(&mut augmented);

        assert_eq!(pivots, vec![Some(0), Some(1)]);
        assert_eq!(augmented.main(), &Matrix::identity(2));
        assert_eq!(augmented.get(2, 0), &Rational::from_int(1));
        assert_eq!(augmented.get(2, 1), &Rational::from_int(3));
    }

    #[test]
    fn skips_unpivotable_columns() {
        // The second column is a multiple of the first.
        let main = Matrix::from_rows(&[vec![1, 2, 0], vec![2, 4, 1]]);
        let mut augmented = AugmentedMatrix::new(main, vec![]);

        let pivots = GaussJordan::reduce(&mut augmented);

        assert_eq!(pivots, vec![Some(0), None, Some(1)]);
    }

    #[test]
    fn singular_matrix_leaves_zero_row() {
        let main = Matrix::from_rows(&[vec![1, 2], vec![2, 4]]);
        let mut augmented = AugmentedMatrix::new(main, vec![Matrix::identity(2)]);

        GaussJordan::reduce(&mut augmented);

        // Rank 1: the second row of the main side reduces to zero.
        assert!(augmented.main().row(1).to_vector().is_zero());
    }

    #[test]
    fn reduce_all_continues_into_secondary_columns() {
        let main = Matrix::from_rows(&[vec![0, 0], vec![0, 0]]);
        let other = Matrix::from_rows(&[vec![3, 0], vec![0, 2]]);
        let mut augmented = AugmentedMatrix::new(main, vec![other]);

        let pivots = GaussJordan::reduce_all(&mut augmented);

        assert_eq!(pivots, vec![None, None, Some(0), Some(1)]);
        assert_eq!(augmented.get(2, 0), &Rational::one());
        assert_eq!(augmented.get(3, 1), &Rational::one());
    }
}
