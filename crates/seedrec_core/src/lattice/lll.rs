//! Lenstra-Lenstra-Lovász lattice basis reduction.
//!
//! Works on exact rationals end to end; there is no floating-point step
//! anywhere, so the reduction is valid for the adversarial bases the seed
//! solver produces. Basis vectors are the matrix *columns*.

use crate::matrix::Matrix;
use crate::rational::Rational;
use crate::vector::{Vector, VectorRead, VectorWrite};

/// Reduction quality parameter δ, kept as an exact fraction.
///
/// Must lie in (1/4, 1). Higher values give a better-reduced basis at the
/// cost of more swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LllConfig {
    pub delta_num: i64,
    pub delta_den: i64,
}

impl Default for LllConfig {
    fn default() -> Self {
        // Lovász's original choice.
        Self {
            delta_num: 3,
            delta_den: 4,
        }
    }
}

impl LllConfig {
    /// δ = 99/100, the quality the seed solver uses.
    pub fn strong() -> Self {
        Self {
            delta_num: 99,
            delta_den: 100,
        }
    }

    fn delta(&self) -> Rational {
        Rational::new(self.delta_num, self.delta_den)
    }
}

pub struct LLL {
    basis: Matrix,
    gso: Matrix,
    mu: Matrix,
    norms: Vector,
}

impl LLL {
    /// Reduce a basis, returning a new matrix with leading all-zero columns
    /// stripped. The input is not modified.
    pub fn reduce(basis: &Matrix, config: &LllConfig) -> Matrix {
        let width = basis.width();
        let height = basis.height();

        if width == 0 {
            return basis.clone();
        }

        let state = Self {
            basis: basis.clone(),
            gso: Matrix::new(width, height),
            mu: Matrix::new(width, width),
            norms: Vector::zero(width),
        };
        state.run(config.delta())
    }

    fn run(mut self, delta: Rational) -> Matrix {
        let width = self.basis.width();

        self.gso.set_column(0, &self.basis.column(0).to_vector());
        self.norms.set(0, self.basis.column(0).sdot());

        let mut k = 1;
        let mut k_max = 0;
        let mut update_gso = true;

        while k < width {
            if k > k_max && update_gso {
                k_max = k;
                self.update_gso(k);
            }
            self.red(k, k - 1);
            if self.lovasz_condition(k, &delta) {
                for l in (0..k - 1).rev() {
                    self.red(k, l);
                }
                k += 1;
                update_gso = true;
            } else {
                self.swap(k, k_max);
                k = if k > 1 { k - 1 } else { 1 };
                update_gso = false;
            }
        }

        let mut zero_cols = 0;
        while zero_cols < width && self.basis.column(zero_cols).is_zero() {
            zero_cols += 1;
        }
        Matrix::from_fn(width - zero_cols, self.basis.height(), |col, row| {
            self.basis.get(zero_cols + col, row).clone()
        })
    }

    fn update_gso(&mut self, k: usize) {
        let mut new_col = self.basis.column(k).to_vector();
        for j in 0..k {
            let mu_jk = if self.norms.get(j).is_zero() {
                Rational::zero()
            } else {
                let projection = self.basis.column(k).dot(&self.gso.column(j));
                &projection / self.norms.get(j)
            };
            let correction = self.gso.column(j).scaled(&mu_jk);
            new_col.sub_assign(&correction);
            self.mu.set(j, k, mu_jk);
        }
        self.norms.set(k, new_col.sdot());
        self.gso.set_column(k, &new_col);
    }

    fn lovasz_condition(&self, k: usize, delta: &Rational) -> bool {
        let factor = delta - &self.mu.get(k - 1, k).pow(2);
        *self.norms.get(k) >= self.norms.get(k - 1) * &factor
    }

    /// Size-reduce column `i` against column `j`.
    fn red(&mut self, i: usize, j: usize) {
        let rounded = self.mu.get(j, i).round();
        if rounded.is_zero() {
            return;
        }

        // Only reached when |μ_ji| > 1/2.
        let correction = self.basis.column(j).scaled(&rounded);
        self.basis.column_mut(i).sub_assign(&correction);

        let adjusted = self.mu.get(j, i) - &rounded;
        self.mu.set(j, i, adjusted);
        for col in 0..j {
            let adjusted = self.mu.get(col, i) - &(self.mu.get(col, j) * &rounded);
            self.mu.set(col, i, adjusted);
        }
    }

    fn swap(&mut self, k: usize, k_max: usize) {
        self.basis.swap_columns(k, k - 1);
        if k > 1 {
            for j in 0..k - 1 {
                self.mu.swap_cells(j, k, j, k - 1);
            }
        }

        let t_mu = self.mu.get(k - 1, k).clone();
        let t_norm = self.norms.get(k) + &(&(&t_mu * &t_mu) * self.norms.get(k - 1));

        if t_norm.is_zero() {
            self.norms.set(k, self.norms.get(k - 1).clone());
            self.norms.set(k - 1, Rational::zero());
            self.gso.swap_columns(k, k - 1);
            for i in k + 1..=k_max {
                self.mu.set(k, i, self.mu.get(k - 1, i).clone());
                self.mu.set(k - 1, i, Rational::zero());
            }
        } else if self.norms.get(k).is_zero() && !t_mu.is_zero() {
            self.norms.set(k - 1, t_norm);
            self.gso.column_mut(k - 1).scale_assign(&t_mu);
            self.mu.set(k - 1, k, t_mu.inverse());
            for i in k + 1..=k_max {
                let value = self.mu.get(k - 1, i) / &t_mu;
                self.mu.set(k - 1, i, value);
            }
        } else {
            let t = self.norms.get(k - 1) / &t_norm;
            self.mu.set(k - 1, k, &t_mu * &t);

            let b = self.gso.column(k - 1).to_vector();
            let new_previous = self.gso.column(k).plus(&b.scaled(&t_mu));
            self.gso.set_column(k - 1, &new_previous);

            let mu_prev_k = self.mu.get(k - 1, k).clone();
            let scale = self.norms.get(k) / &t_norm;
            let new_current = b.scaled(&scale).minus(&self.gso.column(k).scaled(&mu_prev_k));
            self.gso.set_column(k, &new_current);

            let scaled_norm = self.norms.get(k) * &t;
            self.norms.set(k, scaled_norm);
            self.norms.set(k - 1, t_norm);

            for i in k + 1..=k_max {
                let t = self.mu.get(k, i).clone();
                self.mu.set(k, i, self.mu.get(k - 1, i) - &(&t_mu * &t));
                let value = &t + &(&mu_prev_k * self.mu.get(k, i));
                self.mu.set(k - 1, i, value);
            }
        }
    }
}
