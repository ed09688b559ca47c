//! Dense LU solver with partial pivoting.
//!
//! `Circuit` hand-rolls this rather than reaching for `nalgebra`'s built-in
//! `.lu()` so the pivot-tolerance check can produce the crate's own
//! `SingularMatrix` error instead of a silently ill-conditioned solve, and
//! so the factorization can be cached and reused across `rhs`-only steps.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::error::{CircuitError, Result};

/// Tolerance knobs for the dense solve. `pivot_epsilon` is the minimum
/// acceptable pivot magnitude after row selection; anything smaller is
/// treated as numerically singular.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    pub pivot_epsilon: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig { pivot_epsilon: 1e-12 }
    }
}

/// An in-place LU decomposition with partial pivoting, `PA = LU`.
///
/// `lu` packs both factors: the strict lower triangle (unit diagonal
/// implied) holds `L`, the upper triangle including the diagonal holds
/// `U`. `pivots[i]` is the original row that ended up in position `i`
/// after pivoting.
#[derive(Debug, Clone)]
pub struct LuFactorization {
    lu: DMatrix<f64>,
    pivots: Vec<usize>,
}

impl LuFactorization {
    /// Factors `matrix`, selecting the largest-magnitude entry in each
    /// column as the pivot. Fails with `SingularMatrix` if any pivot
    /// falls below `config.pivot_epsilon`.
    pub fn factor(matrix: &DMatrix<f64>, config: SolverConfig) -> Result<Self> {
        let n = matrix.nrows();
        debug_assert_eq!(n, matrix.ncols(), "MNA matrix must be square");

        // Singularity is declared when a pivot magnitude falls below ε·‖A‖∞.
        let norm_inf = matrix
            .row_iter()
            .map(|row| row.iter().map(|v| v.abs()).sum::<f64>())
            .fold(0.0_f64, f64::max);
        let threshold = config.pivot_epsilon * norm_inf.max(1.0);

        let mut lu = matrix.clone();
        let mut pivots: Vec<usize> = (0..n).collect();
        let mut min_pivot = f64::INFINITY;

        for col in 0..n {
            let mut max_row = col;
            let mut max_val = lu[(col, col)].abs();
            for row in (col + 1)..n {
                let val = lu[(row, col)].abs();
                if val > max_val {
                    max_val = val;
                    max_row = row;
                }
            }

            if max_row != col {
                lu.swap_rows(col, max_row);
                pivots.swap(col, max_row);
            }

            let pivot = lu[(col, col)];
            min_pivot = min_pivot.min(pivot.abs());
            if pivot.abs() < threshold {
                return Err(CircuitError::SingularMatrix);
            }

            for row in (col + 1)..n {
                let factor = lu[(row, col)] / pivot;
                lu[(row, col)] = factor;
                for k in (col + 1)..n {
                    let sub = factor * lu[(col, k)];
                    lu[(row, k)] -= sub;
                }
            }
        }

        debug!("LU factored: n={n}, min |pivot|={min_pivot:e}");
        Ok(LuFactorization { lu, pivots })
    }

    /// Solves `A x = rhs` for the `A` this factorization was built from,
    /// via permuted forward/back substitution. Fails with `NonFinite` if
    /// the resulting vector contains a NaN or infinity.
    pub fn solve(&self, rhs: &DVector<f64>) -> Result<DVector<f64>> {
        let n = self.lu.nrows();
        let mut y = DVector::zeros(n);
        for i in 0..n {
            let mut sum = rhs[self.pivots[i]];
            for j in 0..i {
                sum -= self.lu[(i, j)] * y[j];
            }
            y[i] = sum;
        }

        let mut x = DVector::zeros(n);
        for i in (0..n).rev() {
            let mut sum = y[i];
            for j in (i + 1)..n {
                sum -= self.lu[(i, j)] * x[j];
            }
            x[i] = sum / self.lu[(i, i)];
        }

        if x.iter().any(|v| !v.is_finite()) {
            return Err(CircuitError::NonFinite);
        }
        Ok(x)
    }
}

/// One-shot solve that factors `matrix` and immediately solves `rhs`,
/// returning the factorization for reuse on subsequent rhs-only steps.
pub fn solve(matrix: &DMatrix<f64>, rhs: &DVector<f64>, config: SolverConfig) -> Result<(DVector<f64>, LuFactorization)> {
    let factorization = LuFactorization::factor(matrix, config)?;
    let x = factorization.solve(rhs)?;
    Ok((x, factorization))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_a_small_well_conditioned_system() {
        // [2 1; 1 3] x = [5; 10] => x = [1, 3]
        let matrix = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let rhs = DVector::from_row_slice(&[5.0, 10.0]);
        let (x, _) = solve(&matrix, &rhs, SolverConfig::default()).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-9);
        assert!((x[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn requires_pivoting_for_a_zero_diagonal_entry() {
        // [0 1; 1 1] x = [2; 3] => swap rows => x = [1, 2]
        let matrix = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 1.0]);
        let rhs = DVector::from_row_slice(&[2.0, 3.0]);
        let (x, _) = solve(&matrix, &rhs, SolverConfig::default()).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-9);
        assert!((x[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn a_singular_matrix_is_reported() {
        let matrix = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let rhs = DVector::from_row_slice(&[1.0, 2.0]);
        assert_eq!(solve(&matrix, &rhs, SolverConfig::default()).err(), Some(CircuitError::SingularMatrix));
    }

    #[test]
    fn cached_factorization_can_be_reused_for_a_new_rhs() {
        let matrix = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let (_, factorization) = solve(&matrix, &DVector::from_row_slice(&[5.0, 10.0]), SolverConfig::default()).unwrap();
        let x2 = factorization.solve(&DVector::from_row_slice(&[4.0, 5.0])).unwrap();
        assert!((x2[0] - 1.4).abs() < 1e-9);
        assert!((x2[1] - 1.2).abs() < 1e-9);
    }
}
