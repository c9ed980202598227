//! Ridge least-squares solve behind the trainer.
//!
//! Normal equations with an L2 penalty on the weights:
//! `(XᵀX + λI)β = Xᵀy`, solved by Cholesky factorization. The intercept
//! column is never penalized. No randomness anywhere, so identical inputs
//! always produce identical coefficients.

use ndarray::{s, Array1, Array2};
use thiserror::Error;

/// Diagonal bump that keeps the factorization positive definite even when
/// the penalty is zero and features are collinear.
const STABILIZER: f64 = 1e-10;

/// Errors from the solve.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("design matrix has {rows} rows but {targets} targets")]
    DimensionMismatch { rows: usize, targets: usize },

    #[error("normal equations are not positive definite")]
    NotPositiveDefinite,
}

/// Fitted coefficients: intercept plus one weight per feature column.
#[derive(Debug, Clone)]
pub struct LinearFit {
    pub bias: f64,
    pub weights: Vec<f64>,
}

/// Solve ridge least squares for `y ≈ bias + X · weights`.
pub fn solve_ridge(
    x: &Array2<f64>,
    y: &Array1<f64>,
    l2_penalty: f64,
) -> Result<LinearFit, SolverError> {
    if x.nrows() != y.len() {
        return Err(SolverError::DimensionMismatch {
            rows: x.nrows(),
            targets: y.len(),
        });
    }

    // Design matrix with a leading column of ones for the intercept.
    let n = x.nrows();
    let p = x.ncols() + 1;
    let mut design = Array2::<f64>::ones((n, p));
    design.slice_mut(s![.., 1..]).assign(x);

    let transpose = design.t();
    let mut gram = transpose.dot(&design);
    let moment = transpose.dot(y);

    // Penalize the weights, never the intercept.
    for i in 1..p {
        gram[[i, i]] += l2_penalty;
    }
    for i in 0..p {
        gram[[i, i]] += STABILIZER;
    }

    let beta = cholesky_solve(&gram, &moment)?;

    Ok(LinearFit {
        bias: beta[0],
        weights: beta.iter().skip(1).copied().collect(),
    })
}

/// Solve `A β = b` for symmetric positive definite `A` via `A = L Lᵀ`.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, SolverError> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return Err(SolverError::NotPositiveDefinite);
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L z = b.
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * z[j];
        }
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: Lᵀ β = z.
    let mut beta = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * beta[j];
        }
        beta[i] = (z[i] - sum) / l[[i, i]];
    }

    Ok(beta)
}
