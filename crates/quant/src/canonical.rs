//! Maximum canonical correlation between two multivariate series.
//!
//! For observation matrices `X` (T×p) and `Y` (T×q) the score is the largest
//! eigenvalue of `S_xx⁻¹ S_xy S_yy⁻¹ S_yx`. The product is not symmetric, so
//! it is evaluated in the whitened form `L⁻¹ S_xy S_yy⁻¹ S_yx L⁻ᵀ` with
//! `S_xx = L Lᵀ`, which has the same spectrum and admits a symmetric
//! eigensolver.
//!
//! The caller centers the inputs. Covariances use the sample (T − 1)
//! estimator, which removes column means again; on centered input that is a
//! no-op. At least `max(p, q) + 1` rows are required.

use nalgebra::DMatrix;
use types::{ReturnColumn, ReturnSeries};

use crate::error::{DomainError, InputError, Result};
use crate::ewma::check_tail_alignment;

/// Eigenvalue ratio below which a covariance matrix is treated as singular.
const SINGULAR_RATIO: f64 = 1e-12;

/// Subtract each column's mean.
pub fn center_columns(m: &DMatrix<f64>) -> DMatrix<f64> {
    let mut out = m.clone();
    let rows = m.nrows() as f64;
    for mut col in out.column_iter_mut() {
        let mean = col.sum() / rows;
        col.add_scalar_mut(-mean);
    }
    out
}

/// Sample cross-covariance of the columns of `x` and `y` (same row count, ≥ 2 rows).
fn cross_covariance(x: &DMatrix<f64>, y: &DMatrix<f64>) -> DMatrix<f64> {
    let xc = center_columns(x);
    let yc = center_columns(y);
    (xc.transpose() * yc) / (x.nrows() as f64 - 1.0)
}

/// Cholesky factor of a covariance matrix, rejecting (near-)singular ones.
fn cholesky_factor(cov: &DMatrix<f64>, name: &'static str) -> Result<DMatrix<f64>> {
    let eigen = cov.clone().symmetric_eigen();
    let max = eigen.eigenvalues.max();
    let min = eigen.eigenvalues.min();
    if !(max > 0.0) || min <= max * SINGULAR_RATIO {
        return Err(DomainError::SingularCovariance(name).into());
    }
    cov.clone()
        .cholesky()
        .map(|c| c.l())
        .ok_or_else(|| DomainError::SingularCovariance(name).into())
}

/// Largest canonical correlation score of `x` and `y`.
///
/// Returns the score (a similarity); `1 - score` is the canonical distance.
/// Identical inputs score 1.0.
///
/// # Errors
/// - [`InputError::InsufficientObservations`] unless `T > max(p, q)`.
/// - [`DomainError::SingularCovariance`] if `S_xx` or `S_yy` is not invertible.
pub fn max_canonical_correlation(x: &DMatrix<f64>, y: &DMatrix<f64>) -> Result<f64> {
    if x.nrows() != y.nrows() {
        return Err(InputError::MalformedMatrix(format!(
            "observation counts differ: {} vs {}",
            x.nrows(),
            y.nrows()
        ))
        .into());
    }
    let required = x.ncols().max(y.ncols());
    if x.nrows() <= required || required == 0 {
        return Err(InputError::InsufficientObservations {
            required,
            actual: x.nrows(),
        }
        .into());
    }

    let s_xx = cross_covariance(x, x);
    let s_yy = cross_covariance(y, y);
    let s_xy = cross_covariance(x, y);

    let l_xx = cholesky_factor(&s_xx, "S_xx")?;
    let l_yy = cholesky_factor(&s_yy, "S_yy")?;

    let l_xx_inv = l_xx
        .try_inverse()
        .ok_or(DomainError::SingularCovariance("S_xx"))?;
    let l_yy_inv = l_yy
        .try_inverse()
        .ok_or(DomainError::SingularCovariance("S_yy"))?;
    let s_yy_inv = l_yy_inv.transpose() * &l_yy_inv;

    let m = &l_xx_inv * &s_xy * s_yy_inv * s_xy.transpose() * l_xx_inv.transpose();
    let m = (&m + m.transpose()) * 0.5;

    let score = m.symmetric_eigen().eigenvalues.max();
    if !score.is_finite() {
        return Err(DomainError::NonFinite("canonical correlation".into()).into());
    }
    // Rounding can leave the top eigenvalue a hair outside [0, 1].
    Ok(score.clamp(0.0, 1.0))
}

/// Centered T×3 block of high/low/close returns over the last `n` rows.
fn centered_block(series: &ReturnSeries, n: usize) -> DMatrix<f64> {
    let rows = &series.rows()[series.len() - n..];
    let block = DMatrix::from_fn(n, ReturnColumn::ALL.len(), |r, c| {
        rows[r].get(ReturnColumn::ALL[c])
    });
    center_columns(&block)
}

/// Canonical correlation score of two return series' high/low/close blocks.
///
/// The series are tail aligned by date like the EWMA path.
pub fn canonical_correlation_series(a: &ReturnSeries, b: &ReturnSeries) -> Result<f64> {
    let n = check_tail_alignment(a, b)?;
    max_canonical_correlation(&centered_block(a, n), &centered_block(b, n))
}
