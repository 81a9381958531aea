//! Exponentially weighted correlation of log-returns.
//!
//! Both entry points share one algorithm. With `alpha = 2 / (span + 1)` the
//! `i`-th retained observation (oldest first) gets weight `(1 - alpha)^i`,
//! normalized to sum to one. Each series is multiplied by the weights,
//! z-scored with the population standard deviation, and the correlation is
//! `dot(z_a, z_b) / n`.
//!
//! - [`ewma_correlation`] / [`ewma_correlation_series`]: one pair of series.
//! - [`ewma_correlation_matrix`]: a whole panel at once.
//!
//! Both return correlation. Distances are derived in [`crate::matrix`].

use nalgebra::DMatrix;
use types::{ReturnPanel, ReturnSeries, Ticker};

use crate::error::{DomainError, InputError, Result};
use crate::matrix::CorrelationMatrix;
use crate::stats;

/// Normalized decay weights for `n` observations, oldest first.
pub fn ewma_weights(n: usize, span: u32) -> Result<Vec<f64>> {
    if span < 1 {
        return Err(InputError::InvalidSpan(span).into());
    }
    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut weights: Vec<f64> = (0..n).map(|i| decay.powi(i as i32)).collect();
    let total: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    Ok(weights)
}

/// Weighted and standardized copy of `values`.
fn standardize_weighted(values: &[f64], weights: &[f64], label: &str) -> Result<Vec<f64>> {
    // A series without variation carries no correlation information, even
    // when the decay weights would make its weighted copy vary.
    if values.iter().all(|&v| v == values[0]) {
        return Err(DomainError::ZeroVariance(label.to_string()).into());
    }
    let weighted: Vec<f64> = values.iter().zip(weights).map(|(v, w)| v * w).collect();
    stats::zscore(&weighted).ok_or_else(|| DomainError::ZeroVariance(label.to_string()).into())
}

fn finish(corr: f64, what: impl FnOnce() -> String) -> Result<f64> {
    if !corr.is_finite() {
        return Err(DomainError::NonFinite(what()).into());
    }
    // Rounding can push |corr| a hair past one.
    Ok(corr.clamp(-1.0, 1.0))
}

/// EWMA correlation of two raw return slices.
///
/// The last `n = min(len_a, len_b)` values of each slice are paired
/// positionally. Use [`ewma_correlation_series`] when the dates are known so
/// the alignment can be checked.
///
/// # Errors
/// - [`InputError::EmptySeries`] if either slice is empty.
/// - [`InputError::InvalidSpan`] if `span == 0`.
/// - [`DomainError::ZeroVariance`] if either retained series is constant.
pub fn ewma_correlation(a: &[f64], b: &[f64], span: u32) -> Result<f64> {
    ewma_correlation_labeled(a, b, span, "left", "right")
}

fn ewma_correlation_labeled(
    a: &[f64],
    b: &[f64],
    span: u32,
    label_a: &str,
    label_b: &str,
) -> Result<f64> {
    let n = a.len().min(b.len());
    if n == 0 {
        let label = if a.is_empty() { label_a } else { label_b };
        return Err(InputError::EmptySeries(label.to_string()).into());
    }
    let weights = ewma_weights(n, span)?;

    let za = standardize_weighted(&a[a.len() - n..], &weights, label_a)?;
    let zb = standardize_weighted(&b[b.len() - n..], &weights, label_b)?;

    finish(stats::dot(&za, &zb) / n as f64, || {
        format!("EWMA correlation of {label_a}/{label_b}")
    })
}

/// EWMA correlation of the close-return columns of two series.
///
/// The series are tail aligned: the last `n` dates of both must coincide,
/// otherwise [`InputError::MisalignedSeries`] is returned.
pub fn ewma_correlation_series(a: &ReturnSeries, b: &ReturnSeries, span: u32) -> Result<f64> {
    let n = check_tail_alignment(a, b)?;
    let ca = a.closes();
    let cb = b.closes();
    ewma_correlation_labeled(
        &ca[ca.len() - n..],
        &cb[cb.len() - n..],
        span,
        a.ticker(),
        b.ticker(),
    )
}

/// Number of tail rows shared by `a` and `b`, after checking their dates match.
pub(crate) fn check_tail_alignment(a: &ReturnSeries, b: &ReturnSeries) -> Result<usize> {
    let n = a.len().min(b.len());
    if n == 0 {
        let empty = if a.is_empty() { a } else { b };
        return Err(InputError::EmptySeries(empty.ticker().to_string()).into());
    }
    if a.tail_dates(n) != b.tail_dates(n) {
        return Err(InputError::MisalignedSeries {
            left: a.ticker().to_string(),
            right: b.ticker().to_string(),
        }
        .into());
    }
    Ok(n)
}

/// EWMA correlation matrix of a panel's close returns.
///
/// Every series must share the same date index. The diagonal is 1.0.
pub fn ewma_correlation_matrix(panel: &ReturnPanel, span: u32) -> Result<CorrelationMatrix> {
    let first = panel.series().first().ok_or(InputError::EmptyUniverse)?;
    for s in panel.iter().skip(1) {
        if s.dates() != first.dates() {
            return Err(InputError::MisalignedSeries {
                left: first.ticker().to_string(),
                right: s.ticker().to_string(),
            }
            .into());
        }
    }

    let n = first.len();
    if n == 0 {
        return Err(InputError::EmptySeries(first.ticker().to_string()).into());
    }
    let weights = ewma_weights(n, span)?;

    let columns: Vec<Vec<f64>> = panel
        .iter()
        .map(|s| standardize_weighted(&s.closes(), &weights, s.ticker()))
        .collect::<Result<_>>()?;

    let m = columns.len();
    let z = DMatrix::from_fn(n, m, |row, col| columns[col][row]);
    let mut corr = (z.transpose() * &z) / n as f64;

    for i in 0..m {
        for j in 0..m {
            let v = corr[(i, j)];
            if !v.is_finite() {
                return Err(DomainError::NonFinite(format!(
                    "EWMA correlation of {}/{}",
                    columns_label(panel, i),
                    columns_label(panel, j)
                ))
                .into());
            }
            corr[(i, j)] = v.clamp(-1.0, 1.0);
        }
    }

    let tickers: Vec<Ticker> = panel.tickers().into_iter().map(String::from).collect();
    Ok(CorrelationMatrix::from_raw(tickers, corr))
}

fn columns_label(panel: &ReturnPanel, i: usize) -> &str {
    panel.series()[i].ticker()
}
