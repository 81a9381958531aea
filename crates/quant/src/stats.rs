//! Statistical utilities shared by the correlation engines.
//!
//! Functions return `None` when the statistic is undefined; callers turn
//! that into a typed error with context.

/// Calculate the mean of a slice of values.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Calculate the variance of a slice of values (population variance).
pub fn variance(values: &[f64]) -> Option<f64> {
    let mean_val = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean_val).powi(2)).sum();
    Some(sum_sq / values.len() as f64)
}

/// Calculate the standard deviation (population).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(|v| v.sqrt())
}

/// Standardize to zero mean and unit population standard deviation.
///
/// Returns `None` for an empty slice or a zero (or non-finite) deviation.
pub fn zscore(values: &[f64]) -> Option<Vec<f64>> {
    let m = mean(values)?;
    let sd = std_dev(values)?;
    if sd == 0.0 || !sd.is_finite() {
        return None;
    }
    Some(values.iter().map(|v| (v - m) / sd).collect())
}

/// Dot product of two equal-length slices.
pub fn dot(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    x.iter().zip(y).map(|(a, b)| a * b).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = std_dev(&values).unwrap();
        assert!((std - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_zscore_unit_variance() {
        let z = zscore(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!(mean(&z).unwrap().abs() < 1e-12);
        assert!((std_dev(&z).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zscore_constant_is_none() {
        assert_eq!(zscore(&[3.0, 3.0, 3.0]), None);
        assert_eq!(zscore(&[]), None);
    }

    #[test]
    fn test_dot() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
    }
}
