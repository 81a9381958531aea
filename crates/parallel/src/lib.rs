//! Declarative parallel/sequential execution utilities.
//!
//! This crate provides helpers that abstract over parallel vs sequential execution
//! based on the `parallel` feature flag. The `cfg` logic lives here in ONE place,
//! keeping call sites in the analytics crates clean.
//!
//! # Runtime Override
//!
//! All functions accept a `force_sequential` parameter. When `true`, execution
//! is sequential even if the `parallel` feature is enabled. This allows runtime
//! profiling and reproducing a failure in a single thread.
//!
//! # Example
//!
//! ```
//! let halves: Result<Vec<i32>, String> =
//!     parallel::try_map_slice(&[2, 4, 6], |x| Ok(x / 2), false);
//! assert_eq!(halves, Ok(vec![1, 2, 3]));
//!
//! let pairs = parallel::upper_triangle(3);
//! assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// =============================================================================
// Slice Operations
// =============================================================================

/// Map a fallible function over a slice, stopping at the first error.
///
/// On success the results keep input order. In parallel mode the error
/// returned is one of the failures, not necessarily the lowest-index one.
#[inline]
pub fn try_map_slice<T, F, R, E>(slice: &[T], f: F, force_sequential: bool) -> Result<Vec<R>, E>
where
    T: Sync,
    F: Fn(&T) -> Result<R, E> + Sync + Send,
    R: Send,
    E: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            slice.iter().map(f).collect()
        } else {
            slice.par_iter().map(f).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        slice.iter().map(f).collect()
    }
}

// =============================================================================
// Pair Operations
// =============================================================================

/// All index pairs `(i, j)` with `i < j < n`, row-major.
pub fn upper_triangle(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Evaluate a fallible function once per unordered pair of `0..n`.
///
/// Returns `(i, j, value)` triples in row-major pair order. Each pair is
/// evaluated by exactly one worker, so the caller can assemble the results
/// into disjoint matrix cells without locking.
#[inline]
pub fn try_map_pairs<F, R, E>(n: usize, f: F, force_sequential: bool) -> Result<Vec<(usize, usize, R)>, E>
where
    F: Fn(usize, usize) -> Result<R, E> + Sync + Send,
    R: Send,
    E: Send,
{
    let pairs = upper_triangle(n);
    try_map_slice(&pairs, |&(i, j)| f(i, j).map(|v| (i, j, v)), force_sequential)
}
