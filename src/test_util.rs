//! Helpers for comparing tensor values in tests.

use crate::autograd::{no_grad, Tensor};
use crate::config::config;

/// Compare two value sequences element-wise within `eps`.
///
/// NaN matches only NaN and infinities must match exactly. The error message
/// names the first offending index.
///
/// # Errors
///
/// Returns a description of the first length or value mismatch.
///
/// ```
/// use tensorgrad::test_util::arrays_close;
///
/// assert!(arrays_close(&[1.0, f32::NAN], &[1.0005, f32::NAN], 1e-3).is_ok());
/// assert!(arrays_close(&[1.0], &[f32::NAN], 1e-3).is_err());
/// ```
pub fn arrays_close(actual: &[f32], expected: &[f32], eps: f32) -> Result<(), String> {
    if actual.len() != expected.len() {
        return Err(format!(
            "length mismatch: actual {} vs expected {}",
            actual.len(),
            expected.len()
        ));
    }

    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        let ok = if a.is_nan() || e.is_nan() {
            a.is_nan() && e.is_nan()
        } else if a.is_infinite() || e.is_infinite() {
            a == e
        } else {
            (a - e).abs() <= eps
        };
        if !ok {
            return Err(format!(
                "arrays differ at index {i}: actual {a} vs expected {e} (eps {eps})"
            ));
        }
    }
    Ok(())
}

/// Assert that a tensor's values match `expected` within the configured
/// [`test_epsilon`](crate::config::EngineConfig::test_epsilon).
///
/// # Panics
///
/// Panics with the [`arrays_close`] message on mismatch.
#[track_caller]
pub fn assert_arrays_close(actual: &Tensor, expected: &[f32]) {
    let eps = config().test_epsilon;
    if let Err(msg) = arrays_close(actual.data(), expected, eps) {
        panic!("{msg}");
    }
}

/// Central-difference gradient of a scalar-valued `f` at `x`.
///
/// `f` is evaluated with tracking disabled. Only meaningful when `f(x)` has a
/// single element.
pub fn numerical_gradient<F>(f: F, x: &Tensor, eps: f32) -> Tensor
where
    F: Fn(&Tensor) -> Tensor,
{
    let base = x.data();
    let grad_data: Vec<f32> = (0..x.numel())
        .map(|i| {
            let mut plus = base.to_vec();
            let mut minus = base.to_vec();
            plus[i] += eps;
            minus[i] -= eps;

            let y_plus = no_grad(|| f(&Tensor::new(&plus, x.shape())).item());
            let y_minus = no_grad(|| f(&Tensor::new(&minus, x.shape())).item());
            (y_plus - y_minus) / (2.0 * eps)
        })
        .collect();

    Tensor::new(&grad_data, x.shape())
}
