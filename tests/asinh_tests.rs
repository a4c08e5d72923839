//! End-to-end tests for `asinh`: forward values, NaN handling, gradients, and
//! input validation through the public API.

use serde_json::json;
use tensorgrad::test_util::assert_arrays_close;
use tensorgrad::{asinh, grad, scalar, tensor1d, tensor2d, DType, Tensor, TensorError};

fn expected_asinh(values: &[f32]) -> Vec<f32> {
    values
        .iter()
        .map(|&v| f64::from(v).asinh() as f32)
        .collect()
}

fn expected_grad(a: &[f32], dy: &[f32]) -> Vec<f32> {
    a.iter()
        .zip(dy)
        .map(|(&a, &dy)| (f64::from(dy) / (1.0 + f64::from(a) * f64::from(a)).sqrt()) as f32)
        .collect()
}

#[test]
fn basic() {
    let values = [1.0, -3.0, 2.0, 7.0, -4.0];
    let result = asinh(tensor1d(&values)).expect("asinh");

    assert_eq!(result.shape(), &[5]);
    assert_arrays_close(&result, &expected_asinh(&values));
}

#[test]
fn scalar_input() {
    let result = asinh(scalar(1.0)).expect("asinh");

    assert!(result.shape().is_empty());
    assert_arrays_close(&result, &expected_asinh(&[1.0]));
}

#[test]
fn tensor2d_input() {
    let values = [1.0, -3.0, 2.0, 7.0];
    let a = tensor2d(&values, [2, 2]).expect("2x2");
    let result = asinh(&a).expect("asinh");

    assert_eq!(result.shape(), &[2, 2]);
    assert_arrays_close(&result, &expected_asinh(&values));
}

#[test]
fn propagates_nans() {
    let result = asinh(tensor1d(&[4.0, f32::NAN, 0.0])).expect("asinh");

    assert_arrays_close(&result, &[4.0_f32.asinh(), f32::NAN, 0.0]);
}

#[test]
fn finite_extremes_stay_finite() {
    let values = [3.0e38, -3.0e38, f32::MAX];
    let result = asinh(tensor1d(&values)).expect("asinh");

    assert!(result.data().iter().all(|v| v.is_finite()));
    assert_arrays_close(&result, &expected_asinh(&values));
}

#[test]
fn gradients_scalar() {
    let a = scalar(0.5);
    let dy = scalar(8.0);

    let gradients = grad(|a| asinh(a))(&a, Some(&dy)).expect("grad");

    assert_eq!(gradients.shape(), a.shape());
    assert_eq!(gradients.dtype(), DType::Float32);
    assert_arrays_close(&gradients, &[8.0 / (1.0_f32 + 0.5 * 0.5).sqrt()]);
}

#[test]
fn gradient_with_clones() {
    let a = scalar(0.5);
    let dy = scalar(8.0);

    let gradients = grad(|a: &Tensor| Ok(asinh(a.clone())?.clone()))(&a, Some(&dy)).expect("grad");

    assert_eq!(gradients.shape(), a.shape());
    assert_eq!(gradients.dtype(), DType::Float32);
    assert_arrays_close(&gradients, &[8.0 / (1.0_f32 + 0.5 * 0.5).sqrt()]);
}

#[test]
fn gradients_tensor1d() {
    let a_values = [-1.0, 2.0, 3.0, -5.0];
    let dy_values = [1.0, 2.0, 3.0, 4.0];
    let a = tensor1d(&a_values);
    let dy = tensor1d(&dy_values);

    let gradients = grad(|a| asinh(a))(&a, Some(&dy)).expect("grad");

    assert_eq!(gradients.shape(), a.shape());
    assert_eq!(gradients.dtype(), DType::Float32);
    assert_arrays_close(&gradients, &expected_grad(&a_values, &dy_values));
}

#[test]
fn gradients_tensor2d() {
    let a_values = [-3.0, 1.0, 2.0, 3.0];
    let dy_values = [1.0, 2.0, 3.0, 4.0];
    let a = tensor2d(&a_values, [2, 2]).expect("2x2");
    let dy = tensor2d(&dy_values, [2, 2]).expect("2x2");

    let gradients = grad(|a| asinh(a))(&a, Some(&dy)).expect("grad");

    assert_eq!(gradients.shape(), a.shape());
    assert_eq!(gradients.dtype(), DType::Float32);
    assert_arrays_close(&gradients, &expected_grad(&a_values, &dy_values));
}

#[test]
fn throws_when_passed_a_non_tensor() {
    let err = asinh(json!({})).expect_err("object is not tensor-like");

    assert!(matches!(err, TensorError::InvalidArgument { .. }));
    assert!(err
        .to_string()
        .starts_with("Argument 'x' passed to 'asinh' must be a Tensor"));
}

#[test]
fn accepts_a_tensor_like_object() {
    let values = [1.0_f32, -3.0, 2.0, 7.0, -4.0];
    let result = asinh(values.to_vec()).expect("asinh");

    assert_eq!(result.shape(), &[5]);
    assert_arrays_close(&result, &expected_asinh(&values));
}

#[test]
fn accepts_a_json_array() {
    let result = asinh(json!([[1, -3], [2, 7]])).expect("asinh");

    assert_eq!(result.shape(), &[2, 2]);
    assert_arrays_close(&result, &expected_asinh(&[1.0, -3.0, 2.0, 7.0]));
}

#[test]
fn throws_for_string_tensor() {
    let err = asinh("q").expect_err("string");

    assert_eq!(
        err.to_string(),
        "Argument 'x' passed to 'asinh' must be numeric tensor, but got string tensor"
    );
}

#[test]
fn gradient_rejects_mismatched_dy() {
    let a = tensor1d(&[1.0, 2.0]);
    let dy = tensor1d(&[1.0, 2.0, 3.0]);

    let err = grad(|a| asinh(a))(&a, Some(&dy)).expect_err("dy shape");
    assert!(matches!(err, TensorError::GradientShapeMismatch { .. }));
}

#[test]
fn forward_with_tracing_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let a = tensor1d(&[0.0, 1.0]).requires_grad();
    let dx = grad(|a| asinh(a))(&a, None).expect("grad");
    assert_arrays_close(&dx, &[1.0, 1.0 / 2.0_f32.sqrt()]);
}
