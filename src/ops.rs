//! Element-wise math over tensor-like input.
//!
//! These wrap the [`Tensor`] methods of the same name. They accept anything
//! convertible into a [`TensorLike`] (tensors, numbers, nested `Vec`s, JSON
//! values), validate it as argument `x` of the named op, and return a float32
//! tensor of the input's shape. Tensor inputs keep their identity, so the
//! result is recorded on the tape like a direct method call.

use crate::autograd::{convert_to_tensor, DTypeRequirement, Tensor, TensorLike};
use crate::error::Result;

fn unary(x: impl Into<TensorLike>, op: &str, f: fn(&Tensor) -> Tensor) -> Result<Tensor> {
    let x = convert_to_tensor(x, "x", op, DTypeRequirement::Numeric)?;
    Ok(f(&x))
}

/// Inverse hyperbolic sine, `ln(x + sqrt(x² + 1))`, element-wise.
///
/// NaN propagates position by position. The gradient is `dy / sqrt(1 + x²)`.
///
/// # Errors
///
/// - [`TensorError::InvalidArgument`](crate::TensorError::InvalidArgument)
///   if `x` is not a tensor or tensor-like value
/// - [`TensorError::NotNumeric`](crate::TensorError::NotNumeric) if `x` is a string
/// - [`TensorError::RaggedArray`](crate::TensorError::RaggedArray) for ragged nesting
///
/// # Example
///
/// ```
/// use tensorgrad::asinh;
///
/// let y = asinh(vec![1.0_f32, -3.0, 2.0, 7.0, -4.0]).unwrap();
/// assert_eq!(y.shape(), &[5]);
/// assert!((y.data()[0] - 1.0_f32.asinh()).abs() < 1e-6);
/// ```
pub fn asinh(x: impl Into<TensorLike>) -> Result<Tensor> {
    unary(x, "asinh", Tensor::asinh)
}

/// Inverse hyperbolic cosine, element-wise. NaN below 1.
///
/// # Errors
///
/// Same validation as [`asinh`].
pub fn acosh(x: impl Into<TensorLike>) -> Result<Tensor> {
    unary(x, "acosh", Tensor::acosh)
}

/// Inverse hyperbolic tangent, element-wise. NaN outside [-1, 1].
///
/// # Errors
///
/// Same validation as [`asinh`].
pub fn atanh(x: impl Into<TensorLike>) -> Result<Tensor> {
    unary(x, "atanh", Tensor::atanh)
}

/// Hyperbolic sine, element-wise.
///
/// # Errors
///
/// Same validation as [`asinh`].
pub fn sinh(x: impl Into<TensorLike>) -> Result<Tensor> {
    unary(x, "sinh", Tensor::sinh)
}

/// Hyperbolic cosine, element-wise.
///
/// # Errors
///
/// Same validation as [`asinh`].
pub fn cosh(x: impl Into<TensorLike>) -> Result<Tensor> {
    unary(x, "cosh", Tensor::cosh)
}

/// Hyperbolic tangent, element-wise.
///
/// # Errors
///
/// Same validation as [`asinh`].
pub fn tanh(x: impl Into<TensorLike>) -> Result<Tensor> {
    unary(x, "tanh", Tensor::tanh)
}

/// `e^x`, element-wise.
///
/// # Errors
///
/// Same validation as [`asinh`].
pub fn exp(x: impl Into<TensorLike>) -> Result<Tensor> {
    unary(x, "exp", Tensor::exp)
}

/// Natural logarithm, element-wise.
///
/// # Errors
///
/// Same validation as [`asinh`].
pub fn log(x: impl Into<TensorLike>) -> Result<Tensor> {
    unary(x, "log", Tensor::log)
}

/// Square root, element-wise.
///
/// # Errors
///
/// Same validation as [`asinh`].
pub fn sqrt(x: impl Into<TensorLike>) -> Result<Tensor> {
    unary(x, "sqrt", Tensor::sqrt)
}

/// `x²`, element-wise.
///
/// # Errors
///
/// Same validation as [`asinh`].
pub fn square(x: impl Into<TensorLike>) -> Result<Tensor> {
    unary(x, "square", Tensor::square)
}

/// `-x`, element-wise.
///
/// # Errors
///
/// Same validation as [`asinh`].
pub fn neg(x: impl Into<TensorLike>) -> Result<Tensor> {
    unary(x, "neg", Tensor::neg)
}
