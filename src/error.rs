//! Error types for tensorgrad operations.
//!
//! Validation failures are surfaced as values so callers working with
//! dynamic input (JSON payloads, user-supplied arrays) can recover. Internal
//! invariant violations on already-validated tensors panic instead.

use thiserror::Error;

use crate::autograd::DType;

/// Main error type for tensorgrad operations.
///
/// # Examples
///
/// ```
/// use tensorgrad::error::TensorError;
///
/// let err = TensorError::NotNumeric {
///     arg: "x".to_string(),
///     op: "asinh".to_string(),
///     actual: tensorgrad::DType::String,
/// };
/// assert!(err.to_string().contains("must be numeric"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TensorError {
    /// A value that is neither a tensor nor tensor-like was passed.
    #[error("Argument '{arg}' passed to '{op}' must be a Tensor or TensorLike, but got '{actual}'")]
    InvalidArgument {
        /// Argument name
        arg: String,
        /// Operation name
        op: String,
        /// Type name of the offending value
        actual: String,
    },

    /// A non-numeric (string) value was passed to a numeric operation.
    #[error("Argument '{arg}' passed to '{op}' must be numeric tensor, but got {actual} tensor")]
    NotNumeric {
        /// Argument name
        arg: String,
        /// Operation name
        op: String,
        /// Inferred dtype
        actual: DType,
    },

    /// The dtype differs from the one the operation requires.
    #[error("Argument '{arg}' passed to '{op}' must be {expected} tensor, but got {actual} tensor")]
    DTypeMismatch {
        /// Argument name
        arg: String,
        /// Operation name
        op: String,
        /// Required dtype
        expected: DType,
        /// Actual dtype
        actual: DType,
    },

    /// A nested array whose sub-arrays have different lengths.
    #[error("Element {path} should have {expected} elements, but has {actual} elements")]
    RaggedArray {
        /// Index path of the offending element, e.g. `arr[1]`
        path: String,
        /// Length of the first sibling
        expected: usize,
        /// Length found
        actual: usize,
    },

    /// The number of values does not match the requested shape.
    #[error("Based on the provided shape, [{}], the tensor should have {expected} values but has {actual}", join_dims(.shape))]
    ShapeMismatch {
        /// Requested shape
        shape: Vec<usize>,
        /// Number of values the shape implies
        expected: usize,
        /// Number of values provided
        actual: usize,
    },

    /// The upstream gradient passed to `grad(f)(x, dy)` has the wrong shape.
    #[error("The shape of dy passed in grad(f)(x, dy) must match the shape returned by f(x): expected {expected:?}, got {actual:?}")]
    GradientShapeMismatch {
        /// Shape of `f(x)`
        expected: Vec<usize>,
        /// Shape of `dy`
        actual: Vec<usize>,
    },

    /// `f(x)` does not depend on `x`.
    #[error("Cannot compute gradient of y=f(x) with respect to x. Make sure that the f you passed encloses all operations that lead from x to y.")]
    NotDifferentiable,

    /// Engine configuration value out of range.
    #[error("Invalid configuration: {param} = {value}, expected {constraint}")]
    InvalidConfig {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },
}

/// `[2, 3]` -> `2,3`
fn join_dims(shape: &[usize]) -> String {
    shape
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Result type for tensorgrad operations.
pub type Result<T> = std::result::Result<T, TensorError>;
