//! Tensor constructors.

use crate::autograd::{convert_to_tensor, DTypeRequirement, Tensor, TensorLike};
use crate::error::{Result, TensorError};

/// Rank-0 float32 tensor.
#[must_use]
pub fn scalar(value: f32) -> Tensor {
    Tensor::scalar(value)
}

/// Rank-1 float32 tensor of shape `[values.len()]`.
#[must_use]
pub fn tensor1d(values: &[f32]) -> Tensor {
    Tensor::from_slice(values)
}

/// Rank-2 float32 tensor, row-major.
///
/// # Errors
///
/// Returns [`TensorError::ShapeMismatch`] if `values.len() != rows * cols`.
///
/// ```
/// use tensorgrad::tensor2d;
///
/// let t = tensor2d(&[1.0, -3.0, 2.0, 7.0], [2, 2]).unwrap();
/// assert_eq!(t.shape(), &[2, 2]);
/// assert!(tensor2d(&[1.0, 2.0, 3.0], [2, 2]).is_err());
/// ```
pub fn tensor2d(values: &[f32], shape: [usize; 2]) -> Result<Tensor> {
    Tensor::try_new(values, &shape)
}

/// Tensor from any tensor-like value, optionally reshaped.
///
/// Without `shape` the shape is inferred from the nesting of `values`. With
/// it, the values are read in row-major order and must fill the shape
/// exactly. The inferred dtype is kept.
///
/// # Errors
///
/// Fails like [`convert_to_tensor`] for invalid input, or with
/// [`TensorError::ShapeMismatch`] if `shape` does not match the value count.
pub fn tensor(values: impl Into<TensorLike>, shape: Option<&[usize]>) -> Result<Tensor> {
    let t = convert_to_tensor(values, "values", "tensor", DTypeRequirement::Numeric)?;
    let Some(shape) = shape else {
        return Ok(t);
    };

    let expected: usize = shape.iter().product();
    if expected != t.numel() {
        return Err(TensorError::ShapeMismatch {
            shape: shape.to_vec(),
            expected,
            actual: t.numel(),
        });
    }
    Ok(Tensor::from_parts(t.data().to_vec(), shape.to_vec(), t.dtype()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::DType;

    #[test]
    fn test_scalar() {
        let s = scalar(1.0);
        assert!(s.shape().is_empty());
        assert_eq!(s.dtype(), DType::Float32);
    }

    #[test]
    fn test_tensor1d() {
        let t = tensor1d(&[1.0, -3.0, 2.0, 7.0, -4.0]);
        assert_eq!(t.shape(), &[5]);
    }

    #[test]
    fn test_tensor2d_mismatch() {
        let err = tensor2d(&[1.0, 2.0, 3.0, 4.0, 5.0], [2, 2]).expect_err("5 into 2x2");
        assert_eq!(
            err,
            TensorError::ShapeMismatch {
                shape: vec![2, 2],
                expected: 4,
                actual: 5,
            }
        );
        assert_eq!(
            err.to_string(),
            "Based on the provided shape, [2,2], the tensor should have 4 values but has 5"
        );
    }

    #[test]
    fn test_tensor_infers_shape() {
        let t = tensor(vec![vec![1.0_f32, 2.0], vec![3.0, 4.0]], None).expect("nested");
        assert_eq!(t.shape(), &[2, 2]);
    }

    #[test]
    fn test_tensor_reshapes() {
        let t = tensor(vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0], Some(&[3, 2])).expect("reshape");
        assert_eq!(t.shape(), &[3, 2]);
        assert_eq!(t.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_tensor_reshape_mismatch() {
        assert!(matches!(
            tensor(vec![1.0_f32, 2.0, 3.0], Some(&[2, 2])),
            Err(TensorError::ShapeMismatch { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    fn test_tensor_keeps_int_dtype() {
        let t = tensor(vec![1, 2], None).expect("ints");
        assert_eq!(t.dtype(), DType::Int32);
    }

    #[test]
    fn test_tensor_rejects_string() {
        let err = tensor("abc", None).expect_err("string");
        assert!(err
            .to_string()
            .starts_with("Argument 'values' passed to 'tensor' must be numeric"));
    }
}
