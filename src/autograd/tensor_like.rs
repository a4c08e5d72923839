//! Conversion of loosely typed input into tensors.
//!
//! Ops that accept "anything tensor-shaped" take `impl Into<TensorLike>` and
//! call [`convert_to_tensor`], which validates the value before any work is
//! done and names the offending argument and op in the error.

use serde_json::Value;

use super::tensor::{DType, Tensor};
use crate::error::{Result, TensorError};

/// Dtype constraint checked by [`convert_to_tensor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DTypeRequirement {
    /// Any non-string dtype.
    Numeric,
    /// Exactly this dtype.
    Exact(DType),
}

/// A value that may be converted into a [`Tensor`].
///
/// Nested arrays must be rectangular. The dtype is inferred from the leaves:
/// any string makes it `String`, otherwise any float makes it `Float32`, then
/// any integer makes it `Int32`, and all-bool input is `Bool`.
#[derive(Debug, Clone)]
pub enum TensorLike {
    /// An existing tensor, passed through unchanged.
    Tensor(Tensor),
    /// Floating point number.
    Number(f64),
    /// Integer.
    Int(i32),
    /// Boolean.
    Bool(bool),
    /// Text; never numeric.
    Text(String),
    /// Nested array.
    Array(Vec<TensorLike>),
    /// Missing value.
    Null,
    /// Anything else, identified by its type name (e.g. `Object`).
    Opaque(String),
}

impl TensorLike {
    /// Type name used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            TensorLike::Tensor(_) => "Tensor",
            TensorLike::Number(_) | TensorLike::Int(_) => "Number",
            TensorLike::Bool(_) => "Boolean",
            TensorLike::Text(_) => "String",
            TensorLike::Array(_) => "Array",
            TensorLike::Null => "null",
            TensorLike::Opaque(name) => name,
        }
    }

    fn shape(&self) -> Vec<usize> {
        match self {
            TensorLike::Tensor(t) => t.shape().to_vec(),
            TensorLike::Array(items) => {
                let mut shape = vec![items.len()];
                if let Some(first) = items.first() {
                    shape.extend(first.shape());
                }
                shape
            }
            _ => Vec::new(),
        }
    }

    /// Check every element against `expected`, the shape of `self` at `path`.
    fn assert_shape(&self, expected: &[usize], path: &str) -> Result<()> {
        let ragged = |actual: usize| TensorError::RaggedArray {
            path: path.to_string(),
            expected: expected.first().copied().unwrap_or(0),
            actual,
        };
        match self {
            TensorLike::Array(items) => {
                if expected.first() != Some(&items.len()) {
                    return Err(ragged(items.len()));
                }
                items.iter().enumerate().try_for_each(|(i, item)| {
                    item.assert_shape(&expected[1..], &format!("{path}[{i}]"))
                })
            }
            TensorLike::Tensor(t) if t.shape() != expected => {
                Err(ragged(t.shape().first().copied().unwrap_or(0)))
            }
            TensorLike::Tensor(_) => Ok(()),
            _ if !expected.is_empty() => Err(ragged(0)),
            _ => Ok(()),
        }
    }

    fn infer_dtype(&self) -> Result<DType> {
        let mut seen = Seen::default();
        self.visit_dtype(&mut seen)?;
        Ok(if seen.string {
            DType::String
        } else if seen.float {
            DType::Float32
        } else if seen.int {
            DType::Int32
        } else if seen.bool {
            DType::Bool
        } else {
            DType::Float32
        })
    }

    fn visit_dtype(&self, seen: &mut Seen) -> Result<()> {
        match self {
            TensorLike::Tensor(t) => match t.dtype() {
                DType::Float32 => seen.float = true,
                DType::Int32 => seen.int = true,
                DType::Bool => seen.bool = true,
                DType::String => seen.string = true,
            },
            TensorLike::Number(_) => seen.float = true,
            TensorLike::Int(_) => seen.int = true,
            TensorLike::Bool(_) => seen.bool = true,
            TensorLike::Text(_) => seen.string = true,
            TensorLike::Array(items) => {
                for item in items {
                    item.visit_dtype(seen)?;
                }
            }
            TensorLike::Null | TensorLike::Opaque(_) => {
                return Err(TensorError::InvalidArgument {
                    arg: String::new(),
                    op: String::new(),
                    actual: self.type_name().to_string(),
                })
            }
        }
        Ok(())
    }

    fn flatten_into(&self, out: &mut Vec<f32>) {
        match self {
            TensorLike::Tensor(t) => out.extend_from_slice(t.data()),
            TensorLike::Number(v) => out.push(*v as f32),
            TensorLike::Int(v) => out.push(*v as f32),
            TensorLike::Bool(b) => out.push(if *b { 1.0 } else { 0.0 }),
            TensorLike::Array(items) => items.iter().for_each(|item| item.flatten_into(out)),
            // rejected by the dtype check before flattening
            TensorLike::Text(_) | TensorLike::Null | TensorLike::Opaque(_) => {}
        }
    }
}

#[derive(Default)]
struct Seen {
    float: bool,
    int: bool,
    bool: bool,
    string: bool,
}

/// Convert `x` into a tensor for argument `arg_name` of op `op_name`.
///
/// Tensors pass through unchanged (same id, so gradients still flow).
/// Anything else is validated, shape- and dtype-inferred, and flattened in
/// row-major order.
///
/// # Errors
///
/// - [`TensorError::InvalidArgument`] for `Null`, opaque values, or arrays
///   containing them
/// - [`TensorError::NotNumeric`] for strings under [`DTypeRequirement::Numeric`]
/// - [`TensorError::DTypeMismatch`] when an exact dtype is required and differs
/// - [`TensorError::RaggedArray`] for non-rectangular nested arrays
///
/// # Example
///
/// ```
/// use tensorgrad::autograd::{convert_to_tensor, DTypeRequirement};
///
/// let t = convert_to_tensor(vec![vec![1.0_f32, 2.0], vec![3.0, 4.0]], "x", "asinh",
///     DTypeRequirement::Numeric).unwrap();
/// assert_eq!(t.shape(), &[2, 2]);
///
/// let err = convert_to_tensor("q", "x", "asinh", DTypeRequirement::Numeric).unwrap_err();
/// assert!(err.to_string().contains("must be numeric"));
/// ```
pub fn convert_to_tensor(
    x: impl Into<TensorLike>,
    arg_name: &str,
    op_name: &str,
    requirement: DTypeRequirement,
) -> Result<Tensor> {
    let x = x.into();

    let dtype = match &x {
        TensorLike::Tensor(t) => t.dtype(),
        other => other.infer_dtype().map_err(|err| match err {
            TensorError::InvalidArgument { actual, .. } => TensorError::InvalidArgument {
                arg: arg_name.to_string(),
                op: op_name.to_string(),
                actual,
            },
            other => other,
        })?,
    };
    check_dtype(requirement, dtype, arg_name, op_name)?;

    if let TensorLike::Tensor(t) = x {
        return Ok(t);
    }

    let shape = x.shape();
    x.assert_shape(&shape, "arr")?;

    let mut data = Vec::with_capacity(shape.iter().product());
    x.flatten_into(&mut data);
    Ok(Tensor::from_parts(data, shape, dtype))
}

fn check_dtype(requirement: DTypeRequirement, actual: DType, arg: &str, op: &str) -> Result<()> {
    match requirement {
        DTypeRequirement::Numeric if !actual.is_numeric() => Err(TensorError::NotNumeric {
            arg: arg.to_string(),
            op: op.to_string(),
            actual,
        }),
        DTypeRequirement::Exact(expected) if expected != actual => {
            Err(TensorError::DTypeMismatch {
                arg: arg.to_string(),
                op: op.to_string(),
                expected,
                actual,
            })
        }
        _ => Ok(()),
    }
}

impl From<Tensor> for TensorLike {
    fn from(t: Tensor) -> Self {
        TensorLike::Tensor(t)
    }
}

impl From<&Tensor> for TensorLike {
    fn from(t: &Tensor) -> Self {
        TensorLike::Tensor(t.clone())
    }
}

impl From<f32> for TensorLike {
    fn from(v: f32) -> Self {
        TensorLike::Number(f64::from(v))
    }
}

impl From<f64> for TensorLike {
    fn from(v: f64) -> Self {
        TensorLike::Number(v)
    }
}

impl From<i32> for TensorLike {
    fn from(v: i32) -> Self {
        TensorLike::Int(v)
    }
}

impl From<bool> for TensorLike {
    fn from(v: bool) -> Self {
        TensorLike::Bool(v)
    }
}

impl From<&str> for TensorLike {
    fn from(v: &str) -> Self {
        TensorLike::Text(v.to_string())
    }
}

impl From<String> for TensorLike {
    fn from(v: String) -> Self {
        TensorLike::Text(v)
    }
}

impl<T: Into<TensorLike>> From<Vec<T>> for TensorLike {
    fn from(items: Vec<T>) -> Self {
        TensorLike::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<TensorLike> + Clone> From<&[T]> for TensorLike {
    fn from(items: &[T]) -> Self {
        TensorLike::Array(items.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<TensorLike>, const N: usize> From<[T; N]> for TensorLike {
    fn from(items: [T; N]) -> Self {
        TensorLike::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for TensorLike {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => TensorLike::Null,
            Value::Bool(b) => TensorLike::Bool(b),
            Value::Number(n) => n
                .as_f64()
                .map_or_else(|| TensorLike::Opaque("Number".to_string()), TensorLike::Number),
            Value::String(s) => TensorLike::Text(s),
            Value::Array(items) => TensorLike::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(_) => TensorLike::Opaque("Object".to_string()),
        }
    }
}

impl From<&Value> for TensorLike {
    fn from(value: &Value) -> Self {
        value.clone().into()
    }
}
