//! Functional gradients: `grad(f)(x, dy)`.
//!
//! Each call runs `f` on its own tape so gradients never leak into, or pick
//! up state from, whatever the caller has recorded.

use tracing::debug;

use super::tensor::{DType, Tensor};
use super::{get_grad, TapeScope};
use crate::error::{Result, TensorError};

/// Gradient of a single-input function.
///
/// Returns a closure `(x, dy) -> dx`. `dy` seeds the backward pass and
/// defaults to ones shaped like `f(x)`; when given, its shape must equal that
/// of `f(x)`. `dx` has the shape of `x` and dtype `float32`.
///
/// # Errors
///
/// The returned closure fails if `f` fails, with
/// [`TensorError::GradientShapeMismatch`] if `dy` has the wrong shape, or with
/// [`TensorError::NotDifferentiable`] if `f(x)` does not depend on `x`.
///
/// # Example
///
/// ```
/// use tensorgrad::{asinh, grad, scalar};
///
/// let dx = grad(|a| asinh(a))(&scalar(0.5), Some(&scalar(8.0))).unwrap();
/// assert!((dx.item() - 8.0 / 1.25_f32.sqrt()).abs() < 1e-5);
/// ```
pub fn grad<F>(f: F) -> impl Fn(&Tensor, Option<&Tensor>) -> Result<Tensor>
where
    F: Fn(&Tensor) -> Result<Tensor>,
{
    move |x, dy| run(&f, x, dy).map(|(_, dx)| dx)
}

/// Like [`grad`], but also returns the (detached) value of `f(x)`.
///
/// # Errors
///
/// Same as [`grad`].
pub fn value_and_grad<F>(f: F) -> impl Fn(&Tensor, Option<&Tensor>) -> Result<(Tensor, Tensor)>
where
    F: Fn(&Tensor) -> Result<Tensor>,
{
    move |x, dy| run(&f, x, dy)
}

fn run<F>(f: &F, x: &Tensor, dy: Option<&Tensor>) -> Result<(Tensor, Tensor)>
where
    F: Fn(&Tensor) -> Result<Tensor>,
{
    let _scope = TapeScope::enter();

    let tracked = x.cast(DType::Float32).requires_grad();
    let y = f(&tracked)?;

    let seed = match dy {
        Some(dy) if dy.shape() != y.shape() => {
            return Err(TensorError::GradientShapeMismatch {
                expected: y.shape().to_vec(),
                actual: dy.shape().to_vec(),
            });
        }
        Some(dy) => dy.cast(DType::Float32),
        None => Tensor::ones(y.shape()),
    };

    debug!(x_shape = ?x.shape(), y_shape = ?y.shape(), "computing gradient");

    let dx = if y.id() == tracked.id() {
        // f is the identity (possibly through clones)
        seed
    } else {
        y.backward_with_grad(seed);
        get_grad(tracked.id()).ok_or(TensorError::NotDifferentiable)?
    };

    Ok((y.detach(), dx))
}
