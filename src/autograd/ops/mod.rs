//! Differentiable operations for tensors.
//!
//! Each operation:
//! 1. Computes the forward result
//! 2. Records a `GradFn` to the computation graph (if gradient tracking is enabled)
//!
//! Results are always float32, whatever the input dtype.

use std::sync::Arc;

use tracing::warn;

use super::grad_fn::{
    AddBackward, DivBackward, ExpBackward, GradFn, LogBackward, MeanBackward, MulBackward,
    MulScalarBackward, NegBackward, SqrtBackward, SquareBackward, SubBackward, SumBackward,
};
use super::tensor::Tensor;
use super::{is_grad_enabled, with_graph};
use crate::config::debug_enabled;

mod hyperbolic;

impl Tensor {
    /// Element-wise map into a new float32 tensor of the same shape.
    pub(crate) fn map_values(&self, f: impl Fn(f32) -> f32) -> Tensor {
        let data: Vec<f32> = self.data().iter().map(|&a| f(a)).collect();
        Tensor::new(&data, self.shape())
    }

    /// Record a single-input op producing `result`.
    ///
    /// `make` builds the backward function from the forward result and only
    /// runs when the op is actually recorded.
    pub(crate) fn record_unary<G, F>(&self, op: &str, result: &mut Tensor, make: F)
    where
        G: GradFn + 'static,
        F: FnOnce(&Tensor) -> G,
    {
        check_result(op, result);
        if is_grad_enabled() && self.requires_grad_enabled() {
            let grad_fn: Arc<dyn GradFn> = Arc::new(make(&*result));
            result.requires_grad_(true);
            result.set_grad_fn(grad_fn.clone());

            with_graph(|graph| {
                graph.register_tensor(self.clone());
                graph.record(result.id(), grad_fn, vec![self.id()]);
            });
        }
    }

    fn record_binary<G, F>(&self, other: &Tensor, op: &str, result: &mut Tensor, make: F)
    where
        G: GradFn + 'static,
        F: FnOnce() -> G,
    {
        check_result(op, result);
        if is_grad_enabled() && (self.requires_grad_enabled() || other.requires_grad_enabled()) {
            let grad_fn: Arc<dyn GradFn> = Arc::new(make());
            result.requires_grad_(true);
            result.set_grad_fn(grad_fn.clone());

            with_graph(|graph| {
                graph.register_tensor(self.clone());
                graph.register_tensor(other.clone());
                graph.record(result.id(), grad_fn, vec![self.id(), other.id()]);
            });
        }
    }

    fn zip_values(&self, other: &Tensor, op: &str, f: impl Fn(f32, f32) -> f32) -> Tensor {
        assert_eq!(
            self.shape(),
            other.shape(),
            "{op}: operands must have the same shape, got {:?} and {:?}",
            self.shape(),
            other.shape()
        );
        let data: Vec<f32> = self
            .data()
            .iter()
            .zip(other.data().iter())
            .map(|(&a, &b)| f(a, b))
            .collect();
        Tensor::new(&data, self.shape())
    }
}

/// In debug mode, warn about NaN or infinite values in an op result.
fn check_result(op: &str, result: &Tensor) {
    if !debug_enabled() {
        return;
    }
    let nan = result.data().iter().filter(|v| v.is_nan()).count();
    let inf = result.data().iter().filter(|v| v.is_infinite()).count();
    if nan > 0 || inf > 0 {
        warn!(op, nan, inf, shape = ?result.shape(), "non-finite values in op result");
    }
}

// ============================================================================
// Element-wise Operations
// ============================================================================

impl Tensor {
    /// Element-wise addition: z = self + other
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    #[must_use]
    pub fn add(&self, other: &Tensor) -> Tensor {
        let mut result = self.zip_values(other, "add", |a, b| a + b);
        self.record_binary(other, "add", &mut result, || AddBackward);
        result
    }

    /// Element-wise subtraction: z = self - other
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    #[must_use]
    pub fn sub(&self, other: &Tensor) -> Tensor {
        let mut result = self.zip_values(other, "sub", |a, b| a - b);
        self.record_binary(other, "sub", &mut result, || SubBackward);
        result
    }

    /// Element-wise multiplication: z = self * other
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    #[must_use]
    pub fn mul(&self, other: &Tensor) -> Tensor {
        let mut result = self.zip_values(other, "mul", |a, b| a * b);
        self.record_binary(other, "mul", &mut result, || MulBackward {
            x: self.clone(),
            y: other.clone(),
        });
        result
    }

    /// Element-wise division: z = self / other
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    #[must_use]
    pub fn div(&self, other: &Tensor) -> Tensor {
        let mut result = self.zip_values(other, "div", |a, b| a / b);
        self.record_binary(other, "div", &mut result, || DivBackward {
            x: self.clone(),
            y: other.clone(),
        });
        result
    }

    /// Element-wise negation: z = -self
    #[must_use]
    pub fn neg(&self) -> Tensor {
        let mut result = self.map_values(|a| -a);
        self.record_unary("neg", &mut result, |_| NegBackward);
        result
    }

    /// Scalar multiplication: z = self * scalar
    #[must_use]
    pub fn mul_scalar(&self, scalar: f32) -> Tensor {
        let mut result = self.map_values(|a| a * scalar);
        self.record_unary("mul_scalar", &mut result, |_| MulScalarBackward { scalar });
        result
    }

    /// Element-wise square: z = self²
    #[must_use]
    pub fn square(&self) -> Tensor {
        let mut result = self.map_values(|a| a * a);
        self.record_unary("square", &mut result, |_| SquareBackward { x: self.clone() });
        result
    }
}

// ============================================================================
// Transcendental Operations
// ============================================================================

impl Tensor {
    /// Element-wise exponential: z = exp(self)
    #[must_use]
    pub fn exp(&self) -> Tensor {
        let mut result = self.map_values(f32::exp);
        self.record_unary("exp", &mut result, |out| ExpBackward {
            output: out.detach(),
        });
        result
    }

    /// Element-wise natural logarithm: z = log(self)
    #[must_use]
    pub fn log(&self) -> Tensor {
        let mut result = self.map_values(f32::ln);
        self.record_unary("log", &mut result, |_| LogBackward { x: self.clone() });
        result
    }

    /// Element-wise square root: z = sqrt(self)
    #[must_use]
    pub fn sqrt(&self) -> Tensor {
        let mut result = self.map_values(f32::sqrt);
        self.record_unary("sqrt", &mut result, |out| SqrtBackward {
            output: out.detach(),
        });
        result
    }
}

// ============================================================================
// Reduction Operations
// ============================================================================

impl Tensor {
    /// Sum all elements into a scalar: z = sum(self)
    #[must_use]
    pub fn sum(&self) -> Tensor {
        let sum: f32 = self.data().iter().sum();
        let mut result = Tensor::scalar(sum);
        self.record_unary("sum", &mut result, |_| SumBackward {
            input_shape: self.shape().to_vec(),
        });
        result
    }

    /// Mean of all elements as a scalar: z = mean(self)
    #[must_use]
    pub fn mean(&self) -> Tensor {
        let sum: f32 = self.data().iter().sum();
        let mut result = Tensor::scalar(sum / self.numel() as f32);
        self.record_unary("mean", &mut result, |_| MeanBackward {
            input_shape: self.shape().to_vec(),
        });
        result
    }
}
