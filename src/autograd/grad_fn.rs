//! Gradient function trait and implementations.
//!
//! Each differentiable operation implements `GradFn` to define
//! how gradients flow backward through the operation.

use super::tensor::Tensor;

/// Trait for functions that compute gradients during backward pass.
///
/// Each differentiable operation creates a `GradFn` implementation
/// that captures the necessary context for gradient computation.
///
/// # Example Implementation
///
/// For element-wise addition z = x + y:
/// - ∂z/∂x = 1
/// - ∂z/∂y = 1
///
/// So `backward(grad_output)` returns [`grad_output`, `grad_output`].
pub trait GradFn: Send + Sync {
    /// Compute gradients with respect to inputs.
    ///
    /// # Arguments
    ///
    /// * `grad_output` - Gradient flowing back from downstream operations
    ///
    /// # Returns
    ///
    /// Vector of gradients, one for each input tensor.
    /// The order must match the input order used during forward pass.
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor>;

    /// Human-readable name for debugging.
    fn name(&self) -> &'static str;
}

/// `grad_output[i] * f(saved[i])`, shaped like `grad_output`.
fn scale_by(grad_output: &Tensor, saved: &Tensor, f: impl Fn(f32) -> f32) -> Tensor {
    let grad_data: Vec<f32> = grad_output
        .data()
        .iter()
        .zip(saved.data().iter())
        .map(|(&g, &v)| g * f(v))
        .collect();
    Tensor::new(&grad_data, grad_output.shape())
}

// ============================================================================
// Element-wise Arithmetic
// ============================================================================

/// Gradient function for addition: z = x + y
pub(crate) struct AddBackward;

impl GradFn for AddBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        // ∂(x+y)/∂x = 1, ∂(x+y)/∂y = 1
        vec![grad_output.detach(), grad_output.detach()]
    }

    fn name(&self) -> &'static str {
        "AddBackward"
    }
}

/// Gradient function for subtraction: z = x - y
pub(crate) struct SubBackward;

impl GradFn for SubBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        // ∂(x-y)/∂x = 1, ∂(x-y)/∂y = -1
        let neg: Vec<f32> = grad_output.data().iter().map(|&g| -g).collect();
        vec![
            grad_output.detach(),
            Tensor::new(&neg, grad_output.shape()),
        ]
    }

    fn name(&self) -> &'static str {
        "SubBackward"
    }
}

/// Gradient function for multiplication: z = x * y
pub(crate) struct MulBackward {
    pub(crate) x: Tensor,
    pub(crate) y: Tensor,
}

impl GradFn for MulBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        // ∂(x*y)/∂x = y, ∂(x*y)/∂y = x
        let grad_x = scale_by(grad_output, &self.y, |y| y);
        let grad_y = scale_by(grad_output, &self.x, |x| x);
        vec![grad_x, grad_y]
    }

    fn name(&self) -> &'static str {
        "MulBackward"
    }
}

/// Gradient function for scaling by a constant: z = x * c
pub(crate) struct MulScalarBackward {
    pub(crate) scalar: f32,
}

impl GradFn for MulScalarBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        let grad_data: Vec<f32> = grad_output.data().iter().map(|&g| g * self.scalar).collect();
        vec![Tensor::new(&grad_data, grad_output.shape())]
    }

    fn name(&self) -> &'static str {
        "MulScalarBackward"
    }
}

/// Gradient function for division: z = x / y
pub(crate) struct DivBackward {
    pub(crate) x: Tensor,
    pub(crate) y: Tensor,
}

impl GradFn for DivBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        // ∂(x/y)/∂x = 1/y, ∂(x/y)/∂y = -x/y²
        let grad_x = scale_by(grad_output, &self.y, |y| 1.0 / y);
        let grad_y_data: Vec<f32> = grad_output
            .data()
            .iter()
            .zip(self.x.data().iter())
            .zip(self.y.data().iter())
            .map(|((&g, &x), &y)| -g * x / (y * y))
            .collect();
        vec![grad_x, Tensor::new(&grad_y_data, grad_output.shape())]
    }

    fn name(&self) -> &'static str {
        "DivBackward"
    }
}

/// Gradient function for negation: z = -x
pub(crate) struct NegBackward;

impl GradFn for NegBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        let grad_data: Vec<f32> = grad_output.data().iter().map(|&g| -g).collect();
        vec![Tensor::new(&grad_data, grad_output.shape())]
    }

    fn name(&self) -> &'static str {
        "NegBackward"
    }
}

/// Gradient function for square: z = x²
pub(crate) struct SquareBackward {
    pub(crate) x: Tensor,
}

impl GradFn for SquareBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        vec![scale_by(grad_output, &self.x, |x| 2.0 * x)]
    }

    fn name(&self) -> &'static str {
        "SquareBackward"
    }
}

// ============================================================================
// Transcendental Operations
// ============================================================================

/// Gradient function for exp: z = exp(x)
pub(crate) struct ExpBackward {
    pub(crate) output: Tensor, // exp(x) - we save the output, not input
}

impl GradFn for ExpBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        vec![scale_by(grad_output, &self.output, |exp_x| exp_x)]
    }

    fn name(&self) -> &'static str {
        "ExpBackward"
    }
}

/// Gradient function for log: z = log(x)
pub(crate) struct LogBackward {
    pub(crate) x: Tensor,
}

impl GradFn for LogBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        vec![scale_by(grad_output, &self.x, |x| 1.0 / x)]
    }

    fn name(&self) -> &'static str {
        "LogBackward"
    }
}

/// Gradient function for sqrt: z = sqrt(x)
pub(crate) struct SqrtBackward {
    pub(crate) output: Tensor, // sqrt(x)
}

impl GradFn for SqrtBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        // ∂sqrt(x)/∂x = 0.5 / sqrt(x)
        vec![scale_by(grad_output, &self.output, |sqrt_x| 0.5 / sqrt_x)]
    }

    fn name(&self) -> &'static str {
        "SqrtBackward"
    }
}

// ============================================================================
// Hyperbolic Functions
// ============================================================================

/// Gradient function for sinh: z = sinh(x)
pub(crate) struct SinhBackward {
    pub(crate) x: Tensor,
}

impl GradFn for SinhBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        vec![scale_by(grad_output, &self.x, f32::cosh)]
    }

    fn name(&self) -> &'static str {
        "SinhBackward"
    }
}

/// Gradient function for cosh: z = cosh(x)
pub(crate) struct CoshBackward {
    pub(crate) x: Tensor,
}

impl GradFn for CoshBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        vec![scale_by(grad_output, &self.x, f32::sinh)]
    }

    fn name(&self) -> &'static str {
        "CoshBackward"
    }
}

/// Gradient function for tanh: z = tanh(x)
pub(crate) struct TanhBackward {
    pub(crate) output: Tensor, // tanh(x)
}

impl GradFn for TanhBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        // ∂tanh(x)/∂x = 1 - tanh²(x)
        vec![scale_by(grad_output, &self.output, |t| 1.0 - t * t)]
    }

    fn name(&self) -> &'static str {
        "TanhBackward"
    }
}

/// Gradient function for asinh: z = ln(x + sqrt(x² + 1))
pub(crate) struct AsinhBackward {
    pub(crate) x: Tensor,
}

impl GradFn for AsinhBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        // ∂asinh(x)/∂x = 1 / sqrt(1 + x²)
        vec![scale_by(grad_output, &self.x, |x| {
            let x = f64::from(x);
            (1.0 / (1.0 + x * x).sqrt()) as f32
        })]
    }

    fn name(&self) -> &'static str {
        "AsinhBackward"
    }
}

/// Gradient function for acosh: z = ln(x + sqrt(x² - 1))
pub(crate) struct AcoshBackward {
    pub(crate) x: Tensor,
}

impl GradFn for AcoshBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        // ∂acosh(x)/∂x = 1 / sqrt(x² - 1), undefined for x <= 1
        vec![scale_by(grad_output, &self.x, |x| {
            let x = f64::from(x);
            (1.0 / (x * x - 1.0).sqrt()) as f32
        })]
    }

    fn name(&self) -> &'static str {
        "AcoshBackward"
    }
}

/// Gradient function for atanh: z = 0.5 * ln((1 + x) / (1 - x))
pub(crate) struct AtanhBackward {
    pub(crate) x: Tensor,
}

impl GradFn for AtanhBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        vec![scale_by(grad_output, &self.x, |x| 1.0 / (1.0 - x * x))]
    }

    fn name(&self) -> &'static str {
        "AtanhBackward"
    }
}

// ============================================================================
// Reduction Operations
// ============================================================================

/// Gradient function for sum: z = sum(x)
pub(crate) struct SumBackward {
    pub(crate) input_shape: Vec<usize>,
}

impl GradFn for SumBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        // Broadcast scalar gradient to input shape
        let g = grad_output.item();
        let numel: usize = self.input_shape.iter().product();
        vec![Tensor::new(&vec![g; numel], &self.input_shape)]
    }

    fn name(&self) -> &'static str {
        "SumBackward"
    }
}

/// Gradient function for mean: z = mean(x)
pub(crate) struct MeanBackward {
    pub(crate) input_shape: Vec<usize>,
}

impl GradFn for MeanBackward {
    fn backward(&self, grad_output: &Tensor) -> Vec<Tensor> {
        let g = grad_output.item();
        let numel: usize = self.input_shape.iter().product();
        let grad_val = g / numel as f32;
        vec![Tensor::new(&vec![grad_val; numel], &self.input_shape)]
    }

    fn name(&self) -> &'static str {
        "MeanBackward"
    }
}
