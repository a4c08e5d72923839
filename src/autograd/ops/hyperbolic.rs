//! Hyperbolic functions and their inverses.
//!
//! `asinh` and `acosh` evaluate in f64. Their f32 forms overflow for inputs
//! near `f32::MAX`, although the results are below 90.

use crate::autograd::grad_fn::{
    AcoshBackward, AsinhBackward, AtanhBackward, CoshBackward, SinhBackward, TanhBackward,
};
use crate::autograd::tensor::Tensor;

impl Tensor {
    /// Element-wise hyperbolic sine.
    #[must_use]
    pub fn sinh(&self) -> Tensor {
        let mut result = self.map_values(f32::sinh);
        self.record_unary("sinh", &mut result, |_| SinhBackward { x: self.clone() });
        result
    }

    /// Element-wise hyperbolic cosine.
    #[must_use]
    pub fn cosh(&self) -> Tensor {
        let mut result = self.map_values(f32::cosh);
        self.record_unary("cosh", &mut result, |_| CoshBackward { x: self.clone() });
        result
    }

    /// Element-wise hyperbolic tangent.
    #[must_use]
    pub fn tanh(&self) -> Tensor {
        let mut result = self.map_values(f32::tanh);
        self.record_unary("tanh", &mut result, |out| TanhBackward {
            output: out.detach(),
        });
        result
    }

    /// Element-wise inverse hyperbolic sine: z = ln(x + sqrt(x² + 1)).
    ///
    /// Defined on the whole real line; NaN stays NaN and ±∞ maps to ±∞.
    ///
    /// ```
    /// use tensorgrad::Tensor;
    ///
    /// let y = Tensor::from_slice(&[0.0, 1.0]).asinh();
    /// assert_eq!(y.data()[0], 0.0);
    /// assert!((y.data()[1] - 0.881_373_6).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn asinh(&self) -> Tensor {
        let mut result = self.map_values(|a| f64::from(a).asinh() as f32);
        self.record_unary("asinh", &mut result, |_| AsinhBackward { x: self.clone() });
        result
    }

    /// Element-wise inverse hyperbolic cosine. NaN for x < 1.
    #[must_use]
    pub fn acosh(&self) -> Tensor {
        let mut result = self.map_values(|a| f64::from(a).acosh() as f32);
        self.record_unary("acosh", &mut result, |_| AcoshBackward { x: self.clone() });
        result
    }

    /// Element-wise inverse hyperbolic tangent. NaN outside [-1, 1], ±∞ at ±1.
    #[must_use]
    pub fn atanh(&self) -> Tensor {
        let mut result = self.map_values(f32::atanh);
        self.record_unary("atanh", &mut result, |_| AtanhBackward { x: self.clone() });
        result
    }
}
