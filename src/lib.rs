//! Tensorgrad: dense f32 tensors with reverse-mode automatic differentiation.
//!
//! Tensors are host-resident, row-major and immutable. Element-wise math
//! records itself on a thread-local tape when any input requires gradients,
//! and [`grad`] turns a closure over tensors into its vector-Jacobian product.
//!
//! # Quick Start
//!
//! ```
//! use tensorgrad::{asinh, grad, tensor1d, tensor2d};
//!
//! // Forward
//! let y = asinh(tensor1d(&[1.0, -3.0, 2.0, 7.0, -4.0])).unwrap();
//! assert!((y.data()[1] - (-3.0_f32).asinh()).abs() < 1e-6);
//!
//! // Backward, seeded with dy
//! let x = tensor2d(&[-3.0, 1.0, 2.0, 3.0], [2, 2]).unwrap();
//! let dy = tensor2d(&[1.0, 2.0, 3.0, 4.0], [2, 2]).unwrap();
//! let dx = grad(|a| asinh(a))(&x, Some(&dy)).unwrap();
//! assert_eq!(dx.shape(), &[2, 2]);
//! assert!((dx.data()[0] - 1.0 / 10.0_f32.sqrt()).abs() < 1e-6);
//! ```
//!
//! Anything tensor-like is accepted where a tensor is expected:
//!
//! ```
//! use tensorgrad::asinh;
//!
//! assert!(asinh(vec![vec![1.0_f32, 2.0], vec![3.0, 4.0]]).is_ok());
//! assert!(asinh("q").is_err());
//! ```
//!
//! # Modules
//!
//! - [`autograd`]: tensors, the tape, and functional gradients
//! - [`creation`]: `scalar`, `tensor1d`, `tensor2d`, `tensor`
//! - [`ops`]: element-wise math over tensor-like input
//! - [`config`]: engine configuration (debug checks, test tolerance)
//! - [`error`]: error types
//! - [`test_util`]: approximate array comparison and numerical gradients

pub mod autograd;
pub mod config;
pub mod creation;
pub mod error;
pub mod ops;
pub mod test_util;

pub use autograd::{grad, no_grad, value_and_grad, DType, Tensor, TensorLike};
pub use creation::{scalar, tensor, tensor1d, tensor2d};
pub use error::{Result, TensorError};
pub use ops::{acosh, asinh, atanh, cosh, exp, log, neg, sinh, sqrt, square, tanh};
