//! Reverse-mode automatic differentiation engine.
//!
//! This module implements tape-based automatic differentiation following the
//! methodology described in Baydin et al. (2018) and Griewank & Walther (2008).
//!
//! # Architecture
//!
//! The autograd engine uses a define-by-run (dynamic) computational graph:
//! - Operations are recorded to a tape during forward pass
//! - Gradients are computed in reverse order during backward pass
//! - Supports gradient accumulation for multi-use tensors
//! - [`grad`] runs a closure on its own tape and hands back dx
//!
//! # Example
//!
//! ```
//! use tensorgrad::autograd::{clear_graph, get_grad, Tensor};
//!
//! clear_graph();
//! let x = Tensor::from_slice(&[0.5, 1.0]).requires_grad();
//! let y = x.asinh().sum();
//! y.backward();
//!
//! let dx = get_grad(x.id()).unwrap();
//! assert!((dx.data()[0] - 1.0 / 1.25_f32.sqrt()).abs() < 1e-6);
//! ```
//!
//! # References
//!
//! - Baydin, A. G., et al. (2018). Automatic differentiation in machine learning: a survey. JMLR.
//! - Rumelhart, D. E., et al. (1986). Learning representations by back-propagating errors. Nature.
//! - Griewank, A., & Walther, A. (2008). Evaluating derivatives. SIAM.

mod functional;
pub(crate) mod grad_fn;
mod graph;
mod ops;
mod tensor;
mod tensor_like;

pub use functional::{grad, value_and_grad};
pub use grad_fn::GradFn;
pub use graph::ComputationGraph;
pub use tensor::{DType, Tensor, TensorId};
pub use tensor_like::{convert_to_tensor, DTypeRequirement, TensorLike};

use std::cell::RefCell;

thread_local! {
    /// Global computation graph for the current thread.
    static GRAPH: RefCell<ComputationGraph> = RefCell::new(ComputationGraph::new());

    /// Flag to disable gradient tracking (for inference).
    static GRAD_ENABLED: RefCell<bool> = const { RefCell::new(true) };
}

/// Execute a closure without gradient tracking.
///
/// Useful for inference or when gradients are not needed.
///
/// # Example
///
/// ```
/// use tensorgrad::autograd::{no_grad, Tensor};
///
/// let x = Tensor::from_slice(&[1.0, 2.0]).requires_grad();
/// let y = no_grad(|| x.asinh().sum());
///
/// assert!(!y.requires_grad_enabled());
/// ```
pub fn no_grad<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    GRAD_ENABLED.with(|enabled| {
        let prev = *enabled.borrow();
        *enabled.borrow_mut() = false;
        let result = f();
        *enabled.borrow_mut() = prev;
        result
    })
}

/// Check if gradient tracking is currently enabled.
#[must_use]
pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(|enabled| *enabled.borrow())
}

/// Get a reference to the thread-local computation graph.
pub(crate) fn with_graph<F, R>(f: F) -> R
where
    F: FnOnce(&mut ComputationGraph) -> R,
{
    GRAPH.with(|graph| f(&mut graph.borrow_mut()))
}

/// Clear the computation graph (called after backward).
pub fn clear_graph() {
    GRAPH.with(|graph| graph.borrow_mut().clear());
}

/// Get gradient for a tensor by ID from the graph.
#[must_use]
pub fn get_grad(id: TensorId) -> Option<Tensor> {
    with_graph(|graph| graph.get_grad(id))
}

/// Clear gradient for a specific tensor by ID.
pub fn clear_grad(id: TensorId) {
    with_graph(|graph| graph.clear_grad(id));
}

/// Fresh tape with tracking enabled; the previous tape and flag come back on drop.
pub(crate) struct TapeScope {
    prev_graph: Option<ComputationGraph>,
    prev_enabled: bool,
}

impl TapeScope {
    pub(crate) fn enter() -> Self {
        let prev_graph = GRAPH.with(|graph| std::mem::take(&mut *graph.borrow_mut()));
        let prev_enabled = GRAD_ENABLED.with(|enabled| enabled.replace(true));
        Self {
            prev_graph: Some(prev_graph),
            prev_enabled,
        }
    }
}

impl Drop for TapeScope {
    fn drop(&mut self) {
        if let Some(prev) = self.prev_graph.take() {
            GRAPH.with(|graph| *graph.borrow_mut() = prev);
        }
        GRAD_ENABLED.with(|enabled| enabled.replace(self.prev_enabled));
    }
}
