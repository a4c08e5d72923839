//! Computation graph for automatic differentiation.
//!
//! This module implements the tape-based recording of operations
//! and the backward pass algorithm.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use super::grad_fn::GradFn;
use super::tensor::{Tensor, TensorId};

/// Entry in the computation tape.
#[derive(Clone)]
pub(crate) struct TapeEntry {
    /// ID of the output tensor
    pub output_id: TensorId,

    /// Function to compute gradients
    pub grad_fn: Arc<dyn GradFn>,

    /// IDs of input tensors
    pub input_ids: Vec<TensorId>,
}

/// Computation graph that records operations for backward pass.
///
/// The graph uses a tape-based approach where operations are recorded
/// in order during the forward pass, then gradients are computed in
/// reverse order during the backward pass.
///
/// # Thread Safety
///
/// Each thread has its own computation graph (via `thread_local` storage
/// in the parent module).
#[allow(missing_debug_implementations)]
pub struct ComputationGraph {
    tape: Vec<TapeEntry>,

    /// Tensors that took part in a recorded op, by ID
    tensors: HashMap<TensorId, Tensor>,

    requires_grad: HashSet<TensorId>,
}

impl ComputationGraph {
    /// Create a new empty computation graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tape: Vec::new(),
            tensors: HashMap::new(),
            requires_grad: HashSet::new(),
        }
    }

    /// Clear all recorded operations.
    pub fn clear(&mut self) {
        self.tape.clear();
        self.tensors.clear();
        self.requires_grad.clear();
    }

    /// Register a tensor that participates in a recorded operation.
    ///
    /// Registering the same ID twice keeps the first copy, so a gradient
    /// already accumulated on it survives.
    pub fn register_tensor(&mut self, tensor: Tensor) {
        if tensor.requires_grad_enabled() {
            self.requires_grad.insert(tensor.id());
        }
        self.tensors.entry(tensor.id()).or_insert(tensor);
    }

    /// Record an operation to the tape.
    pub fn record(
        &mut self,
        output_id: TensorId,
        grad_fn: Arc<dyn GradFn>,
        input_ids: Vec<TensorId>,
    ) {
        debug!(op = grad_fn.name(), ?output_id, "recording op");
        self.tape.push(TapeEntry {
            output_id,
            grad_fn,
            input_ids,
        });
    }

    /// Get a tensor by ID.
    #[must_use]
    pub fn get_tensor(&self, id: TensorId) -> Option<&Tensor> {
        self.tensors.get(&id)
    }

    /// Whether `id` was registered with gradient tracking enabled.
    #[must_use]
    pub fn tracks(&self, id: TensorId) -> bool {
        self.requires_grad.contains(&id)
    }

    /// Compute gradients via backpropagation.
    ///
    /// 1. Start with `grad_output` for the output tensor
    /// 2. Iterate through operations in reverse order
    /// 3. For each operation, compute gradients w.r.t. inputs
    /// 4. Accumulate gradients for tensors used multiple times
    ///
    /// Gradients end up on registered leaf tensors that require grad.
    ///
    /// # Arguments
    ///
    /// * `output_id` - ID of the tensor to differentiate
    /// * `grad_output` - Initial gradient (typically ones for scalar loss)
    pub fn backward(&mut self, output_id: TensorId, grad_output: Tensor) {
        debug!(tape_len = self.tape.len(), "running backward pass");

        let mut grads: HashMap<TensorId, Tensor> = HashMap::new();
        grads.insert(output_id, grad_output);

        for entry in self.tape.iter().rev() {
            let grad_out = match grads.get(&entry.output_id) {
                Some(g) => g.clone(),
                None => continue,
            };

            let input_grads = entry.grad_fn.backward(&grad_out);

            for (input_id, input_grad) in entry.input_ids.iter().zip(input_grads) {
                grads
                    .entry(*input_id)
                    .and_modify(|existing| {
                        let new_data: Vec<f32> = existing
                            .data()
                            .iter()
                            .zip(input_grad.data().iter())
                            .map(|(a, b)| a + b)
                            .collect();
                        *existing = Tensor::new(&new_data, existing.shape());
                    })
                    .or_insert(input_grad);
            }
        }

        for (id, grad) in grads {
            if let Some(tensor) = self.tensors.get_mut(&id) {
                if tensor.requires_grad_enabled() && tensor.is_leaf() {
                    tensor.accumulate_grad(grad);
                }
            }
        }
    }

    /// Get the number of recorded operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tape.len()
    }

    /// Check if the tape is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tape.is_empty()
    }

    /// Get gradient for a tensor by ID (after backward).
    #[must_use]
    pub fn get_grad(&self, id: TensorId) -> Option<Tensor> {
        self.tensors.get(&id).and_then(|t| t.grad().cloned())
    }

    /// Clear gradient for a specific tensor.
    pub fn clear_grad(&mut self, id: TensorId) {
        if let Some(tensor) = self.tensors.get_mut(&id) {
            tensor.clear_grad();
        }
    }
}

impl Default for ComputationGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::grad_fn::{AsinhBackward, NegBackward};

    #[test]
    fn test_graph_creation() {
        let graph = ComputationGraph::default();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
    }

    #[test]
    fn test_graph_clear() {
        let mut graph = ComputationGraph::new();
        let t = Tensor::from_slice(&[1.0, 2.0]).requires_grad();
        let id = t.id();
        graph.register_tensor(t);
        graph.record(TensorId::new(), Arc::new(NegBackward), vec![id]);

        graph.clear();
        assert!(graph.is_empty());
        assert!(graph.get_tensor(id).is_none());
        assert!(!graph.tracks(id));
    }

    #[test]
    fn test_tensor_registration() {
        let mut graph = ComputationGraph::new();

        let t1 = Tensor::from_slice(&[1.0]).requires_grad();
        let t2 = Tensor::from_slice(&[2.0]);
        let id1 = t1.id();
        let id2 = t2.id();

        graph.register_tensor(t1);
        graph.register_tensor(t2);

        assert!(graph.get_tensor(id1).is_some());
        assert!(graph.get_tensor(id2).is_some());
        assert!(graph.tracks(id1));
        assert!(!graph.tracks(id2));
    }

    #[test]
    fn test_register_same_tensor_twice_keeps_grad() {
        let mut graph = ComputationGraph::new();
        let t = Tensor::from_slice(&[1.0]).requires_grad();
        let id = t.id();

        graph.register_tensor(t.clone());
        graph.record(TensorId::new(), Arc::new(NegBackward), vec![id]);
        let out_id = graph.tape[0].output_id;
        graph.backward(out_id, Tensor::from_slice(&[1.0]));

        graph.register_tensor(t);
        assert_eq!(graph.get_grad(id).expect("grad kept").data(), &[-1.0]);
    }

    #[test]
    fn test_backward_single_op() {
        let mut graph = ComputationGraph::new();

        let input = Tensor::from_slice(&[0.0, 1.0]).requires_grad();
        let input_id = input.id();
        graph.register_tensor(input.clone());

        let output = Tensor::from_slice(&[0.0, 1.0_f32.asinh()]);
        let output_id = output.id();

        graph.record(output_id, Arc::new(AsinhBackward { x: input }), vec![input_id]);
        graph.backward(output_id, Tensor::from_slice(&[2.0, 2.0]));

        let grad = graph.get_grad(input_id).expect("gradient for input");
        assert!((grad.data()[0] - 2.0).abs() < 1e-6);
        assert!((grad.data()[1] - 2.0 / 2.0_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_backward_accumulates_across_passes() {
        let mut graph = ComputationGraph::new();

        let x = Tensor::from_slice(&[3.0]).requires_grad();
        let x_id = x.id();
        graph.register_tensor(x);

        let a = TensorId::new();
        let b = TensorId::new();
        graph.record(a, Arc::new(NegBackward), vec![x_id]);
        graph.record(b, Arc::new(NegBackward), vec![x_id]);

        graph.backward(a, Tensor::from_slice(&[1.0]));
        graph.backward(b, Tensor::from_slice(&[1.0]));

        let grad = graph.get_grad(x_id).expect("accumulated");
        assert_eq!(grad.data(), &[-2.0]);
    }

    #[test]
    fn test_backward_no_matching_output() {
        let mut graph = ComputationGraph::new();
        let output_id = Tensor::from_slice(&[1.0]).id();
        graph.backward(output_id, Tensor::from_slice(&[1.0]));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_backward_skips_unrelated_operations() {
        let mut graph = ComputationGraph::new();

        let t1 = Tensor::from_slice(&[1.0]).requires_grad();
        let t1_id = t1.id();
        let t2 = Tensor::from_slice(&[-1.0]);
        let t2_id = t2.id();
        let t3 = Tensor::from_slice(&[5.0]).requires_grad();
        let t3_id = t3.id();

        graph.register_tensor(t1);
        graph.register_tensor(t2);
        graph.register_tensor(t3);

        graph.record(t2_id, Arc::new(NegBackward), vec![t1_id]);
        graph.record(TensorId::new(), Arc::new(NegBackward), vec![t3_id]);

        graph.backward(t2_id, Tensor::from_slice(&[1.0]));

        assert!(graph.get_grad(t1_id).is_some());
        assert!(graph.get_grad(t3_id).is_none());
    }

    #[test]
    fn test_clear_grad() {
        let mut graph = ComputationGraph::new();
        let t = Tensor::from_slice(&[1.0, 2.0]).requires_grad();
        let id = t.id();
        graph.register_tensor(t);
        graph.record(TensorId::new(), Arc::new(NegBackward), vec![id]);
        let out = graph.tape[0].output_id;
        graph.backward(out, Tensor::from_slice(&[1.0, 1.0]));
        assert!(graph.get_grad(id).is_some());

        graph.clear_grad(id);
        assert!(graph.get_grad(id).is_none());

        // unknown id is a no-op
        graph.clear_grad(TensorId::new());
    }

    #[test]
    fn test_tape_entry_clone() {
        let entry = TapeEntry {
            output_id: TensorId::new(),
            grad_fn: Arc::new(NegBackward),
            input_ids: vec![TensorId::new(), TensorId::new()],
        };

        let cloned = entry.clone();
        assert_eq!(cloned.input_ids.len(), 2);
        assert_eq!(cloned.grad_fn.name(), "NegBackward");
    }
}
