//! Property-based tests using proptest.
//!
//! These tests verify invariants of the element-wise ops and their gradients.

use proptest::prelude::*;
use tensorgrad::test_util::{arrays_close, numerical_gradient};
use tensorgrad::{asinh, grad, neg, sinh, tensor1d, Tensor};

// Any finite f32, including values near f32::MAX
fn finite_strategy(max_len: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(
        any::<f32>().prop_filter("finite", |v| v.is_finite()),
        1..=max_len,
    )
}

// Strategy for generating rank-1 tensors
fn tensor_strategy(max_len: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-100.0f32..100.0, 1..=max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn asinh_matches_f64_reference(values in finite_strategy(16)) {
        let y = asinh(tensor1d(&values)).expect("asinh");
        prop_assert_eq!(y.shape(), &[values.len()]);
        for (&got, &x) in y.data().iter().zip(&values) {
            // ln(|x| + sqrt(x² + 1)) in f64, where x² cannot overflow
            let ax = f64::from(x).abs();
            let reference = (ax + (ax * ax + 1.0).sqrt()).ln().copysign(f64::from(x));
            prop_assert!(got.is_finite(), "asinh({}) = {}", x, got);
            let tol = 1e-6 * reference.abs().max(1.0);
            prop_assert!(
                (f64::from(got) - reference).abs() <= tol,
                "asinh({}) = {}, want {}", x, got, reference
            );
        }
    }

    #[test]
    fn asinh_is_odd(values in tensor_strategy(16)) {
        let pos = asinh(tensor1d(&values)).expect("asinh");
        let neg_pos = neg(&pos).expect("neg");
        let of_neg = asinh(neg(tensor1d(&values)).expect("neg")).expect("asinh");
        prop_assert!(arrays_close(of_neg.data(), neg_pos.data(), 1e-5).is_ok());
    }

    #[test]
    fn asinh_inverts_sinh(values in proptest::collection::vec(-5.0f32..5.0, 1..16)) {
        let round = asinh(sinh(tensor1d(&values)).expect("sinh")).expect("asinh");
        prop_assert!(arrays_close(round.data(), &values, 1e-3).is_ok());
    }

    #[test]
    fn asinh_grad_is_seed_over_sqrt(
        pairs in proptest::collection::vec((-100.0f32..100.0, -10.0f32..10.0), 1..16)
    ) {
        let (a, dy): (Vec<f32>, Vec<f32>) = pairs.into_iter().unzip();
        let dx = grad(|t| asinh(t))(&tensor1d(&a), Some(&tensor1d(&dy))).expect("grad");
        let expected: Vec<f32> = a
            .iter()
            .zip(&dy)
            .map(|(a, dy)| dy / (1.0 + a * a).sqrt())
            .collect();
        prop_assert_eq!(dx.shape(), &[a.len()]);
        prop_assert!(arrays_close(dx.data(), &expected, 1e-4).is_ok());
    }

    #[test]
    fn asinh_grad_is_bounded_by_seed(values in tensor_strategy(16)) {
        let dx = grad(|t: &Tensor| Ok(t.asinh()))(&tensor1d(&values), None).expect("grad");
        prop_assert!(dx.data().iter().all(|&g| g > 0.0 && g <= 1.0));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn hyperbolic_grads_match_central_differences(
        values in proptest::collection::vec(-3.0f32..3.0, 1..6)
    ) {
        let x = tensor1d(&values);
        let ops: [fn(&Tensor) -> Tensor; 4] = [Tensor::asinh, Tensor::sinh, Tensor::cosh, Tensor::tanh];
        for op in ops {
            let analytical = grad(|t: &Tensor| Ok(op(t).sum()))(&x, None).expect("grad");
            let numerical = numerical_gradient(|t: &Tensor| op(t).sum(), &x, 1e-2);
            prop_assert!(arrays_close(analytical.data(), numerical.data(), 5e-2).is_ok());
        }
    }
}
