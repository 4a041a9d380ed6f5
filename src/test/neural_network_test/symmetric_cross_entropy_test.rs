use super::*;

fn sample_batch() -> (Array2<f32>, Array1<usize>) {
    let scores = array![
        [2.0f32, 0.5, -1.0, 0.3],
        [0.1, 0.2, 3.0, -0.4],
        [-1.5, 1.0, 0.0, 0.8]
    ];
    let labels = array![0usize, 2, 3];
    (scores, labels)
}

#[test]
fn new_validation_test() {
    // Valid parameters
    let loss = SymmetricCrossEntropy::new(0.1, 1.0, 10);
    assert!(loss.is_ok());

    // Zero weights are allowed
    assert!(SymmetricCrossEntropy::new(0.0, 0.0, 1).is_ok());

    // Zero classes
    let loss = SymmetricCrossEntropy::new(1.0, 1.0, 0);
    assert!(matches!(loss, Err(ModelError::InvalidArgument(_))));

    // Negative alpha
    let loss = SymmetricCrossEntropy::new(-0.1, 1.0, 2);
    assert!(matches!(loss, Err(ModelError::InvalidArgument(_))));

    // Negative beta
    let loss = SymmetricCrossEntropy::new(1.0, -1.0, 2);
    assert!(matches!(loss, Err(ModelError::InvalidArgument(_))));

    // Non-finite weights
    assert!(SymmetricCrossEntropy::new(f32::NAN, 1.0, 2).is_err());
    assert!(SymmetricCrossEntropy::new(1.0, f32::INFINITY, 2).is_err());
}

#[test]
fn default_and_getters_test() {
    let loss = SymmetricCrossEntropy::default();
    assert_eq!(loss.get_alpha(), 1.0);
    assert_eq!(loss.get_beta(), 1.0);
    assert_eq!(loss.get_num_classes(), 2);

    let loss = SymmetricCrossEntropy::new(0.25, 4.0, 7)
        .unwrap()
        .with_backend(ComputeBackend::Sequential);
    assert_eq!(loss.get_alpha(), 0.25);
    assert_eq!(loss.get_beta(), 4.0);
    assert_eq!(loss.get_num_classes(), 7);
    assert_eq!(loss.get_backend(), ComputeBackend::Sequential);
    assert_eq!(loss.loss_name(), "SymmetricCrossEntropy");
}

#[test]
fn confident_correct_scenario_test() {
    let loss = SymmetricCrossEntropy::new(1.0, 1.0, 2).unwrap();
    let scores = array![[10.0f32, -10.0], [-10.0, 10.0]];
    let labels = array![0usize, 1];

    let components = loss
        .compute_components(scores.view(), labels.view())
        .unwrap();
    let (_, _, reference) = reference_sce(1.0, 1.0, &scores, &[0, 1]);

    assert!(components.cross_entropy < 1e-6);
    // Each row keeps only the floored 1e-7 probability on the wrong class
    assert_abs_diff_eq!(
        components.reverse_cross_entropy,
        -1e-7 * 1e-4f32.ln(),
        epsilon = 1e-9
    );
    assert_abs_diff_eq!(components.loss as f64, reference, epsilon = 1e-8);
    assert_eq!(
        loss.compute(scores.view(), labels.view()).unwrap(),
        components.loss
    );
}

#[test]
fn matches_reference_formula_test() {
    let (scores, labels) = sample_batch();
    let loss = SymmetricCrossEntropy::new(0.1, 1.0, 4).unwrap();

    let components = loss
        .compute_components(scores.view(), labels.view())
        .unwrap();
    let (ce, rce, total) = reference_sce(0.1, 1.0, &scores, labels.as_slice().unwrap());

    assert_relative_eq!(components.cross_entropy as f64, ce, max_relative = 1e-5);
    assert_relative_eq!(components.reverse_cross_entropy as f64, rce, max_relative = 1e-5);
    assert_relative_eq!(components.loss as f64, total, max_relative = 1e-5);
}

#[test]
fn uniform_scores_test() {
    let loss = SymmetricCrossEntropy::new(1.0, 1.0, 4).unwrap();
    let scores = Array2::<f32>::zeros((3, 4));
    let labels = array![0usize, 1, 3];

    let components = loss
        .compute_components(scores.view(), labels.view())
        .unwrap();

    assert_abs_diff_eq!(components.cross_entropy, 4.0f32.ln(), epsilon = 1e-5);
    // Three wrong classes, each with probability 1/4
    assert_abs_diff_eq!(
        components.reverse_cross_entropy,
        0.75 * -(1e-4f32.ln()),
        epsilon = 1e-4
    );
}

#[test]
fn reverse_term_is_non_negative_test() {
    let loss = SymmetricCrossEntropy::new(1.0, 1.0, 4).unwrap();
    let scores = array![
        [2.0f32, 0.5, -1.0, 0.3],
        [50.0, -50.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
        [-3.0, -3.0, 8.0, -3.0]
    ];
    let labels = array![1usize, 0, 2, 2];

    let per_sample = loss
        .reverse_cross_entropy_per_sample(scores.view(), labels.view())
        .unwrap();

    assert_eq!(per_sample.len(), 4);
    assert!(per_sample.iter().all(|&r| r >= 0.0));
}

#[test]
fn reverse_term_orientation_test() {
    // Probability mass on the wrong class is multiplied by -ln(1e-4)
    let loss = SymmetricCrossEntropy::new(0.0, 1.0, 2).unwrap();
    let scores = array![[0.0f32, 0.0]];
    let labels = array![0usize];

    let value = loss.compute(scores.view(), labels.view()).unwrap();
    assert_abs_diff_eq!(value, 0.5 * -(1e-4f32.ln()), epsilon = 1e-5);
}

#[test]
fn weight_linearity_test() {
    let (scores, labels) = sample_batch();
    let (a, b) = (0.5f32, 0.7f32);

    let single = SymmetricCrossEntropy::new(a, b, 4).unwrap();
    let double_alpha = SymmetricCrossEntropy::new(2.0 * a, b, 4).unwrap();
    let double_beta = SymmetricCrossEntropy::new(a, 2.0 * b, 4).unwrap();

    let base = single
        .compute_components(scores.view(), labels.view())
        .unwrap();
    let with_double_alpha = double_alpha.compute(scores.view(), labels.view()).unwrap();
    let with_double_beta = double_beta.compute(scores.view(), labels.view()).unwrap();

    assert_abs_diff_eq!(
        with_double_alpha - base.loss,
        a * base.cross_entropy,
        epsilon = 1e-5
    );
    assert_abs_diff_eq!(
        with_double_beta - base.loss,
        b * base.reverse_cross_entropy,
        epsilon = 1e-5
    );
}

#[test]
fn batch_tiling_invariance_test() {
    let (scores, labels) = sample_batch();
    let loss = SymmetricCrossEntropy::new(0.3, 1.2, 4).unwrap();

    let tiled_scores = ndarray::concatenate(Axis(0), &vec![scores.view(); 5]).unwrap();
    let tiled_labels = ndarray::concatenate(Axis(0), &vec![labels.view(); 5]).unwrap();

    let original = loss.compute(scores.view(), labels.view()).unwrap();
    let tiled = loss
        .compute(tiled_scores.view(), tiled_labels.view())
        .unwrap();

    assert_abs_diff_eq!(original, tiled, epsilon = 1e-5);
}

#[test]
fn gradient_matches_finite_differences_test() {
    let (scores, labels) = sample_batch();
    let loss = SymmetricCrossEntropy::new(0.1, 1.0, 4).unwrap();

    let analytic = loss.gradient(scores.view(), labels.view()).unwrap();
    let numeric = numerical_gradient(&scores, 1e-2, |s| {
        loss.compute(s.view(), labels.view()).unwrap()
    });

    assert_eq!(analytic.shape(), scores.shape());
    for (a, n) in analytic.iter().zip(numeric.iter()) {
        assert_abs_diff_eq!(*a, *n, epsilon = 2e-3);
    }
}

#[test]
fn gradient_rows_sum_to_zero_test() {
    let (scores, labels) = sample_batch();
    let loss = SymmetricCrossEntropy::new(1.0, 1.0, 4).unwrap();

    let grad = loss.gradient(scores.view(), labels.view()).unwrap();
    for row in grad.rows() {
        assert_abs_diff_eq!(row.sum(), 0.0, epsilon = 1e-6);
    }
}

#[test]
fn gradient_without_reverse_term_is_cross_entropy_gradient_test() {
    let (scores, labels) = sample_batch();
    let sce = SymmetricCrossEntropy::new(1.0, 0.0, 4).unwrap();
    let ce = CrossEntropy::new(4).unwrap();

    let sce_grad = sce.gradient(scores.view(), labels.view()).unwrap();
    let ce_grad = ce.gradient(scores.view(), labels.view()).unwrap();

    for (a, b) in sce_grad.iter().zip(ce_grad.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-7);
    }
}

#[test]
fn gradient_ignores_reverse_term_below_probability_floor_test() {
    // The wrong-class probability e^-30 is below the 1e-7 floor, so the clamp cuts its gradient
    let loss = SymmetricCrossEntropy::new(0.0, 1.0, 2).unwrap();
    let scores = array![[30.0f32, 0.0]];
    let labels = array![0usize];

    let grad = loss.gradient(scores.view(), labels.view()).unwrap();
    assert!(grad.iter().all(|g| g.abs() < 1e-9));
}

#[test]
fn error_cases_test() {
    let loss = SymmetricCrossEntropy::new(1.0, 1.0, 2).unwrap();

    // Label outside the label space
    let result = loss.compute(array![[0.0f32, 1.0]].view(), array![5usize].view());
    assert!(matches!(result, Err(ModelError::IndexOutOfRange(_))));

    // Batch size mismatch
    let loss3 = SymmetricCrossEntropy::new(1.0, 1.0, 3).unwrap();
    let scores = Array2::<f32>::zeros((4, 3));
    let labels = Array1::<usize>::zeros(5);
    let result = loss3.compute(scores.view(), labels.view());
    assert!(matches!(result, Err(ModelError::ShapeMismatch(_))));

    // Class dimension differs from num_classes
    let scores = Array2::<f32>::zeros((2, 3));
    let labels = array![0usize, 1];
    let result = loss.compute(scores.view(), labels.view());
    assert!(matches!(result, Err(ModelError::ShapeMismatch(_))));

    // Empty batch
    let scores = Array2::<f32>::zeros((0, 2));
    let labels = Array1::<usize>::zeros(0);
    let result = loss.compute(scores.view(), labels.view());
    assert!(matches!(result, Err(ModelError::InvalidArgument(_))));

    // Every operation validates the same way
    let bad_labels = array![0usize, 2];
    let scores = Array2::<f32>::zeros((2, 2));
    assert!(matches!(
        loss.gradient(scores.view(), bad_labels.view()),
        Err(ModelError::IndexOutOfRange(_))
    ));
    assert!(matches!(
        loss.reverse_cross_entropy_per_sample(scores.view(), bad_labels.view()),
        Err(ModelError::IndexOutOfRange(_))
    ));
}

#[test]
fn tensor_interface_test() {
    let (scores, labels) = sample_batch();
    let loss = SymmetricCrossEntropy::new(0.1, 1.0, 4).unwrap();

    let y_pred = scores.clone().into_dyn();
    let y_true_column = labels.mapv(|l| l as f32).into_shape_with_order((3, 1)).unwrap().into_dyn();
    let y_true_flat = labels.mapv(|l| l as f32).into_dyn();

    let expected = loss.compute(scores.view(), labels.view()).unwrap();
    assert_eq!(loss.compute_loss(&y_true_column, &y_pred).unwrap(), expected);
    assert_eq!(loss.compute_loss(&y_true_flat, &y_pred).unwrap(), expected);

    let grad = loss.compute_grad(&y_true_column, &y_pred).unwrap();
    let expected_grad = loss.gradient(scores.view(), labels.view()).unwrap();
    assert_eq!(grad.shape(), &[3, 4]);
    assert_eq!(grad, expected_grad.into_dyn());
}

#[test]
fn tensor_interface_errors_test() {
    let loss = SymmetricCrossEntropy::new(1.0, 1.0, 2).unwrap();
    let y_pred = array![[0.0f32, 1.0]].into_dyn();

    // Fractional label
    let result = loss.compute_loss(&array![0.5f32].into_dyn(), &y_pred);
    assert!(matches!(result, Err(ModelError::InvalidArgument(_))));

    // Negative label
    let result = loss.compute_loss(&array![-1.0f32].into_dyn(), &y_pred);
    assert!(matches!(result, Err(ModelError::IndexOutOfRange(_))));

    // Labels must be a column
    let result = loss.compute_loss(&array![[0.0f32, 1.0]].into_dyn(), &y_pred);
    assert!(matches!(result, Err(ModelError::ShapeMismatch(_))));

    // Scores must be 2D
    let y_pred_3d = Array3::<f32>::zeros((1, 2, 1)).into_dyn();
    let result = loss.compute_grad(&array![0.0f32].into_dyn(), &y_pred_3d);
    assert!(matches!(result, Err(ModelError::InvalidArgument(_))));
}

#[test]
fn concurrent_compute_test() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SymmetricCrossEntropy>();

    let (scores, labels) = sample_batch();
    let loss = SymmetricCrossEntropy::new(0.1, 1.0, 4).unwrap();
    let expected = loss.compute(scores.view(), labels.view()).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| loss.compute(scores.view(), labels.view()).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn non_finite_scores_propagate_to_reverse_term_test() {
    let loss = SymmetricCrossEntropy::new(1.0, 1.0, 2).unwrap();
    let labels = array![0usize];

    for scores in [array![[f32::NAN, 0.0]], array![[f32::INFINITY, 0.0]]] {
        let per_sample = loss
            .reverse_cross_entropy_per_sample(scores.view(), labels.view())
            .unwrap();
        assert!(per_sample[0].is_nan());

        let components = loss
            .compute_components(scores.view(), labels.view())
            .unwrap();
        assert!(components.reverse_cross_entropy.is_nan());
        assert!(components.loss.is_nan());
    }
}
