#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use autodrome::simulation::brain::{BrainError, NeuralNetwork};
use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[test]
fn test_construction_shapes() {
    let net = NeuralNetwork::new_with(&[3, 4, 2], &mut seeded(0));

    // one extra bias slot per destination neuron
    assert_eq!(net.weights.len(), 2);
    assert_eq!(net.weights[0].len(), (3 + 1) * 4);
    assert_eq!(net.weights[1].len(), (4 + 1) * 2);

    assert_eq!(net.layer_values.len(), 3);
    assert_eq!(net.layer_values[0].len(), 3);
    assert_eq!(net.layer_values[1].len(), 4);
    assert_eq!(net.layer_values[2].len(), 2);
}

#[test]
fn test_initial_weights_in_range() {
    let net = NeuralNetwork::new_with(&[5, 8, 3], &mut seeded(1));
    for layer in &net.weights {
        for &w in layer {
            assert!((-1.0..=1.0).contains(&w), "weight {w} out of range");
        }
    }
}

#[test]
#[should_panic(expected = "input and an output layer")]
fn test_single_layer_topology_is_rejected() {
    let _ = NeuralNetwork::new_with(&[4], &mut seeded(0));
}

#[test]
fn test_set_input_rejects_wrong_size() {
    let mut net = NeuralNetwork::new_with(&[3, 2], &mut seeded(2));
    let result = net.set_input(&Array1::from_vec(vec![1.0, 2.0]));

    assert_eq!(
        result,
        Err(BrainError::InvalidInputSize {
            expected: 3,
            got: 2
        })
    );
}

#[test]
fn test_set_input_copies_values() {
    let mut net = NeuralNetwork::new_with(&[3, 2], &mut seeded(3));
    net.set_input(&Array1::from_vec(vec![0.5, -1.0, 2.0]))
        .expect("matching size");

    assert_eq!(net.layer_values[0].to_vec(), vec![0.5, -1.0, 2.0]);
}

#[test]
fn test_forward_propagation_is_deterministic() {
    let mut net = NeuralNetwork::new_with(&[4, 6, 2], &mut seeded(4));
    let input = Array1::from_vec(vec![0.1, 0.2, 0.3, 0.4]);

    net.set_input(&input).expect("matching size");
    net.forward_propagate();
    let first = net.output().to_vec();

    net.set_input(&input).expect("matching size");
    net.forward_propagate();
    assert_eq!(net.output().to_vec(), first);
}

#[test]
fn test_forward_propagation_recomputes_from_input() {
    let mut net = NeuralNetwork::new_with(&[2, 1], &mut seeded(5));
    // make the output depend on the first input only
    net.weights[0] = Array1::from_vec(vec![2.0, 0.0, 0.0]);

    net.set_input(&Array1::from_vec(vec![1.0, 0.0]))
        .expect("matching size");
    net.forward_propagate();
    let high = net.output()[0];

    net.set_input(&Array1::from_vec(vec![-1.0, 0.0]))
        .expect("matching size");
    net.forward_propagate();
    let low = net.output()[0];

    assert!(high > 0.5 && low < 0.5, "outputs {high} / {low}");
}

#[test]
fn test_hand_computed_forward_value() {
    let mut net = NeuralNetwork::new_with(&[2, 1], &mut seeded(6));
    net.weights[0] = Array1::from_vec(vec![0.5, -0.25, 0.1]);

    net.set_input(&Array1::from_vec(vec![1.0, 0.5]))
        .expect("matching size");
    net.forward_propagate();

    // 0.5 * 1.0 + (-0.25) * 0.5 + 0.1 (bias) = 0.475
    let expected = 1.0 / (1.0 + (-0.475_f32).exp());
    assert!((net.output()[0] - expected).abs() < 1e-6);
}

#[test]
fn test_bias_occupies_the_trailing_slot() {
    let mut net = NeuralNetwork::new_with(&[2, 2], &mut seeded(7));
    // zero all input weights; only the per-row trailing bias drives output
    net.weights[0] = Array1::from_vec(vec![0.0, 0.0, 2.0, 0.0, 0.0, -2.0]);

    net.set_input(&Array1::from_vec(vec![0.3, 0.7]))
        .expect("matching size");
    net.forward_propagate();

    let expected_high = 1.0 / (1.0 + (-2.0_f32).exp());
    let expected_low = 1.0 / (1.0 + 2.0_f32.exp());
    assert!((net.output()[0] - expected_high).abs() < 1e-6);
    assert!((net.output()[1] - expected_low).abs() < 1e-6);
}

#[test]
fn test_end_to_end_two_three_one() {
    let mut net = NeuralNetwork::new_with(&[2, 3, 1], &mut seeded(42));
    net.set_input(&Array1::from_vec(vec![1.0, 0.0]))
        .expect("matching size");
    net.forward_propagate();

    let out = net.output();
    assert_eq!(out.len(), 1);
    // sigmoid range is exclusive on both ends
    assert!(out[0] > 0.0 && out[0] < 1.0);

    let first = out[0];
    net.forward_propagate();
    assert_eq!(net.output()[0], first);
}

#[test]
fn test_mutation_rejects_incompatible_topology() {
    let net = NeuralNetwork::new_with(&[2, 3, 1], &mut seeded(8));
    let other = NeuralNetwork::new_with(&[2, 4, 1], &mut seeded(9));

    let result = net.clone_mutated(&other, &mut seeded(10));
    assert!(matches!(
        result,
        Err(BrainError::IncompatibleTopology { .. })
    ));
}

#[test]
fn test_mutation_preserves_topology_and_clears_activations() {
    let base = NeuralNetwork::new_with(&[3, 4, 2], &mut seeded(11));
    let child = base
        .clone_mutated(&base, &mut seeded(12))
        .expect("same topology");

    assert_eq!(child.layer_sizes, base.layer_sizes);
    for (c, b) in child.weights.iter().zip(&base.weights) {
        assert_eq!(c.len(), b.len());
    }
    for layer in &child.layer_values {
        assert!(layer.iter().all(|&v| v == 0.0));
    }
}

#[test]
fn test_mutation_drift_dominates_selected_cells() {
    let base = NeuralNetwork::new_with(&[2, 2], &mut seeded(13));
    let mut current = base.clone();
    let drift = 0.1;
    current.weights[0][0] += drift;

    let mut rng = seeded(14);
    let trials = 1000;
    let mut changed = 0;
    let mut shift_sum = 0.0;

    for _ in 0..trials {
        let child = current.clone_mutated(&base, &mut rng).expect("same topology");
        let shift = child.weights[0][0] - current.weights[0][0];
        if shift != 0.0 {
            changed += 1;
            // drift * 10 = 1.0 swamps the +-0.05 jitter, so every selected
            // cell moves in the drift direction
            assert!(shift > 0.0, "selected cell moved against the drift: {shift}");
            shift_sum += shift;
        }
    }

    // selection probability is 0.25 per cell
    assert!(
        (150..=350).contains(&changed),
        "selected {changed} of {trials}"
    );
    let mean_shift = shift_sum / changed as f32;
    assert!(
        (0.9..=1.1).contains(&mean_shift),
        "mean shift {mean_shift} not dominated by amplified drift"
    );
}

#[test]
fn test_mutation_zero_drift_cells_receive_jitter_only() {
    let base = NeuralNetwork::new_with(&[2, 2], &mut seeded(15));
    // current == base everywhere: every selected cell gets jitter, no push
    let current = base.clone();

    let mut rng = seeded(16);
    for _ in 0..500 {
        let child = current.clone_mutated(&base, &mut rng).expect("same topology");
        for (c, o) in child.weights[0].iter().zip(current.weights[0].iter()) {
            assert!(
                (c - o).abs() <= 0.05 + 1e-5,
                "zero-drift cell moved by {}",
                c - o
            );
        }
    }
}

#[test]
fn test_mutation_is_reproducible_with_a_seed() {
    let base = NeuralNetwork::new_with(&[3, 3], &mut seeded(17));
    let mut current = base.clone();
    current.weights[0][2] += 0.3;

    let a = current
        .clone_mutated(&base, &mut seeded(99))
        .expect("same topology");
    let b = current
        .clone_mutated(&base, &mut seeded(99))
        .expect("same topology");

    for (wa, wb) in a.weights.iter().zip(&b.weights) {
        assert_eq!(wa.to_vec(), wb.to_vec());
    }
}
