//! Small feed-forward networks with online output-layer updates.

use rand::Rng;

/// A fully-connected feed-forward network.
///
/// Activation policy is fixed by layer position: ReLU on the first
/// hidden layer, tanh on interior hidden layers, sigmoid on the output
/// layer (with the pre-activation clamped to avoid overflow). Outputs
/// are therefore always in `(0.0, 1.0)`.
#[derive(Debug, Clone)]
pub struct FeedForward {
    /// Layer widths: input, hidden layers, output.
    sizes: Vec<usize>,
    /// Per layer: `sizes[i] * sizes[i + 1]` weights, row-major
    /// (`weights[layer][input_index * output_width + output_index]`).
    weights: Vec<Vec<f32>>,
    /// Per layer: one bias per output unit.
    biases: Vec<Vec<f32>>,
    /// Momentum buffer for the output layer's weight deltas.
    output_deltas: Vec<f32>,
    learning_rate: f32,
    momentum: f32,
}

/// Per-layer activations from one forward pass, kept for training.
#[derive(Debug, Clone)]
pub struct Trace {
    /// `activations[0]` is the input; the last entry is the output.
    activations: Vec<Vec<f32>>,
}

impl Trace {
    /// The network output this trace recorded.
    #[must_use]
    pub fn output(&self) -> &[f32] {
        self.activations.last().expect("trace has at least the input layer")
    }
}

impl FeedForward {
    /// Creates a network with random initialization.
    ///
    /// Weights are uniform in `±1/√fan_in`; biases uniform in `±0.05`.
    ///
    /// # Panics
    ///
    /// Panics if `input` or `output` is zero.
    #[expect(clippy::cast_precision_loss)]
    pub fn new<R>(
        input: usize,
        hidden: &[usize],
        output: usize,
        learning_rate: f32,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(input > 0 && output > 0);
        let mut sizes = Vec::with_capacity(hidden.len() + 2);
        sizes.push(input);
        sizes.extend_from_slice(hidden);
        sizes.push(output);

        let mut weights = Vec::with_capacity(sizes.len() - 1);
        let mut biases = Vec::with_capacity(sizes.len() - 1);
        for layer in 0..sizes.len() - 1 {
            let (rows, cols) = (sizes[layer], sizes[layer + 1]);
            let scale = 1.0 / (rows as f32).sqrt();
            weights.push(
                (0..rows * cols)
                    .map(|_| rng.random_range(-scale..=scale))
                    .collect(),
            );
            biases.push((0..cols).map(|_| rng.random_range(-0.05..=0.05)).collect());
        }

        let output_layer_len = sizes[sizes.len() - 2] * output;
        Self {
            sizes,
            weights,
            biases,
            output_deltas: vec![0.0; output_layer_len],
            learning_rate,
            momentum: 0.9,
        }
    }

    /// Output width of the network.
    #[must_use]
    pub fn output_len(&self) -> usize {
        *self.sizes.last().expect("network has layers")
    }

    /// Runs a forward pass.
    ///
    /// # Panics
    ///
    /// Panics if `input` does not match the network's input width.
    #[must_use]
    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        self.forward_trace(input).activations.pop().expect("trace has output")
    }

    /// Runs a forward pass and keeps every layer's activations for a
    /// later [`update`](Self::update).
    #[must_use]
    pub fn forward_trace(&self, input: &[f32]) -> Trace {
        assert_eq!(input.len(), self.sizes[0], "input width mismatch");

        let mut activations = Vec::with_capacity(self.sizes.len());
        activations.push(input.to_vec());

        for layer in 0..self.weights.len() {
            let previous = &activations[layer];
            let cols = self.sizes[layer + 1];
            let mut next = self.biases[layer].clone();
            for (i, &value) in previous.iter().enumerate() {
                let row = &self.weights[layer][i * cols..(i + 1) * cols];
                for (j, &weight) in row.iter().enumerate() {
                    next[j] += weight * value;
                }
            }

            let is_output = layer == self.weights.len() - 1;
            let is_first_hidden = layer == 0;
            for value in &mut next {
                *value = if is_output {
                    sigmoid(*value)
                } else if is_first_hidden {
                    value.max(0.0)
                } else {
                    value.tanh()
                };
            }
            activations.push(next);
        }

        Trace { activations }
    }

    /// Applies one online update toward `target`.
    ///
    /// Delta rule with momentum on the output layer's weights and biases
    /// only; hidden layers are left at their initialization. `trace`
    /// must come from a forward pass of this network on the same input.
    ///
    /// # Panics
    ///
    /// Panics if `target` does not match the output width.
    pub fn update(&mut self, trace: &Trace, target: &[f32]) {
        let output = trace.output();
        assert_eq!(target.len(), output.len(), "target width mismatch");

        let last = self.weights.len() - 1;
        let previous = &trace.activations[last];
        let cols = self.sizes[last + 1];

        // Sigmoid derivative folded into the per-unit delta.
        let unit_deltas: Vec<f32> = target
            .iter()
            .zip(output)
            .map(|(&t, &o)| (t - o) * o * (1.0 - o))
            .collect();

        for (i, &activation) in previous.iter().enumerate() {
            for (j, &unit_delta) in unit_deltas.iter().enumerate() {
                let index = i * cols + j;
                let delta = self.learning_rate * unit_delta * activation;
                self.weights[last][index] += delta + self.momentum * self.output_deltas[index];
                self.output_deltas[index] = delta;
            }
        }
        for (j, &unit_delta) in unit_deltas.iter().enumerate() {
            self.biases[last][j] += self.learning_rate * unit_delta;
        }
    }
}

/// Logistic activation with the input clamped to `[-500, 500]` so the
/// exponential cannot overflow.
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x.clamp(-500.0, 500.0)).exp())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::from_seed([7; 16])
    }

    #[test]
    fn test_output_shape_and_range() {
        let network = FeedForward::new(8, &[6, 4], 3, 0.001, &mut rng());
        let output = network.forward(&[0.5; 8]);
        assert_eq!(output.len(), 3);
        for value in output {
            assert!((0.0..=1.0).contains(&value), "sigmoid escaped: {value}");
        }
    }

    #[test]
    fn test_forward_is_deterministic_for_same_seed() {
        let a = FeedForward::new(8, &[6], 2, 0.001, &mut rng());
        let b = FeedForward::new(8, &[6], 2, 0.001, &mut rng());
        assert_eq!(a.forward(&[0.3; 8]), b.forward(&[0.3; 8]));
    }

    #[test]
    fn test_sigmoid_survives_extreme_inputs() {
        assert_eq!(sigmoid(1e30), 1.0);
        assert_eq!(sigmoid(-1e30), 0.0);
        assert!(sigmoid(f32::MAX).is_finite());
    }

    #[test]
    fn test_update_moves_output_toward_target() {
        let mut network = FeedForward::new(4, &[5], 1, 0.5, &mut rng());
        let input = [0.9, 0.1, 0.4, 0.7];
        let before = network.forward(&input)[0];
        for _ in 0..200 {
            let trace = network.forward_trace(&input);
            network.update(&trace, &[1.0]);
        }
        let after = network.forward(&input)[0];
        assert!(after > before, "update did not raise output: {before} -> {after}");
    }

    #[test]
    fn test_update_leaves_hidden_layers_frozen() {
        let mut network = FeedForward::new(4, &[5, 3], 2, 0.5, &mut rng());
        let hidden_before = network.weights[..network.weights.len() - 1].to_vec();
        let trace = network.forward_trace(&[0.2, 0.4, 0.6, 0.8]);
        network.update(&trace, &[1.0, 0.0]);
        assert_eq!(
            network.weights[..network.weights.len() - 1],
            hidden_before[..]
        );
    }

    #[test]
    #[should_panic(expected = "input width mismatch")]
    fn test_wrong_input_width_panics() {
        let network = FeedForward::new(4, &[], 1, 0.001, &mut rng());
        let _ = network.forward(&[0.0; 3]);
    }
}
