//! A layered, fully connected network trained one example at a time.
//!
//! [`Network`] chains affine layers built from [`Matrix`] weights. Hidden
//! layers apply the logistic sigmoid; the final layer stays linear, so the
//! output is unbounded and the net can regress onto arbitrary values.
//! Training is plain stochastic gradient descent on a single input/target
//! column per call.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Error, Matrix, Result};

/// A fully connected feed-forward network.
///
/// Built from one width per layer, e.g. `[2, 3, 1]` for two inputs, a hidden
/// layer of three neurons, and a single output.
#[derive(Debug, Clone)]
pub struct Network {
    layer_sizes: Vec<usize>,
    weights: Vec<Matrix>,
    biases: Vec<Matrix>,
    learning_rate: f64,
}

impl Network {
    /// Builds a network with parameters drawn from the thread RNG.
    pub fn new(layer_sizes: &[usize], learning_rate: f64) -> Result<Self> {
        let mut rng = rand::thread_rng();
        Self::new_with_rng(layer_sizes, learning_rate, &mut rng)
    }

    /// Builds a reproducible network from a seed.
    pub fn new_with_seed(layer_sizes: &[usize], learning_rate: f64, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new_with_rng(layer_sizes, learning_rate, &mut rng)
    }

    /// Builds a network, drawing every weight and bias uniformly from
    /// `(-1, 1)` with the supplied generator.
    ///
    /// `layer_sizes` must list at least an input and an output width, all
    /// nonzero. The learning rate is taken as given; a rate of zero learns
    /// nothing and a negative rate climbs the error instead of descending it.
    pub fn new_with_rng<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        learning_rate: f64,
        rng: &mut R,
    ) -> Result<Self> {
        Self::check_layer_sizes(layer_sizes)?;

        let mut weights = Vec::with_capacity(layer_sizes.len() - 1);
        let mut biases = Vec::with_capacity(layer_sizes.len() - 1);
        for pair in layer_sizes.windows(2) {
            let (current, next) = (pair[0], pair[1]);

            let mut weight = Matrix::zeros(next, current);
            weight.randomize(-1.0, 1.0, rng);
            weights.push(weight);

            let mut bias = Matrix::zeros(next, 1);
            bias.randomize(-1.0, 1.0, rng);
            biases.push(bias);
        }

        Ok(Self {
            layer_sizes: layer_sizes.to_vec(),
            weights,
            biases,
            learning_rate,
        })
    }

    /// Builds a network from explicit parameters instead of random ones.
    ///
    /// Every matrix is checked against `layer_sizes`: weight `i` must be
    /// `(layer_sizes[i + 1], layer_sizes[i])` and bias `i` must be
    /// `(layer_sizes[i + 1], 1)`.
    pub fn from_parameters(
        layer_sizes: &[usize],
        learning_rate: f64,
        weights: Vec<Matrix>,
        biases: Vec<Matrix>,
    ) -> Result<Self> {
        Self::check_layer_sizes(layer_sizes)?;

        let pairs = layer_sizes.len() - 1;
        if weights.len() != pairs || biases.len() != pairs {
            return Err(Error::InvalidConfig(format!(
                "{} layer sizes need {pairs} weight and {pairs} bias matrices, got {} and {}",
                layer_sizes.len(),
                weights.len(),
                biases.len()
            )));
        }
        for (i, pair) in layer_sizes.windows(2).enumerate() {
            let (current, next) = (pair[0], pair[1]);
            if weights[i].shape() != (next, current) {
                return Err(Error::InvalidConfig(format!(
                    "weight {i} must be {next}x{current}, got {}x{}",
                    weights[i].rows(),
                    weights[i].cols()
                )));
            }
            if biases[i].shape() != (next, 1) {
                return Err(Error::InvalidConfig(format!(
                    "bias {i} must be {next}x1, got {}x{}",
                    biases[i].rows(),
                    biases[i].cols()
                )));
            }
        }

        Ok(Self {
            layer_sizes: layer_sizes.to_vec(),
            weights,
            biases,
            learning_rate,
        })
    }

    fn check_layer_sizes(layer_sizes: &[usize]) -> Result<()> {
        if layer_sizes.len() < 2 {
            return Err(Error::InvalidConfig(
                "layer sizes must include input and output widths".to_owned(),
            ));
        }
        if layer_sizes.contains(&0) {
            return Err(Error::InvalidConfig(
                "all layer sizes must be > 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Runs one input column through every layer.
    ///
    /// Each hidden layer applies the logistic sigmoid to its affine result;
    /// the final layer does not, so its output is unbounded.
    ///
    /// Shape contract: `input` is `(layer_sizes[0], 1)`.
    pub fn forward(&self, input: &Matrix) -> Result<Matrix> {
        let mut activation = input.clone();
        for (i, (weight, bias)) in self.weights.iter().zip(&self.biases).enumerate() {
            activation = weight.matmul(&activation)?.add(bias)?;
            if i + 1 < self.weights.len() {
                activation.sigmoid();
            }
        }
        Ok(activation)
    }

    /// Takes one stochastic gradient descent step on a single example.
    ///
    /// The output layer is corrected first, from the raw prediction error;
    /// the error is then carried back layer by layer, through each weight
    /// matrix as it stands after its own update, and scaled elementwise by
    /// one minus the squared activation of the layer it reaches.
    ///
    /// A shape violation in `input` or `target` surfaces before any
    /// parameter has been touched.
    ///
    /// Shape contract:
    /// - `input` is `(layer_sizes[0], 1)`
    /// - `target` is `(layer_sizes.last(), 1)`
    pub fn train(&mut self, input: &Matrix, target: &Matrix) -> Result<()> {
        // Forward, keeping every post-activation; activations[0] is the input.
        let mut activations = Vec::with_capacity(self.weights.len() + 1);
        activations.push(input.clone());
        for (i, (weight, bias)) in self.weights.iter().zip(&self.biases).enumerate() {
            let mut activation = weight.matmul(&activations[i])?.add(bias)?;
            if i + 1 < self.weights.len() {
                activation.sigmoid();
            }
            activations.push(activation);
        }

        let last = self.weights.len() - 1;
        let lr = self.learning_rate;

        // With a linear output layer and half squared error, the output
        // delta is the prediction minus the target.
        let mut error = activations[last + 1].sub(target)?;
        let grad = error.matmul(&activations[last].transpose())?;
        self.weights[last] = self.weights[last].sub(&(&grad * lr))?;
        self.biases[last] = self.biases[last].sub(&(&error * lr))?;

        for i in (0..last).rev() {
            error = self.weights[i + 1].transpose().matmul(&error)?;

            let mut squared = activations[i + 1].clone();
            squared.square();
            let derivative = Matrix::from_elem(squared.rows(), squared.cols(), 1.0).sub(&squared)?;
            debug_assert_eq!(error.shape(), derivative.shape());
            for (e, d) in error.as_mut_slice().iter_mut().zip(derivative.as_slice()) {
                *e *= *d;
            }

            let grad = error.matmul(&activations[i].transpose())?;
            self.weights[i] = self.weights[i].sub(&(&grad * lr))?;
            self.biases[i] = self.biases[i].sub(&(&error * lr))?;
        }

        Ok(())
    }

    /// Number of layers, counting the input layer.
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layer_sizes.len()
    }

    /// Width of layer `index`. Panics when `index` is out of range.
    #[inline]
    pub fn layer_size(&self, index: usize) -> usize {
        self.layer_sizes[index]
    }

    #[inline]
    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    #[inline]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Replaces the learning rate, unvalidated like at construction.
    #[inline]
    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    /// Weight matrix feeding layer `index + 1`. Panics when `index` is out
    /// of range.
    #[inline]
    pub fn weight(&self, index: usize) -> &Matrix {
        &self.weights[index]
    }

    /// Bias column feeding layer `index + 1`. Panics when `index` is out of
    /// range.
    #[inline]
    pub fn bias(&self, index: usize) -> &Matrix {
        &self.biases[index]
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Network ")?;
        for (i, size) in self.layer_sizes.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{size}")?;
        }
        write!(f, " (lr {})", self.learning_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(analytic: f64, numeric: f64, abs_tol: f64, rel_tol: f64) {
        let diff = (analytic - numeric).abs();
        let scale = analytic.abs().max(numeric.abs()).max(1.0);
        assert!(
            diff <= abs_tol || diff / scale <= rel_tol,
            "analytic={analytic} numeric={numeric} diff={diff}"
        );
    }

    fn half_squared_error(net: &Network, input: &Matrix, target: &Matrix) -> f64 {
        let mut diff = net.forward(input).unwrap().sub(target).unwrap();
        diff.square();
        0.5 * diff.sum()
    }

    #[test]
    fn construction_rejects_degenerate_layer_sizes() {
        assert!(matches!(
            Network::new_with_seed(&[5], 0.1, 0),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Network::new_with_seed(&[3, 0, 2], 0.1, 0),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn seeded_init_is_deterministic() {
        let a = Network::new_with_seed(&[2, 3, 1], 0.01, 123).unwrap();
        let b = Network::new_with_seed(&[2, 3, 1], 0.01, 123).unwrap();

        let input = Matrix::from_vec(2, 1, vec![0.3, -0.7]).unwrap();
        assert_eq!(a.forward(&input).unwrap(), b.forward(&input).unwrap());
    }

    #[test]
    fn initial_parameters_sit_inside_the_unit_interval() {
        let net = Network::new_with_seed(&[4, 6, 2], 0.1, 7).unwrap();
        for i in 0..net.layer_count() - 1 {
            for &v in net.weight(i).as_slice() {
                assert!((-1.0..1.0).contains(&v), "weight cell {v}");
            }
            for &v in net.bias(i).as_slice() {
                assert!((-1.0..1.0).contains(&v), "bias cell {v}");
            }
        }
    }

    #[test]
    fn from_parameters_checks_every_shape() {
        let good_w = vec![Matrix::zeros(3, 2), Matrix::zeros(1, 3)];
        let good_b = vec![Matrix::zeros(3, 1), Matrix::zeros(1, 1)];
        assert!(Network::from_parameters(&[2, 3, 1], 0.1, good_w.clone(), good_b.clone()).is_ok());

        let short_w = vec![Matrix::zeros(3, 2)];
        assert!(matches!(
            Network::from_parameters(&[2, 3, 1], 0.1, short_w, good_b.clone()),
            Err(Error::InvalidConfig(_))
        ));

        let bad_w = vec![Matrix::zeros(2, 3), Matrix::zeros(1, 3)];
        assert!(matches!(
            Network::from_parameters(&[2, 3, 1], 0.1, bad_w, good_b),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn accessors_expose_the_configuration() {
        let mut net = Network::new_with_seed(&[2, 4, 3], 0.5, 2).unwrap();
        assert_eq!(net.layer_count(), 3);
        assert_eq!(net.layer_size(1), 4);
        assert_eq!(net.layer_sizes(), &[2, 4, 3]);
        assert_eq!(net.weight(0).shape(), (4, 2));
        assert_eq!(net.bias(1).shape(), (3, 1));
        assert_eq!(net.learning_rate(), 0.5);

        net.set_learning_rate(0.125);
        assert_eq!(net.learning_rate(), 0.125);
    }

    #[test]
    fn forward_produces_one_output_column() {
        let net = Network::new_with_seed(&[3, 5, 2], 0.1, 1).unwrap();
        let out = net.forward(&Matrix::zeros(3, 1)).unwrap();
        assert_eq!(out.shape(), (2, 1));
    }

    #[test]
    fn forward_rejects_a_mismatched_input() {
        let net = Network::new_with_seed(&[3, 5, 2], 0.1, 1).unwrap();
        assert!(matches!(
            net.forward(&Matrix::zeros(4, 1)),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn forward_matches_hand_computed_values() {
        let weights = vec![
            Matrix::from_vec(2, 2, vec![0.5, -0.25, 1.0, 0.75]).unwrap(),
            Matrix::from_vec(1, 2, vec![0.3, -0.4]).unwrap(),
        ];
        let biases = vec![
            Matrix::from_vec(2, 1, vec![0.1, -0.2]).unwrap(),
            Matrix::from_vec(1, 1, vec![0.05]).unwrap(),
        ];
        let net = Network::from_parameters(&[2, 2, 1], 0.1, weights, biases).unwrap();

        let input = Matrix::from_vec(2, 1, vec![1.0, 0.0]).unwrap();
        let out = net.forward(&input).unwrap();
        assert_eq!(out.shape(), (1, 1));

        let h0 = 1.0 / (1.0 + (-(0.5 * 1.0 - 0.25 * 0.0 + 0.1_f64)).exp());
        let h1 = 1.0 / (1.0 + (-(1.0 * 1.0 + 0.75 * 0.0 - 0.2_f64)).exp());
        let expected = 0.3 * h0 - 0.4 * h1 + 0.05;
        assert!((out.get(0, 0).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn one_training_step_matches_a_hand_rolled_update() {
        let lr = 0.1;
        let weights = vec![
            Matrix::from_vec(1, 1, vec![0.5]).unwrap(),
            Matrix::from_vec(1, 1, vec![1.2]).unwrap(),
        ];
        let biases = vec![
            Matrix::from_vec(1, 1, vec![0.0]).unwrap(),
            Matrix::from_vec(1, 1, vec![0.1]).unwrap(),
        ];
        let mut net = Network::from_parameters(&[1, 1, 1], lr, weights, biases).unwrap();

        let input = Matrix::from_vec(1, 1, vec![1.0]).unwrap();
        let target = Matrix::from_vec(1, 1, vec![1.0]).unwrap();
        net.train(&input, &target).unwrap();

        // Forward: hidden = sigmoid(0.5), output = 1.2 * hidden + 0.1.
        let hidden = 1.0 / (1.0 + (-0.5_f64).exp());
        let output = 1.2 * hidden + 0.1;

        // Output layer first.
        let output_error = output - 1.0;
        let w1 = 1.2 - (output_error * hidden) * lr;
        let b1 = 0.1 - output_error * lr;

        // The error reaches the hidden layer through the freshly updated
        // weight, scaled by one minus the squared activation.
        let hidden_error = w1 * output_error * (1.0 - hidden * hidden);
        let w0 = 0.5 - (hidden_error * 1.0) * lr;
        let b0 = 0.0 - hidden_error * lr;

        assert!((net.weight(1).get(0, 0).unwrap() - w1).abs() < 1e-12);
        assert!((net.bias(1).get(0, 0).unwrap() - b1).abs() < 1e-12);
        assert!((net.weight(0).get(0, 0).unwrap() - w0).abs() < 1e-12);
        assert!((net.bias(0).get(0, 0).unwrap() - b0).abs() < 1e-12);
    }

    #[test]
    fn train_updates_match_numeric_gradients() {
        let sizes = [2usize, 3];
        let lr = 0.01;
        let weights =
            vec![Matrix::from_vec(3, 2, vec![0.4, -0.6, 0.15, 0.25, -0.35, 0.05]).unwrap()];
        let biases = vec![Matrix::from_vec(3, 1, vec![0.2, -0.1, 0.3]).unwrap()];

        let input = Matrix::from_vec(2, 1, vec![0.3, -0.7]).unwrap();
        let target = Matrix::from_vec(3, 1, vec![0.2, 0.0, -0.5]).unwrap();

        let mut trained =
            Network::from_parameters(&sizes, lr, weights.clone(), biases.clone()).unwrap();
        trained.train(&input, &target).unwrap();

        let eps = 1e-5;
        let abs_tol = 1e-8;
        let rel_tol = 1e-6;

        for r in 0..3 {
            for c in 0..2 {
                let base = weights[0].get(r, c).unwrap();

                let mut plus = weights.clone();
                plus[0].set(r, c, base + eps).unwrap();
                let net = Network::from_parameters(&sizes, lr, plus, biases.clone()).unwrap();
                let loss_plus = half_squared_error(&net, &input, &target);

                let mut minus = weights.clone();
                minus[0].set(r, c, base - eps).unwrap();
                let net = Network::from_parameters(&sizes, lr, minus, biases.clone()).unwrap();
                let loss_minus = half_squared_error(&net, &input, &target);

                let numeric = (loss_plus - loss_minus) / (2.0 * eps);
                let analytic = (base - trained.weight(0).get(r, c).unwrap()) / lr;
                assert_close(analytic, numeric, abs_tol, rel_tol);
            }
        }

        for r in 0..3 {
            let base = biases[0].get(r, 0).unwrap();

            let mut plus = biases.clone();
            plus[0].set(r, 0, base + eps).unwrap();
            let net = Network::from_parameters(&sizes, lr, weights.clone(), plus).unwrap();
            let loss_plus = half_squared_error(&net, &input, &target);

            let mut minus = biases.clone();
            minus[0].set(r, 0, base - eps).unwrap();
            let net = Network::from_parameters(&sizes, lr, weights.clone(), minus).unwrap();
            let loss_minus = half_squared_error(&net, &input, &target);

            let numeric = (loss_plus - loss_minus) / (2.0 * eps);
            let analytic = (base - trained.bias(0).get(r, 0).unwrap()) / lr;
            assert_close(analytic, numeric, abs_tol, rel_tol);
        }
    }

    #[test]
    fn train_with_a_mismatched_target_leaves_parameters_untouched() {
        let mut net = Network::new_with_seed(&[2, 3, 1], 0.05, 11).unwrap();
        let before = net.clone();

        let input = Matrix::from_vec(2, 1, vec![0.4, 0.6]).unwrap();
        let target = Matrix::zeros(2, 1);
        assert!(matches!(
            net.train(&input, &target),
            Err(Error::DimensionMismatch { .. })
        ));

        for i in 0..net.layer_count() - 1 {
            assert_eq!(net.weight(i), before.weight(i));
            assert_eq!(net.bias(i), before.bias(i));
        }
    }

    #[test]
    fn display_prints_the_architecture() {
        let net = Network::new_with_seed(&[2, 3, 1], 0.01, 0).unwrap();
        assert_eq!(net.to_string(), "Network 2 -> 3 -> 1 (lr 0.01)");
    }
}
