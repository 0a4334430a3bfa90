//! The network itself: feed-forward and backpropagation.
//!
//! A [`Network`] owns its layers exclusively. During a pass, a layer's input
//! is an alias resolved by position: layer 1 reads the network-owned copy of
//! the caller's root input, layer `i > 1` reads `layers[i - 1].output`.
//!
//! `feed_forward` and `backprop` are the raw per-example steps;
//! [`Network::train`](crate::Network::train) drives them over a dataset.

use crate::{Cost, Error, Layer, Matrix, Result};

#[derive(Debug)]
pub struct Network {
    pub(crate) layers: Vec<Layer>,
    /// `topology[i] == layers[i].output_nodes`, filled in by `connect`.
    pub(crate) topology: Vec<usize>,
    pub(crate) learning_rate: f64,
    pub(crate) cost: Cost,
    pub(crate) connected: bool,
    /// Root input copy for the current pass; what layer 1 aliases.
    pub(crate) input: Option<Matrix>,
}

impl Network {
    /// A new, empty, unconnected network.
    ///
    /// Fails with `InvalidLearningRate` unless the rate is finite and
    /// greater than zero.
    pub fn build(learning_rate: f64, cost: Cost) -> Result<Self> {
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(Error::InvalidLearningRate);
        }
        Ok(Self {
            layers: Vec::new(),
            topology: Vec::new(),
            learning_rate,
            cost,
            connected: false,
            input: None,
        })
    }

    #[inline]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    #[inline]
    pub fn cost(&self) -> Cost {
        self.cost
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Node counts per layer, input first. Empty until connected.
    #[inline]
    pub fn topology(&self) -> &[usize] {
        &self.topology
    }

    /// The layers in walk order (input first) once connected.
    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// The output layer's activation from the most recent forward pass.
    pub fn output(&self) -> Option<&Matrix> {
        self.layers.last().and_then(|l| l.output())
    }

    /// Run one forward pass, leaving each layer's activated output in place.
    ///
    /// `input` must be a column vector with `topology[0]` rows. Previous
    /// outputs and error buffers are dropped as each layer is recomputed.
    pub fn feed_forward(&mut self, input: &Matrix) -> Result<()> {
        if !self.connected {
            return Err(Error::NetworkNotConnected);
        }
        if !input.is_column_vector() {
            return Err(Error::ExpectedVectorGotMatrix);
        }
        if input.rows() != self.topology[0] {
            return Err(Error::WrongInputSize {
                expected: self.topology[0],
                got: input.rows(),
            });
        }

        self.input = Some(input.clone());
        for i in 1..self.layers.len() {
            let (before, rest) = self.layers.split_at_mut(i);
            let layer = &mut rest[0];
            let input_alias = if i == 1 {
                self.input.as_ref().expect("root input stored above")
            } else {
                before[i - 1].output().expect("previous layer just produced output")
            };

            let weights = layer.weights().expect("connected layer has weights");
            let mut out = weights.multiply(input_alias)?;
            if layer.uses_bias() {
                out.add_scalar(layer.bias())?;
            }
            let activation = *layer.activation();
            out.map(|x| activation.apply(x));

            layer.clear_transients();
            layer.set_output(out);
        }
        Ok(())
    }

    /// Run one backward pass against `expected` and apply the weight and
    /// bias updates, scaled by the learning rate.
    ///
    /// Walks the layers last to first seeding each layer's error: the output
    /// layer from the cost gradient, inner layers from
    /// `transpose(next.weights) x next.layer_error`. The activation
    /// derivative is applied in place to the layer's activated output, the
    /// seed is folded in elementwise, and the weight delta is the outer
    /// product of the layer error with the transposed input alias.
    ///
    /// # Panics
    ///
    /// Panics if called before [`feed_forward`](Self::feed_forward) has run
    /// on the current topology.
    pub fn backprop(&mut self, expected: &Matrix) -> Result<()> {
        if !self.connected {
            return Err(Error::NetworkNotConnected);
        }
        if !expected.is_column_vector() {
            return Err(Error::ExpectedVectorGotMatrix);
        }
        let last = self.layers.len() - 1;
        let output_nodes = self.topology[last];
        if expected.rows() != output_nodes {
            return Err(Error::WrongOutputSize {
                expected: output_nodes,
                got: expected.rows(),
            });
        }

        for i in (1..=last).rev() {
            let seed = if i == last {
                let output = self.layers[last]
                    .output()
                    .expect("feed_forward must run before backprop");
                self.cost.gradient(output, expected)?
            } else {
                let next = &self.layers[i + 1];
                let weights_t = next.weights().expect("connected layer has weights").transpose();
                weights_t.multiply(next.layer_error().expect("set on the previous step"))?
            };

            let (before, rest) = self.layers.split_at_mut(i);
            let layer = &mut rest[0];
            let activation = *layer.activation();
            let output = layer
                .output_mut()
                .expect("feed_forward must run before backprop");
            output.map(|y| activation.derivative(y));
            let layer_error = output.hadamard(&seed)?;

            let input_alias = if i == 1 {
                self.input
                    .as_ref()
                    .expect("feed_forward must run before backprop")
            } else {
                before[i - 1].output().expect("feed_forward filled every output")
            };
            let delta = Matrix::outer(&layer_error, &input_alias.transpose())?;

            layer.set_layer_error(layer_error);
            layer.set_weight_delta(delta);
        }

        for layer in self.layers.iter_mut().skip(1) {
            let mut delta = layer.take_weight_delta().expect("set in the error phase");
            delta.scale(self.learning_rate);
            let updated = layer
                .weights()
                .expect("connected layer has weights")
                .subtract(&delta)?;
            layer.replace_weights(updated);
        }

        for layer in self.layers.iter_mut().skip(1) {
            if layer.uses_bias() {
                let error_sum = layer.layer_error().expect("set in the error phase").sum();
                layer.apply_bias_delta(self.learning_rate * error_sum);
            }
        }
        Ok(())
    }
}

/// Cloning a network clones its layers as fresh instances with the same
/// weights and state.
impl Clone for Network {
    fn clone(&self) -> Self {
        Self {
            layers: self.layers.clone(),
            topology: self.topology.clone(),
            learning_rate: self.learning_rate,
            cost: self.cost,
            connected: self.connected,
            input: self.input.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Activation, LayerKind};

    fn small_net(seed: u64) -> Network {
        let mut net = Network::build(1.0, Cost::Quadratic).unwrap();
        net.add_layer(Layer::build(LayerKind::Input, false, 2, Activation::sigmoid()).unwrap())
            .unwrap();
        net.add_layer(Layer::build(LayerKind::Hidden, true, 3, Activation::sigmoid()).unwrap())
            .unwrap();
        net.add_layer(Layer::build(LayerKind::Output, true, 1, Activation::sigmoid()).unwrap())
            .unwrap();
        net.connect_with_seed(seed).unwrap();
        net
    }

    fn cost_at(net: &Network, input: &Matrix, expected: &Matrix) -> f64 {
        let mut probe = net.clone();
        probe.feed_forward(input).unwrap();
        probe.cost().value(probe.output().unwrap(), expected).unwrap()
    }

    #[test]
    fn feed_forward_requires_a_connected_network() {
        let mut net = Network::build(0.1, Cost::Quadratic).unwrap();
        let input = Matrix::column(&[1.0, 0.0]).unwrap();
        assert!(matches!(
            net.feed_forward(&input),
            Err(Error::NetworkNotConnected)
        ));
    }

    #[test]
    fn feed_forward_rejects_the_wrong_input_size() {
        let mut net = small_net(1);
        let input = Matrix::column(&[1.0, 0.0, 0.5]).unwrap();
        assert!(matches!(
            net.feed_forward(&input),
            Err(Error::WrongInputSize { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn feed_forward_fills_every_non_input_output() {
        let mut net = small_net(1);
        let input = Matrix::column(&[1.0, 0.0]).unwrap();
        net.feed_forward(&input).unwrap();

        assert!(net.layers()[0].output().is_none());
        assert_eq!(net.layers()[1].output().unwrap().rows(), 3);
        assert_eq!(net.layers()[2].output().unwrap().rows(), 1);
        // Sigmoid outputs live strictly inside (0, 1).
        let y = net.output().unwrap().get(0, 0);
        assert!(y > 0.0 && y < 1.0);
    }

    #[test]
    fn backprop_rejects_the_wrong_output_size() {
        let mut net = small_net(1);
        let input = Matrix::column(&[1.0, 0.0]).unwrap();
        net.feed_forward(&input).unwrap();
        let expected = Matrix::column(&[1.0, 0.0]).unwrap();
        assert!(matches!(
            net.backprop(&expected),
            Err(Error::WrongOutputSize { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn one_backprop_step_reduces_the_cost() {
        let mut net = small_net(11);
        let input = Matrix::column(&[0.3, -0.6]).unwrap();
        let expected = Matrix::column(&[0.8]).unwrap();

        let before = cost_at(&net, &input, &expected);
        net.feed_forward(&input).unwrap();
        net.backprop(&expected).unwrap();
        let after = cost_at(&net, &input, &expected);

        assert!(after < before, "cost went from {before} to {after}");
    }

    #[test]
    fn backprop_gradient_matches_numeric_differentiation() {
        let net = small_net(9);
        let input = Matrix::column(&[0.3, -0.6]).unwrap();
        let expected = Matrix::column(&[0.8]).unwrap();

        // learning_rate is 1.0, so the weight step equals the raw gradient.
        let mut stepped = net.clone();
        stepped.feed_forward(&input).unwrap();
        stepped.backprop(&expected).unwrap();

        let eps = 1e-5;
        for li in 1..net.layer_count() {
            let rows = net.layers()[li].weights().unwrap().rows();
            let cols = net.layers()[li].weights().unwrap().columns();
            for r in 0..rows {
                for c in 0..cols {
                    let analytic = net.layers()[li].weights().unwrap().get(r, c)
                        - stepped.layers()[li].weights().unwrap().get(r, c);

                    let mut plus = net.clone();
                    plus.layers_mut()[li].weights_mut().unwrap().set(
                        r,
                        c,
                        net.layers()[li].weights().unwrap().get(r, c) + eps,
                    );
                    let mut minus = net.clone();
                    minus.layers_mut()[li].weights_mut().unwrap().set(
                        r,
                        c,
                        net.layers()[li].weights().unwrap().get(r, c) - eps,
                    );
                    let numeric = (cost_at(&plus, &input, &expected)
                        - cost_at(&minus, &input, &expected))
                        / (2.0 * eps);

                    assert!(
                        (analytic - numeric).abs() < 1e-6,
                        "layer {li} weight ({r}, {c}): analytic {analytic}, numeric {numeric}"
                    );
                }
            }
        }
    }

    #[test]
    fn bias_update_follows_the_learning_rate() {
        let mut net = small_net(5);
        let slow = {
            let mut n = net.clone();
            n.learning_rate = 0.01;
            n
        };
        let input = Matrix::column(&[0.5, 0.5]).unwrap();
        let expected = Matrix::column(&[0.0]).unwrap();

        let bias_before = net.layers()[2].bias();
        net.feed_forward(&input).unwrap();
        net.backprop(&expected).unwrap();
        let fast_step = (net.layers()[2].bias() - bias_before).abs();

        let mut slow = slow;
        slow.feed_forward(&input).unwrap();
        slow.backprop(&expected).unwrap();
        let slow_step = (slow.layers()[2].bias() - bias_before).abs();

        assert!(fast_step > slow_step * 50.0);
    }

    #[test]
    fn invalid_learning_rates_are_rejected() {
        assert!(matches!(
            Network::build(0.0, Cost::Quadratic),
            Err(Error::InvalidLearningRate)
        ));
        assert!(matches!(
            Network::build(-0.5, Cost::Quadratic),
            Err(Error::InvalidLearningRate)
        ));
        assert!(matches!(
            Network::build(f64::NAN, Cost::Quadratic),
            Err(Error::InvalidLearningRate)
        ));
    }
}
