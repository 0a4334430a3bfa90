//! A single network layer.
//!
//! A layer holds the weights mapping from the previous layer's output to its
//! own nodes, plus the transient per-pass buffers (`output`, `layer_error`,
//! `weight_delta`) that feed-forward and backprop rebuild on every example.
//!
//! A layer's *input* is never stored here: during a pass it is always an
//! alias of the previous layer's `output` (or the network-owned root input),
//! resolved by index inside the network walks. A layer never owns the memory
//! it reads its input from.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

use crate::{Activation, Error, Matrix, Result};

/// Weights and biases are initialized uniformly in `[-INIT_INTERVAL, INIT_INTERVAL]`.
pub(crate) const INIT_INTERVAL: f64 = 0.5;

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayerKind {
    Input,
    Hidden,
    Output,
}

#[derive(Debug)]
pub struct Layer {
    /// Process-unique identity, used for the duplicate-instance check when
    /// adding a layer to a network.
    id: u64,
    kind: LayerKind,
    input_nodes: usize,
    output_nodes: usize,
    uses_bias: bool,
    bias: f64,
    activation: Activation,
    /// `output_nodes x input_nodes`; `None` for the input layer and for any
    /// layer before the network is connected.
    weights: Option<Matrix>,
    output: Option<Matrix>,
    layer_error: Option<Matrix>,
    weight_delta: Option<Matrix>,
}

impl Layer {
    /// Build an unconnected layer.
    ///
    /// Only the kind, node count, bias flag, and activation are set; the
    /// input dimension and weights are filled in by `Network::connect`.
    pub fn build(
        kind: LayerKind,
        uses_bias: bool,
        nodes: usize,
        activation: Activation,
    ) -> Result<Self> {
        if nodes == 0 {
            return Err(Error::InvalidNodeCount);
        }
        Ok(Self {
            id: NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            input_nodes: 0,
            output_nodes: nodes,
            uses_bias,
            bias: 0.0,
            activation,
            weights: None,
            output: None,
            layer_error: None,
            weight_delta: None,
        })
    }

    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    #[inline]
    pub fn input_nodes(&self) -> usize {
        self.input_nodes
    }

    #[inline]
    pub fn output_nodes(&self) -> usize {
        self.output_nodes
    }

    #[inline]
    pub fn uses_bias(&self) -> bool {
        self.uses_bias
    }

    #[inline]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    #[inline]
    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    /// The weight matrix, once the network is connected.
    #[inline]
    pub fn weights(&self) -> Option<&Matrix> {
        self.weights.as_ref()
    }

    /// Mutable weight access, for tooling and tests.
    #[inline]
    pub fn weights_mut(&mut self) -> Option<&mut Matrix> {
        self.weights.as_mut()
    }

    #[inline]
    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    /// The activated output of the most recent forward pass.
    #[inline]
    pub fn output(&self) -> Option<&Matrix> {
        self.output.as_ref()
    }

    pub(crate) fn output_mut(&mut self) -> Option<&mut Matrix> {
        self.output.as_mut()
    }

    pub(crate) fn set_output(&mut self, output: Matrix) {
        self.output = Some(output);
    }

    pub(crate) fn layer_error(&self) -> Option<&Matrix> {
        self.layer_error.as_ref()
    }

    pub(crate) fn set_layer_error(&mut self, err: Matrix) {
        self.layer_error = Some(err);
    }

    pub(crate) fn take_weight_delta(&mut self) -> Option<Matrix> {
        self.weight_delta.take()
    }

    pub(crate) fn set_weight_delta(&mut self, delta: Matrix) {
        self.weight_delta = Some(delta);
    }

    pub(crate) fn replace_weights(&mut self, weights: Matrix) {
        self.weights = Some(weights);
    }

    pub(crate) fn apply_bias_delta(&mut self, delta: f64) {
        self.bias -= delta;
    }

    /// Drop the transient buffers from a previous pass.
    pub(crate) fn clear_transients(&mut self) {
        self.output = None;
        self.layer_error = None;
        self.weight_delta = None;
    }

    /// Wire this layer to a predecessor with `input_nodes` outputs:
    /// randomize the weight matrix and, if enabled, the bias.
    ///
    /// The input layer gets `input_nodes == output_nodes` and no weights.
    pub(crate) fn connect<R: Rng + ?Sized>(&mut self, input_nodes: usize, rng: &mut R) -> Result<()> {
        self.clear_transients();
        if self.kind == LayerKind::Input {
            self.input_nodes = self.output_nodes;
            self.weights = None;
            self.bias = 0.0;
            return Ok(());
        }

        self.input_nodes = input_nodes;
        self.weights = Some(Matrix::random(
            self.output_nodes,
            input_nodes,
            INIT_INTERVAL,
            rng,
        )?);
        self.bias = if self.uses_bias {
            rng.gen_range(-INIT_INTERVAL..=INIT_INTERVAL)
        } else {
            0.0
        };
        Ok(())
    }

    /// Rebuild a connected layer from its persisted parts.
    pub(crate) fn restore(
        kind: LayerKind,
        input_nodes: usize,
        output_nodes: usize,
        uses_bias: bool,
        bias: f64,
        activation: Activation,
        weights: Option<Matrix>,
    ) -> Self {
        Self {
            id: NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            input_nodes,
            output_nodes,
            uses_bias,
            bias,
            activation,
            weights,
            output: None,
            layer_error: None,
            weight_delta: None,
        }
    }
}

/// A clone is a distinct layer instance: it gets a fresh identity, so adding
/// a layer and its clone to the same network is not a duplicate.
impl Clone for Layer {
    fn clone(&self) -> Self {
        Self {
            id: NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed),
            kind: self.kind,
            input_nodes: self.input_nodes,
            output_nodes: self.output_nodes,
            uses_bias: self.uses_bias,
            bias: self.bias,
            activation: self.activation,
            weights: self.weights.clone(),
            output: self.output.clone(),
            layer_error: self.layer_error.clone(),
            weight_delta: self.weight_delta.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn build_rejects_zero_nodes() {
        assert!(matches!(
            Layer::build(LayerKind::Hidden, true, 0, Activation::sigmoid()),
            Err(Error::InvalidNodeCount)
        ));
    }

    #[test]
    fn built_layer_is_unconnected() {
        let l = Layer::build(LayerKind::Hidden, true, 4, Activation::sigmoid()).unwrap();
        assert_eq!(l.output_nodes(), 4);
        assert_eq!(l.input_nodes(), 0);
        assert!(l.weights().is_none());
        assert!(l.output().is_none());
        assert_eq!(l.bias(), 0.0);
    }

    #[test]
    fn connect_randomizes_weights_within_the_interval() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut l = Layer::build(LayerKind::Hidden, true, 4, Activation::sigmoid()).unwrap();
        l.connect(3, &mut rng).unwrap();

        let w = l.weights().unwrap();
        assert_eq!(w.rows(), 4);
        assert_eq!(w.columns(), 3);
        assert!(w.values().iter().all(|v| v.abs() <= INIT_INTERVAL));
        assert!(l.bias().abs() <= INIT_INTERVAL);
    }

    #[test]
    fn input_layer_gets_no_weights_or_bias() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut l = Layer::build(LayerKind::Input, false, 5, Activation::sigmoid()).unwrap();
        l.connect(99, &mut rng).unwrap();
        assert!(l.weights().is_none());
        assert_eq!(l.input_nodes(), 5);
        assert_eq!(l.bias(), 0.0);
    }

    #[test]
    fn bias_stays_zero_when_disabled() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut l = Layer::build(LayerKind::Output, false, 2, Activation::sigmoid()).unwrap();
        l.connect(4, &mut rng).unwrap();
        assert_eq!(l.bias(), 0.0);
    }

    #[test]
    fn clones_are_distinct_instances() {
        let l = Layer::build(LayerKind::Hidden, true, 2, Activation::tanh()).unwrap();
        let c = l.clone();
        assert_ne!(l.id(), c.id());
        assert_eq!(l.output_nodes(), c.output_nodes());
    }
}
