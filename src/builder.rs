//! Assembling and wiring a network.
//!
//! Layers can be added in any order; [`Network::connect`] moves the input
//! layer to the front, the output layer to the back, keeps hidden layers in
//! their insertion order, and then randomizes every weight matrix and bias.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Error, Layer, LayerKind, Network, Result};

impl Network {
    /// Add a layer to the (unconnected) network.
    ///
    /// At most one input and one output layer are allowed; adding a second
    /// fails with `TooManyInputLayers`/`TooManyOutputLayers` and leaves the
    /// network unchanged. Adding any layer invalidates a previous `connect`.
    pub fn add_layer(&mut self, layer: Layer) -> Result<()> {
        match layer.kind() {
            LayerKind::Input if self.layers.iter().any(|l| l.kind() == LayerKind::Input) => {
                return Err(Error::TooManyInputLayers);
            }
            LayerKind::Output if self.layers.iter().any(|l| l.kind() == LayerKind::Output) => {
                return Err(Error::TooManyOutputLayers);
            }
            _ => {}
        }
        if self.layers.iter().any(|l| l.id() == layer.id()) {
            return Err(Error::DuplicateLayerInNetwork);
        }

        self.connected = false;
        self.topology.clear();
        self.layers.push(layer);
        Ok(())
    }

    /// Order the layers and randomize weights and biases from `rng`.
    ///
    /// On success the network is connected and ready for `feed_forward`,
    /// `backprop`, `train`, and `predict`. On failure it stays unconnected.
    pub fn connect_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.connected = false;
        self.topology.clear();
        self.input = None;

        let input_pos = self
            .layers
            .iter()
            .position(|l| l.kind() == LayerKind::Input)
            .ok_or(Error::NoInputLayer)?;
        self.layers.swap(0, input_pos);

        let last = self.layers.len() - 1;
        let output_pos = self
            .layers
            .iter()
            .position(|l| l.kind() == LayerKind::Output)
            .ok_or(Error::NoOutputLayer)?;
        self.layers.swap(last, output_pos);

        for i in (0..=last).rev() {
            let input_nodes = if i == 0 { 0 } else { self.layers[i - 1].output_nodes() };
            self.layers[i].connect(input_nodes, rng)?;
        }

        self.topology = self.layers.iter().map(|l| l.output_nodes()).collect();
        self.connected = true;
        Ok(())
    }

    /// [`connect_with_rng`](Self::connect_with_rng) with a seeded `StdRng`,
    /// for reproducible initialization.
    pub fn connect_with_seed(&mut self, seed: u64) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.connect_with_rng(&mut rng)
    }

    /// [`connect_with_rng`](Self::connect_with_rng) with the thread-local RNG.
    pub fn connect(&mut self) -> Result<()> {
        let mut rng = rand::thread_rng();
        self.connect_with_rng(&mut rng)
    }
}
