//! Saving and loading connected networks as versioned JSON.
//!
//! The wire structs mirror the live types instead of serializing them
//! directly, so the on-disk format stays stable as the internals move.
//! Loading validates everything: format version, layer ordering, the
//! dimension chain, weight lengths, and value finiteness. A loaded network
//! is connected and ready to train or predict.
//!
//! Networks using a [`Custom`](crate::ActivationKind::Custom) activation
//! carry raw function pointers and cannot be persisted.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Activation, ActivationKind, Cost, Error, Layer, LayerKind, Matrix, Network, Result,
};

/// Bumped whenever the serialized layout changes incompatibly.
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedLayer {
    pub kind: LayerKind,
    pub input_nodes: usize,
    pub output_nodes: usize,
    pub uses_bias: bool,
    pub bias: f64,
    pub activation: ActivationKind,
    /// Row-major, `output_nodes * input_nodes` values; absent for the input
    /// layer.
    pub weights: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedNetwork {
    pub format_version: u32,
    pub learning_rate: f64,
    pub cost: Cost,
    pub topology: Vec<usize>,
    pub layers: Vec<SerializedLayer>,
}

impl TryFrom<&Network> for SerializedNetwork {
    type Error = Error;

    fn try_from(net: &Network) -> Result<Self> {
        if !net.is_connected() {
            return Err(Error::NetworkNotConnected);
        }
        let layers = net
            .layers()
            .iter()
            .map(|layer| {
                if layer.activation().kind() == ActivationKind::Custom {
                    return Err(Error::CustomActivationNotSerializable);
                }
                Ok(SerializedLayer {
                    kind: layer.kind(),
                    input_nodes: layer.input_nodes(),
                    output_nodes: layer.output_nodes(),
                    uses_bias: layer.uses_bias(),
                    bias: layer.bias(),
                    activation: layer.activation().kind(),
                    weights: layer.weights().map(|w| w.values().to_vec()),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            format_version: MODEL_FORMAT_VERSION,
            learning_rate: net.learning_rate(),
            cost: net.cost(),
            topology: net.topology().to_vec(),
            layers,
        })
    }
}

impl SerializedNetwork {
    fn validate(&self) -> Result<()> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(Error::InvalidModelFile(format!(
                "unsupported format version {} (expected {MODEL_FORMAT_VERSION})",
                self.format_version
            )));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidModelFile(
                "learning rate must be finite and > 0".into(),
            ));
        }
        if self.layers.len() < 2 {
            return Err(Error::InvalidModelFile(
                "a network needs at least an input and an output layer".into(),
            ));
        }
        if self.topology.len() != self.layers.len() {
            return Err(Error::InvalidModelFile(
                "topology length does not match the layer count".into(),
            ));
        }

        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            let expected_kind = if i == 0 {
                LayerKind::Input
            } else if i == last {
                LayerKind::Output
            } else {
                LayerKind::Hidden
            };
            if layer.kind != expected_kind {
                return Err(Error::InvalidModelFile(format!(
                    "layer {i} has kind {:?}, expected {expected_kind:?}",
                    layer.kind
                )));
            }
            if layer.activation == ActivationKind::Custom {
                return Err(Error::InvalidModelFile(
                    "custom activations cannot be restored".into(),
                ));
            }
            if layer.output_nodes == 0 || self.topology[i] != layer.output_nodes {
                return Err(Error::InvalidModelFile(format!(
                    "layer {i} node count does not match the topology"
                )));
            }
            if !layer.bias.is_finite() || (!layer.uses_bias && layer.bias != 0.0) {
                return Err(Error::InvalidModelFile(format!("layer {i} bias is invalid")));
            }

            if i == 0 {
                if layer.weights.is_some() {
                    return Err(Error::InvalidModelFile(
                        "the input layer must not carry weights".into(),
                    ));
                }
                if layer.input_nodes != layer.output_nodes {
                    return Err(Error::InvalidModelFile(
                        "the input layer's dimensions must match".into(),
                    ));
                }
                continue;
            }

            if layer.input_nodes != self.layers[i - 1].output_nodes {
                return Err(Error::InvalidModelFile(format!(
                    "layer {i} input dimension breaks the chain"
                )));
            }
            match &layer.weights {
                None => {
                    return Err(Error::InvalidModelFile(format!("layer {i} is missing weights")));
                }
                Some(values) => {
                    if values.len() != layer.output_nodes * layer.input_nodes {
                        return Err(Error::InvalidModelFile(format!(
                            "layer {i} has {} weights, expected {}",
                            values.len(),
                            layer.output_nodes * layer.input_nodes
                        )));
                    }
                    if values.iter().any(|v| !v.is_finite()) {
                        return Err(Error::InvalidModelFile(format!(
                            "layer {i} contains a non-finite weight"
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<SerializedNetwork> for Network {
    type Error = Error;

    fn try_from(serialized: SerializedNetwork) -> Result<Self> {
        serialized.validate()?;

        let mut layers = Vec::with_capacity(serialized.layers.len());
        for layer in &serialized.layers {
            let activation = Activation::select(layer.activation, None, None)?;
            let weights = match &layer.weights {
                Some(values) => Some(Matrix::from_parts(
                    layer.output_nodes,
                    layer.input_nodes,
                    values.clone(),
                )?),
                None => None,
            };
            layers.push(Layer::restore(
                layer.kind,
                layer.input_nodes,
                layer.output_nodes,
                layer.uses_bias,
                layer.bias,
                activation,
                weights,
            ));
        }

        Ok(Network {
            layers,
            topology: serialized.topology,
            learning_rate: serialized.learning_rate,
            cost: serialized.cost,
            connected: true,
            input: None,
        })
    }
}

pub fn to_json_string(net: &Network) -> Result<String> {
    let serialized = SerializedNetwork::try_from(net)?;
    serde_json::to_string(&serialized).map_err(|e| Error::InvalidModelFile(e.to_string()))
}

pub fn to_json_string_pretty(net: &Network) -> Result<String> {
    let serialized = SerializedNetwork::try_from(net)?;
    serde_json::to_string_pretty(&serialized).map_err(|e| Error::InvalidModelFile(e.to_string()))
}

pub fn from_json_str(json: &str) -> Result<Network> {
    let serialized: SerializedNetwork =
        serde_json::from_str(json).map_err(|e| Error::InvalidModelFile(e.to_string()))?;
    Network::try_from(serialized)
}

pub fn save_json<P: AsRef<Path>>(net: &Network, path: P) -> Result<()> {
    fs::write(path, to_json_string_pretty(net)?)?;
    Ok(())
}

pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
    from_json_str(&fs::read_to_string(path)?)
}
