//! A small feedforward neural-network library.
//!
//! Dense matrix algebra, a layer/network model, forward propagation and
//! backpropagation with stochastic gradient descent, pluggable activation
//! and cost functions, and a CSV dataset pipeline with feature typing and
//! train/test splitting.
//!
//! ```
//! use feedforward::{Activation, Cost, DataSet, Layer, LayerKind, Network};
//!
//! # fn main() -> feedforward::Result<()> {
//! let mut net = Network::build(0.5, Cost::Quadratic)?;
//! net.add_layer(Layer::build(LayerKind::Input, false, 2, Activation::sigmoid())?)?;
//! net.add_layer(Layer::build(LayerKind::Hidden, true, 8, Activation::sigmoid())?)?;
//! net.add_layer(Layer::build(LayerKind::Output, true, 1, Activation::sigmoid())?)?;
//! net.connect_with_seed(42)?;
//!
//! let data = DataSet::from_pairs(
//!     vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
//!     vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]],
//! )?;
//! net.train(&data, 1000)?;
//! let out = net.predict(&[1.0, 0.0])?;
//! assert_eq!(out.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! Randomness is always explicit: `connect_with_rng`/`connect_with_seed`
//! and `split_with_rng`/`split_with_seed` take the RNG, and `connect()` is
//! a thin convenience over the thread-local one. With fixed seeds, every
//! run is reproducible.
//!
//! The `serde` feature adds versioned JSON persistence of connected
//! networks in [`serde_model`].

mod activation;
mod builder;
mod cost;
mod data;
mod error;
mod layer;
mod matrix;
mod net;
#[cfg(feature = "serde")]
pub mod serde_model;
mod train;

pub use activation::{Activation, ActivationFn, ActivationKind};
pub use cost::Cost;
pub use data::{DataPair, DataSet, FeatureType};
pub use error::{Error, Result};
pub use layer::{Layer, LayerKind};
pub use matrix::Matrix;
pub use net::Network;
pub use train::TrainReport;
