//! Activation functions.
//!
//! A non-input layer computes `z = W x (+ bias)` and applies its activation
//! elementwise: `y = f(z)`. Derivatives are expressed in terms of the cached
//! *post-activation* output `y`, so backprop never has to recompute or store
//! the raw pre-activation values:
//!
//! - sigmoid: `f'(y) = y * (1 - y)`
//! - tanh: `f'(y) = 1 - y^2`
//!
//! Custom activations supply both callbacks with the same convention.

use std::fmt;

use crate::{Error, Result};

/// Signature for activation callbacks and their derivatives.
pub type ActivationFn = fn(f64) -> f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivationKind {
    Sigmoid,
    Tanh,
    Custom,
}

/// An activation function paired with its derivative-on-output.
#[derive(Clone, Copy)]
pub struct Activation {
    kind: ActivationKind,
    f: ActivationFn,
    df: ActivationFn,
}

impl Activation {
    /// Resolve an activation selection.
    ///
    /// For `Sigmoid` and `Tanh` the built-in pair is returned and the
    /// callback arguments are ignored. For `Custom`, both callbacks are
    /// mandatory; `NoActivationCallbackGiven` is returned if either is
    /// missing.
    pub fn select(
        kind: ActivationKind,
        f: Option<ActivationFn>,
        df: Option<ActivationFn>,
    ) -> Result<Self> {
        match kind {
            ActivationKind::Sigmoid => Ok(Self::sigmoid()),
            ActivationKind::Tanh => Ok(Self::tanh()),
            ActivationKind::Custom => match (f, df) {
                (Some(f), Some(df)) => Ok(Self::custom(f, df)),
                _ => Err(Error::NoActivationCallbackGiven),
            },
        }
    }

    pub fn sigmoid() -> Self {
        Self {
            kind: ActivationKind::Sigmoid,
            f: sigmoid,
            df: sigmoid_prime,
        }
    }

    pub fn tanh() -> Self {
        Self {
            kind: ActivationKind::Tanh,
            f: f64::tanh,
            df: tanh_prime,
        }
    }

    pub fn custom(f: ActivationFn, df: ActivationFn) -> Self {
        Self {
            kind: ActivationKind::Custom,
            f,
            df,
        }
    }

    #[inline]
    pub fn kind(&self) -> ActivationKind {
        self.kind
    }

    /// Apply the activation to a raw pre-activation value.
    #[inline]
    pub(crate) fn apply(&self, x: f64) -> f64 {
        (self.f)(x)
    }

    /// Derivative evaluated at the already-activated output `y`.
    #[inline]
    pub(crate) fn derivative(&self, y: f64) -> f64 {
        (self.df)(y)
    }
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activation").field("kind", &self.kind).finish()
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid derivative as a function of the activated output.
fn sigmoid_prime(y: f64) -> f64 {
    y * (1.0 - y)
}

/// Tanh derivative as a function of the activated output.
fn tanh_prime(y: f64) -> f64 {
    1.0 - y * y
}
