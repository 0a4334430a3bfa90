//! Fit sin(2*pi*x) over [0, 1] with a small tanh network and report the
//! cost on held-out points.
//!
//! Run with `cargo run --example sine`.

use std::f64::consts::TAU;

use feedforward::{Activation, Cost, DataPair, DataSet, Layer, LayerKind, Network};

fn sine_pairs(count: usize, offset: f64) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let mut inputs = Vec::with_capacity(count);
    let mut targets = Vec::with_capacity(count);
    for i in 0..count {
        let x = (i as f64 + offset) / count as f64;
        inputs.push(vec![x]);
        targets.push(vec![(TAU * x).sin()]);
    }
    (inputs, targets)
}

fn main() -> feedforward::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let (inputs, targets) = sine_pairs(64, 0.0);
    let data = DataSet::from_pairs(inputs, targets)?;

    let mut net = Network::build(0.1, Cost::Quadratic)?;
    net.add_layer(Layer::build(LayerKind::Input, false, 1, Activation::tanh())?)?;
    net.add_layer(Layer::build(LayerKind::Hidden, true, 16, Activation::tanh())?)?;
    net.add_layer(Layer::build(LayerKind::Output, true, 1, Activation::tanh())?)?;
    net.connect_with_seed(42)?;

    let report = net.train(&data, 5_000)?;
    println!("trained for {} epochs", report.epochs);

    // Held-out points fall between the training samples.
    let (test_inputs, test_targets) = sine_pairs(16, 0.5);
    let held_out: Vec<DataPair> = test_inputs
        .into_iter()
        .zip(test_targets)
        .map(|(input, target)| DataPair { input, target })
        .collect();
    let test_cost = net.evaluate(held_out.iter())?;
    println!("average cost on {} held-out points: {test_cost:.6}", held_out.len());

    for pair in held_out.iter().step_by(4) {
        let out = net.predict(&pair.input)?;
        println!(
            "sin(2*pi*{:.3}) -> {:.4} (want {:.4})",
            pair.input[0], out[0], pair.target[0]
        );
    }
    Ok(())
}
