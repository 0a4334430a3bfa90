//! Train a 2-8-1 network on the XNOR truth table and print its predictions.
//!
//! Run with `cargo run --example xor`.

use feedforward::{Activation, Cost, DataSet, Layer, LayerKind, Network};

fn main() -> feedforward::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let mut net = Network::build(0.5, Cost::Quadratic)?;
    net.add_layer(Layer::build(LayerKind::Input, false, 2, Activation::sigmoid())?)?;
    net.add_layer(Layer::build(LayerKind::Hidden, true, 8, Activation::sigmoid())?)?;
    net.add_layer(Layer::build(LayerKind::Output, true, 1, Activation::sigmoid())?)?;
    net.connect_with_seed(42)?;

    let data = DataSet::from_pairs(
        vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ],
        vec![vec![1.0], vec![0.0], vec![0.0], vec![1.0]],
    )?;

    let report = net.train(&data, 30_000)?;
    println!("trained for {} epochs", report.epochs);

    for pair in data.training_pairs() {
        let out = net.predict(&pair.input)?;
        println!(
            "{:?} -> {:.4} (want {})",
            pair.input, out[0], pair.target[0]
        );
    }
    Ok(())
}
