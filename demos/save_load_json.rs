//! Train a network, save it as JSON, load it back, and show that the two
//! agree.
//!
//! Run with `cargo run --example save_load_json --features serde`.

use feedforward::serde_model;
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
    net.train(&data, 10_000)?;

    let path = std::env::temp_dir().join("feedforward-xnor.json");
    serde_model::save_json(&net, &path)?;
    println!("saved model to {}", path.display());

    let mut restored = serde_model::load_json(&path)?;
    for pair in data.training_pairs() {
        let a = net.predict(&pair.input)?;
        let b = restored.predict(&pair.input)?;
        assert_eq!(a, b);
        println!("{:?} -> {:.4} (restored {:.4})", pair.input, a[0], b[0]);
    }
    println!("original and restored networks agree");
    Ok(())
}
