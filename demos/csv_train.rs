//! Load a CSV dataset, pick input features, split it, and train against the
//! held-out test view.
//!
//! Run with `RUST_LOG=info cargo run --example csv_train` to watch the test
//! cost fall per epoch.

use feedforward::{Activation, Cost, DataSet, Layer, LayerKind, Network};

// Noisy samples of y = x1 XOR-ish blend; the "label" column is a text note
// that the pipeline drops automatically.
const CSV: &str = "\
x1,x2,label,y
0.05,0.10,low-low,0.95
0.00,0.95,low-high,0.05
0.90,0.05,high-low,0.10
1.00,0.90,high-high,0.90
0.10,0.00,low-low,0.90
0.05,1.00,low-high,0.10
0.95,0.10,high-low,0.05
0.90,1.00,high-high,0.95
0.00,0.05,low-low,1.00
0.10,0.90,low-high,0.00
1.00,0.00,high-low,0.00
0.95,0.95,high-high,1.00
";

fn main() -> feedforward::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut data = DataSet::from_csv_reader(CSV.as_bytes())?;
    println!("features: {:?}", data.feature_names());

    data.set_input_features(&["x1", "x2"])?;
    data.split_with_seed(0.75, 9)?;
    println!(
        "{} pairs: {} training, {} test",
        data.len(),
        data.training_len(),
        data.test_len()
    );

    let mut net = Network::build(0.5, Cost::Quadratic)?;
    net.add_layer(Layer::build(LayerKind::Input, false, 2, Activation::sigmoid())?)?;
    net.add_layer(Layer::build(LayerKind::Hidden, true, 8, Activation::sigmoid())?)?;
    net.add_layer(Layer::build(LayerKind::Output, true, 1, Activation::sigmoid())?)?;
    net.connect_with_seed(42)?;

    let report = net.train(&data, 5_000)?;
    if let Some(cost) = report.final_test_cost {
        println!("final average test cost: {cost:.6}");
    }

    for pair in data.test_pairs() {
        let out = net.predict(&pair.input)?;
        println!(
            "{:?} -> {:.4} (want {})",
            pair.input, out[0], pair.target[0]
        );
    }
    Ok(())
}
