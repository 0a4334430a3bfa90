use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feedforward::{Activation, Cost, DataSet, Layer, LayerKind, Matrix, Network};

fn build_net(topology: &[usize]) -> Network {
    let mut net = Network::build(0.3, Cost::Quadratic).unwrap();
    let last = topology.len() - 1;
    for (i, &nodes) in topology.iter().enumerate() {
        let kind = if i == 0 {
            LayerKind::Input
        } else if i == last {
            LayerKind::Output
        } else {
            LayerKind::Hidden
        };
        net.add_layer(Layer::build(kind, i != 0, nodes, Activation::sigmoid()).unwrap())
            .unwrap();
    }
    net.connect_with_seed(42).unwrap();
    net
}

fn bench_feed_forward(c: &mut Criterion) {
    let mut net = build_net(&[16, 32, 32, 4]);
    let input = Matrix::column(&vec![0.5; 16]).unwrap();

    c.bench_function("feed_forward 16-32-32-4", |b| {
        b.iter(|| net.feed_forward(black_box(&input)).unwrap())
    });
}

fn bench_backprop(c: &mut Criterion) {
    let mut net = build_net(&[16, 32, 32, 4]);
    let input = Matrix::column(&vec![0.5; 16]).unwrap();
    let expected = Matrix::column(&vec![1.0; 4]).unwrap();
    net.feed_forward(&input).unwrap();

    c.bench_function("backprop 16-32-32-4", |b| {
        b.iter(|| {
            net.feed_forward(black_box(&input)).unwrap();
            net.backprop(black_box(&expected)).unwrap();
        })
    });
}

fn bench_train_epoch(c: &mut Criterion) {
    let mut net = build_net(&[8, 16, 1]);
    let inputs: Vec<Vec<f64>> = (0..64).map(|i| vec![(i % 7) as f64 / 7.0; 8]).collect();
    let targets: Vec<Vec<f64>> = (0..64).map(|i| vec![(i % 2) as f64]).collect();
    let data = DataSet::from_pairs(inputs, targets).unwrap();

    c.bench_function("train 1 epoch, 64 pairs, 8-16-1", |b| {
        b.iter(|| net.train(black_box(&data), 1).unwrap())
    });
}

criterion_group!(benches, bench_feed_forward, bench_backprop, bench_train_epoch);
criterion_main!(benches);
