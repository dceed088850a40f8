use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use farecast::{
    app::sample_record,
    preprocessing::{FeaturePipeline, HandleUnknown},
    record::{Column, TravelRecord},
    trainer::{FarePredictor, LinearRegressionTrainer, Regressor, TrainerConfig},
};

const AIRPORTS: [&str; 6] = ["ZQN", "AKL", "CHC", "WLG", "DUD", "NSN"];
const AIRLINES: [&str; 3] = ["Air New Zealand", "Jetstar", "Sounds Air"];

/// Synthetic training set covering every route and airline.
fn records() -> Vec<TravelRecord> {
    let mut out = Vec::new();
    for (i, from) in AIRPORTS.iter().enumerate() {
        for (j, to) in AIRPORTS.iter().enumerate() {
            if i == j {
                continue;
            }
            for (k, airline) in AIRLINES.iter().enumerate() {
                let fare = 100.0 + 30.0 * i as f64 + 20.0 * j as f64 + 50.0 * k as f64;
                out.push(TravelRecord::from_fields(
                    ["18/12/2019", *from, "10:20 AM", *to, "6:10 PM", "7h 50m", "(1 stop)", "", "", *airline],
                    fare,
                ));
            }
        }
    }
    out
}

fn fitted_pipeline(train: &[TravelRecord]) -> FeaturePipeline {
    let pipeline = FeaturePipeline::new(Column::DEFAULT_ENCODED.to_vec(), HandleUnknown::Ignore)
        .expect("valid columns");
    pipeline.fit(train).expect("Failed to fit pipeline");
    pipeline
}

fn bench_encode(c: &mut Criterion) {
    let train = records();
    let pipeline = fitted_pipeline(&train);
    let sample = sample_record();

    c.bench_function("encode_single", |b| {
        b.iter(|| black_box(pipeline.encode(black_box(&sample)).expect("encode")));
    });

    for n in [10, 100, 1000] {
        let batch: Vec<TravelRecord> = train.iter().cycle().take(n).cloned().collect();
        c.bench_with_input(BenchmarkId::new("encode_batch", n), &batch, |b, batch| {
            b.iter(|| black_box(pipeline.encode_batch(black_box(batch)).expect("encode")));
        });
    }
}

fn bench_predict(c: &mut Criterion) {
    let train = records();
    let pipeline = fitted_pipeline(&train);
    let x = pipeline.encode_batch(&train).expect("encode");
    let y: Vec<f64> = train.iter().map(|r| r.fare).collect();
    let model = LinearRegressionTrainer::new(TrainerConfig::default().max_epochs(50))
        .expect("valid config")
        .train(&x, &y)
        .expect("Failed to fit model");

    let features = pipeline.encode(&sample_record()).expect("encode");
    c.bench_function("predict_single", |b| {
        b.iter(|| black_box(model.predict(black_box(&features))));
    });
}

fn bench_train(c: &mut Criterion) {
    let train = records();
    let pipeline = fitted_pipeline(&train);
    let x = pipeline.encode_batch(&train).expect("encode");
    let y: Vec<f64> = train.iter().map(|r| r.fare).collect();
    let trainer = LinearRegressionTrainer::new(TrainerConfig::default().max_epochs(20).tolerance(0.0))
        .expect("valid config");

    c.bench_function("train_20_epochs", |b| {
        b.iter(|| black_box(trainer.train(black_box(&x), black_box(&y)).expect("train")));
    });
}

criterion_group!(benches, bench_encode, bench_predict, bench_train);
criterion_main!(benches);
