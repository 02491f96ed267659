// Criterion benchmarks for the Spam Classifier

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spam_classifier::core::{Classifier, TfidfVectorizer, VectorizerArtifact};
use spam_classifier::services::{ArtifactPair, PredictionService};

const VECTORIZER_JSON: &str = include_str!("../tests/fixtures/tfidf_vectorizer.json");
const CLASSIFIER_JSON: &str = include_str!("../tests/fixtures/spam_classifier_model.json");

const SPAM_TEXT: &str = "URGENT! You've won $1,000,000! Click here to claim your prize NOW! \
    This is a limited time offer. Call 1-800-123-4567 immediately for your free gift!";

fn load_pair() -> ArtifactPair {
    let artifact: VectorizerArtifact = serde_json::from_str(VECTORIZER_JSON).unwrap();
    let classifier: Classifier = serde_json::from_str(CLASSIFIER_JSON).unwrap();
    ArtifactPair::new(
        Some(classifier),
        Some(TfidfVectorizer::from_artifact(artifact).unwrap()),
    )
}

fn bench_transform(c: &mut Criterion) {
    let vectorizer = load_pair().vectorizer.unwrap();

    c.bench_function("tfidf_transform", |b| {
        b.iter(|| vectorizer.transform(black_box(&[SPAM_TEXT])).unwrap());
    });
}

fn bench_predict(c: &mut Criterion) {
    let service = PredictionService::new(load_pair(), 0);

    let mut group = c.benchmark_group("predict");
    for repeat in [1usize, 10, 100].iter() {
        let text = SPAM_TEXT.repeat(*repeat);
        group.bench_with_input(BenchmarkId::from_parameter(repeat), &text, |b, text| {
            b.iter(|| service.predict(black_box(text)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_transform, bench_predict);
criterion_main!(benches);
