use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sa_nlu::{KeywordIntentClassifier, LexiconSentimentScorer};

const MESSAGES: &[&str] = &[
    "hello",
    "track my order ORD-5521",
    "show me dresses under 2000",
    "I want to speak to a manager about my broken order",
    "this is terrible, I want a refund right now",
    "can you recommend the best phone for photography",
    "what can you do",
    "",
];

fn bench_sentiment(c: &mut Criterion) {
    let scorer = LexiconSentimentScorer::default();
    c.bench_function("sentiment_1000_mixed", |b| {
        b.iter(|| {
            for _ in 0..125 {
                for msg in MESSAGES {
                    black_box(scorer.score(msg));
                }
            }
        })
    });
}

fn bench_intent(c: &mut Criterion) {
    let classifier = KeywordIntentClassifier::default();
    c.bench_function("intent_1000_mixed", |b| {
        b.iter(|| {
            for _ in 0..125 {
                for msg in MESSAGES {
                    black_box(classifier.classify(msg));
                }
            }
        })
    });

    let long = "show me something ".repeat(500);
    c.bench_function("intent_long_message", |b| {
        b.iter(|| black_box(classifier.classify(&long)))
    });
}

criterion_group!(benches, bench_sentiment, bench_intent);
criterion_main!(benches);
