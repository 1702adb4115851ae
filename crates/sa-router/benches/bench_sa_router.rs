use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sa_core::{AnalysisSource, DecisionContext, Intent, IntentResult, RoutingConfig, SentimentResult};
use sa_router::{evaluate_signals, FlowDecisionEngine, SignalInput};

fn bench_decide(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    let engine = FlowDecisionEngine::default();
    let ctx = DecisionContext::default();
    let messages = [
        "show me dresses under 2000",
        "where is my order ORD-1234",
        "I want to speak to a manager about my broken order",
        "this is terrible, I want a refund",
        "hello",
        "",
    ];

    c.bench_function("decide_1000_mixed_turns", |b| {
        b.iter(|| {
            rt.block_on(async {
                for i in 0..1000 {
                    let msg = messages[i % messages.len()];
                    black_box(engine.decide(&format!("user_{}", i % 50), msg, &ctx).await);
                }
            })
        })
    });
}

fn bench_signals(c: &mut Criterion) {
    let config = RoutingConfig::default();
    let sentiment = SentimentResult::new(-0.6, 1, AnalysisSource::Local);
    let intent = IntentResult::single(Intent::OrderTracking, 0.8, AnalysisSource::Local);
    c.bench_function("evaluate_signals", |b| {
        b.iter(|| {
            black_box(evaluate_signals(
                &SignalInput {
                    message: black_box("my order is late, get me a supervisor"),
                    original_message: None,
                    sentiment: &sentiment,
                    intent: &intent,
                    prior_failures: 2,
                },
                &config,
            ))
        })
    });
}

criterion_group!(benches, bench_decide, bench_signals);
criterion_main!(benches);
