use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nba::fixtures::{create_large_roster, create_mock_replay};
use nba::live::message::{parse_inbound, GameEvent, InboundMessage};
use nba::live::replay::ReplayState;
use nba::live::rules;
use nba::live::StatAggregator;
use tokio::time::{Duration, Instant};

/// Events from the scripted fixture game
fn fixture_events() -> Vec<GameEvent> {
    create_mock_replay()
        .into_iter()
        .filter_map(|(_, frame)| match parse_inbound(&frame) {
            InboundMessage::Event(event) => Some(event),
            _ => None,
        })
        .collect()
}

fn bench_rule_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("rules");
    let event_types = [
        "shot",
        "score-3",
        "three-pointer",
        "free_throw",
        "rebound",
        "assist",
        "foul",
        "steal",
    ];

    group.bench_function("evaluate_all_types", |b| {
        b.iter(|| {
            for event_type in event_types {
                black_box(rules::evaluate(black_box(event_type)));
            }
        })
    });

    group.finish();
}

fn bench_apply_event(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregator");
    let roster = create_large_roster(500);
    let last = GameEvent::new("Player499", "Number499", "three-pointer");
    let by_number = GameEvent::new("Nobody", "Known", "rebound").with_number("42");

    group.bench_function("apply_name_match_end_of_roster", |b| {
        let mut aggregator = StatAggregator::new(roster.clone(), ReplayState::default());
        let now = Instant::now();
        b.iter(|| {
            black_box(aggregator.apply_event(black_box(&last), now));
            aggregator.prune_deltas(now + Duration::from_secs(2));
        })
    });

    group.bench_function("apply_jersey_fallback", |b| {
        let mut aggregator = StatAggregator::new(roster.clone(), ReplayState::default());
        let now = Instant::now();
        b.iter(|| {
            black_box(aggregator.apply_event(black_box(&by_number), now));
            aggregator.prune_deltas(now + Duration::from_secs(2));
        })
    });

    group.finish();
}

fn bench_inbound_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("inbound");
    let frames: Vec<String> = create_mock_replay().into_iter().map(|(_, f)| f).collect();
    let events = fixture_events();

    group.bench_function("parse_fixture_frames", |b| {
        b.iter(|| {
            for frame in &frames {
                black_box(parse_inbound(black_box(frame)));
            }
        })
    });

    group.bench_function("replay_fixture_game", |b| {
        b.iter(|| {
            let mut aggregator = StatAggregator::new(
                nba::fixtures::create_mock_roster(),
                ReplayState::default(),
            );
            let now = Instant::now();
            for event in &events {
                black_box(aggregator.apply_event(event, now));
            }
            aggregator
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_rule_table,
    bench_apply_event,
    bench_inbound_frames
);
criterion_main!(benches);
