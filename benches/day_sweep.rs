use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rangerate::elements::source::{ElementSource, TleFileSource};
use rangerate::observers::ObserverLocation;
use rangerate::propagation::Sgp4Propagator;
use rangerate::report::TextSink;
use rangerate::time::CalendarTimestamp;
use rangerate::tracker::{NoPacing, SimulatedClock, SimulatedDay, Tracker, TrackerConfig};

fn setup() -> (Sgp4Propagator, ObserverLocation) {
    let set = TleFileSource::new("tests/data/sample.tle")
        .fetch(25445)
        .expect("sample element set");
    let propagator = Sgp4Propagator::adopt(&set).expect("adoptable element set");
    let observer = ObserverLocation::from_degrees(53.7694, -113.4560, 701.0, None)
        .expect("valid observer");
    (propagator, observer)
}

/// One pipeline pass: propagation, look angles, sub-point, Sun and shadow.
fn bench_single_tick(c: &mut Criterion) {
    let (propagator, observer) = setup();
    let mut tracker = Tracker::day_sweep(&propagator, &observer, TrackerConfig::default());
    let instant = CalendarTimestamp::new(2024, 10, 16, 14, 30, 0);

    c.bench_function("tracker/observe", |b| {
        b.iter(|| black_box(tracker.observe(black_box(&instant)).unwrap()))
    });
}

/// Last hour of a day sweep written to memory, 3 600 ticks.
fn bench_sweep_hour(c: &mut Criterion) {
    let (propagator, observer) = setup();
    let start = CalendarTimestamp::new(2024, 10, 16, 23, 0, 0);

    let mut group = c.benchmark_group("tracker/day_sweep");
    group.sample_size(10);
    group.bench_function("one_hour", |b| {
        b.iter(|| {
            let mut tracker = Tracker::day_sweep(&propagator, &observer, TrackerConfig::default());
            let mut day =
                SimulatedDay::from_clock(SimulatedClock::from_timestamp(start).unwrap());
            let mut sink = TextSink::new(Vec::with_capacity(1 << 20));
            black_box(tracker.run(&mut day, &mut NoPacing, &mut sink).unwrap())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_single_tick, bench_sweep_hour);
criterion_main!(benches);
