use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use imadet_core::Response;
use imadet_staircase::{CalibrationSession, SessionConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Full two-track session where the participant answers "present" to every
/// grating and "absent" to every third noise trial.
fn run_session(seed: u64) -> i32 {
    let mut session =
        CalibrationSession::new(SessionConfig::default(), StdRng::seed_from_u64(seed)).unwrap();
    let mapping = session.response_mapping();
    let mut n = 0usize;
    while !session.is_complete() {
        for present in session.cycle_plan() {
            n += 1;
            let response = if present || n % 3 != 0 {
                Response::Present
            } else {
                Response::Absent
            };
            session.record_key(present, mapping.key_for(response)).unwrap();
        }
        session.evaluate().unwrap();
    }
    let visibility = session.finish().unwrap();
    visibility.left + visibility.right
}

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("calibration_session");
    group.sample_size(50);

    group.bench_function("two_tracks_default", |b| {
        b.iter_batched(
            || 42u64,
            |seed| black_box(run_session(seed)),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("stimulus_frames", |b| {
        let mut session =
            CalibrationSession::new(SessionConfig::default(), StdRng::seed_from_u64(1)).unwrap();
        b.iter(|| black_box(session.stimulus_frames(black_box(true)).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_session);
criterion_main!(benches);
