//! Simulation tick throughput.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use marionette::animation::{AnimationClip, AnimationRole, ClipLibrary, RigTemplate};
use marionette::config::ScenarioConfig;
use marionette::simulation::Simulation;

fn soldier() -> Arc<RigTemplate> {
    Arc::new(RigTemplate::new(
        "Soldier",
        (0..24).map(|i| format!("Joint{i}")).collect(),
        ClipLibrary::from_clips([
            AnimationClip::new("Idle", 2.0),
            AnimationClip::new("Walk", 1.0),
            AnimationClip::new("Run", 0.5),
        ]),
    ))
}

fn build(count: usize) -> Simulation {
    let config = ScenarioConfig {
        count,
        ..ScenarioConfig::drift()
    };
    let mut sim = Simulation::from_config(&config).expect("valid scenario");
    let template = soldier();
    for entity in 0..count {
        sim.attach_rig(entity, &template).expect("entity in range");
    }
    sim
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_tick");
    for count in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut sim = build(count);
            let mut frame = 0_usize;
            b.iter(|| {
                frame += 1;
                if frame % 120 == 0 {
                    let role = AnimationRole::ALL[(frame / 120) % 3];
                    sim.set_active_role(frame % count, role).expect("entity in range");
                }
                sim.tick(black_box(1.0 / 60.0));
                black_box(sim.consume_dirty());
            });
        });
    }
    group.finish();
}

fn bench_pack(c: &mut Criterion) {
    let mut sim = build(10_000);
    sim.tick(1.0 / 60.0);
    c.bench_function("buffer_as_bytes_10k", |b| {
        b.iter(|| black_box(sim.buffer().as_bytes().len()));
    });
}

criterion_group!(benches, bench_tick, bench_pack);
criterion_main!(benches);
