use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use corelib::{NodeRecord, RackKey, RingBuilder, TokenRing};
use planner::{Optimizer, PlannerConfig};

/// One datacenter with three racks of `per_rack` nodes, 16 tokens each.
fn ring(per_rack: usize) -> TokenRing {
    let nodes = per_rack * 3;
    let tokens = nodes * 16;
    let step = u64::MAX / tokens as u64;
    let records = (0..nodes).map(|n| {
        let rack = format!("R{}", n % 3 + 1);
        let owned = (0..16).map(move |t| {
            let offset = (t * nodes + n) as u64 * step + n as u64 * 13;
            i64::MIN.wrapping_add(offset as i64)
        });
        NodeRecord::new(format!("10.0.0.{n}"), "DC1", rack, owned)
    });
    RingBuilder::new().add_records(records).build().unwrap()
}

fn optimizer_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimizer");
    for per_rack in [4usize, 8, 12] {
        let ring = ring(per_rack);
        let rack = ring
            .topology()
            .rack_group(&RackKey::new("DC1", "R1"))
            .unwrap();
        for workers in [1usize, 4] {
            let config = PlannerConfig {
                workers,
                ..PlannerConfig::default()
            };
            group.bench_with_input(
                BenchmarkId::new(format!("remove_2_workers_{workers}"), per_rack),
                &rack,
                |b, rack| {
                    let optimizer = Optimizer::new(&ring, &config);
                    b.iter(|| optimizer.plan(black_box(rack), 2, 3).unwrap())
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, optimizer_bench);
criterion_main!(benches);
