use chained_collections::hash::concurrent::{prelude::*, Map, Set};
use chained_collections::queue::Queue;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::Rng;
use rand::seq::SliceRandom;
use std::hint::black_box;
use std::sync::{Arc, Barrier};
use std::thread;

const SAMPLE_SIZE: usize = 10_000;
const BUCKETS: usize = 1_031;

#[derive(Clone, Copy)]
enum Workload {
    WriteHeavy, // 80% writes, 20% reads
    ReadHeavy,  // 20% writes, 80% reads
    Mixed,      // 50% writes, 50% reads
}

impl Workload {
    fn write_ratio(self) -> u32 {
        match self {
            Workload::WriteHeavy => 80,
            Workload::ReadHeavy => 20,
            Workload::Mixed => 50,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Workload::WriteHeavy => "write_heavy",
            Workload::ReadHeavy => "read_heavy",
            Workload::Mixed => "mixed",
        }
    }
}

const WORKLOADS: [Workload; 3] = [Workload::Mixed, Workload::ReadHeavy, Workload::WriteHeavy];

fn shuffled_keys() -> Arc<Vec<String>> {
    let mut keys: Vec<String> = (0..SAMPLE_SIZE).map(|i| format!("key{i}")).collect();
    keys.shuffle(&mut rand::rng());
    Arc::new(keys)
}

// Writes alternate between replacing and removing, so chains keep changing
// shape under the readers.
fn map_benchmark(c: &mut Criterion, threads: usize, workload: Workload) {
    let mut group = c.benchmark_group(format!("Map_{threads}_threads"));

    let map: Arc<Map<String, String>> = Arc::new(Map::with_buckets(BUCKETS));
    for i in 0..SAMPLE_SIZE {
        map.insert(format!("key{i}"), format!("value{i}"));
    }

    group.throughput(Throughput::Elements(SAMPLE_SIZE as u64));
    group.bench_function(BenchmarkId::new(workload.name(), SAMPLE_SIZE), |b| {
        b.iter_with_setup(
            || (Arc::new(Barrier::new(threads)), shuffled_keys()),
            |(barrier, keys)| {
                thread::scope(|s| {
                    for _ in 0..threads {
                        let map = &map;
                        let barrier = Arc::clone(&barrier);
                        let keys = Arc::clone(&keys);

                        s.spawn(move || {
                            let mut rng = rand::rng();
                            barrier.wait();
                            for i in 0..SAMPLE_SIZE / threads {
                                let key = &keys[i % keys.len()];
                                if rng.random_range(0..100) < workload.write_ratio() {
                                    if i % 2 == 0 {
                                        map.insert_or_replace(key.clone(), format!("new_value{i}"));
                                    } else {
                                        black_box(map.remove(key));
                                    }
                                } else {
                                    black_box(map.view(key, |_, v| v.len()));
                                }
                            }
                        });
                    }
                });
            },
        );
    });

    group.finish();
}

fn set_benchmark(c: &mut Criterion, threads: usize, workload: Workload) {
    let mut group = c.benchmark_group(format!("Set_{threads}_threads"));

    let set: Arc<Set<u64>> = Arc::new(Set::with_buckets(BUCKETS));
    for i in 0..SAMPLE_SIZE as u64 {
        set.insert(i);
    }

    group.throughput(Throughput::Elements(SAMPLE_SIZE as u64));
    group.bench_function(BenchmarkId::new(workload.name(), SAMPLE_SIZE), |b| {
        b.iter_with_setup(
            || Arc::new(Barrier::new(threads)),
            |barrier| {
                thread::scope(|s| {
                    for _ in 0..threads {
                        let set = &set;
                        let barrier = Arc::clone(&barrier);

                        s.spawn(move || {
                            let mut rng = rand::rng();
                            barrier.wait();
                            for _ in 0..SAMPLE_SIZE / threads {
                                let value = rng.random_range(0..2 * SAMPLE_SIZE as u64);
                                if rng.random_range(0..100) < workload.write_ratio() {
                                    if value % 2 == 0 {
                                        black_box(set.insert(value));
                                    } else {
                                        black_box(set.remove(&value));
                                    }
                                } else {
                                    black_box(set.contains(&value));
                                }
                            }
                        });
                    }
                });
            },
        );
    });

    group.finish();
}

fn resize_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Map_resize");
    group.throughput(Throughput::Elements(SAMPLE_SIZE as u64));

    for target in [BUCKETS * 2, BUCKETS * 8] {
        group.bench_function(BenchmarkId::from_parameter(target), |b| {
            b.iter_with_setup(
                || {
                    let map: Map<u64, u64> = Map::with_buckets(BUCKETS);
                    for i in 0..SAMPLE_SIZE as u64 {
                        map.insert(i, i);
                    }
                    map
                },
                |mut map| {
                    map.resize(target);
                    black_box(map.len())
                },
            );
        });
    }

    group.finish();
}

fn queue_benchmark(c: &mut Criterion, pairs: usize) {
    let mut group = c.benchmark_group(format!("Queue_{pairs}_pairs"));
    group.throughput(Throughput::Elements(SAMPLE_SIZE as u64));

    group.bench_function(BenchmarkId::new("push_pop", SAMPLE_SIZE), |b| {
        b.iter(|| {
            let queue = Queue::new();
            let per_producer = SAMPLE_SIZE / pairs;
            thread::scope(|s| {
                for p in 0..pairs {
                    let queue = &queue;
                    s.spawn(move || {
                        for i in 0..per_producer {
                            queue.push(p * per_producer + i);
                        }
                    });
                    s.spawn(move || {
                        for _ in 0..per_producer {
                            black_box(queue.wait_and_pop());
                        }
                    });
                }
            });
        });
    });

    group.finish();
}

fn map_pressure(c: &mut Criterion) {
    for threads in [2, 4, 8] {
        for workload in WORKLOADS {
            map_benchmark(c, threads, workload);
        }
    }
}

fn set_pressure(c: &mut Criterion) {
    for threads in [2, 4, 8] {
        for workload in WORKLOADS {
            set_benchmark(c, threads, workload);
        }
    }
}

fn queue_pressure(c: &mut Criterion) {
    for pairs in [1, 2, 4] {
        queue_benchmark(c, pairs);
    }
}

criterion_group!(benches, map_pressure, set_pressure, resize_benchmark, queue_pressure);
criterion_main!(benches);
