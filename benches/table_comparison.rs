use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownMap;
use primap::Method;
use primap::PrimitiveMap;
use primap::Scalar;
use primap::compress::Compressible;
use rand::Rng;
use rand::SeedableRng;
use rand::distr;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;

/// A key width the benchmarks can draw random, non-sentinel keys for.
trait BenchKey: Scalar + core::hash::Hash {
    fn random(rng: &mut SmallRng) -> Self;
}

impl BenchKey for i32 {
    fn random(rng: &mut SmallRng) -> Self {
        rng.random_range(1..i32::MAX)
    }
}

impl BenchKey for i64 {
    fn random(rng: &mut SmallRng) -> Self {
        rng.random_range(1..i64::MAX)
    }
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
    (1 << 18),
    (1 << 20),
];

fn distinct_keys<K: BenchKey>(count: usize, rng: &mut SmallRng) -> Vec<K> {
    let mut seen = HashbrownMap::with_capacity(count);
    let mut keys = Vec::with_capacity(count);
    while keys.len() < count {
        let key = K::random(rng);
        if seen.insert(key, ()).is_none() {
            keys.push(key);
        }
    }
    keys
}

fn filled<K: BenchKey>(keys: &[K]) -> PrimitiveMap<K, i64> {
    let mut map = PrimitiveMap::with_capacity(0);
    for (i, &key) in keys.iter().enumerate() {
        map.put(key, i as i64 + 1);
    }
    map
}

fn bench_insert_random<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "insert_random_{}",
        core::any::type_name::<K>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = SmallRng::from_os_rng();
    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = distinct_keys::<K>(size, &mut rng);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("primap/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = PrimitiveMap::<K, i64>::with_capacity(0);
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.put(key, i as i64 + 1));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| {
                    let mut map = HashbrownMap::<K, i64>::with_capacity(0);
                    for (i, key) in keys.into_iter().enumerate() {
                        black_box(map.insert(key, i as i64 + 1));
                    }
                    black_box(map)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_hit_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = SmallRng::from_os_rng();
    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = distinct_keys::<K>(size, &mut rng);
        let probe = filled(&keys);
        let mut frozen = probe.clone();
        frozen.compress(Method::Freeze);
        let reference: HashbrownMap<K, i64> = probe.iter().collect();

        let mut lookups = keys.clone();
        lookups.shuffle(&mut rng);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("primap/{size}"), |b| {
            b.iter(|| {
                for &key in lookups.iter() {
                    black_box(probe.get(key));
                }
            })
        });

        group.bench_function(format!("primap_frozen/{size}"), |b| {
            b.iter(|| {
                for &key in lookups.iter() {
                    black_box(frozen.get(key));
                }
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in lookups.iter() {
                    black_box(reference.get(key));
                }
            })
        });
    }

    group.finish();
}

fn bench_find_miss<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_miss_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = SmallRng::from_os_rng();
    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = distinct_keys::<K>(size * 2, &mut rng);
        let (present, absent) = keys.split_at(size);
        let probe = filled(present);
        let reference: HashbrownMap<K, i64> = probe.iter().collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("primap/{size}"), |b| {
            b.iter(|| {
                for &key in absent.iter() {
                    black_box(probe.find(key));
                }
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in absent.iter() {
                    black_box(reference.get(key));
                }
            })
        });
    }

    group.finish();
}

fn bench_remove<K: BenchKey, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("remove_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = SmallRng::from_os_rng();
    for &size in SIZES[..=MAX_SIZE].iter() {
        let keys = distinct_keys::<K>(size, &mut rng);
        let probe = filled(&keys);
        let reference: HashbrownMap<K, i64> = probe.iter().collect();

        let mut removals = keys.clone();
        removals.shuffle(&mut rng);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("primap/{size}"), |b| {
            b.iter_batched(
                || probe.clone(),
                |mut map| {
                    for &key in removals.iter() {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::LargeInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || reference.clone(),
                |mut map| {
                    for key in removals.iter() {
                        black_box(map.remove(key));
                    }
                    black_box(map)
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

#[derive(Clone, Copy)]
enum Operation {
    Insert,
    Remove,
    Find,
}

fn bench_mixed_probabilistic_zipf<const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_probabilistic_zipf_i64");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    const KEY_SPACE_MULTIPLIER: f32 = 2.0;

    for &size in SIZES[..=MAX_SIZE].iter() {
        let mut rng = SmallRng::from_os_rng();
        let insert_distr = Zipf::new(size as f32, 1.0).unwrap();
        let find_remove_distr = Zipf::new(size as f32 * KEY_SPACE_MULTIPLIER, 1.0).unwrap();

        // Zipf samples start at 1, so none of them is a sentinel.
        let operations = (0..size * 3)
            .map(|_| {
                let op_choice: f64 = rng.sample(distr::Uniform::new(0.0, 1.0).unwrap());
                if op_choice < 0.5 {
                    (Operation::Find, rng.sample(find_remove_distr) as i64)
                } else if op_choice < 0.75 {
                    (Operation::Insert, rng.sample(insert_distr) as i64)
                } else {
                    (Operation::Remove, rng.sample(find_remove_distr) as i64)
                }
            })
            .collect::<Vec<(Operation, i64)>>();

        group.throughput(Throughput::Elements(size as u64 * 3));
        group.bench_function(format!("primap/{size}"), |b| {
            b.iter(|| {
                let mut map = PrimitiveMap::<i64, i64>::with_capacity(0);
                for &(operation, key) in operations.iter() {
                    match operation {
                        Operation::Insert => {
                            black_box(map.put(key, key));
                        }
                        Operation::Remove => {
                            black_box(map.remove(key));
                        }
                        Operation::Find => {
                            black_box(map.find(key));
                        }
                    }
                }
                black_box(map)
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                let mut map = HashbrownMap::<i64, i64>::with_capacity(0);
                for &(operation, key) in operations.iter() {
                    match operation {
                        Operation::Insert => {
                            black_box(map.insert(key, key));
                        }
                        Operation::Remove => {
                            black_box(map.remove(&key));
                        }
                        Operation::Find => {
                            black_box(map.get(&key));
                        }
                    }
                }
                black_box(map)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<i32, 5>,
    bench_insert_random::<i64, 5>,
    bench_find_hit::<i32, 5>,
    bench_find_hit::<i64, 5>,
    bench_find_miss::<i64, 5>,
    bench_remove::<i64, 4>,
    bench_mixed_probabilistic_zipf::<5>,
);

criterion_main!(benches);
