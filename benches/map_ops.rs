use std::hash::BuildHasherDefault;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fp_collections::Value;
use hashbrown::HashSet;
use rand::{distributions::Uniform, prelude::Distribution, Rng};
use rustc_hash::FxHasher;

fn lookup_test_dense<M: MapLike>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("Lookups (Dense, {})", M::NAME));
    let mut rng = rand::thread_rng();
    const BATCH_SIZE: usize = 1024;
    for map_size in [1u64 << 10, 1 << 17] {
        let map = M::build(0..map_size);

        group.throughput(Throughput::Elements(BATCH_SIZE as u64));
        group.bench_with_input(format!("hits, size={map_size}"), &map, |b, m| {
            let between = Uniform::from(0..map_size);
            let elts: Vec<u64> = (0..BATCH_SIZE).map(|_| between.sample(&mut rng)).collect();
            b.iter(|| {
                for elt in &elts {
                    black_box(m.lookup(*elt));
                }
            })
        });
        group.bench_with_input(format!("misses, size={map_size}"), &map, |b, m| {
            let between = Uniform::from(map_size..u64::MAX);
            let elts: Vec<u64> = (0..BATCH_SIZE).map(|_| between.sample(&mut rng)).collect();
            b.iter(|| {
                for elt in &elts {
                    black_box(m.lookup(*elt));
                }
            })
        });
    }
}

fn derive_test<M: MapLike>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("Derived versions ({})", M::NAME));
    let mut rng = rand::thread_rng();
    const BATCH_SIZE: usize = 256;
    for map_size in [1u64 << 10, 1 << 17] {
        let map = M::build(0..map_size);
        let between = Uniform::from(0..map_size * 2);
        let elts: Vec<u64> = (0..BATCH_SIZE).map(|_| between.sample(&mut rng)).collect();

        group.throughput(Throughput::Elements(BATCH_SIZE as u64));
        group.bench_function(format!("updated, size={map_size}"), |b| {
            b.iter(|| {
                for elt in &elts {
                    black_box(map.updated(*elt, *elt));
                }
            })
        });
        group.bench_function(format!("removed, size={map_size}"), |b| {
            b.iter(|| {
                for elt in &elts {
                    black_box(map.removed(*elt));
                }
            })
        });
    }
}

fn comparison<M: MapLike>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("Comparisons ({})", M::NAME));
    let mut rng = rand::thread_rng();
    for map_size in [1u64 << 10, 1 << 17] {
        // Generate `map_size` unique integers
        let mut set: HashSet<u64> = HashSet::with_capacity(map_size as usize);
        while set.len() < map_size as usize {
            set.insert(rng.gen());
        }
        let mut extra = rng.gen();
        while set.contains(&extra) {
            extra = rng.gen();
        }
        let map1 = M::build(set.iter().copied());
        let map2 = M::build(set.iter().copied());
        let first = set.iter().next().copied().unwrap_or_default();
        let map3 = map1.removed(first).updated(extra, extra);
        let map4 = map1.updated(extra, extra).removed(extra);

        group.bench_function(format!("equal, no sharing, size={map_size}"), |b| {
            b.iter(|| black_box(map1 == map2))
        });
        group.bench_function(format!("equal, sharing, size={map_size}"), |b| {
            b.iter(|| black_box(map1 == map4))
        });
        group.bench_function(format!("unequal, sharing, size={map_size}"), |b| {
            b.iter(|| black_box(map1 == map3))
        });
        group.bench_function(format!("unequal, no sharing, size={map_size}"), |b| {
            b.iter(|| black_box(map2 == map3))
        });
    }
}

fn value_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("Record keys (fp-collections)");
    let records: Vec<Value> = (0..1024i64)
        .map(|i| {
            Value::record([
                ("id", Value::Int(i)),
                ("name", Value::str(&format!("user-{i}"))),
                ("tags", Value::seq([Value::str("a"), Value::Int(i % 7)])),
            ])
        })
        .collect();
    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("collect", |b| {
        b.iter(|| black_box(fp_collections::HashSet::collect(records.iter().cloned())))
    });
    if let Ok(set) = fp_collections::HashSet::collect(records.iter().cloned()) {
        group.bench_function("contains", |b| {
            b.iter(|| {
                for r in &records {
                    black_box(set.contains(r));
                }
            })
        });
    }
}

/// Persistent-map operations as the benchmarks use them: every change yields
/// a new map.
trait MapLike: Clone + Eq {
    const NAME: &'static str;
    fn build(keys: impl Iterator<Item = u64>) -> Self;
    fn lookup(&self, k: u64) -> bool;
    fn updated(&self, k: u64, v: u64) -> Self;
    fn removed(&self, k: u64) -> Self;
}

criterion_group!(
    benches,
    comparison::<HashBrown>,
    comparison::<ImMap>,
    comparison::<FpHashMap>,
    lookup_test_dense::<HashBrown>,
    lookup_test_dense::<ImMap>,
    lookup_test_dense::<FpHashMap>,
    derive_test::<HashBrown>,
    derive_test::<ImMap>,
    derive_test::<FpHashMap>,
    value_keys,
);

criterion_main!(benches);

type HashBrown = hashbrown::HashMap<u64, u64, BuildHasherDefault<FxHasher>>;
type ImMap = im::HashMap<u64, u64, BuildHasherDefault<FxHasher>>;
type FpHashMap = fp_collections::HashMap<u64, u64>;

impl MapLike for HashBrown {
    const NAME: &'static str = "hashbrown (full copy)";
    fn build(keys: impl Iterator<Item = u64>) -> Self {
        keys.map(|k| (k, k)).collect()
    }

    fn lookup(&self, k: u64) -> bool {
        self.contains_key(&k)
    }

    fn updated(&self, k: u64, v: u64) -> Self {
        let mut next = self.clone();
        next.insert(k, v);
        next
    }

    fn removed(&self, k: u64) -> Self {
        let mut next = self.clone();
        next.remove(&k);
        next
    }
}

impl MapLike for ImMap {
    const NAME: &'static str = "im";
    fn build(keys: impl Iterator<Item = u64>) -> Self {
        keys.map(|k| (k, k)).collect()
    }

    fn lookup(&self, k: u64) -> bool {
        self.contains_key(&k)
    }

    fn updated(&self, k: u64, v: u64) -> Self {
        self.update(k, v)
    }

    fn removed(&self, k: u64) -> Self {
        self.without(&k)
    }
}

impl MapLike for FpHashMap {
    const NAME: &'static str = "fp-collections";
    fn build(keys: impl Iterator<Item = u64>) -> Self {
        // u64 keys always hash.
        fp_collections::HashMap::collect(keys.map(|k| (k, k))).unwrap_or_default()
    }

    fn lookup(&self, k: u64) -> bool {
        self.contains_key(&k)
    }

    fn updated(&self, k: u64, v: u64) -> Self {
        fp_collections::HashMap::updated(self, k, v).unwrap_or_else(|_| self.clone())
    }

    fn removed(&self, k: u64) -> Self {
        fp_collections::HashMap::removed(self, &k)
    }
}
