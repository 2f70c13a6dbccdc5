//! Benchmarks for the predicate engine, the R-tree and the overlay.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use flatgeom::rtree::{BulkItem, RTree};
use flatgeom::{ConstructOpts, Envelope, Geometry, LineString, Polygon, XY};

/// Deterministic xorshift source for benchmark inputs.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 % 10_000) as f64 / 100.0
    }
}

fn random_line_string(n: usize, seed: u64) -> Geometry {
    let mut rng = Rng(seed);
    let mut xys = Vec::with_capacity(n);
    let mut x = 0.0;
    for _ in 0..n {
        x += rng.next() / 50.0 + 0.01;
        xys.push(XY::new(x, rng.next()));
    }
    LineString::from_xys(&xys).unwrap().into()
}

fn random_boxes(n: usize, seed: u64) -> Vec<BulkItem> {
    let mut rng = Rng(seed);
    (0..n)
        .map(|i| {
            let (x, y) = (rng.next(), rng.next());
            let (w, h) = (rng.next() / 20.0, rng.next() / 20.0);
            BulkItem::new(
                Envelope::from_corners(XY::new(x, y), XY::new(x + w, y + h)),
                i as i64,
            )
        })
        .collect()
}

/// A jagged star-shaped polygon around a centre point.
fn star_polygon(points: usize, cx: f64, cy: f64, seed: u64) -> Geometry {
    let mut rng = Rng(seed);
    let mut xys = Vec::with_capacity(points + 1);
    for i in 0..points {
        let angle = i as f64 / points as f64 * std::f64::consts::TAU;
        let r = 10.0 + rng.next() / 10.0;
        xys.push(XY::new(cx + r * angle.cos(), cy + r * angle.sin()));
    }
    xys.push(xys[0]);
    let ring = LineString::from_xys(&xys).unwrap();
    Polygon::new(vec![ring], ConstructOpts::default()).unwrap().into()
}

fn bench_sweep_intersects(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep_intersects");
    for n in [100, 1000, 5000] {
        let a = random_line_string(n, 1);
        let b = random_line_string(n, 2);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("segments", n), &(&a, &b), |bch, &(a, b)| {
            bch.iter(|| black_box(a).intersects(black_box(b)))
        });
    }
    group.finish();
}

fn bench_rtree(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree");
    for n in [1000, 10_000, 50_000] {
        let items = random_boxes(n, 42);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("bulk_load", n), &items, |bch, items| {
            bch.iter(|| RTree::bulk_load(black_box(items.clone())))
        });

        let tree = RTree::bulk_load(items.clone());
        let query = Envelope::from_xy(XY::new(50.0, 50.0));
        group.bench_with_input(BenchmarkId::new("nearest_10", n), &tree, |bch, tree| {
            bch.iter(|| {
                let mut seen = 0;
                tree.priority_search(black_box(query), |_| {
                    seen += 1;
                    seen < 10
                });
                seen
            })
        });
    }
    group.finish();
}

fn bench_overlay_union(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay_union");
    for n in [16, 64, 256] {
        let a = star_polygon(n, 0.0, 0.0, 7);
        let b = star_polygon(n, 5.0, 3.0, 8);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("star", n), &(&a, &b), |bch, &(a, b)| {
            bch.iter(|| black_box(a).union(black_box(b)).unwrap())
        });
    }
    group.finish();
}

fn bench_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance");
    for n in [100, 1000, 5000] {
        let a = random_line_string(n, 3);
        let b = random_line_string(n, 4);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("line_line", n), &(&a, &b), |bch, &(a, b)| {
            bch.iter(|| black_box(a).distance(black_box(b)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_sweep_intersects,
    bench_rtree,
    bench_overlay_union,
    bench_distance
);
criterion_main!(benches);
