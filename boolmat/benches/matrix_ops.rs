use boolmat::{
    BitRow, BoolMatrix, BoolMatrix256, BoolMatrix64, BoolMatrix8, PackedRow, ParallelMatrixOps,
};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::SmallRng, SeedableRng};
use std::hint::black_box;

fn bench_mul<R: PackedRow, const N: usize>(c: &mut Criterion, name: &str) {
    let mut rng = SmallRng::seed_from_u64(1);
    let m1 = BoolMatrix::<R, N>::random(&mut rng);
    let m2 = BoolMatrix::<R, N>::random(&mut rng);

    let mut group = c.benchmark_group(name);
    group.bench_function("packed", |b| b.iter(|| black_box(&m1) * black_box(&m2)));
    group.bench_function("naive", |b| {
        b.iter(|| black_box(&m1).naive_mul(black_box(&m2)))
    });
    group.bench_function("parallel", |b| {
        b.iter(|| black_box(&m1).par_mul(black_box(&m2)))
    });
    group.finish();
}

fn matrix_mul(c: &mut Criterion) {
    bench_mul::<u8, 8>(c, "mul 8x8");
    bench_mul::<u64, 64>(c, "mul 64x64");
    bench_mul::<BitRow<4>, 256>(c, "mul 256x256");
}

fn closure(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(1);
    let m64 = BoolMatrix64::random(&mut rng) & BoolMatrix64::random(&mut rng);
    let m256 = BoolMatrix256::build(|i, j| j == (i * 7 + 1) % 256);
    c.bench_function("transitive_closure 64x64", |b| {
        b.iter(|| black_box(&m64).transitive_closure())
    });
    c.bench_function("transitive_closure 256x256", |b| {
        b.iter(|| black_box(&m256).transitive_closure())
    });
    c.bench_function("index_and_period 8x8", |b| {
        let m = BoolMatrix8::build(|i, j| j == (i + 1) % 8);
        b.iter(|| black_box(&m).index_and_period())
    });
}

criterion_group!(benches, matrix_mul, closure);
criterion_main!(benches);
