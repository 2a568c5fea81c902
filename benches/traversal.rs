use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ndslice::{from_slice, iota};

fn bench_iota_sum(c: &mut Criterion) {
    c.bench_function("iota_2d_sum", |b| {
        let s = iota::<i64, 2>([512, 512]);
        b.iter(|| {
            let total: i64 = black_box(s).iter().sum();
            black_box(total)
        })
    });
}

fn bench_transposed_traversal(c: &mut Criterion) {
    let data: Vec<i64> = (0..512 * 512).collect();
    c.bench_function("transposed_sum", |b| {
        b.iter(|| {
            let view = from_slice(black_box(&data), [512, 512]).unwrap();
            let total: i64 = view.transposed([1, 0]).iter().sum();
            black_box(total)
        })
    });
}

fn bench_window_reduction(c: &mut Criterion) {
    c.bench_function("slide_window_sum", |b| {
        let s = iota::<i64, 1>([1 << 16]);
        b.iter(|| {
            let slid = black_box(s).slide::<8, _, _>(|w: [i64; 8]| w.iter().sum::<i64>());
            let total: i64 = slid.iter().sum();
            black_box(total)
        })
    });
}

fn bench_diagonal(c: &mut Criterion) {
    let data: Vec<f64> = (0..1024 * 1024).map(|x| x as f64).collect();
    c.bench_function("diagonal_sum", |b| {
        b.iter(|| {
            let view = from_slice(black_box(&data), [1024, 1024]).unwrap();
            let total: f64 = view.diagonal().iter().sum();
            black_box(total)
        })
    });
}

criterion_group!(
    benches,
    bench_iota_sum,
    bench_transposed_traversal,
    bench_window_reduction,
    bench_diagonal
);
criterion_main!(benches);
