use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use math_audio_decomp::{
    ColumnOrdering, CscMatrix, DecompConfig, lup_dense, lup_sparse, qr_dense, svd_dense,
};
use ndarray::Array2;

fn test_matrix(n: usize) -> Array2<f64> {
    Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            4.0 + i as f64 * 0.01
        } else {
            ((i * 7 + j * 13) % 11) as f64 / 11.0 - 0.5
        }
    })
}

/// 2-D five-point Laplacian on a `side × side` grid
fn laplacian(side: usize) -> CscMatrix<f64> {
    let n = side * side;
    let mut triplets = Vec::with_capacity(5 * n);
    for i in 0..side {
        for j in 0..side {
            let k = i * side + j;
            triplets.push((k, k, 4.0));
            if i > 0 {
                triplets.push((k, k - side, -1.0));
            }
            if i + 1 < side {
                triplets.push((k, k + side, -1.0));
            }
            if j > 0 {
                triplets.push((k, k - 1, -1.0));
            }
            if j + 1 < side {
                triplets.push((k, k + 1, -1.0));
            }
        }
    }
    CscMatrix::from_triplets(n, n, triplets).unwrap()
}

fn bench_dense(c: &mut Criterion) {
    let config = DecompConfig::default();
    let mut group = c.benchmark_group("dense");

    for n in [16, 64, 128] {
        let a = test_matrix(n);
        group.bench_with_input(BenchmarkId::new("lup", n), &a, |b, a| {
            b.iter(|| lup_dense(black_box(a.view())))
        });
        group.bench_with_input(BenchmarkId::new("qr", n), &a, |b, a| {
            b.iter(|| qr_dense(black_box(a.view()), &config))
        });
        if n <= 64 {
            group.bench_with_input(BenchmarkId::new("svd", n), &a, |b, a| {
                b.iter(|| svd_dense(black_box(a.view()), &config))
            });
        }
    }
    group.finish();
}

fn bench_sparse_lu(c: &mut Criterion) {
    let a = laplacian(24);
    let mut group = c.benchmark_group("sparse_lu");

    for code in 0..=3 {
        let ordering = ColumnOrdering::from_code(code).unwrap();
        group.bench_with_input(BenchmarkId::new("ordering", code), &a, |b, a| {
            b.iter(|| lup_sparse(black_box(a), ordering, 1.0))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dense, bench_sparse_lu);
criterion_main!(benches);
