use criterion::{black_box, criterion_group, criterion_main, Criterion};
use heightfield::terrain::{
    blur_grid, GaussianKernel, HeightmapConfig, HeightmapPipeline, NoiseConfig, NoiseLattice,
    TerrainMesh,
};

fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("Value Noise");

    for &n in &[64, 256, 512] {
        group.bench_function(format!("lattice_{}", n), |b| {
            b.iter(|| black_box(NoiseLattice::generate(42, n, n)));
        });

        group.bench_function(format!("fbm_grid_{}", n), |b| {
            let config = HeightmapConfig::new(n, n, NoiseConfig::default());
            let pipeline = HeightmapPipeline::new(config).unwrap();
            b.iter(|| black_box(pipeline.raw_matrix()));
        });
    }

    group.finish();
}

fn bench_blur(c: &mut Criterion) {
    let mut group = c.benchmark_group("Gaussian Blur");

    for &radius in &[2, 5, 10] {
        group.bench_function(format!("blur_256_r{}", radius), |b| {
            let pipeline =
                HeightmapPipeline::new(HeightmapConfig::new(256, 256, NoiseConfig::default()))
                    .unwrap();
            let grid = pipeline.remapped_matrix().unwrap();
            let kernel = GaussianKernel::from_radius(radius, 2.6).unwrap();
            b.iter(|| black_box(blur_grid(&grid, &kernel)));
        });
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Heightmap Pipeline");

    group.bench_function("noise_matrix_default", |b| {
        let pipeline = HeightmapPipeline::new(HeightmapConfig::default()).unwrap();
        b.iter(|| black_box(pipeline.noise_matrix()));
    });

    group.bench_function("noise_map_default", |b| {
        let pipeline = HeightmapPipeline::new(HeightmapConfig::default()).unwrap();
        b.iter(|| black_box(pipeline.noise_map()));
    });

    group.bench_function("mesh_default", |b| {
        let matrix = HeightmapPipeline::new(HeightmapConfig::default())
            .unwrap()
            .noise_matrix()
            .unwrap();
        b.iter(|| black_box(TerrainMesh::from_grid(&matrix, 10.0)));
    });

    group.finish();
}

criterion_group!(benches, bench_noise, bench_blur, bench_pipeline);
criterion_main!(benches);
