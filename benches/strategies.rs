use std::time::Duration;

use criterion::{
    criterion_group, criterion_main, measurement::WallTime, Bencher, BenchmarkId, Criterion,
    SamplingMode,
};
use lumacount::{count, synth, RasterBuffer, Threshold, TileSize, WorkerCount};

fn images() -> Vec<(String, RasterBuffer)> {
    let cell = TileSize::square(8).unwrap();
    [512, 1024, 2048]
        .into_iter()
        .map(|size| {
            (
                format!("half_{size}x{size}"),
                synth::half_solid_checkerboard(size, size, cell).unwrap(),
            )
        })
        .collect()
}

fn bench(c: &mut Criterion, group: &str, mut f: impl FnMut(&mut Bencher<WallTime>, &RasterBuffer)) {
    let mut group = c.benchmark_group(group);
    group
        .sample_size(30)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_millis(500));

    for (name, image) in &images() {
        group.bench_with_input(BenchmarkId::from_parameter(name), image, &mut f);
    }
}

fn predicate(sample: u8) -> bool {
    Threshold::DEFAULT.matches(sample)
}

fn sequential(c: &mut Criterion) {
    bench(c, "sequential", |b, image| {
        b.iter(|| count::sequential(image, predicate))
    });
}

fn columns_par(c: &mut Criterion) {
    for workers in [2usize, 4, 8] {
        bench(c, &format!("columns_par_{workers}"), |b, image| {
            let workers = WorkerCount::try_from(workers).unwrap();
            b.iter(|| count::columns_par(image, workers, predicate).unwrap())
        });
    }
}

fn tiles_par(c: &mut Criterion) {
    let tile = TileSize::default();
    for workers in [2usize, 4, 8] {
        bench(c, &format!("tiles_par_{workers}"), |b, image| {
            let workers = WorkerCount::try_from(workers).unwrap();
            b.iter(|| count::tiles_par(image, workers, tile, predicate).unwrap())
        });
    }
}

fn tiles_par_small_tiles(c: &mut Criterion) {
    let tile = TileSize::square(16).unwrap();
    bench(c, "tiles_par_4_16x16", |b, image| {
        let workers = WorkerCount::try_from(4).unwrap();
        b.iter(|| count::tiles_par(image, workers, tile, predicate).unwrap())
    });
}

criterion_group!(benches, sequential, columns_par, tiles_par, tiles_par_small_tiles);
criterion_main!(benches);
