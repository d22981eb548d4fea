use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rect_binpack::prelude::*;

fn generate_rects(count: usize, min_side: u32, max_side: u32) -> Vec<(u32, u32)> {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EED);
    (0..count)
        .map(|_| (rng.gen_range(min_side..=max_side), rng.gen_range(min_side..=max_side)))
        .collect()
}

fn pack_all(cfg: PackerConfig, rects: &[(u32, u32)]) -> PackSummary {
    let mut packer = Packer::new(cfg).expect("valid config");
    for (i, &(w, h)) in rects.iter().enumerate() {
        let _ = packer.add(i, w, h);
    }
    packer.pack()
}

fn bench_engines(c: &mut Criterion) {
    let mut group = c.benchmark_group("engines");

    for count in [50usize, 100, 200] {
        let rects = generate_rects(count, 8, 64);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("Guillotine_BAF", count), &rects, |b, rects| {
            b.iter(|| {
                let cfg = PackerConfig::Guillotine(GuillotineConfig::new(BinConfig::new(512, 512)));
                black_box(pack_all(cfg, rects))
            });
        });

        group.bench_with_input(BenchmarkId::new("MaxRects_BAF", count), &rects, |b, rects| {
            b.iter(|| {
                let cfg = PackerConfig::MaxRects(MaxRectsConfig::new(BinConfig::new(512, 512)));
                black_box(pack_all(cfg, rects))
            });
        });

        group.bench_with_input(
            BenchmarkId::new("MaxRects_ContactPoint", count),
            &rects,
            |b, rects| {
                b.iter(|| {
                    let cfg = PackerConfig::MaxRects(
                        MaxRectsConfig::new(BinConfig::new(512, 512))
                            .heuristic(MaxRectsHeuristic::ContactPoint),
                    );
                    black_box(pack_all(cfg, rects))
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("Skyline_BottomLeft", count),
            &rects,
            |b, rects| {
                b.iter(|| {
                    let cfg = PackerConfig::Skyline(SkylineConfig::new(BinConfig::new(512, 512)));
                    black_box(pack_all(cfg, rects))
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("Skyline_MinWaste_WasteMap", count),
            &rects,
            |b, rects| {
                b.iter(|| {
                    let cfg = PackerConfig::Skyline(
                        SkylineConfig::new(BinConfig::new(512, 512))
                            .heuristic(SkylineHeuristic::MinWaste)
                            .waste_map(true),
                    );
                    black_box(pack_all(cfg, rects))
                });
            },
        );
    }

    group.finish();
}

fn bench_guillotine_splits(c: &mut Criterion) {
    let mut group = c.benchmark_group("guillotine_splits");
    let rects = generate_rects(150, 8, 48);

    for split in [
        GuillotineSplit::ShorterLeftoverAxis,
        GuillotineSplit::MinimizeArea,
        GuillotineSplit::MaximizeArea,
    ] {
        group.bench_with_input(
            BenchmarkId::new("split", format!("{:?}", split)),
            &rects,
            |b, rects| {
                b.iter(|| {
                    let cfg = PackerConfig::Guillotine(
                        GuillotineConfig::new(BinConfig::new(512, 512))
                            .split(split)
                            .merge(true),
                    );
                    black_box(pack_all(cfg, rects))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_engines, bench_guillotine_splits);
criterion_main!(benches);
