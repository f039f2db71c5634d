use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spnbot::{
    layout::{SEGMENT_COUNT_OFFSET, SEGMENT_RECORDS_OFFSET, SEGMENT_STRIDE, SHARED_MEMORY_BYTES},
    BotApi, RegionConfig, SharedMemoryRegion,
};
use std::sync::Arc;

fn api_with_segments(count: usize) -> BotApi {
    let config = RegionConfig::memfd("records_bench", SHARED_MEMORY_BYTES);
    let region = Arc::new(SharedMemoryRegion::new(config).unwrap());

    for i in 0..count {
        let mut record = [0u8; SEGMENT_STRIDE];
        record[16..20].copy_from_slice(&(i as f32).to_le_bytes());
        record[24..32].copy_from_slice(&((i % 7) as u64).to_le_bytes());
        region.write_from(SEGMENT_RECORDS_OFFSET + i * SEGMENT_STRIDE, &record).unwrap();
    }
    region.write_from(SEGMENT_COUNT_OFFSET, &(count as u32).to_le_bytes()).unwrap();

    BotApi::new(region).unwrap()
}

fn benchmark_segment_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("Segments_Scan");

    for count in [100usize, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("nearest_enemy", count), count, |b, &count| {
            let api = api_with_segments(count);
            b.iter(|| {
                api.segments()
                    .iter()
                    .filter(|s| s.bot_id != 0)
                    .map(|s| s.dist)
                    .fold(f32::INFINITY, f32::min)
            });
        });
    }

    group.finish();
}

fn benchmark_random_access(c: &mut Criterion) {
    let api = api_with_segments(10_000);

    c.bench_function("Segments_Get", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 7919) % 10_000;
            api.segments().get(i).unwrap()
        });
    });
}

fn benchmark_color_pattern(c: &mut Criterion) {
    let mut api = api_with_segments(0);

    c.bench_function("Colors_Rebuild_64", |b| {
        b.iter(|| {
            api.clear_colors();
            for i in 0..64u8 {
                api.add_color(i, 255 - i, 0);
            }
        });
    });
}

criterion_group!(
    benches,
    benchmark_segment_scan,
    benchmark_random_access,
    benchmark_color_pattern
);
criterion_main!(benches);
