use rand::Rng;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use pms5003::framing::{checksum, FrameDecoder, MAGIC};
use pms5003::window::Window;
use pms5003::Sample;

fn frame(counts: [u16; 6]) -> Vec<u8> {
    let mut dat = MAGIC.to_vec();
    dat.extend_from_slice(&28u16.to_be_bytes());
    for w in [0u16; 6].iter().chain(counts.iter()).chain([0u16].iter()) {
        dat.extend_from_slice(&w.to_be_bytes());
    }
    let sum = checksum(&dat);
    dat.extend_from_slice(&sum.to_be_bytes());
    dat
}

fn bench_synchronization(c: &mut Criterion) {
    // Noise with no frame markers at all
    let mut rng = rand::thread_rng();
    let data: Vec<u8> = (0..4096).map(|_| rng.gen_range(0x50..=0xff)).collect();
    let mut group = c.benchmark_group("synchronize");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("noise", |b| {
        b.iter(|| {
            let decoder = FrameDecoder::new(Cursor::new(&data));
            let _: Vec<Sample> = decoder.map_while(Result::ok).collect();
        });
    });
    group.finish();
}

fn bench_decode_frames(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let mut data = Vec::new();
    for _ in 0..1000 {
        data.extend_from_slice(&frame(rng.gen()));
    }

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("frames", |b| {
        b.iter(|| {
            let decoder = FrameDecoder::new(Cursor::new(&data));
            let samples: Vec<Sample> = decoder.map_while(Result::ok).collect();
            assert_eq!(samples.len(), 1000);
        });
    });
    group.finish();
}

fn bench_window_totals(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let mut window = Window::new();
    for _ in 0..Window::CAPACITY {
        let counts: [u16; 6] = rng.gen();
        window.push(Sample::from_counts(counts.map(u64::from)));
    }

    let mut group = c.benchmark_group("window");
    group.bench_function("push_and_concentration", |b| {
        b.iter(|| {
            window.push(Sample::from_counts([1, 2, 3, 4, 5, 6]));
            window.concentration_per_m3()
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_synchronization,
    bench_decode_frames,
    bench_window_totals,
);
criterion_main!(benches);
