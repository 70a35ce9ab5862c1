use std::hint::black_box;
use std::time::Instant;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use wavelane::options::WaveOptions;
use wavelane::waveform::{DecodedAudio, PeakNormalizer, SegmentedRenderer, ViewWindow};

const SAMPLE_RATE: u32 = 44_100;
const SECONDS: usize = 60;

fn stereo_minute() -> DecodedAudio {
    let frames = SAMPLE_RATE as usize * SECONDS;
    let channel = |freq: f32| -> Vec<f32> {
        (0..frames)
            .map(|i| (i as f32 / SAMPLE_RATE as f32 * freq * std::f32::consts::TAU).sin())
            .collect()
    };
    DecodedAudio::from_channels(vec![channel(110.0), channel(165.0)], SAMPLE_RATE)
}

fn bench_visible_pass(c: &mut Criterion) {
    let audio = stereo_minute();
    let options = WaveOptions {
        normalize: true,
        ..WaveOptions::default()
    };
    let peaks = PeakNormalizer::new(options.normalize, options.normalize_reference)
        .apply(&audio.channels);
    let mut group = c.benchmark_group("visible_pass");
    for px_per_sec in [50_u32, 400] {
        let window = ViewWindow {
            scroll: 0.0,
            width: 1_200.0,
            total_width: px_per_sec * SECONDS as u32,
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(px_per_sec),
            &window,
            |b, window| {
                let mut renderer = SegmentedRenderer::new();
                renderer.set_audio(peaks.clone(), &options);
                b.iter(|| black_box(renderer.render(*window, Instant::now())));
            },
        );
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let audio = stereo_minute();
    let normalizer = PeakNormalizer::new(true, Default::default());
    c.bench_function("normalize_stereo_minute", |b| {
        b.iter(|| black_box(normalizer.apply(black_box(&audio.channels))));
    });
}

criterion_group!(benches, bench_visible_pass, bench_normalize);
criterion_main!(benches);
