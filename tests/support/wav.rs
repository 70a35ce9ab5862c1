use std::path::Path;

/// Write interleaved float samples as a WAV file.
pub fn write_test_wav(path: &Path, samples: &[f32], channels: u16, sample_rate: u32) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create wav parent dirs");
    }
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav writer");
    for &sample in samples {
        writer.write_sample(sample).expect("write wav sample");
    }
    writer.finalize().expect("finalize wav");
}

/// A sine tone of `frames` samples per channel.
pub fn tone(frames: usize, channels: u16, sample_rate: u32) -> Vec<f32> {
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for frame in 0..frames {
        let phase = frame as f32 / sample_rate as f32 * 220.0 * std::f32::consts::TAU;
        for _ in 0..channels {
            samples.push(phase.sin() * 0.5);
        }
    }
    samples
}
