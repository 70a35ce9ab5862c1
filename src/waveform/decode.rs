//! WAV decoding through `hound`, de-interleaved into one buffer per channel.

use std::io::Read;
use std::path::Path;

use hound::SampleFormat;

use super::{AudioLoadError, DecodedAudio};

/// Read and decode a WAV file from disk.
pub fn load_wav_file(path: &Path) -> Result<DecodedAudio, AudioLoadError> {
    let bytes = std::fs::read(path).map_err(|source| AudioLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let audio = decode_wav_bytes(&bytes)?;
    tracing::debug!(
        "Decoded {} ({} ch, {} Hz, {:.2}s)",
        path.display(),
        audio.channel_count(),
        audio.sample_rate,
        audio.duration
    );
    Ok(audio)
}

/// Decode in-memory WAV bytes.
pub fn decode_wav_bytes(bytes: &[u8]) -> Result<DecodedAudio, AudioLoadError> {
    let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes))
        .map_err(|source| AudioLoadError::Invalid { source })?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(AudioLoadError::Unsupported {
            message: "zero channels".into(),
        });
    }
    let interleaved = match spec.sample_format {
        SampleFormat::Float => read_float_samples(&mut reader)?,
        SampleFormat::Int => read_int_samples(&mut reader, spec.bits_per_sample)?,
    };
    let channels = deinterleave(&interleaved, spec.channels as usize);
    Ok(DecodedAudio::from_channels(channels, spec.sample_rate))
}

fn read_float_samples<R: Read>(
    reader: &mut hound::WavReader<R>,
) -> Result<Vec<f32>, AudioLoadError> {
    reader
        .samples::<f32>()
        .map(|s| s.map_err(|source| AudioLoadError::Sample { source }))
        .collect()
}

fn read_int_samples<R: Read>(
    reader: &mut hound::WavReader<R>,
    bits_per_sample: u16,
) -> Result<Vec<f32>, AudioLoadError> {
    let scale = (1i64 << bits_per_sample.saturating_sub(1)).max(1) as f32;
    reader
        .samples::<i32>()
        .map(|s| {
            s.map(|v| v as f32 / scale)
                .map_err(|source| AudioLoadError::Sample { source })
        })
        .collect()
}

fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let frames = samples.len() / channels;
    let mut out = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (channel, &sample) in out.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
    out
}
