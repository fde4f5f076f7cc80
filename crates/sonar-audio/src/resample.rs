//! Load-time sample rate conversion using rubato.

use rubato::{FftFixedIn, Resampler};
use sonar_core::{Error, Result};
use tracing::debug;

use crate::decode::SampleData;

/// Frames fed to the resampler per call.
const CHUNK_SIZE: usize = 1024;

/// Convert `data` to `output_rate`. Data already at that rate is returned
/// unchanged.
pub fn resample(data: SampleData, output_rate: u32) -> Result<SampleData> {
    if data.sample_rate == output_rate || data.samples.is_empty() || output_rate == 0 {
        return Ok(data);
    }

    let channels = usize::from(data.channels);
    let mut resampler = FftFixedIn::<f32>::new(
        data.sample_rate as usize,
        output_rate as usize,
        CHUNK_SIZE,
        2,
        channels,
    )
    .map_err(|e| Error::AudioDecode(format!("Failed to create resampler: {e}")))?;

    let input = deinterleave(&data.samples, channels);
    let input_frames = input[0].len();
    let delay = resampler.output_delay();
    let expected = (input_frames as f64 * f64::from(output_rate) / f64::from(data.sample_rate))
        .round() as usize;

    let mut output: Vec<Vec<f32>> = vec![Vec::new(); channels];
    let mut position = 0;

    // Keep feeding (zero padding past the end) until the delayed tail is out.
    while output[0].len() < delay + expected {
        let end = (position + CHUNK_SIZE).min(input_frames);
        let chunk: Vec<Vec<f32>> = input
            .iter()
            .map(|plane| {
                let mut frames = plane.get(position..end).unwrap_or(&[]).to_vec();
                frames.resize(CHUNK_SIZE, 0.0);
                frames
            })
            .collect();
        position = end;

        let resampled = resampler
            .process(&chunk, None)
            .map_err(|e| Error::AudioDecode(format!("Resample failed: {e}")))?;
        for (plane, frames) in output.iter_mut().zip(resampled) {
            plane.extend(frames);
        }
    }

    debug!(
        "Resampled {} frames {}Hz -> {} frames {}Hz",
        input_frames, data.sample_rate, expected, output_rate
    );

    let trimmed: Vec<&[f32]> = output
        .iter()
        .map(|plane| &plane[delay..delay + expected])
        .collect();
    Ok(SampleData::new(
        interleave(&trimmed),
        output_rate,
        data.channels,
    ))
}

fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let frames = samples.len() / channels;
    let mut planes = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (plane, &sample) in planes.iter_mut().zip(frame) {
            plane.push(sample);
        }
    }
    planes
}

fn interleave(planes: &[&[f32]]) -> Vec<f32> {
    let Some(first) = planes.first() else {
        return Vec::new();
    };
    let frames = first.len();
    let mut output = Vec::with_capacity(frames * planes.len());
    for frame in 0..frames {
        for plane in planes {
            output.push(plane[frame]);
        }
    }
    output
}
