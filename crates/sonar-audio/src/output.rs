//! Device output: a cpal stream that pulls rendered frames from the mixer.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use sonar_core::{Error, Result};
use tracing::{debug, error};

use crate::mixer::SharedMixer;

/// Rate and channel layout the mixer renders at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl StreamFormat {
    /// Used before a device is opened, and when none can be.
    pub const FALLBACK: Self = Self {
        sample_rate: 48_000,
        channels: 2,
    };

    const fn of(config: &StreamConfig) -> Self {
        Self {
            sample_rate: config.sample_rate.0,
            channels: config.channels,
        }
    }
}

/// A running output stream. Dropping it closes the device.
pub struct AudioOutput {
    _stream: Stream,
    format: StreamFormat,
    device_name: String,
}

impl AudioOutput {
    /// Open the default output device and start rendering `mixer` into it.
    ///
    /// The mixer is switched to the device's native format first.
    pub fn open_default(mixer: SharedMixer) -> Result<Self> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or_else(|| Error::AudioOutput("no output device".to_string()))?;
        let device_name = device.name().unwrap_or_else(|_| "unnamed device".to_string());
        let fail = |what: &str, e: &dyn std::fmt::Display| {
            Error::AudioOutput(format!("{device_name}: {what}: {e}"))
        };

        let supported = device
            .default_output_config()
            .map_err(|e| fail("no usable config", &e))?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let format = StreamFormat::of(&config);
        debug!("Opening {device_name} as {sample_format:?} {format:?}");

        mixer.lock().configure(format.sample_rate, format.channels);

        let stream = match sample_format {
            SampleFormat::F32 => pull_stream::<f32>(&device, &config, mixer),
            SampleFormat::I16 => pull_stream::<i16>(&device, &config, mixer),
            SampleFormat::U16 => pull_stream::<u16>(&device, &config, mixer),
            other => {
                return Err(fail("unsupported sample format", &format!("{other:?}")));
            }
        }
        .map_err(|e| fail("cannot build stream", &e))?;
        stream.play().map_err(|e| fail("cannot start stream", &e))?;

        Ok(Self {
            _stream: stream,
            format,
            device_name,
        })
    }

    pub const fn format(&self) -> StreamFormat {
        self.format
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

impl std::fmt::Debug for AudioOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioOutput")
            .field("format", &self.format)
            .field("device_name", &self.device_name)
            .finish_non_exhaustive()
    }
}

/// Build a stream whose callback renders the mixer into device samples.
fn pull_stream<T: SizedSample + FromSample<f32>>(
    device: &Device,
    config: &StreamConfig,
    mixer: SharedMixer,
) -> std::result::Result<Stream, cpal::BuildStreamError> {
    let mut scratch: Vec<f32> = Vec::new();
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            scratch.resize(data.len(), 0.0);
            mixer.lock().render(&mut scratch);
            for (out, &sample) in data.iter_mut().zip(&scratch) {
                *out = T::from_sample(sample);
            }
        },
        |err| error!("Audio stream error: {err}"),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_follows_device_config() {
        let config = StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(22_050),
            buffer_size: cpal::BufferSize::Default,
        };
        assert_eq!(
            StreamFormat::of(&config),
            StreamFormat {
                sample_rate: 22_050,
                channels: 1,
            }
        );
        assert_ne!(StreamFormat::of(&config), StreamFormat::FALLBACK);
    }
}
