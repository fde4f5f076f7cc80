//! Audio decoding using symphonia.

use std::io::Cursor;
use std::path::Path;

use bytes::Bytes;
use sonar_core::{Error, Result};
use symphonia::core::{
    audio::SampleBuffer,
    codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL},
    formats::{FormatOptions, FormatReader},
    io::{MediaSourceStream, MediaSourceStreamOptions},
    meta::MetadataOptions,
    probe::Hint,
};
use tracing::{debug, error};

/// Fully decoded PCM audio.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleData {
    /// Interleaved samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl SampleData {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels: channels.max(1),
        }
    }

    /// Decode a sound file. The extension is used as a format hint.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let extension = path.extension().and_then(|e| e.to_str());
        Self::from_bytes(Bytes::from(data), extension).map_err(|e| match e {
            Error::AudioDecode(msg) => {
                Error::AudioDecode(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Decode an in-memory sound, e.g. one embedded with `include_bytes!`.
    pub fn from_bytes(data: Bytes, extension_hint: Option<&str>) -> Result<Self> {
        let mut decoder = AudioDecoder::from_bytes(data, extension_hint)?;
        let mut samples = Vec::new();
        while let Some(chunk) = decoder.decode_next()? {
            samples.extend_from_slice(&chunk);
        }
        debug!(
            "Decoded {} frames at {} Hz, {} channels",
            samples.len() / usize::from(decoder.channels.max(1)),
            decoder.sample_rate,
            decoder.channels
        );
        Ok(Self::new(samples, decoder.sample_rate, decoder.channels))
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    /// Duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.frames() as u64 * 1000 / u64::from(self.sample_rate)
    }

    /// Sample of `channel` at `frame`. Mono data answers for every channel.
    pub fn sample(&self, frame: usize, channel: usize) -> f32 {
        let channels = usize::from(self.channels);
        let channel = channel.min(channels - 1);
        self.samples
            .get(frame * channels + channel)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Packet-by-packet decoder wrapping symphonia.
struct AudioDecoder {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: u16,
}

impl AudioDecoder {
    #[allow(clippy::needless_pass_by_value)] // Bytes is cheaply cloneable
    fn from_bytes(data: Bytes, extension_hint: Option<&str>) -> Result<Self> {
        let cursor = Cursor::new(data);
        let mss = MediaSourceStream::new(Box::new(cursor), MediaSourceStreamOptions::default());

        let mut hint = Hint::new();
        if let Some(extension) = extension_hint {
            hint.with_extension(extension);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| Error::AudioDecode(format!("Failed to probe format: {e}")))?;

        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| Error::AudioDecode("No audio tracks found".to_string()))?;

        let track_id = track.id;
        let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
        let channels = track.codec_params.channels.map_or(1, |c| c.count() as u16);

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| Error::AudioDecode(format!("Failed to create decoder: {e}")))?;

        Ok(Self {
            format,
            decoder,
            track_id,
            sample_rate,
            channels,
        })
    }

    /// Decode the next packet into interleaved f32 samples.
    /// Returns `None` at the end of the stream.
    fn decode_next(&mut self) -> Result<Option<Vec<f32>>> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(None);
                }
                Err(symphonia::core::errors::Error::ResetRequired) => return Ok(None),
                Err(e) => {
                    return Err(Error::AudioDecode(format!("Failed to read packet: {e}")));
                }
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            match self.decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    self.sample_rate = spec.rate;
                    self.channels = spec.channels.count() as u16;

                    let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    buffer.copy_interleaved_ref(decoded);
                    return Ok(Some(buffer.samples().to_vec()));
                }
                Err(symphonia::core::errors::Error::DecodeError(e)) => {
                    // Corrupt frames are skipped
                    error!("Decode error (skipping): {e}");
                }
                Err(e) => {
                    return Err(Error::AudioDecode(format!("Decode failed: {e}")));
                }
            }
        }
    }
}
