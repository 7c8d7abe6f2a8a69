//! # Audio Decoding Module
//!
//! Reads recorded tones from WAV files using hound. Integer PCM of any bit
//! depth is normalized to `[-1.0, 1.0]`; float WAV data is passed through.
//! Channels stay interleaved; the spectrum averages them.

use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader};
use log::debug;

use crate::error::Result;

/// Samples and format information from a decoded file.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    pub channels: usize,
    /// Interleaved samples, `channels` values per frame.
    pub samples: Vec<f32>,
}

impl DecodedAudio {
    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1)
    }

    /// Duration of the recording in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Decodes the WAV file at `path`.
///
/// # Errors
/// * `Error::Decode` if the file cannot be opened or is not valid WAV data
pub fn decode(path: impl AsRef<Path>) -> Result<DecodedAudio> {
    let path = path.as_ref();
    debug!("Opening WAV file at \"{}\"", path.display());
    let reader = WavReader::open(path)?;
    read_wav(reader)
}

/// Decodes WAV data from any reader.
pub fn decode_reader<R: Read>(reader: R) -> Result<DecodedAudio> {
    read_wav(WavReader::new(reader)?)
}

fn read_wav<R: Read>(mut reader: WavReader<R>) -> Result<DecodedAudio> {
    let spec = reader.spec();
    debug!(
        "\t{} channel(s), {} Hz, {}-bit {:?}",
        spec.channels, spec.sample_rate, spec.bits_per_sample, spec.sample_format
    );

    let samples = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let full_scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|s| s as f32 / full_scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    Ok(DecodedAudio {
        sample_rate: spec.sample_rate,
        channels: spec.channels as usize,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use hound::{WavSpec, WavWriter};
    use std::io::Cursor;

    fn wav_bytes(spec: WavSpec, write: impl FnOnce(&mut WavWriter<&mut Cursor<Vec<u8>>>)) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            write(&mut writer);
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_int16_stereo() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, |writer| {
            for (left, right) in [(16384_i16, 0_i16), (-32768, 16384)] {
                writer.write_sample(left).unwrap();
                writer.write_sample(right).unwrap();
            }
        });

        let audio = decode_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.frames(), 2);
        assert_eq!(audio.samples, vec![0.5, 0.0, -1.0, 0.5]);
        assert_eq!(audio.duration_seconds(), 2.0 / 8000.0);
    }

    #[test]
    fn test_decode_float_mono() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let bytes = wav_bytes(spec, |writer| {
            for sample in [0.25_f32, -0.75, 1.0] {
                writer.write_sample(sample).unwrap();
            }
        });

        let audio = decode_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(audio.samples, vec![0.25, -0.75, 1.0]);
        assert_eq!(audio.frames(), 3);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode_reader(Cursor::new(b"definitely not a wav file".to_vec()));
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_decode_missing_file_fails() {
        let result = decode("/nonexistent/path/to/tone.wav");
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
