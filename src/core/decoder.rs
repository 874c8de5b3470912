//! core/decoder.rs
//! Format-detecting decode (Symphonia) into interleaved f32 chunks.
//!
//! Used by the thumbnail builder to walk a whole file, and by the engine
//! when rodio cannot tell how long a stream is.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, SampleBuffer, Signal, SignalSpec};
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;

use super::error::LoadError;

/// An opened, probed audio file positioned at its first packet.
pub struct ProbedStream {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,

    sample_rate: u32,
    channels: usize,
    n_frames: Option<u64>,
    duration_secs: Option<f64>,

    ended: bool,
}

impl ProbedStream {
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(LoadError::Probe)?;

        let format = probed.format;
        let track = format.default_track().ok_or(LoadError::NoTrack)?;
        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(LoadError::DecoderInit)?;

        Ok(Self {
            format,
            decoder,
            track_id,
            sample_rate: codec_params.sample_rate.unwrap_or(44_100),
            channels: codec_params.channels.map(|c| c.count()).unwrap_or(0),
            n_frames: codec_params.n_frames,
            duration_secs: duration_from_params(codec_params.time_base, codec_params.n_frames),
            ended: false,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count; 0 if the container didn't say and nothing is decoded yet.
    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn n_frames(&self) -> Option<u64> {
        self.n_frames
    }

    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_secs
    }

    /// Decode the next packet into `out` (cleared first, interleaved).
    ///
    /// Returns `Ok(false)` once the stream is exhausted. Corrupt packets are
    /// skipped.
    pub fn next_chunk(&mut self, out: &mut Vec<f32>) -> Result<bool, LoadError> {
        out.clear();
        if self.ended {
            return Ok(false);
        }

        loop {
            let packet = match self.format.next_packet() {
                Ok(p) => p,
                Err(e) if is_end_of_stream(&e) => {
                    self.ended = true;
                    return Ok(false);
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.decoder.reset();
                    continue;
                }
                Err(e) => return Err(LoadError::Decode(e.to_string())),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(d) => d,
                Err(e) if is_end_of_stream(&e) => {
                    self.ended = true;
                    return Ok(false);
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    tracing::debug!("skipping corrupt packet: {e}");
                    continue;
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.decoder.reset();
                    continue;
                }
                Err(e) => return Err(LoadError::Decode(e.to_string())),
            };

            if decoded.frames() == 0 {
                continue;
            }

            match decoded {
                AudioBufferRef::F32(buf) => {
                    self.sample_rate = buf.spec().rate;
                    self.channels = buf.spec().channels.count();

                    let frames = buf.frames();
                    out.reserve(frames * self.channels);
                    for f in 0..frames {
                        for c in 0..self.channels {
                            out.push(buf.chan(c)[f]);
                        }
                    }
                }
                other => {
                    let spec = SignalSpec::new(other.spec().rate, other.spec().channels);
                    self.sample_rate = spec.rate;
                    self.channels = spec.channels.count();

                    let mut sbuf = SampleBuffer::<f32>::new(other.frames() as u64, spec);
                    sbuf.copy_interleaved_ref(other);
                    out.extend_from_slice(sbuf.samples());
                }
            }
            return Ok(true);
        }
    }
}

/// Symphonia signals a clean end as an `UnexpectedEof` read. Any other IO
/// error is a real failure.
fn is_end_of_stream(err: &SymphoniaError) -> bool {
    matches!(err, SymphoniaError::IoError(e) if e.kind() == ErrorKind::UnexpectedEof)
}

fn duration_from_params(time_base: Option<TimeBase>, n_frames: Option<u64>) -> Option<f64> {
    let tb = time_base?;
    let frames = n_frames?;

    let t = tb.calc_time(frames);
    Some(t.seconds as f64 + t.frac)
}

/// Duration of the file at `path`, if its container states one.
pub fn probe_duration(path: &Path) -> Result<Option<f64>, LoadError> {
    Ok(ProbedStream::open(path)?.duration_secs())
}


#[cfg(test)]
mod tests {
    use super::test_support::write_wav;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn probes_wav_duration_and_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_wav(dir.path(), "tone.wav", 8_000, 2, 16_000, |_, _| 0.25);

        let stream = ProbedStream::open(&path).unwrap();
        assert_eq!(stream.sample_rate(), 8_000);
        assert_eq!(stream.channels(), 2);
        assert_eq!(stream.n_frames(), Some(16_000));
        assert_relative_eq!(stream.duration_secs().unwrap(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn decodes_every_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_wav(dir.path(), "ramp.wav", 8_000, 1, 5_000, |f, _| {
            if f % 2 == 0 { 0.5 } else { -0.5 }
        });

        let mut stream = ProbedStream::open(&path).unwrap();
        let mut chunk = Vec::new();
        let mut total = 0;
        while stream.next_chunk(&mut chunk).unwrap() {
            total += chunk.len();
            assert!(chunk.iter().all(|s| (s.abs() - 0.5).abs() < 1e-3));
        }
        assert_eq!(total, 5_000);
    }

    #[test]
    fn only_eof_counts_as_end_of_stream() {
        let eof = SymphoniaError::IoError(std::io::Error::new(ErrorKind::UnexpectedEof, "end of stream"));
        let denied = SymphoniaError::IoError(std::io::Error::from(ErrorKind::PermissionDenied));

        assert!(is_end_of_stream(&eof));
        assert!(!is_end_of_stream(&denied));
        assert!(!is_end_of_stream(&SymphoniaError::ResetRequired));
    }

    #[test]
    fn exhausted_stream_stays_exhausted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_wav(dir.path(), "short.wav", 8_000, 1, 300, |_, _| 0.1);

        let mut stream = ProbedStream::open(&path).unwrap();
        let mut chunk = Vec::new();
        while stream.next_chunk(&mut chunk).unwrap() {}

        assert!(!stream.next_chunk(&mut chunk).unwrap());
        assert!(chunk.is_empty());
    }

    #[test]
    fn rejects_non_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.wav");
        std::fs::write(&path, b"definitely not a riff header").unwrap();

        assert!(ProbedStream::open(&path).is_err());
    }

    #[test]
    fn missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProbedStream::open(&dir.path().join("gone.wav")).err().unwrap();
        assert!(matches!(err, LoadError::Open(_)));
    }
}
