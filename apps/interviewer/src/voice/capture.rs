//! Speech detection over a recorded answer.
//!
//! The recorder captures a fixed window whether or not the candidate talks.
//! Transcription models hallucinate on silence (typically "Thank you."), so a
//! capture is screened here before it is uploaded.

use std::io::Cursor;
use std::time::Duration;

use hound::{SampleFormat, WavReader};

/// Absolute 16-bit sample level that counts as speech rather than room noise.
pub const SPEECH_PEAK: i32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Onset {
    /// No frame reached [`SPEECH_PEAK`].
    Silent,
    /// Offset of the first loud frame from the start of the capture.
    At(Duration),
    /// Not 16-bit integer PCM or not a readable wav; left to the transcriber.
    Unknown,
}

/// Finds where speech starts in a wav capture.
pub fn speech_onset(wav: &[u8]) -> Onset {
    let Ok(mut reader) = WavReader::new(Cursor::new(wav)) else {
        return Onset::Unknown;
    };
    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 || spec.sample_rate == 0 {
        return Onset::Unknown;
    }

    let channels = u64::from(spec.channels.max(1));
    for (index, sample) in reader.samples::<i16>().enumerate() {
        // A recorder killed mid-write leaves a short tail; judge what was read.
        let Ok(sample) = sample else { break };
        if i32::from(sample).abs() >= SPEECH_PEAK {
            let frame = index as u64 / channels;
            return Onset::At(Duration::from_micros(
                frame * 1_000_000 / u64::from(spec.sample_rate),
            ));
        }
    }
    Onset::Silent
}

/// Mono 16-bit PCM wav holding `samples`.
#[cfg(test)]
pub fn pcm16_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
    for &sample in samples {
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
    cursor.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_capture_is_silent() {
        let mut samples = vec![0i16; 16_000];
        samples[100] = 300;
        samples[200] = -300;
        assert_eq!(speech_onset(&pcm16_wav(&samples, 16_000)), Onset::Silent);
    }

    #[test]
    fn test_header_only_capture_is_silent() {
        assert_eq!(speech_onset(&pcm16_wav(&[], 16_000)), Onset::Silent);
    }

    #[test]
    fn test_onset_is_measured_in_frames() {
        let mut samples = vec![0i16; 16_000];
        samples[8_000] = -4_000;
        assert_eq!(
            speech_onset(&pcm16_wav(&samples, 16_000)),
            Onset::At(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_stereo_onset_counts_frames_not_samples() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for frame in 0..8_000 {
            let level: i16 = if frame == 2_000 { 5_000 } else { 0 };
            writer.write_sample(0i16).unwrap();
            writer.write_sample(level).unwrap();
        }
        writer.finalize().unwrap();
        assert_eq!(
            speech_onset(&cursor.into_inner()),
            Onset::At(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_unreadable_capture_is_unknown() {
        assert_eq!(speech_onset(b"not a wav file at all"), Onset::Unknown);
    }
}
