//! Pad tone rendering and WAV export.
//!
//! A pad tone is a plain sine at the pad's frequency with a fixed gain, held
//! for the flash duration and then released with a short exponential ramp.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hound::{SampleFormat, WavSpec, WavWriter};
use log::info;

use crate::error::{EchoError, Result};
use crate::game::Symbol;

/// Oscillator gain while the tone is held
pub const TONE_GAIN: f32 = 0.15;

/// Length of the release ramp after the hold
pub const RELEASE_SECS: f32 = 0.02;

/// Level the release ramp ends at
const RELEASE_FLOOR: f32 = 0.0001;

/// Default export sample rate
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Render one tone as mono f32 samples: `duration` of hold plus the release
pub fn render_tone(frequency: f32, duration: Duration, sample_rate: u32) -> Vec<f32> {
    let rate = sample_rate as f32;
    let hold = (duration.as_secs_f32() * rate).round() as usize;
    let release = (RELEASE_SECS * rate).round() as usize;
    let angular_freq = 2.0 * std::f32::consts::PI * frequency / rate;

    (0..hold + release)
        .map(|i| {
            let gain = if i < hold {
                TONE_GAIN
            } else {
                let t = (i - hold) as f32 / release as f32;
                TONE_GAIN * (RELEASE_FLOOR / TONE_GAIN).powf(t)
            };
            gain * (angular_freq * i as f32).sin()
        })
        .collect()
}

/// Write mono samples as a 16-bit WAV file
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let to_export_error = |e: hound::Error| EchoError::ToneExport {
        reason: format!("{}: {}", path.display(), e),
    };

    let mut writer = WavWriter::create(path, spec).map_err(to_export_error)?;
    for sample in samples {
        let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer.write_sample(scaled).map_err(to_export_error)?;
    }
    writer.finalize().map_err(to_export_error)?;

    Ok(())
}

/// Export every pad tone into `dir` as `<pad>.wav`. Returns the written paths.
pub fn export_tones(dir: &Path, duration: Duration, sample_rate: u32) -> Result<Vec<PathBuf>> {
    if sample_rate == 0 {
        return Err(EchoError::ToneExport {
            reason: "sample rate must be greater than 0".to_string(),
        });
    }

    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| EchoError::DirectoryCreateError {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }

    let mut written = Vec::with_capacity(Symbol::ALL.len());
    for symbol in Symbol::ALL {
        let path = dir.join(format!("{}.wav", symbol.name()));
        let samples = render_tone(symbol.tone_hz(), duration, sample_rate);
        write_wav(&path, &samples, sample_rate)?;
        info!("Wrote {} ({:.1} Hz)", path.display(), symbol.tone_hz());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hound::WavReader;
    use tempfile::tempdir;

    #[test]
    fn test_render_length_includes_release() {
        let samples = render_tone(440.0, Duration::from_millis(400), 44100);
        assert_eq!(samples.len(), 17640 + 882);
    }

    #[test]
    fn test_render_peak_is_gain() {
        let samples = render_tone(261.6, Duration::from_millis(400), 48000);
        let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak <= TONE_GAIN);
        assert_relative_eq!(peak, TONE_GAIN, epsilon = 0.001);
    }

    #[test]
    fn test_release_fades_out() {
        let samples = render_tone(523.3, Duration::from_millis(100), 44100);
        let tail = &samples[samples.len() - 20..];
        assert!(tail.iter().all(|s| s.abs() < 0.001));
    }

    #[test]
    fn test_export_writes_one_file_per_pad() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("tones");

        let written = export_tones(&out, Duration::from_millis(200), 22050).unwrap();
        assert_eq!(written.len(), 4);
        assert!(out.join("red.wav").exists());
        assert!(out.join("orange.wav").exists());

        let reader = WavReader::open(out.join("blue.wav")).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len() as usize, 4410 + 441);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let temp = tempdir().unwrap();
        let err = export_tones(temp.path(), Duration::from_millis(200), 0).unwrap_err();
        assert_eq!(err.error_code(), "TONE_EXPORT");
    }
}
