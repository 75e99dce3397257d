//! Integration tests for morphwave-io WAV I/O.

use morphwave_io::{
    Error, StereoSamples, WavFormat, WavSpec, read_wav, read_wav_info, read_wav_stereo, write_wav,
    write_wav_stereo,
};
use tempfile::{NamedTempFile, TempDir};

fn sine_wave(sample_rate: u32, freq_hz: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32).sin())
        .collect()
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn wav_roundtrip_every_bit_depth() {
    let samples = sine_wave(44100, 440.0, 4410);
    for (bits, tolerance) in [(8, 1.0 / 128.0), (16, 1.0 / 32768.0), (24, 1e-6), (32, 0.0)] {
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &samples, WavSpec::mono(44100).with_bits(bits)).unwrap();

        let (loaded, spec) = read_wav(file.path()).unwrap();
        assert_eq!(spec.bits_per_sample, bits);
        assert_eq!(loaded.len(), samples.len());
        let worst = samples
            .iter()
            .zip(&loaded)
            .fold(0.0f32, |m, (a, b)| m.max((a - b).abs()));
        assert!(worst <= tolerance, "{bits}-bit error {worst}");
    }
}

#[test]
fn wav_stereo_roundtrip_keeps_channels_apart() {
    let left = sine_wave(48000, 220.0, 4800);
    let right = sine_wave(48000, 330.0, 4800);
    let samples = StereoSamples::new(left.clone(), right.clone());

    let file = NamedTempFile::new().unwrap();
    write_wav_stereo(file.path(), &samples, WavSpec::stereo(48000)).unwrap();

    let (loaded, spec) = read_wav_stereo(file.path()).unwrap();
    assert_eq!(spec.channels, 2);
    assert_eq!(loaded.left, left);
    assert_eq!(loaded.right, right);
}

// ---------------------------------------------------------------------------
// Channel handling
// ---------------------------------------------------------------------------

#[test]
fn stereo_file_reads_as_mono_average() {
    let samples = StereoSamples::new(vec![1.0, 0.5, -1.0], vec![0.0, 0.5, 0.0]);
    let file = NamedTempFile::new().unwrap();
    write_wav_stereo(file.path(), &samples, WavSpec::stereo(44100)).unwrap();

    let (mono, spec) = read_wav(file.path()).unwrap();
    assert_eq!(spec.channels, 2);
    assert_eq!(mono, vec![0.5, 0.5, -0.5]);
}

#[test]
fn write_wav_forces_one_channel() {
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &[0.1, 0.2], WavSpec::stereo(44100)).unwrap();
    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.channels, 1);
    assert_eq!(info.num_frames, 2);
}

// ---------------------------------------------------------------------------
// Metadata and errors
// ---------------------------------------------------------------------------

#[test]
fn info_reports_duration_and_format() {
    let file = NamedTempFile::new().unwrap();
    write_wav_stereo(
        file.path(),
        &StereoSamples::from_mono(vec![0.0; 24000]),
        WavSpec::stereo(48000).with_bits(24),
    )
    .unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.num_frames, 24000);
    assert_eq!(info.format, WavFormat::Pcm);
    assert!((info.duration_secs - 0.5).abs() < 1e-9);
}

#[test]
fn writing_creates_missing_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("renders").join("table.wav");
    write_wav(&path, &[0.0; 16], WavSpec::default()).unwrap();
    assert!(path.is_file());
}

#[test]
fn reading_garbage_is_a_wav_error() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), b"not a riff file").unwrap();
    assert!(matches!(read_wav(file.path()), Err(Error::Wav(_))));
}
