use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;
use walkdir::WalkDir;

/// Durations of the `.wav` files found under a directory
#[derive(Debug, Default)]
pub struct WavScan {
    /// Per-file durations in seconds, in walk order
    pub files: Vec<(PathBuf, f64)>,
    pub total_seconds: f64,
}

/// Sum the durations of every `.wav` file under `dir` recursively.
///
/// Duration is sample arithmetic: inter-channel sample count divided by
/// sample rate. An unreadable file aborts the scan.
pub fn scan_wav_lengths(dir: &Path) -> Result<WavScan> {
    if !dir.is_dir() {
        bail!("Cannot find input directory: {}", dir.display());
    }

    let mut scan = WavScan::default();
    for entry in WalkDir::new(dir).contents_first(true) {
        let entry = entry.context("Failed to walk input directory")?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != "wav") {
            continue;
        }

        let reader = hound::WavReader::open(path)
            .with_context(|| format!("Failed to open wav file: {}", path.display()))?;
        let seconds = reader.duration() as f64 / reader.spec().sample_rate as f64;
        info!("{} seconds = {}", path.display(), seconds);

        scan.total_seconds += seconds;
        scan.files.push((path.to_path_buf(), seconds));
    }

    Ok(scan)
}

/// Break a duration in seconds into an hour/minute/second report,
/// one unit per line
pub fn format_hms(total_seconds: f64) -> String {
    let secs = total_seconds as u64;
    format!(
        "{:02} hours\n{:02} minutes\n{:02} seconds",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, sample_rate: u32, samples: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..samples {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_scan_sums_durations() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("Vika02");
        std::fs::create_dir(&nested).unwrap();

        // 2 seconds at 16 kHz, 0.5 seconds at 8 kHz
        write_wav(&dir.path().join("a.wav"), 16_000, 32_000);
        write_wav(&nested.join("b.wav"), 8_000, 4_000);
        std::fs::write(dir.path().join("notes.txt"), "ignore").unwrap();

        let scan = scan_wav_lengths(dir.path()).unwrap();
        assert_eq!(scan.files.len(), 2);
        assert!((scan.total_seconds - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_scan_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_wav_lengths(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0.0), "00 hours\n00 minutes\n00 seconds");
        assert_eq!(format_hms(3_725.9), "01 hours\n02 minutes\n05 seconds");
    }
}
