use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info, warn};

/// Audio bitrate handed to ffmpeg, matching the corpus recordings
const AUDIO_BITRATE: &str = "192000";

/// Outcome of one extraction batch
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub converted: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Extract a `.wav` audio track from every video file with `extension`
/// directly inside `input_dir`, one output per input, no parallelism.
///
/// A failing ffmpeg invocation is logged and the batch continues; the
/// outcome reports how many inputs failed.
pub async fn extract_audio_batch(
    input_dir: &Path,
    output_dir: &Path,
    extension: &str,
) -> Result<BatchOutcome> {
    let inputs = video_inputs(input_dir, extension)?;
    if inputs.is_empty() {
        warn!(
            "No .{} files found in {}",
            extension,
            input_dir.display()
        );
        return Ok(BatchOutcome::default());
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let mut outcome = BatchOutcome::default();
    for input in inputs {
        let wav_path = wav_output_path(output_dir, &input)?;
        info!("Extracting audio: {}", input.display());

        if extract_wav(&input, &wav_path).await? {
            report_duration(&wav_path).await;
            outcome.converted += 1;
        } else {
            warn!("ffmpeg failed for {}", input.display());
            outcome.failed += 1;
        }
    }

    Ok(outcome)
}

/// Two-step extraction for `.MOD` camera files: each input gets its own
/// subdirectory holding an intermediate `.mov` and the final `.wav`.
/// Inputs whose subdirectory already exists are skipped entirely.
pub async fn extract_video_batch(input_dir: &Path, output_dir: &Path) -> Result<BatchOutcome> {
    let inputs = video_inputs(input_dir, "MOD")?;
    let mut outcome = BatchOutcome::default();

    for input in inputs {
        let stem = file_stem(&input)?;
        let file_dir = output_dir.join(&stem);
        if file_dir.is_dir() {
            info!("Skipping {}: output directory exists", input.display());
            outcome.skipped += 1;
            continue;
        }
        std::fs::create_dir_all(&file_dir)
            .with_context(|| format!("Failed to create directory: {}", file_dir.display()))?;

        let mov_path = file_dir.join(format!("{stem}.mov"));
        let wav_path = file_dir.join(format!("{stem}.wav"));
        info!("Converting {}", input.display());

        let converted = transcode(&input, &mov_path, &[]).await?
            && extract_wav(&mov_path, &wav_path).await?;
        if converted {
            report_duration(&wav_path).await;
            outcome.converted += 1;
        } else {
            warn!("ffmpeg failed for {}", input.display());
            outcome.failed += 1;
        }
    }

    Ok(outcome)
}

/// Video files with the given extension directly inside `dir`,
/// in name order
pub fn video_inputs(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Cannot find input directory: {}", dir.display());
    }

    let mut inputs: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == extension)
        })
        .collect();
    inputs.sort();
    Ok(inputs)
}

fn wav_output_path(output_dir: &Path, input: &Path) -> Result<PathBuf> {
    Ok(output_dir.join(format!("{}.wav", file_stem(input)?)))
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("Invalid video filename: {}", path.display()))
}

/// `ffmpeg -i <input> -f wav -ab 192000 -vn <output>`
async fn extract_wav(input: &Path, output: &Path) -> Result<bool> {
    transcode(input, output, &["-f", "wav", "-ab", AUDIO_BITRATE, "-vn"]).await
}

async fn transcode(input: &Path, output: &Path, args: &[&str]) -> Result<bool> {
    let status = tokio::process::Command::new("ffmpeg")
        .arg("-i")
        .arg(input)
        .args(args)
        .arg("-y")
        .arg(output)
        .status()
        .await
        .context("Failed to run ffmpeg; is it on the PATH?")?;
    Ok(status.success())
}

/// Log the duration of an extracted file, via ffprobe. Probing is
/// best-effort; a probe failure does not fail the batch.
async fn report_duration(path: &Path) {
    match probe_duration(path).await {
        Ok(seconds) => info!("Extracted {} ({:.1}s)", path.display(), seconds),
        Err(e) => warn!("Could not probe {}: {}", path.display(), e),
    }
}

/// Duration of a media file in seconds, read from ffprobe
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let output = tokio::process::Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path)
        .output()
        .await
        .context("Failed to run ffprobe; is it on the PATH?")?;

    if !output.status.success() {
        bail!("ffprobe failed for {}", path.display());
    }

    let data: serde_json::Value = serde_json::from_slice(&output.stdout)
        .context("Failed to parse ffprobe output")?;
    data["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| anyhow!("ffprobe reported no duration for {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_inputs_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp4"), b"").unwrap();
        std::fs::write(dir.path().join("b.mp4"), b"").unwrap();
        std::fs::write(dir.path().join("c.MOD"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let inputs = video_inputs(dir.path(), "mp4").unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mp4", "b.mp4"]);

        let mods = video_inputs(dir.path(), "MOD").unwrap();
        assert_eq!(mods.len(), 1);
    }

    #[test]
    fn test_video_inputs_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(video_inputs(&missing, "mp4").is_err());
    }

    #[test]
    fn test_wav_output_path_uses_stem() {
        let out = wav_output_path(Path::new("converted"), Path::new("myndbond/clip01.mp4")).unwrap();
        assert_eq!(out, Path::new("converted/clip01.wav"));
    }
}
