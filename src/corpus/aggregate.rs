use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;
use walkdir::WalkDir;

use crate::io::parse_eaf_file;
use crate::models::{AnnotationRecord, speaker_tiers};

/// Aggregate annotation records from every `.eaf` file under `dir`.
///
/// Files are visited in walk order, contents before their directory;
/// within a file, tiers are extracted in the fixed adult-then-child set
/// order. The resulting sequence is therefore grouped by file and tier,
/// not chronological.
pub fn aggregate_directory(dir: &Path) -> Result<Vec<AnnotationRecord>> {
    if !dir.is_dir() {
        bail!("Cannot find input directory: {}", dir.display());
    }

    let mut records = Vec::new();
    for entry in WalkDir::new(dir).contents_first(true) {
        let entry = entry.context("Failed to walk input directory")?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != "eaf") {
            continue;
        }
        extract_file(path, &mut records)?;
    }

    Ok(records)
}

/// Aggregate annotation records from an explicit list of `.eaf` files
pub fn aggregate_files(paths: &[PathBuf]) -> Result<Vec<AnnotationRecord>> {
    let mut records = Vec::new();
    for path in paths {
        if !path.is_file() {
            bail!("Cannot find input file: {}", path.display());
        }
        extract_file(path, &mut records)?;
    }
    Ok(records)
}

/// Extract all speaker-tier annotations of one file, appending to `records`
fn extract_file(path: &Path, records: &mut Vec<AnnotationRecord>) -> Result<()> {
    let document = parse_eaf_file(path)
        .with_context(|| format!("Failed to parse transcription file: {}", path.display()))?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let before = records.len();
    for tier in speaker_tiers() {
        for annotation in document.annotations_for(tier) {
            records.push(AnnotationRecord::new(
                tier,
                &annotation.text,
                annotation.start_ms,
                annotation.end_ms,
                &stem,
            ));
        }
    }

    debug!(
        file = %path.display(),
        records = records.len() - before,
        "extracted annotations"
    );
    Ok(())
}
