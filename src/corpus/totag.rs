use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::AnnotationRecord;
use crate::tokenize::Tokenizer;

/// Name of the per-speaker output subdirectory
pub const TOTAG_DIR: &str = "totag";

/// Write per-speaker tagging-input files under `<run_dir>/totag/`.
///
/// Each record's utterance is tokenized, tokens without textual content
/// are dropped, and the remaining token texts are appended space-joined as
/// one line to `<tier>_test.in`. Lines append: re-running into the same
/// directory duplicates content, and cleaning up between runs is the
/// caller's job.
pub fn write_totag_files(
    run_dir: &Path,
    records: &[AnnotationRecord],
    tokenizer: &dyn Tokenizer,
) -> Result<PathBuf> {
    let totag_dir = run_dir.join(TOTAG_DIR);
    std::fs::create_dir_all(&totag_dir)
        .with_context(|| format!("Failed to create directory: {}", totag_dir.display()))?;

    for record in records {
        let line = tokenizer
            .tokenize(&record.utterance)
            .into_iter()
            .filter(|t| t.has_text())
            .map(|t| t.text)
            .collect::<Vec<_>>()
            .join(" ");

        let path = totag_dir.join(format!("{}_test.in", record.tier));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        writeln!(file, "{line}")?;
    }

    Ok(totag_dir)
}
