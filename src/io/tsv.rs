use std::path::Path;

use anyhow::{Context, Result};

use crate::models::AnnotationRecord;

/// Write aggregated annotation records as a tab-separated table, one row
/// per record, no header. Overwrites the destination.
pub fn write_utterance_tsv(path: &Path, records: &[AnnotationRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create TSV file: {}", path.display()))?;

    for record in records {
        writer
            .serialize(record)
            .context("Failed to write TSV row")?;
    }

    writer.flush().context("Failed to flush TSV file")?;
    Ok(())
}

/// Read an utterance table written by [`write_utterance_tsv`]
pub fn read_utterance_tsv(path: &Path) -> Result<Vec<AnnotationRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to open TSV file: {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize::<AnnotationRecord>() {
        records.push(row.context("Failed to parse a TSV row")?);
    }
    Ok(records)
}

/// Write a two-column key/count frequency table
pub fn write_frequency_tsv(path: &Path, entries: &[(String, u64)]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create TSV file: {}", path.display()))?;

    for (key, count) in entries {
        let count = count.to_string();
        writer
            .write_record([key.as_str(), count.as_str()])
            .context("Failed to write TSV row")?;
    }

    writer.flush().context("Failed to flush TSV file")?;
    Ok(())
}
