use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::RunSummary;

/// Human-readable run report, one statement per line
pub struct RunReport<'a> {
    summary: &'a RunSummary,
}

impl<'a> RunReport<'a> {
    pub fn new(summary: &'a RunSummary) -> Self {
        Self { summary }
    }

    /// Format the report text
    pub fn format(&self) -> String {
        let mut output = String::new();

        output.push_str("Elan transcription output\n");
        output.push_str(&format!("Date: {}\n", self.summary.date));
        output.push_str(
            "Part of the research project ‘Patrilineal Descent: \
             Transcribing Spoken Language of Three Generations’\n",
        );
        output.push_str(&format!(
            "Nr. of output lines: {}\n",
            self.summary.record_count
        ));
        output.push_str(&format!(
            "Adult speakers: {}\n",
            self.summary.speakers.adults.join(", ")
        ));
        output.push_str(&format!(
            "Child speakers: {}\n",
            self.summary.speakers.children.join(", ")
        ));

        output
    }

    /// Write the report to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnnotationRecord;

    #[test]
    fn test_report_lines() {
        let records = vec![
            AnnotationRecord::new("Sif", "hæ", 0, 10, "f1"),
            AnnotationRecord::new("Gunnar", "jæja", 10, 20, "f1"),
            AnnotationRecord::new("Kalli", "nei", 20, 30, "f2"),
        ];
        let summary = RunSummary::from_records(&records);
        let report = RunReport::new(&summary).format();

        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Elan transcription output");
        assert!(lines[1].starts_with("Date: "));
        assert_eq!(lines[3], "Nr. of output lines: 3");
        assert_eq!(lines[4], "Adult speakers: Sif, Gunnar");
        assert_eq!(lines[5], "Child speakers: Kalli");
    }

    #[test]
    fn test_report_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.info");

        let summary = RunSummary::from_records(&[]);
        RunReport::new(&summary).write_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Elan transcription output\n"));
        assert!(content.contains("Nr. of output lines: 0"));
    }
}
