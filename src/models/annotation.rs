use serde::{Deserialize, Serialize};

use super::SpeakerInventory;

/// One timed utterance extracted from a transcription tier.
///
/// Field order matters: the TSV writer serializes records in declaration
/// order, producing the column layout (tier, utterance, start, end,
/// duration, source file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Tier (speaker) name the utterance was extracted from
    pub tier: String,
    /// The utterance text - immutable, carried through verbatim
    pub utterance: String,
    /// Start timestamp in milliseconds
    pub start_ms: u64,
    /// End timestamp in milliseconds
    pub end_ms: u64,
    /// Utterance length in milliseconds
    pub duration_ms: u64,
    /// Stem of the .eaf file the utterance came from
    pub source_file: String,
}

impl AnnotationRecord {
    /// Build a record from raw annotation data. Duration is derived;
    /// an end time before the start time clamps to zero.
    pub fn new(
        tier: &str,
        utterance: &str,
        start_ms: u64,
        end_ms: u64,
        source_file: &str,
    ) -> Self {
        Self {
            tier: tier.to_string(),
            utterance: utterance.to_string(),
            start_ms,
            end_ms,
            duration_ms: end_ms.saturating_sub(start_ms),
            source_file: source_file.to_string(),
        }
    }
}

/// Write-once summary of a completed aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of annotation records aggregated
    pub record_count: usize,
    /// Generation date, dd/mm/YYYY
    pub date: String,
    /// Speakers observed in the aggregated records
    pub speakers: SpeakerInventory,
}

impl RunSummary {
    /// Summarize a finished record sequence, dated today.
    pub fn from_records(records: &[AnnotationRecord]) -> Self {
        let mut speakers = SpeakerInventory::default();
        for record in records {
            speakers.observe(&record.tier);
        }
        Self {
            record_count: records.len(),
            date: chrono::Local::now().format("%d/%m/%Y").to_string(),
            speakers,
        }
    }
}
