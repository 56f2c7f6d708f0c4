use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;
use tracing::warn;

/// Errors produced while reading an ELAN `.eaf` document
#[derive(Debug, Error)]
pub enum EafError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML")]
    Xml(#[from] quick_xml::Error),

    #[error("annotation {annotation} references unknown time slot {slot}")]
    MissingTimeSlot { annotation: String, slot: String },

    #[error("time slot {slot} has invalid TIME_VALUE {value:?}")]
    InvalidTimeValue { slot: String, value: String },
}

/// One time-aligned annotation within a tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EafAnnotation {
    /// Start timestamp in milliseconds
    pub start_ms: u64,
    /// End timestamp in milliseconds
    pub end_ms: u64,
    /// Annotation text (the utterance)
    pub text: String,
}

/// A tier and its annotations in document order
#[derive(Debug, Clone)]
pub struct EafTier {
    pub tier_id: String,
    pub annotations: Vec<EafAnnotation>,
}

/// Parsed `.eaf` document: tiers in document order, each holding its
/// time-resolved annotations.
///
/// Reference tiers (REF_ANNOTATION) carry no time alignment of their own
/// and parse as empty tiers.
#[derive(Debug, Clone, Default)]
pub struct EafDocument {
    pub tiers: Vec<EafTier>,
}

impl EafDocument {
    /// Annotations for a named tier. Absence of the tier is not an error;
    /// files are not required to contain every speaker.
    pub fn annotations_for(&self, tier: &str) -> &[EafAnnotation] {
        self.tiers
            .iter()
            .find(|t| t.tier_id == tier)
            .map(|t| t.annotations.as_slice())
            .unwrap_or(&[])
    }

    pub fn tier_ids(&self) -> impl Iterator<Item = &str> {
        self.tiers.iter().map(|t| t.tier_id.as_str())
    }
}

/// Parse an ELAN `.eaf` file into an [`EafDocument`]
pub fn parse_eaf_file(path: &Path) -> Result<EafDocument, EafError> {
    let content = std::fs::read_to_string(path).map_err(|source| EafError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_eaf_str(&content)
}

/// Parse ELAN `.eaf` XML from a string
pub fn parse_eaf_str(xml: &str) -> Result<EafDocument, EafError> {
    parse_eaf_reader(Reader::from_reader(xml.as_bytes()))
}

/// Pending ALIGNABLE_ANNOTATION while its ANNOTATION_VALUE is read
struct PendingAnnotation {
    annotation_id: String,
    slot_ref1: String,
    slot_ref2: String,
    text: String,
}

fn parse_eaf_reader<R: BufRead>(mut reader: Reader<R>) -> Result<EafDocument, EafError> {
    // TIME_ORDER precedes the tiers in the document, so a single pass
    // resolves every annotation. Slots without a TIME_VALUE stay None.
    let mut time_slots: HashMap<String, Option<u64>> = HashMap::new();
    let mut document = EafDocument::default();
    let mut pending: Option<PendingAnnotation> = None;
    let mut in_value = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"TIME_SLOT" => {
                let slot_id = attr_or_default(&e, b"TIME_SLOT_ID")?;
                let value = match attr(&e, b"TIME_VALUE")? {
                    Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                        EafError::InvalidTimeValue {
                            slot: slot_id.clone(),
                            value: raw,
                        }
                    })?),
                    None => None,
                };
                time_slots.insert(slot_id, value);
            }

            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"TIER" => {
                document.tiers.push(EafTier {
                    tier_id: attr_or_default(&e, b"TIER_ID")?,
                    annotations: Vec::new(),
                });
            }

            Event::Start(e) if e.name().as_ref() == b"ALIGNABLE_ANNOTATION" => {
                pending = Some(PendingAnnotation {
                    annotation_id: attr_or_default(&e, b"ANNOTATION_ID")?,
                    slot_ref1: attr_or_default(&e, b"TIME_SLOT_REF1")?,
                    slot_ref2: attr_or_default(&e, b"TIME_SLOT_REF2")?,
                    text: String::new(),
                });
            }

            Event::Start(e) if e.name().as_ref() == b"ANNOTATION_VALUE" => {
                in_value = true;
            }

            Event::Text(t) if in_value => {
                if let Some(p) = pending.as_mut() {
                    p.text.push_str(&t.unescape()?);
                }
            }

            Event::End(e) if e.name().as_ref() == b"ANNOTATION_VALUE" => {
                in_value = false;
            }

            Event::End(e) if e.name().as_ref() == b"ALIGNABLE_ANNOTATION" => {
                if let Some(p) = pending.take() {
                    let start_ms = resolve_slot(&time_slots, &p.annotation_id, &p.slot_ref1)?;
                    let end_ms = resolve_slot(&time_slots, &p.annotation_id, &p.slot_ref2)?;
                    match (start_ms, end_ms) {
                        (Some(start_ms), Some(end_ms)) => {
                            if let Some(tier) = document.tiers.last_mut() {
                                tier.annotations.push(EafAnnotation {
                                    start_ms,
                                    end_ms,
                                    text: p.text,
                                });
                            }
                        }
                        // Unaligned slots occur in interrupted transcription
                        // sessions; the annotation has no usable timing.
                        _ => warn!(
                            annotation = %p.annotation_id,
                            "skipping annotation with unaligned time slot"
                        ),
                    }
                }
            }

            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(document)
}

/// Resolve a time slot reference to its millisecond value, if aligned
fn resolve_slot(
    time_slots: &HashMap<String, Option<u64>>,
    annotation_id: &str,
    slot_ref: &str,
) -> Result<Option<u64>, EafError> {
    time_slots
        .get(slot_ref)
        .copied()
        .ok_or_else(|| EafError::MissingTimeSlot {
            annotation: annotation_id.to_string(),
            slot: slot_ref.to_string(),
        })
}

fn attr(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, EafError> {
    for attribute in e.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        if attribute.key.as_ref() == name {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn attr_or_default(e: &BytesStart<'_>, name: &[u8]) -> Result<String, EafError> {
    attr(e, name).map(|value| value.unwrap_or_default())
}
