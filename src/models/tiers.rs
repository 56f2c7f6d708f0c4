use serde::{Deserialize, Serialize};

/// Adult speaker tiers of the corpus. Closed set; tier names are the
/// ELAN TIER_ID values used across all recording sessions.
pub const ADULT_TIERS: &[&str] = &[
    "Sif",
    "Gunnar",
    "Hamundur",
    "Hámundur",
    "Rannveig",
    "Hrafnhildur",
    "Sigmundur",
    "Þorgeir",
];

/// Child speaker tiers of the corpus. Closed set.
pub const CHILD_TIERS: &[&str] = &["Kalli", "Gunnar_ungur", "Systir", "Tvíburi"];

/// Generation a speaker tier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierClass {
    Adult,
    Child,
}

impl TierClass {
    /// Classify a tier name against the two fixed tier sets.
    ///
    /// Returns `None` for tier names outside both sets (e.g. annotation
    /// tiers that carry no speech, or tiers from other projects).
    pub fn classify(tier: &str) -> Option<TierClass> {
        if ADULT_TIERS.contains(&tier) {
            Some(TierClass::Adult)
        } else if CHILD_TIERS.contains(&tier) {
            Some(TierClass::Child)
        } else {
            None
        }
    }
}

/// All speaker tiers in extraction order: adults first, then children.
pub fn speaker_tiers() -> impl Iterator<Item = &'static str> {
    ADULT_TIERS.iter().chain(CHILD_TIERS.iter()).copied()
}

/// Distinct speaker tiers observed during an aggregation run, split by
/// generation. Kept in first-observation order so repeated runs over the
/// same corpus report speakers identically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeakerInventory {
    pub adults: Vec<String>,
    pub children: Vec<String>,
}

impl SpeakerInventory {
    /// Record one observed tier name. Unknown tiers are ignored.
    pub fn observe(&mut self, tier: &str) {
        let bucket = match TierClass::classify(tier) {
            Some(TierClass::Adult) => &mut self.adults,
            Some(TierClass::Child) => &mut self.children,
            None => return,
        };
        if !bucket.iter().any(|t| t == tier) {
            bucket.push(tier.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.adults.is_empty() && self.children.is_empty()
    }
}
