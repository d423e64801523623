use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    JobBank,
    Adzuna,
    EmployerDirectory,
    Synthetic,
}

impl SourceId {
    pub const ALL: [SourceId; 4] = [
        SourceId::JobBank,
        SourceId::Adzuna,
        SourceId::EmployerDirectory,
        SourceId::Synthetic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::JobBank => "job_bank",
            Self::Adzuna => "adzuna",
            Self::EmployerDirectory => "employer_directory",
            Self::Synthetic => "synthetic",
        }
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data-quality tier of a source. Declaration order is fallback order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTier {
    Official,
    Commercial,
    Directory,
    Synthetic,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceDescriptor {
    pub id: SourceId,
    pub display_name: &'static str,
    pub tier: SourceTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_order_from_official_to_synthetic() {
        let mut tiers = vec![
            SourceTier::Synthetic,
            SourceTier::Directory,
            SourceTier::Official,
            SourceTier::Commercial,
        ];
        tiers.sort();
        assert_eq!(
            tiers,
            vec![
                SourceTier::Official,
                SourceTier::Commercial,
                SourceTier::Directory,
                SourceTier::Synthetic,
            ]
        );
    }

    #[test]
    fn source_ids_render_snake_case() {
        assert_eq!(SourceId::EmployerDirectory.to_string(), "employer_directory");
        assert_eq!(
            serde_json::to_string(&SourceId::JobBank).unwrap(),
            "\"job_bank\""
        );
    }
}
