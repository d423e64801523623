use serde::Serialize;

use crate::matching::{LocationMatcher, SkillMatchConfig};
use crate::models::{CandidateProfile, Posting};

pub const MAX_SCORE: u8 = 100;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    RequiredSkills,
    OccupationalCode,
    Location,
    Clearance,
    JobType,
    Industry,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ScoreContribution {
    pub factor: ScoreFactor,
    pub points: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MatchScore {
    pub value: u8,
    pub breakdown: Vec<ScoreContribution>,
    pub matching_skills: Vec<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScoringWeights {
    pub per_required_skill: u32,
    pub occupational_code: u32,
    pub location: u32,
    pub clearance: u32,
    pub job_type: u32,
    pub industry: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            per_required_skill: 10,
            occupational_code: 20,
            location: 15,
            clearance: 15,
            job_type: 5,
            industry: 5,
        }
    }
}

/// Weighted additive fit between a posting and a candidate, capped at 100.
///
/// The scorer never excludes a posting; a posting with no matching factor
/// scores 0. Output depends only on the two inputs.
#[derive(Clone, Debug, Default)]
pub struct MatchScorer {
    weights: ScoringWeights,
    skills: SkillMatchConfig,
    locations: LocationMatcher,
}

impl MatchScorer {
    pub fn new(weights: ScoringWeights, skills: SkillMatchConfig, locations: LocationMatcher) -> Self {
        Self {
            weights,
            skills,
            locations,
        }
    }

    pub fn score(&self, posting: &Posting, profile: &CandidateProfile) -> MatchScore {
        let mut breakdown = Vec::new();

        let matching_skills = self
            .skills
            .matching_skills(&profile.skills, &posting.required_skills);
        if !matching_skills.is_empty() {
            breakdown.push(ScoreContribution {
                factor: ScoreFactor::RequiredSkills,
                points: self.weights.per_required_skill * matching_skills.len() as u32,
            });
        }

        if let Some(code) = profile.occupational_code.as_deref().map(str::trim)
            && !code.is_empty()
            && posting
                .occupational_codes
                .iter()
                .any(|candidate| candidate.trim().eq_ignore_ascii_case(code))
        {
            breakdown.push(ScoreContribution {
                factor: ScoreFactor::OccupationalCode,
                points: self.weights.occupational_code,
            });
        }

        if self.location_matches(posting, profile) {
            breakdown.push(ScoreContribution {
                factor: ScoreFactor::Location,
                points: self.weights.location,
            });
        }

        if let (Some(wanted), Some(offered)) = (
            profile.clearance_level.as_deref().map(str::trim),
            posting.clearance.as_deref().map(str::trim),
        ) && !wanted.is_empty()
            && wanted.eq_ignore_ascii_case(offered)
        {
            breakdown.push(ScoreContribution {
                factor: ScoreFactor::Clearance,
                points: self.weights.clearance,
            });
        }

        if substring_match_any(&profile.preferred_job_types, posting.job_type.as_deref()) {
            breakdown.push(ScoreContribution {
                factor: ScoreFactor::JobType,
                points: self.weights.job_type,
            });
        }

        if substring_match_any(&profile.preferred_industries, posting.industry.as_deref()) {
            breakdown.push(ScoreContribution {
                factor: ScoreFactor::Industry,
                points: self.weights.industry,
            });
        }

        let total: u32 = breakdown.iter().map(|entry| entry.points).sum();
        MatchScore {
            value: total.min(u32::from(MAX_SCORE)) as u8,
            breakdown,
            matching_skills,
        }
    }

    fn location_matches(&self, posting: &Posting, profile: &CandidateProfile) -> bool {
        if posting.remote && profile.accepts_remote {
            return true;
        }
        profile
            .preferred_locations
            .iter()
            .filter(|preferred| !preferred.trim().is_empty())
            .any(|preferred| self.locations.matches_lenient(preferred, &posting.location))
    }
}

fn substring_match_any(preferences: &[String], value: Option<&str>) -> bool {
    let Some(value) = value.map(|value| value.trim().to_lowercase()) else {
        return false;
    };
    if value.is_empty() {
        return false;
    }

    preferences
        .iter()
        .map(|preference| preference.trim().to_lowercase())
        .filter(|preference| !preference.is_empty())
        .any(|preference| value.contains(&preference) || preference.contains(&value))
}
