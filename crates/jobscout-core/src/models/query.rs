use serde::{Deserialize, Serialize};

use crate::models::{CoreError, CoreResult};

pub const FINGERPRINT_DELIMITER: &str = "|";

const MAX_RADIUS_KM: u32 = 500;
const DEFAULT_COUNTRY: &str = "ca";

/// An immutable job search request.
///
/// Optional categorical fields act as filters once set; `skills` holds
/// domain skill tags that are translated into provider keywords before the
/// source walk.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobQuery {
    pub keywords: String,
    pub location: Option<String>,
    pub radius_km: Option<u32>,
    pub job_type: Option<String>,
    pub industry: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub skills: Vec<String>,
    pub country: String,
    pub page: u32,
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            keywords: String::new(),
            location: None,
            radius_km: None,
            job_type: None,
            industry: None,
            experience: None,
            education: None,
            skills: Vec::new(),
            country: DEFAULT_COUNTRY.to_string(),
            page: 1,
        }
    }
}

impl JobQuery {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            ..Self::default()
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_radius_km(mut self, radius_km: u32) -> Self {
        self.radius_km = Some(radius_km);
        self
    }

    pub fn with_job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = Some(job_type.into());
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_experience(mut self, experience: impl Into<String>) -> Self {
        self.experience = Some(experience.into());
        self
    }

    pub fn with_education(mut self, education: impl Into<String>) -> Self {
        self.education = Some(education.into());
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Trimmed location term, `None` when unset or blank.
    pub fn location_term(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.page == 0 {
            return Err(CoreError::invalid_input("page numbers start at 1"));
        }

        if let Some(radius) = self.radius_km
            && radius > MAX_RADIUS_KM
        {
            return Err(CoreError::invalid_input(format!(
                "radius {radius}km exceeds the {MAX_RADIUS_KM}km maximum"
            )));
        }

        let country = self.country.trim();
        if country.len() != 2 || !country.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(CoreError::invalid_input(format!(
                "country scope '{}' is not a two-letter code",
                self.country
            )));
        }

        if self.skills.iter().any(|skill| skill.trim().is_empty()) {
            return Err(CoreError::invalid_input("skill tags must not be blank"));
        }

        Ok(())
    }

    /// Normalized cache key. Every field is lower-cased and trimmed, the
    /// skill set is sorted and de-duplicated, and fields are joined in a
    /// fixed order so equivalent queries collide. The page number is left
    /// out: every page of a query is sliced from the same cached pool.
    pub fn fingerprint(&self) -> String {
        let mut skills: Vec<String> = self
            .skills
            .iter()
            .map(|skill| normalize(skill))
            .filter(|skill| !skill.is_empty())
            .collect();
        skills.sort();
        skills.dedup();

        let fields = [
            normalize(&self.keywords),
            normalize_optional(self.location.as_deref()),
            self.radius_km
                .map(|radius| radius.to_string())
                .unwrap_or_default(),
            normalize_optional(self.job_type.as_deref()),
            normalize_optional(self.industry.as_deref()),
            normalize_optional(self.experience.as_deref()),
            normalize_optional(self.education.as_deref()),
            skills.join(","),
            normalize(&self.country),
        ];
        fields.join(FINGERPRINT_DELIMITER)
    }
}

fn normalize(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn normalize_optional(value: Option<&str>) -> String {
    value.map(normalize).unwrap_or_default()
}

/// Per-call switches that are not part of the query identity.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SearchOptions {
    /// Skip the cache read. The fresh result is still written back.
    pub force_refresh: bool,
}

impl SearchOptions {
    pub fn refresh() -> Self {
        Self {
            force_refresh: true,
        }
    }
}
