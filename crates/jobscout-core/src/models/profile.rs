use serde::{Deserialize, Serialize};

/// Candidate attributes supplied by the profile collaborator. Read-only here.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub skills: Vec<String>,
    pub preferred_locations: Vec<String>,
    pub accepts_remote: bool,
    pub preferred_industries: Vec<String>,
    pub preferred_job_types: Vec<String>,
    pub occupational_code: Option<String>,
    pub clearance_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_json() {
        let profile: CandidateProfile = serde_json::from_str(
            r#"{"skills": ["Logistics"], "accepts_remote": true, "occupational_code": "00168"}"#,
        )
        .unwrap();

        assert_eq!(profile.skills, vec!["Logistics".to_string()]);
        assert!(profile.accepts_remote);
        assert!(profile.preferred_locations.is_empty());
        assert_eq!(profile.occupational_code.as_deref(), Some("00168"));
    }
}
