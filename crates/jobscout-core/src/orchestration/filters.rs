use crate::matching::{LocationMatcher, LocationMode, SkillMatchConfig};
use crate::models::{JobQuery, Posting};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilteredPool {
    pub postings: Vec<Posting>,
    pub location_mode: LocationMode,
    pub dropped: usize,
}

/// Post-filters applied to the candidate pool once the walk is done:
/// location, then categorical tags, then skill overlap.
#[derive(Clone, Debug, Default)]
pub struct PoolFilter {
    locations: LocationMatcher,
    skills: SkillMatchConfig,
}

impl PoolFilter {
    pub fn new(locations: LocationMatcher, skills: SkillMatchConfig) -> Self {
        Self { locations, skills }
    }

    /// `skill_vocabulary` is the query's skill tags plus their translated
    /// keyword terms.
    pub fn apply(
        &self,
        pool: Vec<Posting>,
        query: &JobQuery,
        skill_vocabulary: &[String],
    ) -> FilteredPool {
        let before = pool.len();
        let located = self.locations.filter(pool, query.location_term());

        let categorized = located
            .postings
            .into_iter()
            .filter(|posting| matches_categories(posting, query));

        let postings: Vec<Posting> = if query.skills.is_empty() {
            categorized.collect()
        } else {
            categorized
                .filter_map(|posting| self.with_skill_overlap(posting, skill_vocabulary))
                .collect()
        };

        FilteredPool {
            dropped: before - postings.len(),
            postings,
            location_mode: located.mode,
        }
    }

    fn with_skill_overlap(&self, mut posting: Posting, vocabulary: &[String]) -> Option<Posting> {
        let matching = self
            .skills
            .matching_skills(vocabulary, &posting.required_skills);
        if matching.is_empty() {
            return None;
        }
        posting.matching_skills = matching;
        Some(posting)
    }
}

/// Active tag filters need an exact case-insensitive match; a posting
/// without the tag is excluded.
pub fn matches_categories(posting: &Posting, query: &JobQuery) -> bool {
    tag_matches(query.job_type.as_deref(), posting.job_type.as_deref())
        && tag_matches(query.industry.as_deref(), posting.industry.as_deref())
        && tag_matches(query.experience.as_deref(), posting.experience.as_deref())
        && tag_matches(query.education.as_deref(), posting.education.as_deref())
}

fn tag_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    let Some(wanted) = wanted.map(str::trim).filter(|value| !value.is_empty()) else {
        return true;
    };
    actual.is_some_and(|actual| actual.trim().eq_ignore_ascii_case(wanted))
}
