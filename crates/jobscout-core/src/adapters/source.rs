use crate::models::{CoreError, JobQuery, Posting, SourceDescriptor};

pub type AdapterResult<T> = Result<T, CoreError>;

/// What the aggregator hands to every source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceRequest {
    pub query: JobQuery,
    /// Free-text keywords merged with translated skill codes.
    pub keywords: String,
    /// Translated skill codes on their own, for sources that tag skills.
    pub skill_terms: Vec<String>,
    pub page: u32,
    pub per_page: u32,
}

impl SourceRequest {
    pub fn new(query: JobQuery, keywords: impl Into<String>, page: u32, per_page: u32) -> Self {
        Self {
            query,
            keywords: keywords.into(),
            skill_terms: Vec::new(),
            page,
            per_page,
        }
    }

    pub fn with_skill_terms(mut self, skill_terms: Vec<String>) -> Self {
        self.skill_terms = skill_terms;
        self
    }

    /// Skill tags and their translated terms, tags first.
    pub fn skill_vocabulary(&self) -> Vec<String> {
        self.query
            .skills
            .iter()
            .chain(self.skill_terms.iter())
            .cloned()
            .collect()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SourcePage {
    pub postings: Vec<Posting>,
    pub total_count: usize,
    pub total_pages: u32,
}

impl SourcePage {
    pub fn new(postings: Vec<Posting>, total_count: usize, per_page: u32) -> Self {
        Self {
            postings,
            total_count,
            total_pages: total_count.div_ceil(per_page.max(1) as usize) as u32,
        }
    }
}

/// One upstream job provider behind the uniform search contract.
///
/// Implementations translate the request into the provider's own shape and
/// the provider's response into postings. They never fall back to another
/// provider; the aggregator owns the chain.
pub trait JobSourceAdapter: Send + Sync {
    fn descriptor(&self) -> &SourceDescriptor;

    fn search(&self, request: &SourceRequest) -> AdapterResult<SourcePage>;
}

/// Case-insensitive subset of `vocabulary` mentioned in `text`, in
/// vocabulary order. Used by sources whose payloads carry no skill list.
pub(crate) fn mentioned_skills(text: &str, vocabulary: &[String]) -> Vec<String> {
    let haystack = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();
    for term in vocabulary {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() || !haystack.contains(&needle) {
            continue;
        }
        if !found.iter().any(|existing| existing.eq_ignore_ascii_case(term.trim())) {
            found.push(term.trim().to_string());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(SourcePage::new(Vec::new(), 41, 20).total_pages, 3);
        assert_eq!(SourcePage::new(Vec::new(), 0, 20).total_pages, 0);
        assert_eq!(SourcePage::new(Vec::new(), 3, 0).total_pages, 3);
    }

    #[test]
    fn vocabulary_lists_tags_before_terms() {
        let request = SourceRequest::new(
            JobQuery::new("driver").with_skills(["logistics"]),
            "driver logistics",
            1,
            20,
        )
        .with_skill_terms(vec!["distribution".to_string()]);

        assert_eq!(
            request.skill_vocabulary(),
            vec!["logistics".to_string(), "distribution".to_string()]
        );
    }

    #[test]
    fn mentioned_skills_are_case_insensitive_and_unique() {
        let vocabulary = vec![
            "Forklift".to_string(),
            "forklift".to_string(),
            "welding".to_string(),
        ];
        assert_eq!(
            mentioned_skills("Operate a FORKLIFT safely", &vocabulary),
            vec!["Forklift".to_string()]
        );
    }
}
