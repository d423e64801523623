use crate::models::{CandidateProfile, Posting, SearchResult};
use crate::scoring::MatchScorer;

/// Orders postings by descending match score.
#[derive(Clone, Debug, Default)]
pub struct RecommendationEngine {
    scorer: MatchScorer,
}

impl RecommendationEngine {
    pub fn new(scorer: MatchScorer) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    /// Attaches `match_score` and `matching_skills` to every posting and
    /// sorts descending. Equal scores keep their input order.
    pub fn rank(&self, postings: Vec<Posting>, profile: &CandidateProfile) -> Vec<Posting> {
        let mut ranked: Vec<Posting> = postings
            .into_iter()
            .map(|mut posting| {
                let score = self.scorer.score(&posting, profile);
                posting.match_score = Some(score.value);
                posting.matching_skills = score.matching_skills;
                posting
            })
            .collect();

        ranked.sort_by(|left, right| right.match_score.cmp(&left.match_score));
        ranked
    }

    /// The `limit` best postings.
    pub fn top(&self, postings: Vec<Posting>, profile: &CandidateProfile, limit: usize) -> Vec<Posting> {
        let mut ranked = self.rank(postings, profile);
        ranked.truncate(limit);
        ranked
    }

    pub fn rank_result(&self, result: &SearchResult, profile: &CandidateProfile) -> SearchResult {
        result.with_postings(self.rank(result.postings.clone(), profile))
    }
}
