pub mod recommendation;
pub mod scorer;

pub use recommendation::RecommendationEngine;
pub use scorer::{MatchScore, MatchScorer, ScoreContribution, ScoreFactor, ScoringWeights};
