use crate::models::Posting;

const MIN_TRIMMED_TOKEN_LEN: usize = 3;

/// Thresholds for switching from strict to lenient location filtering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocationFilterConfig {
    /// Strict results below this count trigger the lenient pass...
    pub min_strict_matches: usize,
    /// ...but only when the unfiltered pool is larger than this.
    pub lenient_pool_threshold: usize,
    /// Fraction of query tokens a lenient match needs.
    pub lenient_token_ratio: f64,
}

impl Default for LocationFilterConfig {
    fn default() -> Self {
        Self {
            min_strict_matches: 5,
            lenient_pool_threshold: 10,
            lenient_token_ratio: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LocationMode {
    Unfiltered,
    Strict,
    Lenient,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LocationFilterOutcome {
    pub postings: Vec<Posting>,
    pub mode: LocationMode,
    pub strict_matches: usize,
}

#[derive(Clone, Debug, Default)]
pub struct LocationMatcher {
    config: LocationFilterConfig,
}

impl LocationMatcher {
    pub fn new(config: LocationFilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocationFilterConfig {
        &self.config
    }

    /// Every query token appears as a word of the candidate location.
    pub fn matches_strict(&self, term: &str, location: &str) -> bool {
        let tokens = location_tokens(term);
        if tokens.is_empty() {
            return true;
        }
        let words = location_tokens(location);
        tokens.iter().all(|token| words.contains(token))
    }

    /// Enough query tokens appear in the candidate location, or some token
    /// matches once its last character is dropped ("Forces" vs "Force").
    pub fn matches_lenient(&self, term: &str, location: &str) -> bool {
        let tokens = location_tokens(term);
        if tokens.is_empty() {
            return true;
        }
        let words = location_tokens(location);

        let direct = tokens.iter().filter(|token| words.contains(token)).count();
        if direct as f64 >= tokens.len() as f64 * self.config.lenient_token_ratio {
            return true;
        }

        tokens.iter().any(|token| {
            let mut chars = token.chars();
            chars.next_back();
            let trimmed = chars.as_str();
            trimmed.chars().count() >= MIN_TRIMMED_TOKEN_LEN
                && words.iter().any(|word| word.starts_with(trimmed))
        })
    }

    /// Strict filtering with a lenient retry when strict under-returns from
    /// a large enough pool.
    pub fn filter(&self, postings: Vec<Posting>, term: Option<&str>) -> LocationFilterOutcome {
        let Some(term) = term.filter(|term| !location_tokens(term).is_empty()) else {
            return LocationFilterOutcome {
                postings,
                mode: LocationMode::Unfiltered,
                strict_matches: 0,
            };
        };

        let strict: Vec<Posting> = postings
            .iter()
            .filter(|posting| self.matches_strict(term, &posting.location))
            .cloned()
            .collect();
        let strict_matches = strict.len();

        if strict_matches < self.config.min_strict_matches
            && postings.len() > self.config.lenient_pool_threshold
        {
            let lenient = postings
                .into_iter()
                .filter(|posting| self.matches_lenient(term, &posting.location))
                .collect();
            return LocationFilterOutcome {
                postings: lenient,
                mode: LocationMode::Lenient,
                strict_matches,
            };
        }

        LocationFilterOutcome {
            postings: strict,
            mode: LocationMode::Strict,
            strict_matches,
        }
    }
}

fn location_tokens(value: &str) -> Vec<String> {
    value
        .to_lowercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
