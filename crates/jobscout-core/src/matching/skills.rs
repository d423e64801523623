use std::collections::{HashMap, HashSet};

pub const DEFAULT_PREFIX_LEN: usize = 4;

/// Tunables for the fuzzy skill overlap rule.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SkillMatchConfig {
    pub prefix_len: usize,
}

impl Default for SkillMatchConfig {
    fn default() -> Self {
        Self {
            prefix_len: DEFAULT_PREFIX_LEN,
        }
    }
}

impl SkillMatchConfig {
    /// Two skills match when one contains the other (case-insensitive), or
    /// when any whitespace token pair shares a `prefix_len`-character prefix
    /// and both tokens are at least that long. Blank strings never match.
    pub fn matches(&self, left: &str, right: &str) -> bool {
        let left = left.trim().to_lowercase();
        let right = right.trim().to_lowercase();
        if left.is_empty() || right.is_empty() {
            return false;
        }

        if left.contains(&right) || right.contains(&left) {
            return true;
        }

        if self.prefix_len == 0 {
            return false;
        }

        let right_prefixes: Vec<Vec<char>> = right
            .split_whitespace()
            .filter_map(|token| prefix(token, self.prefix_len))
            .collect();

        left.split_whitespace()
            .filter_map(|token| prefix(token, self.prefix_len))
            .any(|left_prefix| right_prefixes.contains(&left_prefix))
    }

    /// Required skills matched by at least one candidate skill, in required
    /// order and without duplicates.
    pub fn matching_skills(&self, candidates: &[String], required: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        required
            .iter()
            .filter(|skill| {
                candidates
                    .iter()
                    .any(|candidate| self.matches(candidate, skill))
            })
            .filter(|skill| seen.insert(skill.trim().to_lowercase()))
            .cloned()
            .collect()
    }
}

fn prefix(token: &str, len: usize) -> Option<Vec<char>> {
    let chars: Vec<char> = token.chars().take(len).collect();
    (chars.len() == len).then_some(chars)
}

/// Fuzzy skill match with the default prefix length.
pub fn skills_match(left: &str, right: &str) -> bool {
    SkillMatchConfig::default().matches(left, right)
}

/// Maps military occupational skill tags to provider keyword codes.
#[derive(Clone, Debug, Default)]
pub struct SkillTranslator {
    table: HashMap<String, Vec<String>>,
}

const MILITARY_SKILL_TABLE: &[(&str, &[&str])] = &[
    ("supply-chain", &["supply chain", "logistics", "inventory"]),
    ("logistics", &["logistics", "distribution", "warehouse"]),
    ("infantry", &["security", "team leader", "operations"]),
    ("signals", &["telecommunications", "network technician"]),
    ("combat-engineer", &["construction", "heavy equipment", "project coordinator"]),
    ("medic", &["paramedic", "health care aide", "first aid"]),
    ("aviation-technician", &["aircraft maintenance", "aviation technician"]),
    ("intelligence", &["intelligence analyst", "data analysis"]),
    ("military-police", &["law enforcement", "security officer"]),
    ("vehicle-technician", &["automotive technician", "mechanic"]),
    ("cyber-operations", &["cybersecurity", "information security"]),
    ("leadership", &["supervisor", "manager"]),
    ("administration", &["administrative assistant", "office clerk"]),
    ("cook", &["cook", "food service"]),
];

impl SkillTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translator preloaded with the built-in military skill table.
    pub fn military() -> Self {
        Self::with_table(MILITARY_SKILL_TABLE.iter().map(|(tag, codes)| {
            (
                tag.to_string(),
                codes.iter().map(|code| code.to_string()).collect(),
            )
        }))
    }

    pub fn with_table<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let table = entries
            .into_iter()
            .map(|(tag, codes)| (tag.trim().to_lowercase(), codes))
            .collect();
        Self { table }
    }

    pub fn insert(&mut self, tag: impl AsRef<str>, codes: Vec<String>) {
        self.table.insert(tag.as_ref().trim().to_lowercase(), codes);
    }

    pub fn knows(&self, tag: &str) -> bool {
        self.table.contains_key(&tag.trim().to_lowercase())
    }

    /// Keyword terms for the given tags. Unknown tags pass through as free
    /// text; repeated terms keep their first position.
    pub fn keyword_terms(&self, skill_tags: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut terms = Vec::new();

        for tag in skill_tags {
            let trimmed = tag.trim();
            if trimmed.is_empty() {
                continue;
            }

            match self.table.get(&trimmed.to_lowercase()) {
                Some(codes) => {
                    for code in codes {
                        if seen.insert(code.to_lowercase()) {
                            terms.push(code.clone());
                        }
                    }
                }
                None => {
                    if seen.insert(trimmed.to_lowercase()) {
                        terms.push(trimmed.to_string());
                    }
                }
            }
        }

        terms
    }

    pub fn translate(&self, skill_tags: &[String]) -> String {
        self.keyword_terms(skill_tags).join(" ")
    }

    /// Free-text keywords followed by translated terms the free text does
    /// not already contain.
    pub fn keyword_expression(&self, free_text: &str, skill_tags: &[String]) -> String {
        let free_text = free_text.split_whitespace().collect::<Vec<_>>().join(" ");
        let lowered = free_text.to_lowercase();

        let mut parts = Vec::new();
        if !free_text.is_empty() {
            parts.push(free_text);
        }
        parts.extend(
            self.keyword_terms(skill_tags)
                .into_iter()
                .filter(|term| !lowered.contains(&term.to_lowercase())),
        );
        parts.join(" ")
    }
}
