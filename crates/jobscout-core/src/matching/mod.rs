pub mod location;
pub mod skills;

pub use location::{
    LocationFilterConfig, LocationFilterOutcome, LocationMatcher, LocationMode,
};
pub use skills::{DEFAULT_PREFIX_LEN, SkillMatchConfig, SkillTranslator, skills_match};
