use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jobscout_core::models::JobQuery;

/// jobscout - search job postings across Canadian job sources
#[derive(Parser, Debug)]
#[command(name = "jobscout", version, about)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, env = "JOBSCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one aggregated search and print the result as JSON
    Search(SearchArgs),

    /// List configured sources in fallback order
    Sources,

    /// Show the keyword expression for military skill tags
    Translate {
        /// Skill tags, e.g. supply-chain signals
        #[arg(required = true)]
        tags: Vec<String>,
    },
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text keywords
    #[arg(default_value = "")]
    pub keywords: String,

    #[arg(long, short)]
    pub location: Option<String>,

    /// Search radius in kilometres
    #[arg(long)]
    pub radius_km: Option<u32>,

    #[arg(long)]
    pub job_type: Option<String>,

    #[arg(long)]
    pub industry: Option<String>,

    #[arg(long)]
    pub experience: Option<String>,

    #[arg(long)]
    pub education: Option<String>,

    /// Skill tag; repeat for several
    #[arg(long = "skill", short = 's')]
    pub skills: Vec<String>,

    /// Two-letter country scope
    #[arg(long, default_value = "ca")]
    pub country: String,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Candidate profile (JSON) used to rank results before paging
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Skip the cache read
    #[arg(long)]
    pub force_refresh: bool,

    /// Print at most this many postings
    #[arg(long)]
    pub limit: Option<usize>,
}

impl SearchArgs {
    pub fn to_query(&self) -> JobQuery {
        let mut query = JobQuery::new(self.keywords.clone())
            .with_skills(self.skills.iter().cloned())
            .with_country(self.country.clone())
            .with_page(self.page);
        query.location = self.location.clone();
        query.radius_km = self.radius_km;
        query.job_type = self.job_type.clone();
        query.industry = self.industry.clone();
        query.experience = self.experience.clone();
        query.education = self.education.clone();
        query
    }
}
