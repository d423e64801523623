use std::collections::HashSet;

use crate::adapters::source::{AdapterResult, JobSourceAdapter, SourcePage, SourceRequest};
use crate::models::{Posting, SourceDescriptor, SourceId};
use crate::registry::EMPLOYER_DIRECTORY_DESCRIPTOR;

/// Keyword tokens shorter than this are ignored when matching.
const MIN_KEYWORD_LEN: usize = 3;

struct DirectoryEntry {
    id: &'static str,
    title: &'static str,
    employer: &'static str,
    location: &'static str,
    description: &'static str,
    job_type: &'static str,
    industry: &'static str,
    skills: &'static [&'static str],
    noc: &'static str,
    clearance: Option<&'static str>,
    remote: bool,
}

const BUILTIN_DIRECTORY: &[DirectoryEntry] = &[
    DirectoryEntry {
        id: "cn-rail-yard-coordinator",
        title: "Rail Yard Operations Coordinator",
        employer: "Canadian National Railway",
        location: "Winnipeg, MB",
        description: "Coordinate yard logistics and crew scheduling. Military leadership experience valued.",
        job_type: "full-time",
        industry: "Transportation",
        skills: &["logistics", "scheduling", "team leadership"],
        noc: "73301",
        clearance: None,
        remote: false,
    },
    DirectoryEntry {
        id: "cae-simulator-technician",
        title: "Flight Simulator Technician",
        employer: "CAE",
        location: "Montreal, QC",
        description: "Maintain full-flight simulators. Aviation technician background preferred.",
        job_type: "full-time",
        industry: "Aerospace",
        skills: &["aircraft maintenance", "electronics", "troubleshooting"],
        noc: "22311",
        clearance: Some("Reliability"),
        remote: false,
    },
    DirectoryEntry {
        id: "commissionaires-security-supervisor",
        title: "Security Supervisor",
        employer: "Commissionaires",
        location: "Ottawa, ON",
        description: "Supervise site security teams at federal facilities.",
        job_type: "full-time",
        industry: "Security",
        skills: &["security", "supervisor", "incident reporting"],
        noc: "64410",
        clearance: Some("Secret"),
        remote: false,
    },
    DirectoryEntry {
        id: "telus-network-technician",
        title: "Network Technician",
        employer: "TELUS",
        location: "Calgary, AB",
        description: "Install and troubleshoot telecommunications networks.",
        job_type: "full-time",
        industry: "Telecommunications",
        skills: &["telecommunications", "network technician", "fibre optics"],
        noc: "22310",
        clearance: None,
        remote: false,
    },
    DirectoryEntry {
        id: "loblaw-distribution-lead",
        title: "Distribution Centre Team Lead",
        employer: "Loblaw Companies",
        location: "Toronto, ON",
        description: "Lead warehouse inventory and distribution shifts.",
        job_type: "full-time",
        industry: "Retail",
        skills: &["warehouse", "inventory", "distribution"],
        noc: "72024",
        clearance: None,
        remote: false,
    },
    DirectoryEntry {
        id: "bell-cybersecurity-analyst",
        title: "Cybersecurity Analyst",
        employer: "Bell Canada",
        location: "Toronto, ON",
        description: "Monitor and respond to information security events.",
        job_type: "full-time",
        industry: "Telecommunications",
        skills: &["cybersecurity", "information security", "incident response"],
        noc: "21220",
        clearance: Some("Secret"),
        remote: true,
    },
    DirectoryEntry {
        id: "ledcor-heavy-equipment",
        title: "Heavy Equipment Operator",
        employer: "Ledcor Group",
        location: "Edmonton, AB",
        description: "Operate heavy equipment on construction projects.",
        job_type: "contract",
        industry: "Construction",
        skills: &["heavy equipment", "construction", "site safety"],
        noc: "73400",
        clearance: None,
        remote: false,
    },
    DirectoryEntry {
        id: "ahs-primary-care-paramedic",
        title: "Primary Care Paramedic",
        employer: "Alberta Health Services",
        location: "Red Deer, AB",
        description: "Respond to emergency calls. Former medics encouraged to apply.",
        job_type: "full-time",
        industry: "Health Care",
        skills: &["paramedic", "first aid", "patient care"],
        noc: "32102",
        clearance: None,
        remote: false,
    },
    DirectoryEntry {
        id: "canadian-tire-automotive-technician",
        title: "Automotive Service Technician",
        employer: "Canadian Tire",
        location: "Halifax, NS",
        description: "Diagnose and repair vehicles in a busy service bay.",
        job_type: "full-time",
        industry: "Automotive",
        skills: &["automotive technician", "mechanic", "diagnostics"],
        noc: "72410",
        clearance: None,
        remote: false,
    },
    DirectoryEntry {
        id: "pspc-administrative-officer",
        title: "Administrative Officer",
        employer: "Public Services and Procurement Canada",
        location: "Gatineau, QC",
        description: "Provide administrative support to a procurement directorate.",
        job_type: "full-time",
        industry: "Public Administration",
        skills: &["administrative assistant", "records management"],
        noc: "13100",
        clearance: Some("Reliability"),
        remote: true,
    },
];

/// Serves postings from a fixed list of veteran-friendly employers.
pub struct EmployerDirectoryAdapter {
    postings: Vec<Posting>,
}

impl EmployerDirectoryAdapter {
    pub fn new(postings: Vec<Posting>) -> Self {
        Self { postings }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_DIRECTORY.iter().map(entry_posting).collect())
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

impl Default for EmployerDirectoryAdapter {
    fn default() -> Self {
        Self::builtin()
    }
}

impl JobSourceAdapter for EmployerDirectoryAdapter {
    fn descriptor(&self) -> &SourceDescriptor {
        &EMPLOYER_DIRECTORY_DESCRIPTOR
    }

    fn search(&self, request: &SourceRequest) -> AdapterResult<SourcePage> {
        let tokens = keyword_tokens(&request.keywords);
        let matched: Vec<Posting> = self
            .postings
            .iter()
            .filter(|posting| tokens.is_empty() || mentions_any(posting, &tokens))
            .cloned()
            .collect();

        let total_count = matched.len();
        let per_page = request.per_page.max(1) as usize;
        let start = (request.page.max(1) as usize - 1).saturating_mul(per_page);
        let postings = matched.into_iter().skip(start).take(per_page).collect();
        Ok(SourcePage::new(postings, total_count, request.per_page))
    }
}

fn entry_posting(entry: &DirectoryEntry) -> Posting {
    let mut posting = Posting::new(
        SourceId::EmployerDirectory,
        entry.id,
        entry.title,
        entry.employer,
        entry.location,
    );
    posting.description = entry.description.to_string();
    posting.job_type = Some(entry.job_type.to_string());
    posting.industry = Some(entry.industry.to_string());
    posting.required_skills = entry.skills.iter().map(|skill| skill.to_string()).collect();
    posting.occupational_codes = vec![entry.noc.to_string()];
    posting.clearance = entry.clearance.map(str::to_string);
    posting.remote = entry.remote;
    posting
}

/// Distinct lower-cased keyword tokens, in first-seen order.
fn keyword_tokens(keywords: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .to_lowercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_KEYWORD_LEN)
        .filter(|token| seen.insert(token.to_string()))
        .map(str::to_string)
        .collect()
}

fn mentions_any(posting: &Posting, tokens: &[String]) -> bool {
    let title = posting.title.to_lowercase();
    let description = posting.description.to_lowercase();
    let skills = posting.required_skills.join(" ").to_lowercase();
    tokens.iter().any(|token| {
        title.contains(token.as_str())
            || description.contains(token.as_str())
            || skills.contains(token.as_str())
    })
}
