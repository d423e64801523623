use crate::models::{SourceDescriptor, SourceId, SourceTier};

pub const JOB_BANK_DESCRIPTOR: SourceDescriptor = SourceDescriptor {
    id: SourceId::JobBank,
    display_name: "Job Bank (Government of Canada)",
    tier: SourceTier::Official,
};

pub const ADZUNA_DESCRIPTOR: SourceDescriptor = SourceDescriptor {
    id: SourceId::Adzuna,
    display_name: "Adzuna",
    tier: SourceTier::Commercial,
};

pub const EMPLOYER_DIRECTORY_DESCRIPTOR: SourceDescriptor = SourceDescriptor {
    id: SourceId::EmployerDirectory,
    display_name: "Veteran-friendly employer directory",
    tier: SourceTier::Directory,
};

pub const SYNTHETIC_DESCRIPTOR: SourceDescriptor = SourceDescriptor {
    id: SourceId::Synthetic,
    display_name: "Synthetic fallback",
    tier: SourceTier::Synthetic,
};

static ALL_SOURCES: [SourceDescriptor; 4] = [
    JOB_BANK_DESCRIPTOR,
    ADZUNA_DESCRIPTOR,
    EMPLOYER_DIRECTORY_DESCRIPTOR,
    SYNTHETIC_DESCRIPTOR,
];

pub fn sources() -> &'static [SourceDescriptor] {
    &ALL_SOURCES
}

pub fn source(id: SourceId) -> Option<&'static SourceDescriptor> {
    ALL_SOURCES.iter().find(|descriptor| descriptor.id == id)
}
