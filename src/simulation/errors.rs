use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Candidate pool is empty")]
    EmptyCandidatePool,
    #[error("Message template catalog is empty")]
    EmptyTemplateCatalog,
    #[error("Role weights must be non-empty and sum to 100, got {0}")]
    InvalidWeights(u64),
}
