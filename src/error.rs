use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no user found for {0}")]
    SubjectNotFound(String),
    #[error("{name} has role '{role}', only students can be analyzed")]
    NotAStudent { name: String, role: String },
}
