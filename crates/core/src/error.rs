use records::RecordsError;

#[derive(Debug, thiserror::Error)]
pub enum PatientorError {
    /// A referenced record does not exist.
    #[error("{0}")]
    NotFound(String),
    /// A payload failed validation.
    #[error("{0}")]
    Validation(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read fixture file {path}: {source}", path = path.display())]
    FixtureRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {name} fixtures: {source}")]
    FixtureParse {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("patient store lock poisoned")]
    StorePoisoned,
}

impl From<RecordsError> for PatientorError {
    fn from(err: RecordsError) -> Self {
        match err {
            RecordsError::Validation(msg) => PatientorError::Validation(msg),
            RecordsError::InvalidInput(msg) => PatientorError::InvalidInput(msg),
        }
    }
}

pub type PatientorResult<T> = std::result::Result<T, PatientorError>;
