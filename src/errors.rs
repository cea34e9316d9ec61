use crate::models::ToastSeverity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("VALIDATION: {0}")]
    Validation(String),
    #[error("DATA_ABSENT: {0}")]
    DataAbsence(String),
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    #[error("COLLABORATOR_FAILED: {0}")]
    Collaborator(String),
    #[error("IO_FAILURE: {0}")]
    Io(String),
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl AppError {
    /// Message shown to the agent, without the error-code prefix.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::DataAbsence(message)
            | Self::NotFound(message)
            | Self::Collaborator(message)
            | Self::Io(message)
            | Self::Internal(message) => message,
        }
    }

    pub fn toast_severity(&self) -> ToastSeverity {
        match self {
            Self::Validation(_) | Self::NotFound(_) => ToastSeverity::Warning,
            Self::DataAbsence(_) | Self::Collaborator(_) | Self::Io(_) | Self::Internal(_) => {
                ToastSeverity::Error
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Internal(value.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
