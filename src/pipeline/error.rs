use thiserror::Error;

use crate::services::UploadError;

pub const TOPIC_REQUIRED: &str = "Topic is required";
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Failures that end a run. Collaborator failures never reach this type;
/// they are absorbed by the local fallbacks.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("{0}")]
    Unknown(String),

    /// The client went away. Nothing is reported.
    #[error("pipeline cancelled")]
    Cancelled,
}

impl PipelineError {
    pub fn topic_required() -> Self {
        Self::Validation(TOPIC_REQUIRED.to_string())
    }

    /// Text carried by the error frame.
    pub fn client_message(&self) -> String {
        match self {
            Self::Unknown(message) if message.trim().is_empty() => UNKNOWN_ERROR.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_sent_to_client() {
        assert_eq!(PipelineError::topic_required().client_message(), "Topic is required");
        assert_eq!(
            PipelineError::from(UploadError("quota".into())).client_message(),
            "YouTube upload failed: quota"
        );
        assert_eq!(PipelineError::Unknown(String::new()).client_message(), UNKNOWN_ERROR);
        assert_eq!(PipelineError::Unknown("disk full".into()).client_message(), "disk full");
    }
}
