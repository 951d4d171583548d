use serde::{Deserialize, Serialize};

/// Body of `POST /generate-video`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRequest {
    #[serde(default)]
    pub topic: String,
}

impl PipelineRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self { topic: topic.into() }
    }
}

/// One frame of the status stream.
///
/// A frame is either a progress message, a progress message carrying the
/// final `videoUrl`, or an error (with an empty `status`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: String,
    #[serde(rename = "videoUrl", default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusUpdate {
    pub fn progress(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Self::default()
        }
    }

    pub fn completed(status: impl Into<String>, video_url: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            video_url: Some(video_url.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            status: String::new(),
            video_url: None,
            error: Some(error.into()),
        }
    }

    /// Completed and failed frames end the stream.
    pub fn is_terminal(&self) -> bool {
        self.error.is_some() || self.video_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_frame_omits_optional_fields() {
        let json = serde_json::to_string(&StatusUpdate::progress("working")).unwrap();
        assert_eq!(json, r#"{"status":"working"}"#);
    }

    #[test]
    fn completed_frame_uses_camel_case_url() {
        let json =
            serde_json::to_string(&StatusUpdate::completed("done", "https://example.com")).unwrap();
        assert_eq!(json, r#"{"status":"done","videoUrl":"https://example.com"}"#);
    }

    #[test]
    fn failure_frame_has_empty_status() {
        let update = StatusUpdate::failure("Topic is required");
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"status":"","error":"Topic is required"}"#
        );
        assert!(update.is_terminal());
        assert!(!StatusUpdate::progress("working").is_terminal());
    }

    #[test]
    fn request_without_topic_defaults_to_empty() {
        let request: PipelineRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.topic, "");
    }
}
