use chrono::Utc;
use log::info;
use serde::Serialize;

use crate::config::{AppConfig, YouTubeCredentials};
use crate::services::video_assembler::VideoData;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_BYTES: usize = 5000;
pub const MAX_TAGS_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("YouTube upload failed: {0}")]
pub struct UploadError(pub String);

/// Publishes the assembled video, chosen once at startup.
#[derive(Debug, Clone)]
pub enum Uploader {
    YouTube(YouTubeUploader),
    Placeholder,
}

impl Uploader {
    pub fn from_config(config: &AppConfig) -> Self {
        match &config.youtube {
            Some(credentials) => {
                info!("Uploader: YouTube credentials present for client {}", credentials.client_id);
                Self::YouTube(YouTubeUploader::new(credentials))
            }
            None => {
                info!("Uploader: no YouTube credentials, returning placeholder URLs");
                Self::Placeholder
            }
        }
    }

    pub async fn upload(
        &self,
        video: &VideoData,
        title: &str,
        description: &str,
    ) -> Result<String, UploadError> {
        match self {
            Self::Placeholder => Ok(placeholder_url()),
            Self::YouTube(uploader) => uploader.upload(video, title, description).await,
        }
    }
}

pub fn placeholder_url() -> String {
    format!("https://youtube.com/watch?v=demo_{}", Utc::now().timestamp_millis())
}

/// `snippet` part of a `videos.insert` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl UploadMetadata {
    pub fn new(title: &str, description: &str) -> Self {
        let mut tags: Vec<String> = Vec::new();
        let topic_tag = title.trim().to_lowercase();
        for tag in std::iter::once(topic_tag.clone()).chain(
            topic_tag
                .split_whitespace()
                .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_string()),
        ) {
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        UploadMetadata {
            title: title.trim().to_string(),
            description: description.to_string(),
            tags,
        }
    }

    /// Checks the limits YouTube enforces on video metadata.
    pub fn validate(&self) -> Result<(), UploadError> {
        if self.title.is_empty() {
            return Err(UploadError("title is empty".to_string()));
        }
        let title_chars = self.title.chars().count();
        if title_chars > MAX_TITLE_CHARS {
            return Err(UploadError(format!(
                "title is {title_chars} characters, limit is {MAX_TITLE_CHARS}"
            )));
        }
        if self.description.len() > MAX_DESCRIPTION_BYTES {
            return Err(UploadError(format!(
                "description is {} bytes, limit is {MAX_DESCRIPTION_BYTES}",
                self.description.len()
            )));
        }
        if [&self.title, &self.description]
            .iter()
            .any(|field| field.contains(['<', '>']))
        {
            return Err(UploadError("title and description may not contain '<' or '>'".to_string()));
        }
        let tags_chars: usize = self.tags.iter().map(|tag| tag.chars().count()).sum();
        if tags_chars > MAX_TAGS_CHARS {
            return Err(UploadError(format!(
                "tags total {tags_chars} characters, limit is {MAX_TAGS_CHARS}"
            )));
        }
        Ok(())
    }
}

/// Configured uploader, identified by its OAuth client id.
#[derive(Debug, Clone)]
pub struct YouTubeUploader {
    client_id: String,
}

impl YouTubeUploader {
    pub fn new(credentials: &YouTubeCredentials) -> Self {
        Self {
            client_id: credentials.client_id.clone(),
        }
    }

    pub async fn upload(
        &self,
        video: &VideoData,
        title: &str,
        description: &str,
    ) -> Result<String, UploadError> {
        let metadata = UploadMetadata::new(title, description);
        metadata.validate()?;

        // Live videos.insert is out of scope; the request is prepared and a
        // placeholder URL handed back.
        info!(
            "Prepared YouTube upload for client {}: title={:?}, tags={:?}, duration={}s",
            self.client_id,
            metadata.title,
            metadata.tags,
            video.duration
        );
        Ok(placeholder_url())
    }
}
