use serde::{Deserialize, Serialize};

pub const SIMULATED_DURATION_SECS: u32 = 90;

/// Descriptor of the (simulated) rendered video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoData {
    pub title: String,
    pub description: String,
    pub script: String,
    pub duration: u32,
    pub thumbnail: String,
}

/// Stands in for voiceover, scene generation and muxing. Nothing is encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoAssembler;

impl VideoAssembler {
    pub async fn assemble(&self, script: &str, topic: &str) -> VideoData {
        VideoData {
            title: topic.to_string(),
            description: format!("A video about {topic}"),
            script: script.to_string(),
            duration: SIMULATED_DURATION_SECS,
            thumbnail: format!(
                "https://via.placeholder.com/1280x720/667eea/ffffff?text={}",
                urlencoding::encode(topic)
            ),
        }
    }
}
