//! Startup configuration, read once from the environment.

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(60);

/// Chat-completion access for the script stages.
#[derive(Clone)]
pub struct ChatCredentials {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}

impl std::fmt::Debug for ChatCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCredentials")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

/// OAuth triple for the YouTube uploader.
#[derive(Clone)]
pub struct YouTubeCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for YouTubeCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` selects the local script templates.
    pub chat: Option<ChatCredentials>,
    /// `None` selects the placeholder uploader.
    pub youtube: Option<YouTubeCredentials>,
    pub collaborator_timeout: Duration,
    /// Simulated per-stage delays.
    pub stage_pacing: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chat: None,
            youtube: None,
            collaborator_timeout: DEFAULT_COLLABORATOR_TIMEOUT,
            stage_pacing: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let chat = get("OPENAI_API_KEY")
            .or_else(|| get("ANTHROPIC_API_KEY"))
            .map(|api_key| ChatCredentials {
                api_key,
                api_base: get("OPENAI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            });

        let youtube = match (
            get("GOOGLE_CLIENT_ID"),
            get("GOOGLE_CLIENT_SECRET"),
            get("GOOGLE_REFRESH_TOKEN"),
        ) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => {
                Some(YouTubeCredentials {
                    client_id,
                    client_secret,
                    refresh_token,
                })
            }
            _ => None,
        };

        Self {
            chat,
            youtube,
            collaborator_timeout: get("COLLABORATOR_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_COLLABORATOR_TIMEOUT),
            stage_pacing: get("STAGE_PACING")
                .map(|s| !matches!(s.to_lowercase().as_str(), "false" | "0" | "off" | "no"))
                .unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_selects_every_fallback() {
        let config = config(&[]);
        assert!(config.chat.is_none());
        assert!(config.youtube.is_none());
        assert_eq!(config.collaborator_timeout, DEFAULT_COLLABORATOR_TIMEOUT);
        assert!(config.stage_pacing);
    }

    #[test]
    fn anthropic_key_is_used_when_openai_key_missing() {
        let config = config(&[("OPENAI_API_KEY", "  "), ("ANTHROPIC_API_KEY", "sk-ant")]);
        let chat = config.chat.unwrap();
        assert_eq!(chat.api_key, "sk-ant");
        assert_eq!(chat.api_base, DEFAULT_API_BASE);
        assert_eq!(chat.model, DEFAULT_MODEL);
    }

    #[test]
    fn openai_key_wins() {
        let config = config(&[("OPENAI_API_KEY", "sk-oa"), ("ANTHROPIC_API_KEY", "sk-ant")]);
        assert_eq!(config.chat.unwrap().api_key, "sk-oa");
    }

    #[test]
    fn youtube_needs_all_three_credentials() {
        let partial = config(&[("GOOGLE_CLIENT_ID", "id"), ("GOOGLE_CLIENT_SECRET", "secret")]);
        assert!(partial.youtube.is_none());

        let full = config(&[
            ("GOOGLE_CLIENT_ID", "id"),
            ("GOOGLE_CLIENT_SECRET", "secret"),
            ("GOOGLE_REFRESH_TOKEN", "token"),
        ]);
        assert_eq!(full.youtube.unwrap().refresh_token, "token");
    }

    #[test]
    fn parses_timeout_and_pacing() {
        let config = config(&[("COLLABORATOR_TIMEOUT_SECS", "5"), ("STAGE_PACING", "Off")]);
        assert_eq!(config.collaborator_timeout, Duration::from_secs(5));
        assert!(!config.stage_pacing);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = config(&[
            ("OPENAI_API_KEY", "sk-secret"),
            ("GOOGLE_CLIENT_ID", "id"),
            ("GOOGLE_CLIENT_SECRET", "shh"),
            ("GOOGLE_REFRESH_TOKEN", "tok"),
        ]);
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("shh"));
        assert!(!debug.contains("tok\""));
    }
}
