#[cfg(feature = "ssr")]
pub mod script_writer {
    use async_openai::{
        config::OpenAIConfig,
        error::OpenAIError,
        types::{
            ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
            CreateChatCompletionRequestArgs,
        },
        Client,
    };
    use log::{debug, info, warn};
    use std::time::Duration;

    use crate::config::{AppConfig, ChatCredentials};

    const WRITER_SYSTEM_PROMPT: &str =
        "You are a professional video script writer. Create engaging, concise video scripts for YouTube.";
    const ENHANCER_SYSTEM_PROMPT: &str = "You are an expert at enhancing video scripts. Improve the script by adding better hooks, transitions, and engagement elements while keeping the same general content.";

    /// Failure of a chat-completion call. Always recovered locally.
    #[derive(Debug, thiserror::Error)]
    pub enum CollaboratorError {
        #[error("chat completion failed: {0}")]
        OpenAi(#[from] OpenAIError),
        #[error("chat completion timed out after {0:?}")]
        Timeout(Duration),
        #[error("chat completion returned no content")]
        EmptyCompletion,
    }

    /// Script generation and enhancement, chosen once at startup.
    #[derive(Clone)]
    pub enum ScriptWriter {
        OpenAi(OpenAiScriptWriter),
        Local,
    }

    impl ScriptWriter {
        pub fn from_config(config: &AppConfig) -> Self {
            match &config.chat {
                Some(credentials) => {
                    info!("Script writer: chat completions via {}", credentials.api_base);
                    Self::OpenAi(OpenAiScriptWriter::new(
                        credentials,
                        config.collaborator_timeout,
                    ))
                }
                None => {
                    info!("Script writer: no API key configured, using local templates");
                    Self::Local
                }
            }
        }

        pub async fn generate(&self, topic: &str) -> String {
            match self {
                Self::Local => demo_script(topic),
                Self::OpenAi(writer) => match writer.generate(topic).await {
                    Ok(script) => script,
                    Err(e) => {
                        warn!("Script generation fell back to local template: {e}");
                        demo_script(topic)
                    }
                },
            }
        }

        pub async fn enhance(&self, script: &str) -> String {
            match self {
                Self::Local => demo_enhance(script),
                Self::OpenAi(writer) => match writer.enhance(script).await {
                    Ok(enhanced) => enhanced,
                    Err(e) => {
                        warn!("Script enhancement fell back to local markup: {e}");
                        demo_enhance(script)
                    }
                },
            }
        }
    }

    #[derive(Clone)]
    pub struct OpenAiScriptWriter {
        client: Client<OpenAIConfig>,
        model: String,
        timeout: Duration,
    }

    impl OpenAiScriptWriter {
        pub fn new(credentials: &ChatCredentials, timeout: Duration) -> Self {
            let config = OpenAIConfig::new()
                .with_api_key(credentials.api_key.clone())
                .with_api_base(credentials.api_base.clone());
            let http_client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default();
            let client = Client::with_config(config).with_http_client(http_client);

            OpenAiScriptWriter {
                client,
                model: credentials.model.clone(),
                timeout,
            }
        }

        pub async fn generate(&self, topic: &str) -> Result<String, CollaboratorError> {
            let prompt = format!(
                "Write a 60-90 second video script about: {topic}. Make it engaging, informative, and perfect for YouTube."
            );
            self.complete(WRITER_SYSTEM_PROMPT, &prompt, 0.8).await
        }

        pub async fn enhance(&self, script: &str) -> Result<String, CollaboratorError> {
            let prompt = format!(
                "Enhance this video script to make it more engaging and professional:\n\n{script}"
            );
            self.complete(ENHANCER_SYSTEM_PROMPT, &prompt, 0.7).await
        }

        async fn complete(
            &self,
            system: &str,
            user: &str,
            temperature: f32,
        ) -> Result<String, CollaboratorError> {
            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .temperature(temperature)
                .messages([
                    ChatCompletionRequestSystemMessageArgs::default()
                        .content(system)
                        .build()?
                        .into(),
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(user)
                        .build()?
                        .into(),
                ])
                .build()?;

            debug!("Requesting chat completion from model {}", self.model);

            let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
                .await
                .map_err(|_| CollaboratorError::Timeout(self.timeout))??;

            response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .filter(|content| !content.trim().is_empty())
                .ok_or(CollaboratorError::EmptyCompletion)
        }
    }

    pub fn demo_script(topic: &str) -> String {
        format!(
            "Welcome to our video about {topic}!

In this video, we'll explore some fascinating aspects of {topic} that you might not know about.

First, let's understand what makes {topic} so interesting. Many people are curious about this topic because it affects our daily lives in unexpected ways.

Second, we'll dive into some surprising facts. Did you know that {topic} has been studied for decades, and researchers continue to make new discoveries?

Third, we'll look at practical applications. Understanding {topic} can help you make better decisions and improve your knowledge.

Finally, we'll wrap up with key takeaways that you can use right away.

Thanks for watching! Don't forget to like and subscribe for more content."
        )
    }

    /// Marks pauses between paragraphs and tags the opening and closing lines.
    pub fn demo_enhance(script: &str) -> String {
        script
            .replace("\n\n", "\n\n[PAUSE]\n\n")
            .replacen("Welcome", "[ENTHUSIASTIC] Welcome", 1)
            .replacen("Thanks for watching", "[WARM] Thanks for watching", 1)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn demo_script_mentions_topic_in_every_body_paragraph() {
            let script = demo_script("black holes");
            assert!(script.starts_with("Welcome to our video about black holes!"));
            assert!(script.ends_with("like and subscribe for more content."));
            assert_eq!(script.matches("black holes").count(), 5);
            assert_eq!(script.split("\n\n").count(), 7);
        }

        #[test]
        fn demo_enhance_inserts_pause_markers_and_tone_tags() {
            let enhanced = demo_enhance("Welcome here!\n\nMiddle.\n\nThanks for watching!");
            assert_eq!(
                enhanced,
                "[ENTHUSIASTIC] Welcome here!\n\n[PAUSE]\n\nMiddle.\n\n[PAUSE]\n\n[WARM] Thanks for watching!"
            );
        }

        #[test]
        fn demo_enhance_is_deterministic() {
            let script = demo_script("tides");
            assert_eq!(demo_enhance(&script), demo_enhance(&script));
            assert_eq!(demo_enhance(&script).matches("[PAUSE]").count(), 6);
        }

        #[test]
        fn demo_enhance_only_tags_first_occurrence() {
            let enhanced = demo_enhance("Welcome. Welcome.");
            assert_eq!(enhanced, "[ENTHUSIASTIC] Welcome. Welcome.");
        }

        #[tokio::test]
        async fn local_writer_uses_templates() {
            let writer = ScriptWriter::Local;
            let script = writer.generate("volcanoes").await;
            assert_eq!(script, demo_script("volcanoes"));
            assert_eq!(writer.enhance(&script).await, demo_enhance(&script));
        }

        #[tokio::test]
        async fn unreachable_api_falls_back_to_local_template() {
            let credentials = ChatCredentials {
                api_key: "sk-test".to_string(),
                api_base: "http://127.0.0.1:1/v1".to_string(),
                model: "gpt-4".to_string(),
            };
            let writer = ScriptWriter::OpenAi(OpenAiScriptWriter::new(
                &credentials,
                Duration::from_secs(5),
            ));

            let script = writer.generate("volcanoes").await;
            assert_eq!(script, demo_script("volcanoes"));
            assert_eq!(writer.enhance(&script).await, demo_enhance(&script));
        }

        #[tokio::test]
        async fn silent_api_times_out_and_falls_back() {
            // Connections land in the backlog and are never answered.
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            let credentials = ChatCredentials {
                api_key: "sk-test".to_string(),
                api_base: format!("http://{addr}/v1"),
                model: "gpt-4".to_string(),
            };
            let writer = OpenAiScriptWriter::new(&credentials, Duration::from_millis(300));

            let started = std::time::Instant::now();
            assert!(writer.generate("tides").await.is_err());
            assert!(started.elapsed() < Duration::from_secs(5));

            let script = ScriptWriter::OpenAi(writer).generate("tides").await;
            assert_eq!(script, demo_script("tides"));
            drop(listener);
        }
    }
}

#[cfg(feature = "ssr")]
pub use script_writer::*;
