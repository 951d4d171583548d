//! Client-side view-model of one generation run, derived purely from the
//! status stream. The `VideoAgent` component owns one of these in a signal.

use chrono::{DateTime, Local};

use crate::types::StatusUpdate;

pub const STARTING_STATUS: &str = "Starting AI agent...";
pub const EMPTY_TOPIC_MESSAGE: &str = "Please enter a topic";
pub const REQUEST_FAILED_MESSAGE: &str = "Failed to generate video";
pub const STREAM_CLOSED_EARLY_MESSAGE: &str = "Stream closed before the video was posted";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Streaming,
    Succeeded,
    Failed,
}

/// Whether the reader should keep pulling from the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("Please enter a topic")]
    EmptyTopic,
    #[error("A video is already being generated")]
    AlreadyRunning,
}

/// Append-only, timestamped log lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientLog {
    entries: Vec<String>,
}

impl ClientLog {
    pub fn push(&mut self, message: &str, at: DateTime<Local>) {
        self.entries
            .push(format!("[{}] {message}", at.format("%-I:%M:%S %p")));
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSession {
    phase: Phase,
    status: String,
    log: ClientLog,
    video_url: Option<String>,
}

impl GenerationSession {
    /// Validates the topic and resets state for a new run.
    pub fn begin(&mut self, topic: &str) -> Result<(), SubmitError> {
        if topic.trim().is_empty() {
            return Err(SubmitError::EmptyTopic);
        }
        if self.phase == Phase::Streaming {
            return Err(SubmitError::AlreadyRunning);
        }
        *self = Self {
            phase: Phase::Streaming,
            status: STARTING_STATUS.to_string(),
            ..Self::default()
        };
        Ok(())
    }

    pub fn apply(&mut self, update: &StatusUpdate, at: DateTime<Local>) -> Flow {
        if self.phase != Phase::Streaming {
            return Flow::Stop;
        }

        if !update.status.is_empty() {
            self.status = update.status.clone();
            self.log.push(&update.status, at);
        }
        if let Some(url) = &update.video_url {
            self.video_url = Some(url.clone());
        }
        if let Some(error) = &update.error {
            self.fail(error, at);
            return Flow::Stop;
        }
        Flow::Continue
    }

    /// Transport-level failure, surfaced like an error frame.
    pub fn fail(&mut self, message: &str, at: DateTime<Local>) {
        if matches!(self.phase, Phase::Succeeded | Phase::Failed) {
            return;
        }
        self.phase = Phase::Failed;
        self.status = format!("❌ Error: {message}");
        self.log.push(&format!("Error: {message}"), at);
    }

    /// The response body ended.
    pub fn finish(&mut self, at: DateTime<Local>) {
        if self.phase != Phase::Streaming {
            return;
        }
        if self.video_url.is_some() {
            self.phase = Phase::Succeeded;
        } else {
            self.fail(STREAM_CLOSED_EARLY_MESSAGE, at);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn log(&self) -> &ClientLog {
        &self.log
    }

    /// Only exposed once the run succeeded.
    pub fn video_url(&self) -> Option<&str> {
        match self.phase {
            Phase::Succeeded | Phase::Streaming => self.video_url.as_deref(),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Streaming
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 14, 3, 9).unwrap()
    }

    fn started() -> GenerationSession {
        let mut session = GenerationSession::default();
        session.begin("black holes").unwrap();
        session
    }

    #[test]
    fn rejects_blank_topic_without_touching_state() {
        let mut session = GenerationSession::default();
        assert_eq!(session.begin("   "), Err(SubmitError::EmptyTopic));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.status().is_empty());
    }

    #[test]
    fn begin_resets_previous_run() {
        let mut session = started();
        session.apply(&StatusUpdate::completed("done", "https://x"), at());
        session.finish(at());
        assert_eq!(session.phase(), Phase::Succeeded);

        session.begin("again").unwrap();
        assert_eq!(session.status(), STARTING_STATUS);
        assert!(session.log().is_empty());
        assert_eq!(session.video_url(), None);
        assert!(session.is_loading());
    }

    #[test]
    fn refuses_second_submit_while_streaming() {
        let mut session = started();
        assert_eq!(session.begin("other"), Err(SubmitError::AlreadyRunning));
    }

    #[test]
    fn logs_only_non_empty_statuses() {
        let mut session = started();
        session.apply(&StatusUpdate::progress("one"), at());
        session.apply(&StatusUpdate::progress(""), at());
        session.apply(&StatusUpdate::progress("two"), at());
        assert_eq!(session.log().len(), 2);
        assert_eq!(session.log().entries()[0], "[2:03:09 PM] one");
        assert_eq!(session.status(), "two");
    }

    #[test]
    fn error_frame_stops_processing() {
        let mut session = started();
        assert_eq!(
            session.apply(&StatusUpdate::progress("working"), at()),
            Flow::Continue
        );
        assert_eq!(
            session.apply(&StatusUpdate::failure("Topic is required"), at()),
            Flow::Stop
        );
        assert_eq!(session.phase(), Phase::Failed);
        assert_eq!(session.status(), "❌ Error: Topic is required");
        assert_eq!(
            session.log().entries().last().unwrap(),
            "[2:03:09 PM] Error: Topic is required"
        );

        assert_eq!(session.apply(&StatusUpdate::progress("late"), at()), Flow::Stop);
        assert_eq!(session.log().len(), 2);
        session.finish(at());
        assert_eq!(session.phase(), Phase::Failed);
    }

    #[test]
    fn completes_with_result_url() {
        let mut session = started();
        session.apply(
            &StatusUpdate::completed("✅ Video posted to YouTube!", "https://youtube.com/watch?v=demo_1"),
            at(),
        );
        session.finish(at());
        assert_eq!(session.phase(), Phase::Succeeded);
        assert_eq!(session.video_url(), Some("https://youtube.com/watch?v=demo_1"));
        assert_eq!(session.status(), "✅ Video posted to YouTube!");
        assert!(!session.is_loading());
    }

    #[test]
    fn stream_ending_without_result_is_a_failure() {
        let mut session = started();
        session.apply(&StatusUpdate::progress("halfway"), at());
        session.finish(at());
        assert_eq!(session.phase(), Phase::Failed);
        assert_eq!(
            session.status(),
            format!("❌ Error: {STREAM_CLOSED_EARLY_MESSAGE}")
        );
        assert_eq!(session.video_url(), None);
    }

    #[test]
    fn transport_failure_is_reported_once() {
        let mut session = started();
        session.fail(REQUEST_FAILED_MESSAGE, at());
        session.fail("again", at());
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.status(), "❌ Error: Failed to generate video");
    }
}
