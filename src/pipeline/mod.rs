//! Sequential video pipeline: script → enhanced script → video → upload.
//!
//! Every stage emits a start and a done update on the sink; the run ends with
//! exactly one terminal update (completed with the video URL, or an error).

pub mod error;
pub mod stage;

use futures::FutureExt;
use log::{error, info, warn};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::services::{ScriptWriter, Uploader, VideoAssembler};
use crate::types::StatusUpdate;

pub use error::PipelineError;
pub use stage::{PipelineState, Stage};

/// The external steps a run delegates to.
#[derive(Clone)]
pub struct Collaborators {
    pub writer: ScriptWriter,
    pub assembler: VideoAssembler,
    pub uploader: Uploader,
}

impl Collaborators {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            writer: ScriptWriter::from_config(config),
            assembler: VideoAssembler,
            uploader: Uploader::from_config(config),
        }
    }

    /// No credentials: local templates and placeholder uploads.
    pub fn local() -> Self {
        Self {
            writer: ScriptWriter::Local,
            assembler: VideoAssembler,
            uploader: Uploader::Placeholder,
        }
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed { video_url: String },
    Failed(PipelineError),
    Cancelled,
}

pub struct PipelineRunner {
    collaborators: Collaborators,
    pacing: bool,
}

impl PipelineRunner {
    pub fn new(collaborators: Collaborators, pacing: bool) -> Self {
        Self {
            collaborators,
            pacing,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        if config.stage_pacing {
            let total: Duration = Stage::ALL.iter().map(|stage| stage.pacing()).sum();
            info!("Stage pacing on, {}ms of simulated work per run", total.as_millis());
        }
        Self::new(Collaborators::from_config(config), config.stage_pacing)
    }

    /// Runs every stage for `topic`, writing updates to `sink` as they happen.
    ///
    /// Stops without further updates once `cancel` fires or the sink closes.
    pub async fn run(
        &self,
        topic: &str,
        sink: mpsc::Sender<StatusUpdate>,
        cancel: CancellationToken,
    ) -> RunOutcome {
        let mut emitter = Emitter::new(&sink);
        let result = self.execute(topic, &mut emitter, &cancel).await;

        match result {
            Ok(video_url) => {
                info!("Pipeline completed for topic {topic:?}: {video_url}");
                RunOutcome::Completed { video_url }
            }
            Err(PipelineError::Cancelled) => {
                warn!("Pipeline for topic {topic:?} cancelled in state {:?}", emitter.state);
                RunOutcome::Cancelled
            }
            Err(e) => {
                error!("Pipeline failed for topic {topic:?} in state {:?}: {e}", emitter.state);
                emitter.fail(&e).await;
                RunOutcome::Failed(e)
            }
        }
    }

    async fn execute(
        &self,
        topic: &str,
        emitter: &mut Emitter<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, PipelineError> {
        if topic.trim().is_empty() {
            return Err(PipelineError::topic_required());
        }
        let Collaborators {
            writer,
            assembler,
            uploader,
        } = &self.collaborators;

        let script = self
            .run_stage(emitter, cancel, Stage::Script, async {
                Ok(writer.generate(topic).await)
            })
            .await?;
        emitter.done(Stage::Script).await?;

        let enhanced = self
            .run_stage(emitter, cancel, Stage::Enhance, async {
                Ok(writer.enhance(&script).await)
            })
            .await?;
        emitter.done(Stage::Enhance).await?;

        let video = self
            .run_stage(emitter, cancel, Stage::Assemble, async {
                Ok(assembler.assemble(&enhanced, topic).await)
            })
            .await?;
        emitter.done(Stage::Assemble).await?;

        let video_url = self
            .run_stage(emitter, cancel, Stage::Upload, async {
                Ok(uploader.upload(&video, topic, &enhanced).await?)
            })
            .await?;
        emitter.complete(&video_url).await?;

        Ok(video_url)
    }

    async fn run_stage<T, F>(
        &self,
        emitter: &mut Emitter<'_>,
        cancel: &CancellationToken,
        stage: Stage,
        action: F,
    ) -> Result<T, PipelineError>
    where
        F: Future<Output = Result<T, PipelineError>>,
    {
        emitter.start(stage).await?;

        if self.pacing {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
                _ = tokio::time::sleep(stage.pacing()) => {}
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PipelineError::Cancelled),
            result = AssertUnwindSafe(action).catch_unwind() => {
                result.unwrap_or_else(|panic| Err(PipelineError::Unknown(panic_message(panic.as_ref()))))
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_default()
}

/// Writes updates for one run and tracks where the run is.
struct Emitter<'a> {
    sink: &'a mpsc::Sender<StatusUpdate>,
    state: PipelineState,
}

impl<'a> Emitter<'a> {
    fn new(sink: &'a mpsc::Sender<StatusUpdate>) -> Self {
        Self {
            sink,
            state: PipelineState::Idle,
        }
    }

    async fn send(&self, update: StatusUpdate) -> Result<(), PipelineError> {
        self.sink
            .send(update)
            .await
            .map_err(|_| PipelineError::Cancelled)
    }

    async fn start(&mut self, stage: Stage) -> Result<(), PipelineError> {
        if !self.state.can_start(stage) {
            return Err(PipelineError::Unknown(format!(
                "stage {} cannot start from {:?}",
                stage.name(),
                self.state
            )));
        }
        info!("Stage {} started", stage.name());
        self.state = PipelineState::Running(stage);
        self.send(StatusUpdate::progress(stage.start_message())).await
    }

    async fn done(&mut self, stage: Stage) -> Result<(), PipelineError> {
        info!("Stage {} done", stage.name());
        self.state = PipelineState::Done(stage);
        self.send(StatusUpdate::progress(stage.done_message())).await
    }

    async fn complete(&mut self, video_url: &str) -> Result<(), PipelineError> {
        self.state = PipelineState::Completed;
        self.send(StatusUpdate::completed(Stage::Upload.done_message(), video_url))
            .await
    }

    async fn fail(&mut self, err: &PipelineError) {
        if self.state.is_terminal() {
            return;
        }
        self.state = PipelineState::Errored;
        if self.send(StatusUpdate::failure(err.client_message())).await.is_err() {
            warn!("Could not deliver error update, client already gone");
        }
    }
}
