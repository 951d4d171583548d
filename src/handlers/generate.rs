use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use log::{info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::{
    event_stream::{frame_channel, FrameStream},
    pipeline::PipelineRunner,
    types::{PipelineRequest, StatusUpdate},
};

pub const GENERATE_VIDEO_PATH: &str = "/generate-video";
pub const API_GENERATE_VIDEO_PATH: &str = "/api/generate-video";

/// `POST /generate-video`: streams the run's status frames.
///
/// Always answers 200 once the stream opens; failures travel inside it.
pub async fn generate_video(
    State(runner): State<Arc<PipelineRunner>>,
    payload: Result<Json<PipelineRequest>, JsonRejection>,
) -> FrameStream {
    let cancel_token = CancellationToken::new();
    let (tx, stream) = frame_channel(cancel_token.clone());

    match payload {
        Ok(Json(request)) => {
            info!("Starting video pipeline for topic: {:?}", request.topic);
            tokio::spawn(async move {
                let outcome = runner.run(&request.topic, tx, cancel_token).await;
                log::debug!("Video pipeline finished: {outcome:?}");
            });
        }
        Err(rejection) => {
            warn!("Rejected generate-video body: {rejection}");
            if tx.try_send(StatusUpdate::failure(rejection.body_text())).is_err() {
                warn!("Could not queue rejection update");
            }
        }
    }

    stream
}

/// Routes for the pipeline endpoint, mounted at both paths.
pub fn generate_routes<S>(runner: Arc<PipelineRunner>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(GENERATE_VIDEO_PATH, post(generate_video))
        .route(API_GENERATE_VIDEO_PATH, post(generate_video))
        .with_state(runner)
}
