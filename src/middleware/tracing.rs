use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// Wraps every request in a span tagged with a fresh `request_id`.
///
/// For the event-stream endpoint the span closes when headers are sent, not
/// when the stream ends.
pub async fn trace_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let span = tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    );

    async move {
        let response = next.run(request).await;
        tracing::info!(status = %response.status(), "request completed");
        response
    }
    .instrument(span)
    .await
}
