use axum::{
    body::{Body, Bytes},
    response::{IntoResponse, Response},
};
use futures::stream::Stream;
use http::header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE};
use std::{
    convert::Infallible,
    pin::Pin,
    task::{ready, Context, Poll},
};
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::sse_codec::encode_frame;
use crate::types::StatusUpdate;

/// Response body fed by a pipeline run.
///
/// Each update is encoded into its own frame as soon as it arrives. The body
/// ends after the first terminal update. Dropping the stream (the client hung
/// up) cancels the run's token.
pub struct FrameStream {
    receiver: mpsc::Receiver<StatusUpdate>,
    finished: bool,
    _cancel_on_drop: DropGuard,
}

impl FrameStream {
    pub fn new(receiver: mpsc::Receiver<StatusUpdate>, cancel_token: CancellationToken) -> Self {
        Self {
            receiver,
            finished: false,
            _cancel_on_drop: cancel_token.drop_guard(),
        }
    }
}

impl Stream for FrameStream {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }
        let Some(update) = ready!(self.receiver.poll_recv(cx)) else {
            return Poll::Ready(None);
        };
        if update.is_terminal() {
            self.finished = true;
            self.receiver.close();
        }
        Poll::Ready(Some(Ok(Bytes::from(encode_frame(&update)))))
    }
}

impl IntoResponse for FrameStream {
    fn into_response(self) -> Response {
        (
            [
                (CONTENT_TYPE, "text/event-stream"),
                (CACHE_CONTROL, "no-cache"),
                (CONNECTION, "keep-alive"),
            ],
            Body::from_stream(self),
        )
            .into_response()
    }
}

/// Channel pair for one run: the sender goes to the runner, the stream to
/// the client.
pub fn frame_channel(cancel_token: CancellationToken) -> (mpsc::Sender<StatusUpdate>, FrameStream) {
    let (tx, rx) = mpsc::channel(16);
    (tx, FrameStream::new(rx, cancel_token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn encodes_each_update_as_a_frame() {
        let (tx, mut stream) = frame_channel(CancellationToken::new());
        tx.send(StatusUpdate::progress("one")).await.unwrap();
        tx.send(StatusUpdate::failure("boom")).await.unwrap();
        drop(tx);

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(&first[..], b"data: {\"status\":\"one\"}\n\n");
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(&second[..], b"data: {\"status\":\"\",\"error\":\"boom\"}\n\n");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn nothing_follows_a_terminal_update() {
        let (tx, mut stream) = frame_channel(CancellationToken::new());
        tx.send(StatusUpdate::completed("done", "https://youtube.com/watch?v=demo_1"))
            .await
            .unwrap();
        tx.send(StatusUpdate::progress("late")).await.unwrap();

        let first = stream.next().await.unwrap().unwrap();
        assert!(first.starts_with(b"data: {\"status\":\"done\""));
        assert!(stream.next().await.is_none());
        assert!(tx.send(StatusUpdate::progress("later")).await.is_err());
    }

    #[tokio::test]
    async fn dropping_stream_cancels_token() {
        let token = CancellationToken::new();
        let (tx, stream) = frame_channel(token.clone());
        drop(stream);
        assert!(token.is_cancelled());
        assert!(tx.send(StatusUpdate::progress("late")).await.is_err());
    }

    #[test]
    fn response_carries_event_stream_headers() {
        let (_tx, stream) = frame_channel(CancellationToken::new());
        let response = stream.into_response();
        let headers = response.headers();
        assert_eq!(headers[CONTENT_TYPE], "text/event-stream");
        assert_eq!(headers[CACHE_CONTROL], "no-cache");
        assert_eq!(headers[CONNECTION], "keep-alive");
    }
}
