//! Per-request write deadline.
//!
//! The clock starts when the request reaches the router, once its headers
//! have been read, and covers the handler and the streaming of the response
//! body. A body still streaming when the deadline passes fails, and hyper
//! drops the connection. Each request on a keep-alive connection gets its
//! own deadline.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::body::{Body, Bytes, HttpBody};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::BoxError;
use http_body::{Frame, SizeHint};
use tokio::time::{Instant, Sleep};

/// Middleware bounding the time spent answering one request to `limit`.
pub async fn limit_response(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let deadline = Instant::now() + limit;
    let response = next.run(request).await;
    response.map(|body| Body::new(DeadlineBody::new(body, deadline)))
}

/// Response body that errors once `deadline` has passed.
pub struct DeadlineBody {
    inner: Body,
    deadline: Pin<Box<Sleep>>,
}

impl DeadlineBody {
    pub fn new(inner: Body, deadline: Instant) -> Self {
        Self {
            inner,
            deadline: Box::pin(tokio::time::sleep_until(deadline)),
        }
    }
}

impl HttpBody for DeadlineBody {
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        // Checked first: a slow reader keeps the inner body always ready.
        if self.deadline.as_mut().poll(cx).is_ready() {
            let err = std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "response exceeded write timeout",
            );
            return Poll::Ready(Some(Err(err.into())));
        }

        Pin::new(&mut self.inner)
            .poll_frame(cx)
            .map(|frame| frame.map(|res| res.map_err(Into::into)))
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}
