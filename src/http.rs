//! # HTTP motion endpoint.
//!
//! The surveillance camera reports its own motion detection with plain GET
//! requests. [`MotionServer`] is the task serving them:
//!
//! - `GET /?Message=start` → enqueue `CameraMotionChanged { active: true }`, 200
//! - `GET /?Message=stop`  → enqueue `CameraMotionChanged { active: false }`, 200
//! - anything else → 400, no event
//!
//! Protocol errors stay at the HTTP boundary; they are reported to the caller
//! and never propagate into the event system.

use std::net::SocketAddr;

use async_trait::async_trait;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::events::{Event, EventTx};
use crate::runtime::Task;

/// Serves the camera's motion start/stop callbacks.
pub struct MotionServer {
    addr: SocketAddr,
    tx: EventTx,
}

impl MotionServer {
    /// Creates the server; the socket is bound when the task starts.
    pub fn new(addr: SocketAddr, tx: EventTx) -> Self {
        Self { addr, tx }
    }
}

#[async_trait]
impl Task for MotionServer {
    fn name(&self) -> &str {
        "motion-http"
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), TaskError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(TaskError::fail)?;
        tracing::info!(addr = %self.addr, "http motion server listening");

        axum::serve(
            listener,
            router(self.tx.clone()).into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(ctx.cancelled_owned())
        .await
        .map_err(TaskError::fail)?;

        tracing::info!("http motion server stopped");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct MotionQuery {
    #[serde(rename = "Message")]
    message: Option<String>,
}

/// Builds the router; split out so tests can drive it in-process.
fn router(tx: EventTx) -> Router {
    Router::new()
        .route("/", get(motion))
        .fallback(|| async { StatusCode::BAD_REQUEST })
        .with_state(tx)
}

async fn motion(
    State(tx): State<EventTx>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(query): Query<MotionQuery>,
) -> StatusCode {
    match query.message.as_deref() {
        Some("start") => {
            tracing::info!(peer = %peer.ip(), "client indicated motion start");
            tx.send(Event::CameraMotionChanged { active: true });
            StatusCode::OK
        }
        Some("stop") => {
            tracing::info!(peer = %peer.ip(), "client indicated motion end");
            tx.send(Event::CameraMotionChanged { active: false });
            StatusCode::OK
        }
        other => {
            tracing::warn!(peer = %peer.ip(), message = ?other, "unknown request");
            StatusCode::BAD_REQUEST
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::events::channel;

    async fn request(uri: &str) -> (StatusCode, crate::events::EventRx) {
        let (tx, rx) = channel();
        let app = router(tx).into_make_service_with_connect_info::<SocketAddr>();
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let svc = app.oneshot(peer).await.unwrap();
        let response = svc
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        (response.status(), rx)
    }

    #[tokio::test]
    async fn start_message_enqueues_motion_active() {
        let (status, mut rx) = request("/?Message=start").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            rx.try_recv(),
            Some(Event::CameraMotionChanged { active: true })
        );
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn stop_message_enqueues_motion_inactive() {
        let (status, mut rx) = request("/?Message=stop").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            rx.try_recv(),
            Some(Event::CameraMotionChanged { active: false })
        );
    }

    #[tokio::test]
    async fn bogus_message_yields_400_and_no_event() {
        let (status, mut rx) = request("/?Message=bogus").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn missing_query_yields_400_and_no_event() {
        let (status, mut rx) = request("/").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn unknown_path_yields_400_and_no_event() {
        let (status, mut rx) = request("/somewhere/else").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(rx.try_recv().is_none());
    }
}
