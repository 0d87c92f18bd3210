//! HTTP API.
//!
//! - `GET /` reports that the API is up.
//! - `POST /chat/{video_id}` answers `{"message": ...}` about a video.

use crate::handler::{ChatHandler, ChatReply, ChatRequest};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Shared application state.
struct AppState {
    handler: ChatHandler,
}

#[derive(Serialize)]
struct StatusResponse {
    #[serde(rename = "Status")]
    status: u16,
    message: &'static str,
}

/// Build the router. Any origin may call it; the usual client is a browser extension.
pub fn router(handler: ChatHandler) -> Router {
    let state = Arc::new(AppState { handler });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/chat/{video_id}", post(chat))
        .layer(cors)
        .with_state(state)
}

/// Serve `router` on `listener` until the process is stopped.
pub async fn serve(listener: tokio::net::TcpListener, handler: ChatHandler) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router(handler)).await
}

async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: 200,
        message: "API Setup",
    })
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatReply> {
    let span = info_span!("chat", request_id = %Uuid::new_v4());

    async move {
        info!("Question about {}", video_id);
        Json(state.handler.handle(&video_id, &req.message).await)
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::is_apology;
    use crate::handler::tests::{handler_in, seed_transcript};
    use crate::resolver::fakes::FailingFetcher;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn chat_request(video_id: &str, message: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(format!("/chat/{}", video_id))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "message": message }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_status() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(handler_in(dir.path(), Arc::new(FailingFetcher::default())));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "Status": 200, "message": "API Setup" })
        );
    }

    #[tokio::test]
    async fn test_chat_answers_from_transcript() {
        let dir = tempfile::tempdir().unwrap();
        seed_transcript(
            dir.path(),
            "abc123",
            "The video explains recursion using a function that calls itself.",
        );
        let app = router(handler_in(dir.path(), Arc::new(FailingFetcher::default())));

        let response = app
            .oneshot(chat_request("abc123", "What technique does the video explain?"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let message = body["message"].as_str().unwrap();
        assert!(!message.is_empty());
        assert!(!is_apology(message));
    }

    #[tokio::test]
    async fn test_chat_failure_is_still_ok() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(handler_in(dir.path(), Arc::new(FailingFetcher::default())));

        let response = app
            .oneshot(chat_request("doesnotexist", "Hello?"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(is_apology(body["message"].as_str().unwrap()));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(handler_in(dir.path(), Arc::new(FailingFetcher::default())));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/chat/abc123")
                    .header(header::ORIGIN, "chrome-extension://abcdef")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
