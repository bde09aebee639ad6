//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - quiz engine API under `/api/v1/...`
/// - static SPA from `./static` with index fallback
/// - permissive CORS and a per-request trace layer
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        .route("/ws", get(ws::ws_upgrade))
        // Generation and sessions
        .route("/api/v1/questions", get(http::http_get_questions))
        .route("/api/v1/challenge", post(http::http_post_challenge))
        .route("/api/v1/answer", post(http::http_post_answer))
        .route("/api/v1/session", get(http::http_get_session))
        // Stateless engine calls
        .route("/api/v1/score/raw", post(http::http_post_raw_score))
        .route("/api/v1/score/total", post(http::http_post_total_score))
        .route("/api/v1/trend", post(http::http_post_trend))
        .route("/api/v1/difficulty", post(http::http_post_difficulty))
        .route("/api/v1/difficulty/initial", get(http::http_get_initial_difficulty))
        // Per-user history
        .route("/api/v1/report", get(http::http_get_report))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(Arc::new(AppState::default()))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn questions_endpoint_clamps_and_falls_back() {
        let req = Request::get("/api/v1/questions?type=unknown&difficulty=9")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        let qs = body["questions"].as_array().unwrap();
        assert_eq!(qs.len(), 5);
        assert!(qs.iter().all(|q| q["type"] == "mental-math"));
    }

    #[tokio::test]
    async fn total_score_weights_categories() {
        let body = json!({ "categoryScores": [
            { "category": "memory", "score": 80, "trend": "stable", "changePercent": 0.0 },
            { "category": "attention", "score": 60, "trend": "up", "changePercent": 4.0 },
        ]});
        let (status, out) = send(app(), post_json("/api/v1/score/total", body)).await;
        assert_eq!(status, StatusCode::OK);
        // (80 * 0.25 + 60 * 0.20) / 0.45 = 71.1
        assert_eq!(out["totalScore"], 71);
    }

    #[tokio::test]
    async fn difficulty_endpoints() {
        let body = json!({ "category": "math", "currentLevel": 3, "recentAccuracies": [0.9, 0.95, 0.85] });
        let (_, out) = send(app(), post_json("/api/v1/difficulty", body)).await;
        assert_eq!(out["level"], 4);

        let req = Request::get("/api/v1/difficulty/initial?ageGroup=child").body(Body::empty()).unwrap();
        let (status, out) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out["level"], 1);

        let req = Request::get("/api/v1/difficulty/initial?ageGroup=toddler").body(Body::empty()).unwrap();
        let (status, out) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out["level"], 2);
    }

    #[tokio::test]
    async fn trend_endpoint_reports_label_and_change() {
        let body = json!({ "scores": [50, 52, 60, 70], "window": 2 });
        let (status, out) = send(app(), post_json("/api/v1/trend", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out["trend"], "up");
        assert_eq!(out["changePercent"], 27.5);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let body = json!({ "sessionId": "missing", "answer": "1", "responseTimeMs": 100 });
        let (status, out) = send(app(), post_json("/api/v1/answer", body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(out["error"].as_str().unwrap().contains("missing"));
    }

    #[tokio::test]
    async fn challenge_then_answer_round() {
        let state = Arc::new(AppState::default());
        let body = json!({ "userId": "u9", "type": "mental-math", "difficulty": 1 });
        let (status, out) = send(build_router(state.clone()), post_json("/api/v1/challenge", body)).await;
        assert_eq!(status, StatusCode::OK);
        let session_id = out["sessionId"].as_str().unwrap().to_string();
        let expected = out["challenge"]["questions"][0]["correctAnswer"].clone();

        let body = json!({ "sessionId": session_id, "answer": expected, "responseTimeMs": 20000 });
        let (status, out) = send(build_router(state.clone()), post_json("/api/v1/answer", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out["correct"], true);
        assert_eq!(out["phase"], "result");
        assert_eq!(out["result"]["totalScore"], 100);

        let req = Request::get("/api/v1/report?userId=u9").body(Body::empty()).unwrap();
        let (_, out) = send(build_router(state), req).await;
        assert_eq!(out["categoryScores"][0]["category"], "math");
        assert_eq!(out["streakCount"], 1);
    }
}
