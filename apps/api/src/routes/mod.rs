pub mod health;
pub mod jobs;
pub mod pages;

use axum::{
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tracing::debug;

use crate::auth::handlers as auth;
use crate::dashboard;
use crate::extraction::{handlers as cv, MAX_UPLOAD_BYTES};
use crate::interview::handlers as interview;
use crate::routes::pages::Page;
use crate::state::AppState;
use crate::wizard::handlers as wizard;

/// Room for the multipart framing around a maximum-size CV.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

/// Unknown paths: 404 pointing the client at the matching browser route,
/// or at home when there is none.
async fn not_found(uri: Uri) -> Response {
    let page = match Page::resolve(uri.path()) {
        Page::NotFound => Page::Home,
        page => page,
    };
    debug!("No API route for {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": {
                "code": "NOT_FOUND",
                "message": format!("No route for {}", uri.path()),
                "redirect": page,
            }
        })),
    )
        .into_response()
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/auth/session", get(auth::handle_get_session))
        // Wizards
        .route(
            "/api/v1/wizards/:flow",
            post(wizard::handle_start)
                .get(wizard::handle_get)
                .delete(wizard::handle_discard),
        )
        .route("/api/v1/wizards/:flow/submit", post(wizard::handle_submit))
        .route("/api/v1/wizards/:flow/back", post(wizard::handle_back))
        .route(
            "/api/v1/wizards/:flow/lists/:list",
            post(wizard::handle_add_item),
        )
        .route(
            "/api/v1/wizards/:flow/lists/:list/:index",
            put(wizard::handle_update_item).delete(wizard::handle_remove_item),
        )
        // CV upload
        .route(
            "/api/v1/cv/upload",
            post(cv::handle_upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        // Jobs & dashboard
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route("/api/v1/dashboard", get(dashboard::handle_dashboard))
        // Interviews
        .route(
            "/api/v1/interviews/:application_id",
            get(interview::handle_get).delete(interview::handle_discard),
        )
        .route(
            "/api/v1/interviews/:application_id/start",
            post(interview::handle_start),
        )
        .route(
            "/api/v1/interviews/:application_id/next",
            post(interview::handle_next),
        )
        .route(
            "/api/v1/interviews/:application_id/end",
            post(interview::handle_end),
        )
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::state::test_state;
    use crate::store::fake::RecordingStore;

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(test_state(Arc::new(RecordingStore::new()))).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "selectra-api");
    }

    #[tokio::test]
    async fn test_wizard_without_session_redirects_to_login() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/wizards/organization-intake")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["redirect"], "/organization-login");
    }

    #[tokio::test]
    async fn test_cv_wizard_redirects_to_candidate_login() {
        let (status, body) = send(get("/api/v1/wizards/cv-intake")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["redirect"], "/candidate-login");
    }

    #[tokio::test]
    async fn test_dashboard_requires_organization_session() {
        let (status, body) = send(get("/api/v1/dashboard")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["redirect"], "/organization-login");
    }

    #[tokio::test]
    async fn test_unknown_job_is_404() {
        let uri = format!("/api/v1/jobs/{}", uuid::Uuid::new_v4());
        let (status, body) = send(get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_fallback_points_at_browser_route() {
        let (status, body) = send(get("/cv-upload")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["redirect"], "/cv-upload");

        let (_, body) = send(get("/nowhere")).await;
        assert_eq!(body["error"]["redirect"], "/");
    }

    #[tokio::test]
    async fn test_signup_validation_runs_before_any_io() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/auth/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"email":"not-an-email","password":"longenough","user_type":"candidate"}"#,
            ))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
