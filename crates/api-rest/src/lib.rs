//! # API REST
//!
//! REST API for the badge system.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI documentation (`/api-docs/openapi.json`)
//! - REST-specific concerns (JSON envelopes, CORS, static files, panic recovery)
//!
//! Uses `badge-core` for rendering and artifact storage.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod handlers;
pub mod models;

use axum::handler::HandlerWithoutStateExt;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use badge_core::{BadgeConfig, DocumentMaterializer};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use error::ApiError;

/// Application state shared across REST API handlers.
///
/// Both members are resolved at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BadgeConfig>,
    pub materializer: Arc<DocumentMaterializer>,
}

impl AppState {
    pub fn new(config: Arc<BadgeConfig>, materializer: Arc<DocumentMaterializer>) -> Self {
        Self {
            config,
            materializer,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::get_sheet,
        handlers::list_printers,
        handlers::generate_badges,
        handlers::generate_pdf,
        handlers::download_pdf,
        handlers::print,
        handlers::get_config,
        handlers::save_config,
    ),
    components(schemas(
        error::ErrorRes,
        models::HealthRes,
        models::SheetRes,
        models::Printer,
        models::GenerateBadgesReq,
        models::GenerateBadgesRes,
        models::PersonReq,
        models::GeneratePdfReq,
        models::GeneratePdfRes,
        models::PrintReq,
        models::MessageRes,
        models::GoogleSheetsView,
        models::BadgeOptionsView,
        models::PrinterView,
        models::ConfigRes,
        models::SaveConfigReq,
    ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// Build the full application router.
///
/// API routes are matched first; anything else is looked up under the static directory and falls
/// through to a JSON 404.
pub fn router(state: AppState) -> Router {
    let static_files = ServeDir::new(state.config.static_dir())
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(handlers::not_found.into_service());

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/sheets/:spreadsheet_id", get(handlers::get_sheet))
        .route("/api/printers", get(handlers::list_printers))
        .route("/api/generate-badges", post(handlers::generate_badges))
        .route("/api/generate-pdf", post(handlers::generate_pdf))
        .route("/api/download-pdf/:file_name", get(handlers::download_pdf))
        .route("/api/print", post(handlers::print))
        .route(
            "/api/config",
            get(handlers::get_config).post(handlers::save_config),
        )
        .fallback_service(static_files)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn boom() -> &'static str {
        panic!("token=abc123 leaked")
    }

    #[tokio::test]
    async fn handler_panic_becomes_generic_json_500() {
        let app: Router = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(handle_panic));

        let res = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        assert!(!String::from_utf8_lossy(&bytes).contains("abc123"));
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({"success": false, "error": error::INTERNAL_ERROR_MESSAGE})
        );
        assert_eq!(body["error"], json!("Internal server error"));
    }
}
