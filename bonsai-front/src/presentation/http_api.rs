//! HTTP API for the front pages.

use crate::application_service::page_presenter::StorePagePresenter;
use crate::application_service::page_request_handler::{PageRequestHandler, PageResponse};
use crate::application_service::suggest_service::SuggestService;
use crate::domain::page::PageType;
use crate::infrastructure::persistence::SledPageRepository;
use crate::port::page_presenter::PresenterError;
use crate::port::page_repository::PageRepository;
use axum::{
    extract::{Path, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Presenter used by the site.
pub type SitePresenter = StorePagePresenter<SledPageRepository>;

/// Services reachable from request handlers.
pub struct SiteServices {
    pub pages: PageRequestHandler<SitePresenter>,
    pub suggestions: SuggestService<SledPageRepository>,
    pub repository: Arc<SledPageRepository>,
}

/// Application state shared across handlers.
pub type AppState = Arc<SiteServices>;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/p/:key", get(page_description))
        .route("/p/:key/media", get(page_media))
        .route("/media/:key/thumbnail", get(media_thumbnail))
        .route("/admin/suggest/pages", get(suggest_pages))
        .with_state(state)
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Parsed `/admin/suggest/pages` query string.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SuggestQuery {
    pub query: String,
    pub types: Vec<PageType>,
}

impl SuggestQuery {
    /// Parse `query=..&types=..&types=..`. Unknown parameters are ignored;
    /// type codes that are not page types are rejected.
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        let mut parsed = SuggestQuery::default();

        for pair in raw.unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(value)?;
            match name {
                "query" => parsed.query = value,
                "types" => {
                    let page_type = value
                        .trim()
                        .parse::<u8>()
                        .ok()
                        .and_then(PageType::from_code)
                        .ok_or_else(|| format!("Invalid page type: {}", value))?;
                    if !parsed.types.contains(&page_type) {
                        parsed.types.push(page_type);
                    }
                }
                _ => {}
            }
        }

        Ok(parsed)
    }
}

fn decode_component(value: &str) -> Result<String, String> {
    urlencoding::decode(&value.replace('+', " "))
        .map(|v| v.into_owned())
        .map_err(|e| format!("Invalid query encoding: {}", e))
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn presenter_error_response(e: PresenterError) -> Response {
    let status = match e {
        PresenterError::NotFound(_) => StatusCode::NOT_FOUND,
        PresenterError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    error_response(status, e.to_string())
}

fn page_response<T: Serialize>(response: PageResponse<T>) -> Response {
    match response {
        PageResponse::Render(view) => Json(view).into_response(),
        PageResponse::PermanentRedirect(route) => (
            StatusCode::MOVED_PERMANENTLY,
            [(header::LOCATION, route.path())],
        )
            .into_response(),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Page description.
async fn page_description(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match state.pages.handle_description(&key).await {
        Ok(response) => page_response(response),
        Err(e) => presenter_error_response(e),
    }
}

/// Media attached to a page.
async fn page_media(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match state.pages.handle_media(&key).await {
        Ok(response) => page_response(response),
        Err(e) => presenter_error_response(e),
    }
}

/// Thumbnail bytes of a media file.
async fn media_thumbnail(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    let media = match state.repository.get_media(&key).await {
        Ok(Some(media)) => media,
        Ok(None) => {
            return error_response(StatusCode::NOT_FOUND, format!("Media not found: {}", key))
        }
        Err(e) => return error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    };

    match state.repository.get_thumbnail(&key).await {
        Ok(Some(bytes)) => ([(header::CONTENT_TYPE, media.mime_type)], bytes).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("Thumbnail not found: {}", key),
        ),
        Err(e) => error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    }
}

/// Page suggestions for the tag editor.
async fn suggest_pages(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let query = match SuggestQuery::parse(raw.as_deref()) {
        Ok(query) => query,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    match state.suggestions.suggest(&query.query, &query.types).await {
        Ok(suggestions) => Json(suggestions).into_response(),
        Err(e) => error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    }
}
