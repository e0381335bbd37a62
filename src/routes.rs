use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use include_dir::{include_dir, Dir};
use parking_lot::RwLock;
use serde_json::json;
use std::{collections::HashMap, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::diffusion::{GenerationError, ImageGenerator};
use crate::models::{GenerateLogoRequest, LogoResponse, LogoSubmission};
use crate::prompt::compose;
use crate::store::{ArtifactStore, StorageError};
use crate::validation::{validate, ValidationError};

static STATIC_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

#[derive(Clone)]
pub struct AppState {
    pub submissions: Arc<RwLock<HashMap<Uuid, LogoSubmission>>>,
    pub generator: Arc<dyn ImageGenerator>,
    pub store: Arc<ArtifactStore>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/logos", post(generate_logo))
        .route("/api/logos/:id", get(get_logo))
        .route("/api/logos/:id/file", get(download_logo))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// All failures funnel through here and render as a JSON error body; the
/// user can correct the form and resubmit, nothing is fatal to the process.
#[derive(Debug)]
pub enum ApiError {
    InvalidParameter(String),
    Validation(ValidationError),
    Generation(GenerationError),
    Storage(StorageError),
    NotFound(String),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e)
    }
}

impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        ApiError::Generation(e)
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(what) => ApiError::NotFound(what),
            other => ApiError::Storage(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidParameter(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            ApiError::Generation(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            ApiError::Storage(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("not found: {}", what)),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// The embedded form page.
pub async fn index() -> Html<&'static str> {
    Html(
        STATIC_DIR
            .get_file("index.html")
            .and_then(|f| f.contents_utf8())
            .unwrap_or("<h1>AI Logo Generator</h1>"),
    )
}

/// One submission = one validate -> compose -> dispatch -> store sequence,
/// run to completion inside this handler.
pub async fn generate_logo(
    State(state): State<AppState>,
    Json(body): Json<GenerateLogoRequest>,
) -> Result<Json<LogoResponse>, ApiError> {
    validate(&body.business_name, &body.description, &body.styles)?;
    body.check_ranges().map_err(ApiError::InvalidParameter)?;

    let request = body.into_logo_request();
    tracing::info!(business_name = %request.business_name, "Generating logo");

    let prompt = compose(&request);
    tracing::debug!(%prompt, "Composed generation prompt");

    let image = state
        .generator
        .generate(&prompt, request.num_steps, request.guidance_scale)
        .await?;

    let artifact = state.store.store(image).await?;

    let submission = LogoSubmission {
        artifact,
        request,
        prompt,
    };
    let response = LogoResponse::from(&submission);

    state
        .submissions
        .write()
        .insert(submission.artifact.id, submission);

    Ok(Json(response))
}

pub async fn get_logo(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<LogoSubmission>, ApiError> {
    state
        .submissions
        .read()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("logo {}", id)))
}

/// Serve the stored PNG for preview/download.
pub async fn download_logo(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let bytes = state.store.load(id).await?;

    let mut headers = axum::http::HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("image/png"));
    if let Ok(disposition) =
        format!("attachment; filename=\"logo-{}.png\"", id).parse::<header::HeaderValue>()
    {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    Ok((StatusCode::OK, headers, bytes).into_response())
}
