//! HTTP routes
//!
//! Thin axum layer over `RequestHandler`. The handler is synchronous and
//! touches SQLite, so every call runs on the blocking pool.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use calburn_core::errors::{ExError, ExErrorKind};
use calburn_core_types::{RequestContext, RequestId};
use tracing::warn;

use crate::handler::{RequestHandler, View};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct AppState {
    handler: Arc<RequestHandler>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(handler: RequestHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/history", get(history))
        .with_state(state)
}

/// An `ExError` rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub ExError);

impl From<ExError> for ApiError {
    fn from(err: ExError) -> Self {
        Self(err)
    }
}

/// HTTP status for an error kind
pub fn status_for(kind: ExErrorKind) -> StatusCode {
    match kind {
        ExErrorKind::FormParse => StatusCode::BAD_REQUEST,
        ExErrorKind::Storage => StatusCode::SERVICE_UNAVAILABLE,
        ExErrorKind::Model
        | ExErrorKind::ModelArtifact
        | ExErrorKind::Config
        | ExErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind());
        let mut response = (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.0.to_string(),
        )
            .into_response();
        if let Some(id) = self.0.request_id() {
            if let Ok(value) = HeaderValue::from_str(id.as_str()) {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }
        }
        response
    }
}

fn context(route: &'static str, headers: &HeaderMap) -> RequestContext {
    let external = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    RequestContext::with_request_id(route, RequestId::from_external(external))
}

async fn run_blocking<F>(ctx: &RequestContext, f: F) -> Result<View, ApiError>
where
    F: FnOnce() -> calburn_core::Result<View> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError),
        Err(join_err) => {
            warn!(
                component = module_path!(),
                route = ctx.route,
                request_id = %ctx.request_id,
                error = %join_err,
                "request task failed"
            );
            Err(ApiError(
                ExError::new(ExErrorKind::Internal)
                    .with_op(ctx.route)
                    .with_request_id(ctx.request_id.clone())
                    .with_message(join_err.to_string()),
            ))
        }
    }
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.handler.index().render())
}

async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Html<String>, ApiError> {
    let ctx = context("predict", &headers);
    let handler = state.handler.clone();
    let view = match form {
        Ok(Form(fields)) => {
            let task_ctx = ctx.clone();
            run_blocking(&ctx, move || handler.predict(&fields, &task_ctx)).await?
        }
        Err(rejection) => handler
            .predict_unreadable(&rejection.body_text(), &ctx)
            .map_err(ApiError)?,
    };
    Ok(Html(view.render()))
}

async fn history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    let ctx = context("history", &headers);
    let handler = state.handler.clone();
    let task_ctx = ctx.clone();
    let view = run_blocking(&ctx, move || handler.history(&task_ctx)).await?;
    Ok(Html(view.render()))
}
