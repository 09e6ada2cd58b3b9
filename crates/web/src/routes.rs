use crate::registry::ViewRegistry;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use fundview_core::error::ViewError;
use fundview_core::view::{CardKey, CollapseState, Page, RecommendationView, Surface};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub views: Arc<ViewRegistry>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/", get(landing))
        .route("/start/fetch", post(start))
        .route("/views/:view_id", get(show_view))
        .route("/views/:view_id/fetch", post(fetch))
        .route("/views/:view_id/feedback", post(feedback))
        .route("/views/:view_id/toggle", post(toggle))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct FetchForm {
    #[serde(default)]
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct FeedbackForm {
    #[serde(default)]
    feedback: String,
}

#[derive(Debug, Deserialize)]
struct ToggleForm {
    card: String,
}

/// Form actions on the landing page live under this path. Nothing is created until the
/// first fetch is posted.
const START_PATH: &str = "/start";

fn view_path(view_id: Uuid) -> String {
    format!("/views/{view_id}")
}

async fn lookup(state: &AppState, view_id: Uuid) -> Result<Arc<RecommendationView>, StatusCode> {
    state.views.get(view_id).await.ok_or(StatusCode::NOT_FOUND)
}

async fn landing() -> Html<String> {
    let surface = Surface::Server {
        view_path: START_PATH.to_string(),
    };
    Html(Page::default().render_document(&CollapseState::default(), &surface))
}

/// First fetch from the landing page: creates the view, then runs the fetch in it.
async fn start(State(state): State<AppState>, Form(form): Form<FetchForm>) -> Redirect {
    let (view_id, view) = state.views.create().await;
    if let Err(err) = view.fetch(&form.user_id).await {
        log_action_error(view_id, "fetch", &err);
    }
    Redirect::to(&view_path(view_id))
}

async fn show_view(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
) -> Result<Html<String>, StatusCode> {
    let view = lookup(&state, view_id).await?;
    let surface = Surface::Server {
        view_path: view_path(view_id),
    };
    Ok(Html(view.render_document(&surface).await))
}

// Outcomes are reflected in the page itself, so every action redirects back to it.

async fn fetch(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
    Form(form): Form<FetchForm>,
) -> Result<Redirect, StatusCode> {
    let view = lookup(&state, view_id).await?;
    if let Err(err) = view.fetch(&form.user_id).await {
        log_action_error(view_id, "fetch", &err);
    }
    Ok(Redirect::to(&view_path(view_id)))
}

async fn feedback(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
    Form(form): Form<FeedbackForm>,
) -> Result<Redirect, StatusCode> {
    let view = lookup(&state, view_id).await?;
    if let Err(err) = view.submit_feedback(&form.feedback).await {
        log_action_error(view_id, "feedback", &err);
    }
    Ok(Redirect::to(&view_path(view_id)))
}

async fn toggle(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
    Form(form): Form<ToggleForm>,
) -> Result<Redirect, StatusCode> {
    let view = lookup(&state, view_id).await?;
    let key = form
        .card
        .parse::<CardKey>()
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    if view.toggle(key).await.is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Redirect::to(&view_path(view_id)))
}

fn log_action_error(view_id: Uuid, action: &'static str, err: &ViewError) {
    match err {
        ViewError::Validation(e) => {
            tracing::debug!(%view_id, action, error = %e, "action rejected by validation")
        }
        ViewError::Request(e) => {
            tracing::warn!(%view_id, action, error = %e, "backend request failed")
        }
    }
}
