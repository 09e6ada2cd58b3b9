use crate::client::RecommendationApi;
use crate::domain::UserId;
use crate::error::ViewError;
use crate::view::page::Surface;
use crate::view::state::{FetchOutcome, ViewState};
use crate::view::toggle::CardKey;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One page's worth of interaction against the backend.
///
/// State is only locked around synchronous transitions, never across a network call,
/// so a second fetch can start while the first is in flight. Request tokens decide
/// which one renders.
pub struct RecommendationView {
    api: Arc<dyn RecommendationApi>,
    state: Mutex<ViewState>,
}

impl RecommendationView {
    pub fn new(api: Arc<dyn RecommendationApi>) -> Self {
        Self {
            api,
            state: Mutex::new(ViewState::new()),
        }
    }

    pub async fn fetch(&self, raw_user_id: &str) -> Result<FetchOutcome, ViewError> {
        let pending = self.state.lock().await.begin_fetch(raw_user_id)?;
        let token = pending.token.get();
        tracing::info!(user_id = %pending.user_id, token, endpoint = self.api.endpoint(), "fetching recommendations");

        let result = self.api.fetch_recommendations(&pending.user_id).await;
        if let Err(err) = &result {
            tracing::warn!(user_id = %pending.user_id, token, error = %err, "recommendation fetch failed");
        }

        let outcome = self.state.lock().await.complete_fetch(pending, result)?;
        if outcome == FetchOutcome::Stale {
            tracing::debug!(token, "discarding superseded recommendation response");
        }
        Ok(outcome)
    }

    pub async fn submit_feedback(&self, text: &str) -> Result<(), ViewError> {
        let request = self.state.lock().await.begin_feedback(text)?;
        tracing::info!(user_id = %request.user_id, chars = request.feedback.chars().count(), "submitting feedback");

        let result = self.api.submit_feedback(&request).await;
        if let Err(err) = &result {
            tracing::warn!(user_id = %request.user_id, error = %err, "feedback submission failed");
        }

        self.state.lock().await.complete_feedback(result)?;
        Ok(())
    }

    pub async fn toggle(&self, key: CardKey) -> Option<bool> {
        self.state.lock().await.toggle(key)
    }

    pub async fn session(&self) -> Option<UserId> {
        self.state.lock().await.session().cloned()
    }

    pub async fn render_document(&self, surface: &Surface) -> String {
        self.state.lock().await.render_document(surface)
    }

    /// Runs `f` against a consistent snapshot of the state.
    pub async fn inspect<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&*self.state.lock().await)
    }
}
