use crate::domain::{FeedbackRequest, RecommendationResponse, UserId};
use crate::error::{RequestError, ValidationError};
use crate::view::page::{OutputRegion, Page, StatusMessage, Surface};
use crate::view::render;
use crate::view::toggle::{CardKey, CollapseState};
use chrono::Utc;

pub const FETCH_NOT_FOUND_MESSAGE: &str = "No recommendations found for this user ID.";
pub const FETCH_FAILED_MESSAGE: &str =
    "Error fetching data (backend is unavailable or returned an invalid response).";
pub const FEEDBACK_SUCCESS_MESSAGE: &str =
    "Feedback submitted successfully! It will be used for your next recommendation.";
pub const FEEDBACK_FAILED_MESSAGE: &str = "Error submitting feedback.";

/// Identifies one fetch attempt. Only the most recently issued token may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A fetch that passed local validation and is waiting on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
    pub token: RequestToken,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Rendered,
    /// A newer fetch was issued while this one was in flight; its result was dropped.
    Stale,
}

pub fn fetch_error_message(err: &RequestError) -> &'static str {
    if err.is_not_found() {
        FETCH_NOT_FOUND_MESSAGE
    } else {
        FETCH_FAILED_MESSAGE
    }
}

/// Page model plus the state behind it: the active session, toggles and the request
/// generation counter.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    page: Page,
    session: Option<UserId>,
    collapse: CollapseState,
    latest_token: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn session(&self) -> Option<&UserId> {
        self.session.as_ref()
    }

    pub fn collapse(&self) -> &CollapseState {
        &self.collapse
    }

    pub fn latest_token(&self) -> RequestToken {
        RequestToken(self.latest_token)
    }

    /// Starts a fetch attempt. Every attempt, valid or not, supersedes requests still in
    /// flight. A valid attempt clears the session and shows the loading placeholder.
    pub fn begin_fetch(&mut self, raw_user_id: &str) -> Result<PendingFetch, ValidationError> {
        self.latest_token += 1;
        self.page.user_id_input = raw_user_id.to_string();
        self.page.feedback_visible = false;

        let Some(user_id) = UserId::parse(raw_user_id) else {
            self.page.output = OutputRegion::Prompt(ValidationError::EmptyUserId.to_string());
            return Err(ValidationError::EmptyUserId);
        };

        self.page.output = OutputRegion::Loading;
        self.session = None;

        Ok(PendingFetch {
            token: RequestToken(self.latest_token),
            user_id,
        })
    }

    /// Applies the backend's answer for `pending`, unless a newer fetch has started.
    pub fn complete_fetch(
        &mut self,
        pending: PendingFetch,
        result: Result<RecommendationResponse, RequestError>,
    ) -> Result<FetchOutcome, RequestError> {
        if pending.token.0 != self.latest_token {
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(resp) => {
                self.collapse.collapse_all();
                self.page.output = OutputRegion::Recommendations(resp);
                self.page.feedback_visible = true;
                self.page.updated_at = Some(Utc::now());
                self.session = Some(pending.user_id);
                Ok(FetchOutcome::Rendered)
            }
            Err(err) => {
                self.page.output = OutputRegion::Error(fetch_error_message(&err).to_string());
                self.page.feedback_visible = false;
                Err(err)
            }
        }
    }

    /// Checks feedback preconditions: an active session first, then non-blank text.
    /// The text is sent as typed.
    pub fn begin_feedback(&mut self, text: &str) -> Result<FeedbackRequest, ValidationError> {
        self.page.feedback_text = text.to_string();

        let check = match &self.session {
            None => Err(ValidationError::NoActiveSession),
            Some(_) if text.trim().is_empty() => Err(ValidationError::EmptyFeedback),
            Some(user_id) => Ok(FeedbackRequest {
                user_id: user_id.clone(),
                feedback: text.to_string(),
            }),
        };

        if let Err(err) = &check {
            self.page.feedback_message = Some(StatusMessage::error(err.to_string()));
        }
        check
    }

    pub fn complete_feedback(&mut self, result: Result<(), RequestError>) -> Result<(), RequestError> {
        match result {
            Ok(()) => {
                self.page.feedback_text.clear();
                self.page.feedback_message = Some(StatusMessage::success(FEEDBACK_SUCCESS_MESSAGE));
                Ok(())
            }
            Err(err) => {
                self.page.feedback_message = Some(StatusMessage::error(FEEDBACK_FAILED_MESSAGE));
                Err(err)
            }
        }
    }

    /// Keys of the cards currently on screen, in display order.
    pub fn card_keys(&self) -> Vec<CardKey> {
        match &self.page.output {
            OutputRegion::Recommendations(resp) => {
                render::cards(resp).into_iter().map(|(key, _)| key).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Flips a rendered card. Returns the new expanded state, or `None` when no such card
    /// is on screen.
    pub fn toggle(&mut self, key: CardKey) -> Option<bool> {
        if !self.card_keys().contains(&key) {
            return None;
        }
        Some(self.collapse.toggle(key))
    }

    pub fn render_document(&self, surface: &Surface) -> String {
        self.page.render_document(&self.collapse, surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    fn scenario() -> RecommendationResponse {
        serde_json::from_value(json!({
            "user_fund_details": [{"name": "X"}],
            "recommendations": [{"name": "Y"}, {"name": "Z"}],
            "ranking": ["Z", "Y"],
        }))
        .unwrap()
    }

    fn http_error(status: StatusCode) -> RequestError {
        RequestError::Status {
            url: "http://localhost:8000/api/v1/mf/recommendations/42".into(),
            status,
            body: String::new(),
        }
    }

    fn fetched(user_id: &str) -> ViewState {
        let mut state = ViewState::new();
        let pending = state.begin_fetch(user_id).unwrap();
        state.complete_fetch(pending, Ok(scenario())).unwrap();
        state
    }

    #[test]
    fn blank_input_prompts_without_a_request() {
        let mut state = ViewState::new();
        for raw in ["", "   ", "\t\n"] {
            assert_eq!(state.begin_fetch(raw), Err(ValidationError::EmptyUserId));
            assert_eq!(
                state.page().output,
                OutputRegion::Prompt("Please enter a user ID".into())
            );
            assert!(!state.page().feedback_visible);
        }
    }

    #[test]
    fn valid_input_shows_loading_and_clears_session() {
        let mut state = fetched("41");
        assert_eq!(state.session().unwrap().as_str(), "41");

        let pending = state.begin_fetch("  42 ").unwrap();
        assert_eq!(pending.user_id.as_str(), "42");
        assert_eq!(state.page().output, OutputRegion::Loading);
        assert!(state.session().is_none());
        assert!(!state.page().feedback_visible);
    }

    #[test]
    fn success_sets_session_to_trimmed_id_and_shows_feedback() {
        let state = fetched(" 42 ");
        assert_eq!(state.session().unwrap().as_str(), "42");
        assert!(state.page().feedback_visible);
        assert!(state.page().updated_at.is_some());
        assert_eq!(
            state.card_keys(),
            vec![
                CardKey::Holding(0),
                CardKey::Recommendation(0),
                CardKey::Recommendation(1)
            ]
        );
    }

    #[test]
    fn failure_shows_error_and_leaves_session_unset() {
        let mut state = fetched("41");
        let pending = state.begin_fetch("42").unwrap();
        let err = state
            .complete_fetch(pending, Err(http_error(StatusCode::BAD_GATEWAY)))
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert_eq!(state.page().output, OutputRegion::Error(FETCH_FAILED_MESSAGE.into()));
        assert!(state.session().is_none());
        assert!(!state.page().feedback_visible);
    }

    #[test]
    fn not_found_gets_its_own_message() {
        let mut state = ViewState::new();
        let pending = state.begin_fetch("42").unwrap();
        let _ = state.complete_fetch(pending, Err(http_error(StatusCode::NOT_FOUND)));
        assert_eq!(
            state.page().output,
            OutputRegion::Error(FETCH_NOT_FOUND_MESSAGE.into())
        );
    }

    #[test]
    fn superseded_fetch_is_discarded() {
        let mut state = ViewState::new();
        let slow = state.begin_fetch("slow").unwrap();
        let fast = state.begin_fetch("fast").unwrap();
        assert!(slow.token < fast.token);

        assert_eq!(state.complete_fetch(fast, Ok(scenario())).unwrap(), FetchOutcome::Rendered);
        let before = state.page().clone();

        assert_eq!(
            state
                .complete_fetch(slow, Err(http_error(StatusCode::INTERNAL_SERVER_ERROR)))
                .unwrap(),
            FetchOutcome::Stale
        );
        assert_eq!(state.page(), &before);
        assert_eq!(state.session().unwrap().as_str(), "fast");
    }

    #[test]
    fn blank_input_also_supersedes_in_flight_fetch() {
        let mut state = ViewState::new();
        let pending = state.begin_fetch("42").unwrap();
        assert!(state.begin_fetch(" ").is_err());
        assert_eq!(state.complete_fetch(pending, Ok(scenario())).unwrap(), FetchOutcome::Stale);
        assert!(matches!(state.page().output, OutputRegion::Prompt(_)));
    }

    #[test]
    fn feedback_requires_session_before_text() {
        let mut state = ViewState::new();
        assert_eq!(state.begin_feedback(""), Err(ValidationError::NoActiveSession));
        assert_eq!(state.begin_feedback("great"), Err(ValidationError::NoActiveSession));
        assert_eq!(
            state.page().feedback_message,
            Some(StatusMessage::error(
                "Error: No active user session. Please fetch data first."
            ))
        );
    }

    #[test]
    fn feedback_requires_text() {
        let mut state = fetched("42");
        assert_eq!(state.begin_feedback("  "), Err(ValidationError::EmptyFeedback));
        assert_eq!(
            state.page().feedback_message,
            Some(StatusMessage::error("Please enter feedback."))
        );
    }

    #[test]
    fn successful_feedback_clears_text_and_keeps_session() {
        let mut state = fetched("42");
        let req = state.begin_feedback(" more debt funds ").unwrap();
        assert_eq!(req.user_id.as_str(), "42");
        assert_eq!(req.feedback, " more debt funds ");
        assert_eq!(state.page().feedback_text, " more debt funds ");

        state.complete_feedback(Ok(())).unwrap();
        assert!(state.page().feedback_text.is_empty());
        assert_eq!(
            state.page().feedback_message,
            Some(StatusMessage::success(FEEDBACK_SUCCESS_MESSAGE))
        );
        assert_eq!(state.session().unwrap().as_str(), "42");
    }

    #[test]
    fn failed_feedback_keeps_text() {
        let mut state = fetched("42");
        state.begin_feedback("more debt funds").unwrap();
        assert!(state
            .complete_feedback(Err(http_error(StatusCode::SERVICE_UNAVAILABLE)))
            .is_err());
        assert_eq!(state.page().feedback_text, "more debt funds");
        assert_eq!(
            state.page().feedback_message,
            Some(StatusMessage::error(FEEDBACK_FAILED_MESSAGE))
        );
    }

    #[test]
    fn toggle_only_touches_rendered_cards_and_resets_on_refetch() {
        let mut state = ViewState::new();
        assert_eq!(state.toggle(CardKey::Holding(0)), None);

        let pending = state.begin_fetch("42").unwrap();
        state.complete_fetch(pending, Ok(scenario())).unwrap();
        assert_eq!(state.toggle(CardKey::Recommendation(1)), Some(true));
        assert_eq!(state.toggle(CardKey::Recommendation(2)), None);
        assert!(state.collapse().is_expanded(CardKey::Recommendation(1)));

        let pending = state.begin_fetch("42").unwrap();
        state.complete_fetch(pending, Ok(scenario())).unwrap();
        assert!(!state.collapse().is_expanded(CardKey::Recommendation(1)));
    }
}
