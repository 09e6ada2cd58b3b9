//! Rendering and view state for the recommendation page.
//!
//! `ViewState` is the synchronous model (page regions, session, toggles, request
//! tokens); `RecommendationView` drives it against a [`RecommendationApi`].
//!
//! [`RecommendationApi`]: crate::client::RecommendationApi

pub mod card;
pub mod controller;
pub mod page;
pub mod render;
pub mod state;
pub mod toggle;

pub use controller::RecommendationView;
pub use page::{OutputRegion, Page, StatusMessage, Surface, Tone};
pub use state::{FetchOutcome, PendingFetch, RequestToken, ViewState};
pub use toggle::{CardKey, CollapseState};

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }
}
