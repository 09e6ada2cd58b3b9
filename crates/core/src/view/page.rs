use crate::domain::RecommendationResponse;
use crate::view::escape_html;
use crate::view::render::render_output;
use crate::view::toggle::{CollapseState, TOGGLE_SCRIPT};
use chrono::{DateTime, Utc};

// Element ids of the rendering surface.
pub const USER_ID_INPUT_ID: &str = "userIdInput";
pub const OUTPUT_ID: &str = "output";
pub const FEEDBACK_CONTAINER_ID: &str = "feedbackContainer";
pub const FEEDBACK_TEXT_ID: &str = "feedbackText";
pub const FEEDBACK_MESSAGE_ID: &str = "feedbackMessage";
pub const TOGGLE_FORM_ID: &str = "toggleForm";

pub const PAGE_TITLE: &str = "Mutual Fund Recommendations";
pub const LOADING_TEXT: &str = "Loading...";

/// Where a rendered page lives, which decides how its controls are wired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Surface {
    /// Served by the web app; controls post forms under `view_path`.
    Server { view_path: String },
    /// Exported file; cards toggle client-side, other controls are inert.
    Static,
}

impl Surface {
    fn action(&self, name: &str) -> Option<String> {
        match self {
            Self::Server { view_path } => {
                Some(format!("{}/{name}", view_path.trim_end_matches('/')))
            }
            Self::Static => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

impl Tone {
    pub fn color(self) -> &'static str {
        match self {
            Self::Success => "green",
            Self::Error => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub tone: Tone,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            text: text.into(),
        }
    }
}

/// Content of the `output` region.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OutputRegion {
    #[default]
    Empty,
    Prompt(String),
    Loading,
    Error(String),
    Recommendations(RecommendationResponse),
}

/// Everything the user sees, independent of how it is delivered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub user_id_input: String,
    pub output: OutputRegion,
    pub feedback_visible: bool,
    pub feedback_text: String,
    pub feedback_message: Option<StatusMessage>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Page {
    pub fn render_output(&self, collapse: &CollapseState, surface: &Surface) -> String {
        match &self.output {
            OutputRegion::Empty => String::new(),
            OutputRegion::Prompt(text) => format!("<p>{}</p>\n", escape_html(text)),
            OutputRegion::Loading => format!("<p>{LOADING_TEXT}</p>\n"),
            OutputRegion::Error(text) => {
                format!("<p style=\"color:red;\">{}</p>\n", escape_html(text))
            }
            OutputRegion::Recommendations(resp) => render_output(resp, collapse, surface),
        }
    }

    pub fn render_document(&self, collapse: &CollapseState, surface: &Surface) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>{PAGE_TITLE}</title>
  <style>{STYLE}</style>
</head>
<body>
<main>
<h1>{PAGE_TITLE}</h1>
"#
        ));

        let inert = if matches!(surface, Surface::Static) { " disabled" } else { "" };
        let user_id = escape_html(&self.user_id_input);
        let lookup_fields = format!(
            r#"<input id="{USER_ID_INPUT_ID}" name="user_id" type="text" placeholder="Enter user ID" value="{user_id}"{inert}/>
  <button type="submit"{inert}>Get Recommendations</button>"#
        );
        out.push_str(&wrap_form(surface.action("fetch"), "lookup", &lookup_fields));

        if let Some(action) = surface.action("toggle") {
            out.push_str(&format!(
                "<form id=\"{TOGGLE_FORM_ID}\" method=\"post\" action=\"{}\"></form>\n",
                escape_html(&action)
            ));
        }

        out.push_str(&format!("<div id=\"{OUTPUT_ID}\">\n"));
        out.push_str(&self.render_output(collapse, surface));
        out.push_str("</div>\n");

        let display = if self.feedback_visible { "block" } else { "none" };
        out.push_str(&format!(
            "<div id=\"{FEEDBACK_CONTAINER_ID}\" style=\"display:{display}\">\n<h2>Feedback</h2>\n"
        ));
        let feedback_fields = format!(
            r#"<textarea id="{FEEDBACK_TEXT_ID}" name="feedback" rows="4" placeholder="Tell us what you think of these recommendations"{inert}>{text}</textarea>
  <button type="submit"{inert}>Submit Feedback</button>"#,
            text = escape_html(&self.feedback_text),
        );
        out.push_str(&wrap_form(surface.action("feedback"), "feedback", &feedback_fields));
        out.push_str(&match &self.feedback_message {
            Some(msg) => format!(
                "<p id=\"{FEEDBACK_MESSAGE_ID}\" style=\"color:{};\">{}</p>\n",
                msg.tone.color(),
                escape_html(&msg.text)
            ),
            None => format!("<p id=\"{FEEDBACK_MESSAGE_ID}\"></p>\n"),
        });
        out.push_str("</div>\n");

        if let Some(at) = self.updated_at {
            out.push_str(&format!(
                "<footer>Last updated {}</footer>\n",
                at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        out.push_str("</main>\n");
        if matches!(surface, Surface::Static) {
            out.push_str(TOGGLE_SCRIPT);
            out.push('\n');
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}

fn wrap_form(action: Option<String>, class: &str, fields: &str) -> String {
    match action {
        Some(action) => format!(
            "<form class=\"{class}\" method=\"post\" action=\"{}\">\n  {fields}\n</form>\n",
            escape_html(&action)
        ),
        None => format!("<div class=\"{class}\">\n  {fields}\n</div>\n"),
    }
}

const STYLE: &str = "
body { font-family: sans-serif; margin: 0; background: #f6f7f9; color: #1f2933; }
main { max-width: 860px; margin: 0 auto; padding: 24px; }
.lookup, .feedback { display: flex; gap: 8px; margin: 12px 0; flex-wrap: wrap; }
textarea { width: 100%; }
.collapsible { background: #fff; border: 1px solid #d9dde3; border-radius: 6px; margin: 8px 0; }
.collapse-btn { width: 100%; text-align: left; padding: 10px 14px; border: 0; background: none; font-weight: 600; cursor: pointer; }
.collapse-content { padding: 0 14px 12px; }
footer { margin-top: 24px; font-size: 12px; color: #6b7280; }
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::toggle::CardKey;
    use serde_json::json;

    fn server() -> Surface {
        Surface::Server {
            view_path: "/views/7c9e".to_string(),
        }
    }

    #[test]
    fn exposes_every_element_id() {
        let html = Page::default().render_document(&CollapseState::default(), &server());
        for id in [
            USER_ID_INPUT_ID,
            OUTPUT_ID,
            FEEDBACK_CONTAINER_ID,
            FEEDBACK_TEXT_ID,
            FEEDBACK_MESSAGE_ID,
        ] {
            assert!(html.contains(&format!("id=\"{id}\"")), "missing #{id}");
        }
        assert!(html.contains(r#"action="/views/7c9e/fetch""#));
        assert!(html.contains(r#"action="/views/7c9e/feedback""#));
        assert!(html.contains(r#"<form id="toggleForm" method="post" action="/views/7c9e/toggle">"#));
        assert!(html.contains(r#"<div id="feedbackContainer" style="display:none">"#));
        assert!(!html.contains("function toggleCollapse"));
    }

    #[test]
    fn output_states_render_their_messages() {
        let collapse = CollapseState::default();
        let mut page = Page {
            output: OutputRegion::Loading,
            ..Default::default()
        };
        assert_eq!(page.render_output(&collapse, &server()), "<p>Loading...</p>\n");

        page.output = OutputRegion::Prompt("Please enter a user ID".into());
        assert_eq!(
            page.render_output(&collapse, &server()),
            "<p>Please enter a user ID</p>\n"
        );

        page.output = OutputRegion::Error("boom <x>".into());
        assert_eq!(
            page.render_output(&collapse, &server()),
            "<p style=\"color:red;\">boom &lt;x&gt;</p>\n"
        );
    }

    #[test]
    fn static_export_is_inert_and_scripted() {
        let resp: RecommendationResponse = serde_json::from_value(json!({
            "user_fund_details": [{"name": "X"}],
            "recommendations": [],
            "ranking": [],
        }))
        .unwrap();
        let page = Page {
            user_id_input: "42\"><b>".to_string(),
            output: OutputRegion::Recommendations(resp),
            feedback_visible: true,
            ..Default::default()
        };
        let mut collapse = CollapseState::default();
        collapse.toggle(CardKey::Holding(0));

        let html = page.render_document(&collapse, &Surface::Static);
        assert!(html.contains("function toggleCollapse"));
        assert!(!html.contains("<form"));
        assert!(html.contains("value=\"42&quot;&gt;&lt;b&gt;\" disabled"));
        assert!(html.contains(r#"<div id="holding-0" class="collapse-content" style="display:block">"#));
        assert!(html.contains(r#"<div id="feedbackContainer" style="display:block">"#));
    }

    #[test]
    fn feedback_message_carries_tone() {
        let page = Page {
            feedback_visible: true,
            feedback_message: Some(StatusMessage::success("Thanks")),
            ..Default::default()
        };
        let html = page.render_document(&CollapseState::default(), &server());
        assert!(html.contains(r#"<p id="feedbackMessage" style="color:green;">Thanks</p>"#));
    }
}
