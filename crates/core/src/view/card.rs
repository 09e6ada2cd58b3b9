use crate::view::escape_html;
use crate::view::page::{Surface, TOGGLE_FORM_ID};
use crate::view::toggle::CardKey;

/// One collapsible card. `content_html` must already be escaped.
#[derive(Debug, Clone)]
pub struct Card<'a> {
    pub key: CardKey,
    pub title: &'a str,
    /// 0-based; rendered as a `"{rank + 1}. "` title prefix.
    pub rank: Option<usize>,
    pub content_html: String,
}

impl Card<'_> {
    pub fn heading(&self) -> String {
        match self.rank {
            Some(rank) => format!("{}. {}", rank + 1, self.title),
            None => self.title.to_string(),
        }
    }

    pub fn render(&self, expanded: bool, surface: &Surface) -> String {
        let id = self.key.to_string();
        let display = if expanded { "block" } else { "none" };
        let button_wiring = match surface {
            Surface::Server { .. } => format!(
                r#"type="submit" form="{TOGGLE_FORM_ID}" name="card" value="{id}""#
            ),
            Surface::Static => format!(r#"type="button" onclick="toggleCollapse('{id}')""#),
        };

        format!(
            r#"<div class="collapsible" data-card="{id}">
  <button class="collapse-btn" {button_wiring} aria-controls="{id}" aria-expanded="{expanded}">{heading}</button>
  <div id="{id}" class="collapse-content" style="display:{display}">
{content}
  </div>
</div>
"#,
            heading = escape_html(&self.heading()),
            content = self.content_html,
        )
    }
}
