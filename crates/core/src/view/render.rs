use crate::domain::{FieldValue, FundDetail, Notes, Recommendation, RecommendationResponse, RETURN_PERIODS};
use crate::view::card::Card;
use crate::view::escape_html;
use crate::view::page::Surface;
use crate::view::toggle::{CardKey, CollapseState};

pub const HOLDINGS_HEADING: &str = "User Fund Details";
pub const RECOMMENDATIONS_HEADING: &str = "Recommendations (Ranked)";
const MISSING: &str = "N/A";

/// A card to be rendered, in display order.
#[derive(Debug, Clone, Copy)]
pub enum CardSource<'a> {
    Holding(&'a FundDetail),
    Recommendation { rank: usize, rec: &'a Recommendation },
}

impl<'a> CardSource<'a> {
    pub fn card(&self, key: CardKey) -> Card<'a> {
        match *self {
            Self::Holding(fund) => Card {
                key,
                title: &fund.name,
                rank: None,
                content_html: fund_details_html(fund),
            },
            Self::Recommendation { rank, rec } => Card {
                key,
                title: rec.name(),
                rank: Some(rank),
                content_html: recommendation_details_html(rec),
            },
        }
    }
}

/// Holdings in API order followed by recommendations in ranking order.
///
/// A recommendation's rank is its position in `ranking`, so a ranked name with no
/// matching record still uses up its number. Card keys count rendered cards only.
pub fn cards(resp: &RecommendationResponse) -> Vec<(CardKey, CardSource<'_>)> {
    let holdings = resp
        .user_fund_details
        .iter()
        .enumerate()
        .map(|(i, fund)| (CardKey::Holding(i), CardSource::Holding(fund)));

    let recs = resp.ranked().into_iter().enumerate().map(|(i, (rank, rec))| {
        (
            CardKey::Recommendation(i),
            CardSource::Recommendation { rank, rec },
        )
    });

    holdings.chain(recs).collect()
}

/// Content of the `output` region for a successful fetch.
pub fn render_output(
    resp: &RecommendationResponse,
    collapse: &CollapseState,
    surface: &Surface,
) -> String {
    let (holdings, recs): (Vec<_>, Vec<_>) = cards(resp)
        .into_iter()
        .partition(|(key, _)| matches!(key, CardKey::Holding(_)));

    let mut out = String::new();
    for (heading, section) in [(HOLDINGS_HEADING, holdings), (RECOMMENDATIONS_HEADING, recs)] {
        out.push_str(&format!("<h2>{heading}</h2>\n"));
        for (key, source) in section {
            out.push_str(&source.card(key).render(collapse.is_expanded(key), surface));
        }
    }
    out
}

pub fn fund_details_html(fund: &FundDetail) -> String {
    let mut out = String::new();
    push_core_fields(&mut out, fund);
    push_tail_fields(&mut out, fund);
    out
}

pub fn recommendation_details_html(rec: &Recommendation) -> String {
    let mut out = String::new();
    push_core_fields(&mut out, &rec.fund);
    out.push_str("<h4>Pros</h4>\n");
    out.push_str(&notes_html(rec.pros.as_ref()));
    out.push_str("<h4>Cons</h4>\n");
    out.push_str(&notes_html(rec.cons.as_ref()));
    push_tail_fields(&mut out, &rec.fund);
    out
}

fn push_core_fields(out: &mut String, fund: &FundDetail) {
    out.push_str(&field_line("Category", fund.category.as_deref()));
    out.push_str(&field_line("NAV", value_text(fund.nav.as_ref()).as_deref()));
    out.push_str(&field_line("AUM", value_text(fund.aum.as_ref()).as_deref()));
    out.push_str("<h4>Returns</h4>\n");
    for period in RETURN_PERIODS {
        out.push_str(&field_line(period, value_text(fund.return_for(period)).as_deref()));
    }
}

fn push_tail_fields(out: &mut String, fund: &FundDetail) {
    out.push_str(&field_line("Risk", fund.risk_level.as_deref()));
    out.push_str(&format!(
        "<p><b>URL:</b> {}</p>\n",
        resource_link_html(fund.resource_url.as_deref())
    ));
}

fn value_text(value: Option<&FieldValue>) -> Option<String> {
    value.map(ToString::to_string)
}

fn field_line(label: &str, value: Option<&str>) -> String {
    let value = value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(MISSING);
    format!("<p><b>{label}:</b> {}</p>\n", escape_html(value))
}

fn notes_html(notes: Option<&Notes>) -> String {
    match notes {
        Some(notes) if !notes.is_blank() => match notes {
            Notes::Text(s) => format!("<p>{}</p>\n", escape_html(s.trim())),
            Notes::Lines(lines) => {
                let mut out = String::from("<ul>\n");
                for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
                    out.push_str(&format!("<li>{}</li>\n", escape_html(line)));
                }
                out.push_str("</ul>\n");
                out
            }
        },
        _ => format!("<p>{MISSING}</p>\n"),
    }
}

/// Anchors are only emitted for http(s) URLs; anything else is shown as text.
fn resource_link_html(url: Option<&str>) -> String {
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return MISSING.to_string();
    };

    let lower = url.to_ascii_lowercase();
    let escaped = escape_html(url);
    if lower.starts_with("http://") || lower.starts_with("https://") {
        format!(r#"<a href="{escaped}" target="_blank" rel="noopener noreferrer">{escaped}</a>"#)
    } else {
        escaped
    }
}
