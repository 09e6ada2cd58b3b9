use anyhow::Context;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use fundview_core::client::RecommendationApi;
use fundview_core::view::render::{self, HOLDINGS_HEADING, RECOMMENDATIONS_HEADING};
use fundview_core::view::{CardKey, OutputRegion, RecommendationView, Surface, Tone, ViewState};

const HELP: &str = "\
commands:
  fetch <user id>     load recommendations and start a session
  toggle <card>       expand or collapse a card (holding-0, rec-2, ...)
  feedback <text>     send feedback for the active session
  status              show the current page
  save <path>         write the page as standalone HTML
  help                show this text
  quit                leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Fetch(String),
    Toggle(CardKey),
    Feedback(String),
    Status,
    Save(PathBuf),
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
///
/// `fetch` and `feedback` keep their argument verbatim so an empty one reaches the
/// page's own validation.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let cmd = match word {
        "fetch" => ShellCommand::Fetch(rest.to_string()),
        "feedback" => ShellCommand::Feedback(rest.to_string()),
        "toggle" if rest.is_empty() => return Err("usage: toggle <card>".into()),
        "toggle" => ShellCommand::Toggle(rest.parse().map_err(|e| format!("{e}"))?),
        "save" if rest.is_empty() => return Err("usage: save <path>".into()),
        "save" => ShellCommand::Save(PathBuf::from(rest)),
        "status" => ShellCommand::Status,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command `{other}`; try `help`")),
    };
    Ok(Some(cmd))
}

pub async fn run(api: Arc<dyn RecommendationApi>) -> anyhow::Result<()> {
    let view = RecommendationView::new(api);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    loop {
        print!("> ");
        std::io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(cmd)) => execute(&view, cmd).await?,
            Err(msg) => println!("{msg}"),
        }
    }
    Ok(())
}

async fn execute(view: &RecommendationView, cmd: ShellCommand) -> anyhow::Result<()> {
    match cmd {
        ShellCommand::Fetch(user_id) => {
            // Failures are already reflected on the page.
            let _ = view.fetch(&user_id).await;
            println!("{}", view.inspect(describe).await);
        }
        ShellCommand::Feedback(text) => {
            let _ = view.submit_feedback(&text).await;
            let message = view
                .inspect(|state| state.page().feedback_message.clone())
                .await;
            if let Some(message) = message {
                println!("{}", message.text);
            }
        }
        ShellCommand::Toggle(key) => match view.toggle(key).await {
            Some(true) => println!("{key} expanded"),
            Some(false) => println!("{key} collapsed"),
            None => println!("no card {key} on the page"),
        },
        ShellCommand::Status => println!("{}", view.inspect(describe).await),
        ShellCommand::Save(path) => {
            let html = view.render_document(&Surface::Static).await;
            tokio::fs::write(&path, html)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("saved {}", path.display());
        }
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => {}
    }
    Ok(())
}

/// Plain-text rendering of the page for the terminal.
pub fn describe(state: &ViewState) -> String {
    let page = state.page();
    let mut out = String::new();

    match &page.output {
        OutputRegion::Empty => out.push_str("(nothing fetched yet)\n"),
        OutputRegion::Loading => out.push_str("Loading...\n"),
        OutputRegion::Prompt(msg) | OutputRegion::Error(msg) => {
            out.push_str(msg);
            out.push('\n');
        }
        OutputRegion::Recommendations(resp) => {
            let (holdings, recs): (Vec<_>, Vec<_>) = render::cards(resp)
                .into_iter()
                .partition(|(key, _)| matches!(key, CardKey::Holding(_)));
            for (heading, section) in [(HOLDINGS_HEADING, holdings), (RECOMMENDATIONS_HEADING, recs)] {
                out.push_str(heading);
                out.push('\n');
                for (key, source) in section {
                    let marker = if state.collapse().is_expanded(key) { '-' } else { '+' };
                    let card = source.card(key);
                    out.push_str(&format!("  [{marker}] {:<10} {}\n", key.to_string(), card.heading()));
                }
            }
        }
    }

    match state.session() {
        Some(user_id) => out.push_str(&format!("session: {user_id}\n")),
        None => out.push_str("session: none\n"),
    }
    if let Some(message) = &page.feedback_message {
        let tone = match message.tone {
            Tone::Success => "ok",
            Tone::Error => "error",
        };
        out.push_str(&format!("feedback [{tone}]: {}\n", message.text));
    }
    out.trim_end().to_string()
}
