use anyhow::Context;
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fundview_core::client::{HttpRecommendationApi, RecommendationApi};
use fundview_core::view::{CardKey, RecommendationView, Surface};

mod shell;

#[derive(Debug, Parser)]
#[command(name = "fundview", about = "Browse mutual fund recommendations")]
struct Args {
    /// Backend base URL. Overrides FUNDVIEW_API_BASE_URL and FUNDVIEW_API_ENV.
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Backend preset: local or hosted. Overrides FUNDVIEW_API_ENV.
    #[arg(long, global = true)]
    api_env: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch recommendations for one user and export the page as static HTML.
    Fetch(FetchArgs),

    /// Interactive session; the active user lives until you quit.
    Shell,
}

#[derive(Debug, clap::Args)]
struct FetchArgs {
    #[arg(long)]
    user_id: String,

    /// Write the page here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Card to render expanded, e.g. holding-0 or rec-2. Repeatable.
    #[arg(long = "expand", value_name = "CARD")]
    expand: Vec<CardKey>,

    /// Submit this feedback after a successful fetch.
    #[arg(long)]
    feedback: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut settings = fundview_core::config::Settings::from_env()?;
    if args.api_base_url.is_some() {
        settings.api_base_url = args.api_base_url.clone();
    }
    if args.api_env.is_some() {
        settings.api_env = args.api_env.clone();
    }
    let _sentry_guard = init_sentry(&settings);

    // stdout carries the exported page; logs go to stderr.
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let api: Arc<dyn RecommendationApi> = Arc::new(HttpRecommendationApi::from_settings(&settings)?);
    tracing::debug!(endpoint = api.endpoint(), "using recommendation backend");

    let result = match args.command {
        Command::Fetch(fetch_args) => run_fetch(api, fetch_args).await,
        Command::Shell => shell::run(api).await,
    };

    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
    }
    result
}

async fn run_fetch(api: Arc<dyn RecommendationApi>, args: FetchArgs) -> anyhow::Result<()> {
    let view = RecommendationView::new(api);
    let fetched = view.fetch(&args.user_id).await;

    if fetched.is_ok() {
        let expand: BTreeSet<CardKey> = args.expand.iter().copied().collect();
        for key in expand {
            if view.toggle(key).await.is_none() {
                tracing::warn!(card = %key, "no such card on the page; ignoring --expand");
            }
        }
    }

    let feedback = match (&fetched, args.feedback.as_deref()) {
        (Ok(_), Some(text)) => Some(view.submit_feedback(text).await),
        _ => None,
    };

    write_document(&view, args.out.as_deref()).await?;

    fetched.with_context(|| format!("failed to fetch recommendations for {:?}", args.user_id))?;
    if let Some(result) = feedback {
        result.context("feedback submission failed")?;
        tracing::info!(user_id = %args.user_id.trim(), "feedback submitted");
    }
    Ok(())
}

async fn write_document(view: &RecommendationView, out: Option<&Path>) -> anyhow::Result<()> {
    let html = view.render_document(&Surface::Static).await;
    match out {
        Some(path) => {
            tokio::fs::write(path, html)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote recommendations page");
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(html.as_bytes()).await.context("failed to write stdout")?;
            stdout.flush().await.context("failed to flush stdout")?;
        }
    }
    Ok(())
}

fn init_sentry(settings: &fundview_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
