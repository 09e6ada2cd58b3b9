pub mod client;
pub mod domain;
pub mod error;
pub mod view;

pub mod config {
    use anyhow::Context;

    pub const LOCAL_API_BASE_URL: &str = "http://localhost:8000/api/v1";
    pub const HOSTED_API_BASE_URL: &str = "https://mf-backend-geou.onrender.com/api/v1";

    /// Backend presets selectable at runtime via `FUNDVIEW_API_ENV`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ApiEnvironment {
        Local,
        Hosted,
    }

    impl ApiEnvironment {
        pub fn parse(s: &str) -> anyhow::Result<Self> {
            match s.trim().to_ascii_lowercase().as_str() {
                "local" => Ok(Self::Local),
                "hosted" => Ok(Self::Hosted),
                other => anyhow::bail!("unknown FUNDVIEW_API_ENV {other:?} (expected local or hosted)"),
            }
        }

        pub fn base_url(self) -> &'static str {
            match self {
                Self::Local => LOCAL_API_BASE_URL,
                Self::Hosted => HOSTED_API_BASE_URL,
            }
        }
    }

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub api_base_url: Option<String>,
        pub api_env: Option<String>,
        pub api_timeout_secs: Option<u64>,
        pub max_views: Option<usize>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                api_base_url: non_empty_var("FUNDVIEW_API_BASE_URL"),
                api_env: non_empty_var("FUNDVIEW_API_ENV"),
                api_timeout_secs: parse_var("FUNDVIEW_API_TIMEOUT_SECS")?,
                max_views: parse_var("FUNDVIEW_MAX_VIEWS")?,
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn api_environment(&self) -> anyhow::Result<ApiEnvironment> {
            match self.api_env.as_deref() {
                Some(s) => ApiEnvironment::parse(s),
                None => Ok(ApiEnvironment::Local),
            }
        }

        /// An explicit base URL wins over the environment preset.
        pub fn resolve_api_base_url(&self) -> anyhow::Result<String> {
            if let Some(url) = self.api_base_url.as_deref() {
                return Ok(url.trim().to_string());
            }
            Ok(self.api_environment()?.base_url().to_string())
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.trim().is_empty())
    }

    fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        non_empty_var(key)
            .map(|s| {
                s.trim()
                    .parse::<T>()
                    .with_context(|| format!("{key} must be a valid number (got {s:?})"))
            })
            .transpose()
    }

}
