use anyhow::{Context, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://android-kotlin-fun-mars-server.appspot.com/";

/// Server-side subset of listings, sent as the `filter` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarsApiFilter {
    ShowRent,
    ShowBuy,
    ShowAll,
}

impl MarsApiFilter {
    /// Query value understood by the server
    pub fn value(&self) -> &'static str {
        match self {
            MarsApiFilter::ShowRent => "rent",
            MarsApiFilter::ShowBuy => "buy",
            MarsApiFilter::ShowAll => "all",
        }
    }
}

impl Default for MarsApiFilter {
    fn default() -> Self {
        MarsApiFilter::ShowAll
    }
}

impl fmt::Display for MarsApiFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for MarsApiFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rent" => Ok(MarsApiFilter::ShowRent),
            "buy" => Ok(MarsApiFilter::ShowBuy),
            "all" => Ok(MarsApiFilter::ShowAll),
            other => anyhow::bail!("Unknown filter {:?} (expected all, rent or buy)", other),
        }
    }
}

/// Connection settings for the listing endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL the `realestate` path is resolved against
    pub base_url: String,
    pub user_agent: String,
    /// `None` keeps reqwest's default (no timeout)
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}

impl ApiConfig {
    /// Defaults overlaid with `MARS_API_BASE_URL`, `MARS_API_USER_AGENT`
    /// and `MARS_API_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup("MARS_API_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(user_agent) = lookup("MARS_API_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(secs) = lookup("MARS_API_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("MARS_API_TIMEOUT_SECS is not a number: {:?}", secs))?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}
