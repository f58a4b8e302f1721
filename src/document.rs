//! Parsed modem status page and the places it can be loaded from.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use scraper::Html;
use url::Url;

use crate::error::{Result, SurfboardError};

/// Signal data page served by the modem on its fixed management address.
pub const DEFAULT_URL: &str = "http://192.168.100.1/cmSignalData.htm";

/// Default timeout for the single fetch of the status page.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Immutable, lowercased parse tree of one status page snapshot.
///
/// The whole source is lowercased once before parsing, so every text query
/// against the tree works with lowercase needles.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(&source.to_lowercase()),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Load and parse a page. URLs get exactly one GET, no retries.
    pub fn load(source: &Source, agent: &ureq::Agent) -> Result<Self> {
        let text = match source {
            Source::Url(url) => fetch(agent, url)?,
            Source::File(path) => {
                std::fs::read_to_string(path).map_err(|source| SurfboardError::Read {
                    path: path.clone(),
                    source,
                })?
            }
        };
        tracing::debug!(%source, bytes = text.len(), "loaded status page");
        Ok(Self::parse(&text))
    }
}

fn fetch(agent: &ureq::Agent, url: &Url) -> Result<String> {
    let to_error = |source| SurfboardError::Fetch {
        url: url.to_string(),
        source,
    };
    let response = agent.get(url.as_str()).call().map_err(to_error)?;
    response.into_body().read_to_string().map_err(to_error)
}

/// Blocking HTTP agent with a global timeout covering the whole request.
pub fn agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    ureq::Agent::new_with_config(config)
}

/// Where the status page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(Url),
    File(PathBuf),
}

impl Source {
    /// `http`/`https` URLs are fetched; anything else is a file path.
    pub fn parse(value: &str) -> Self {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Source::Url(url),
            _ => Source::File(PathBuf::from(value)),
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::parse(DEFAULT_URL)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{url}"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}
