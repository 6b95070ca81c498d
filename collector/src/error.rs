use thiserror::Error;

/// Everything that can abort a collection run.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// `page` is the zero-based search page; `None` for vacancy detail requests.
    #[error("request for {url}{} failed: {source}", page_note(.page))]
    Fetch {
        url: String,
        page: Option<u32>,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url}{} returned HTTP {status}", page_note(.page))]
    Status {
        url: String,
        page: Option<u32>,
        status: reqwest::StatusCode,
    },

    #[error("unexpected response shape for {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn page_note(page: &Option<u32>) -> String {
    page.map(|p| format!(" (page {p})")).unwrap_or_default()
}

impl CollectError {
    /// Transport-level failures (network, HTTP status).
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Status { .. })
    }

    /// Data-shape failures (malformed or unexpected JSON).
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Search page the failed request was for, if it was a page request.
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Fetch { page, .. } | Self::Status { page, .. } => *page,
            _ => None,
        }
    }
}

pub type Result<T, E = CollectError> = std::result::Result<T, E>;
