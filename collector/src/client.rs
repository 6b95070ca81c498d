//! HTTP access to the vacancy search API.

use std::thread::sleep;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{SearchPage, VacancyDetail};
use crate::error::{CollectError, Result};
use crate::query::Query;

pub const DEFAULT_BASE_URL: &str = "https://api.hh.ru";
pub const DEFAULT_USER_AGENT: &str = concat!("hh-collector/", env!("CARGO_PKG_VERSION"));

/// Where pages and vacancy details come from.
pub trait PageSource {
    /// Fetch one zero-based page of search results.
    fn fetch_page(&self, query: &Query, page: u32) -> Result<SearchPage>;

    /// Fetch the full vacancy (description, key skills).
    fn fetch_vacancy(&self, id: &str) -> Result<VacancyDetail>;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn fetch_page(&self, query: &Query, page: u32) -> Result<SearchPage> {
        (**self).fetch_page(query, page)
    }

    fn fetch_vacancy(&self, id: &str) -> Result<VacancyDetail> {
        (**self).fetch_vacancy(id)
    }
}

/// Blocking client for the search API.
///
/// Page requests are made once. Vacancy detail requests are retried up to
/// `detail_attempts` times, waiting `detail_retry_delay` between attempts.
pub struct HhClient {
    http: Client,
    base_url: String,
    detail_attempts: u32,
    detail_retry_delay: Duration,
}

impl HhClient {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(CollectError::Client)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            detail_attempts: 3,
            detail_retry_delay: Duration::from_secs(5),
        })
    }

    pub fn with_detail_retries(mut self, attempts: u32, delay: Duration) -> Self {
        self.detail_attempts = attempts.max(1);
        self.detail_retry_delay = delay;
        self
    }

    /// GET `url` and decode the JSON body. `page` tags errors from search page requests.
    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        page: Option<u32>,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .map_err(|source| CollectError::Fetch {
                url: url.to_string(),
                page,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectError::Status {
                url: url.to_string(),
                page,
                status,
            });
        }

        let body = response.bytes().map_err(|source| CollectError::Fetch {
            url: url.to_string(),
            page,
            source,
        })?;
        debug!(url, bytes = body.len(), "response received");

        serde_json::from_slice(&body).map_err(|source| CollectError::Parse {
            context: match page {
                Some(p) => format!("{url} (page {p})"),
                None => url.to_string(),
            },
            source,
        })
    }
}

impl PageSource for HhClient {
    fn fetch_page(&self, query: &Query, page: u32) -> Result<SearchPage> {
        let url = format!("{}/vacancies", self.base_url);
        self.get_json(&url, Some(page), &query.params(page))
    }

    fn fetch_vacancy(&self, id: &str) -> Result<VacancyDetail> {
        let url = format!("{}/vacancies/{}", self.base_url, id);
        let mut attempt = 1;
        loop {
            match self.get_json(&url, None, &[]) {
                Ok(detail) => return Ok(detail),
                // Only transport failures are worth another try
                Err(e) if e.is_fetch() && attempt < self.detail_attempts => {
                    warn!(vacancy = id, attempt, error = %e, "bad response for vacancy, trying again");
                    sleep(self.detail_retry_delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
