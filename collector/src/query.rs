use crate::error::{CollectError, Result};

/// Largest `per_page` the search API accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Search keyword plus filters. Validated on construction, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    keyword: String,
    area: Option<String>,
    per_page: u32,
}

impl Query {
    pub fn new(keyword: &str) -> Result<Self> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(CollectError::InvalidQuery("keyword is empty".to_string()));
        }
        Ok(Self {
            keyword: keyword.to_string(),
            area: None,
            per_page: MAX_PER_PAGE,
        })
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        let area = area.into();
        self.area = (!area.trim().is_empty()).then(|| area.trim().to_string());
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Result<Self> {
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(CollectError::InvalidQuery(format!(
                "per_page must be within 1..={MAX_PER_PAGE}, got {per_page}"
            )));
        }
        self.per_page = per_page;
        Ok(self)
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn area(&self) -> Option<&str> {
        self.area.as_deref()
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Query-string pairs for the given zero-based page.
    pub fn params(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![("text", self.keyword.clone())];
        if let Some(area) = &self.area {
            params.push(("area", area.clone()));
        }
        params.push(("page", page.to_string()));
        params.push(("per_page", self.per_page.to_string()));
        params
    }
}
