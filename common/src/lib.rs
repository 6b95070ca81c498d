//! Shared vacancy record and its flat row layout.
//!
//! The collector writes `Posting`s as delimited rows and the analysis crate
//! reads them back, so both sides agree on [`COLUMNS`] through this crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod delimited;
pub mod observability;

pub use delimited::{Delimiter, parse_rows, write_row};

/// Header row of every delimited ResultSet file, in column order.
pub const COLUMNS: [&str; 15] = [
    "id",
    "name",
    "employer",
    "salary_from",
    "salary_to",
    "currency",
    "description",
    "city",
    "address",
    "url",
    "key_skills",
    "schedule",
    "roles",
    "published_at",
    "experience",
];

/// Separator used when a list field (skills, roles) is packed into one cell.
///
/// Items may contain `;` but not this exact sequence.
pub const LIST_SEPARATOR: &str = "; ";

/// One job advertisement fetched from the search API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Posting {
    pub id: String,
    pub title: String,
    pub employer: String,
    pub salary_from: Option<i64>,
    pub salary_to: Option<i64>,
    pub currency: Option<String>,
    pub description: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub url: String,
    pub skills: Vec<String>,
    pub schedule: Option<String>,
    pub roles: Vec<String>,
    /// Publication date, `YYYY-MM-DD`.
    pub published_at: Option<String>,
    /// Experience level id as reported by the API (e.g. `between1And3`).
    pub experience: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("expected {expected} columns, found {found}")]
    Arity { expected: usize, found: usize },
    #[error("column `{column}` is not an integer: {value:?}")]
    NotInteger { column: &'static str, value: String },
}

impl Posting {
    /// Flatten into one cell per entry of [`COLUMNS`]. Missing values become empty cells.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.employer.clone(),
            opt_cell(self.salary_from),
            opt_cell(self.salary_to),
            self.currency.clone().unwrap_or_default(),
            self.description.clone(),
            self.city.clone().unwrap_or_default(),
            self.address.clone().unwrap_or_default(),
            self.url.clone(),
            self.skills.join(LIST_SEPARATOR),
            self.schedule.clone().unwrap_or_default(),
            self.roles.join(LIST_SEPARATOR),
            self.published_at.clone().unwrap_or_default(),
            self.experience.clone().unwrap_or_default(),
        ]
    }

    /// Rebuild a posting from a row produced by [`Posting::to_row`].
    pub fn from_row(row: &[String]) -> Result<Self, RowError> {
        let [
            id,
            title,
            employer,
            salary_from,
            salary_to,
            currency,
            description,
            city,
            address,
            url,
            skills,
            schedule,
            roles,
            published_at,
            experience,
        ] = row
        else {
            return Err(RowError::Arity {
                expected: COLUMNS.len(),
                found: row.len(),
            });
        };

        Ok(Self {
            id: id.clone(),
            title: title.clone(),
            employer: employer.clone(),
            salary_from: int_cell("salary_from", salary_from)?,
            salary_to: int_cell("salary_to", salary_to)?,
            currency: text_cell(currency),
            description: description.clone(),
            city: text_cell(city),
            address: text_cell(address),
            url: url.clone(),
            skills: list_cell(skills),
            schedule: text_cell(schedule),
            roles: list_cell(roles),
            published_at: text_cell(published_at),
            experience: text_cell(experience),
        })
    }
}

fn opt_cell(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// Cells are read back exactly as written: no column is trimmed.

fn text_cell(cell: &str) -> Option<String> {
    (!cell.is_empty()).then(|| cell.to_string())
}

fn int_cell(column: &'static str, cell: &str) -> Result<Option<i64>, RowError> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<i64>()
        .map(Some)
        .map_err(|_| RowError::NotInteger {
            column,
            value: cell.to_string(),
        })
}

fn list_cell(cell: &str) -> Vec<String> {
    cell.split(LIST_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
