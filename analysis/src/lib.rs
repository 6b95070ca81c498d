//! Exploratory statistics over a collected set of vacancies.
//!
//! Reads the collector's CSV/TSV/JSON output and answers three questions:
//! which skills are asked for most, how salaries are distributed, and how
//! salary moves with required experience.

use std::fs;
use std::path::Path;

use common::{COLUMNS, Delimiter, Posting, RowError, parse_rows};
use thiserror::Error;
use tracing::debug;

pub mod stats;

pub use stats::{
    Bucket, ExperienceLevel, ExperienceReport, LevelStats, SalaryStats, SkillCount,
    experience_salary, salary_distribution, salary_estimate, skill_frequency,
};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path} does not start with the expected header row")]
    Header { path: String },
    #[error("{path}, row {row}: {source}")]
    Row {
        path: String,
        row: usize,
        #[source]
        source: RowError,
    },
}

/// Load postings written by the collector. The format follows the file extension.
pub fn load_postings(path: &Path) -> Result<Vec<Posting>, AnalysisError> {
    let shown = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|source| AnalysisError::Read {
        path: shown.clone(),
        source,
    })?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    if ext.eq_ignore_ascii_case("json") {
        return serde_json::from_str(&text).map_err(|source| AnalysisError::Json {
            path: shown,
            source,
        });
    }

    let mut rows = parse_rows(&text, Delimiter::from_ext(ext)).into_iter();
    match rows.next() {
        Some(header) if header == COLUMNS => {}
        _ => return Err(AnalysisError::Header { path: shown }),
    }

    let postings = rows
        .enumerate()
        .map(|(i, row)| {
            Posting::from_row(&row).map_err(|source| AnalysisError::Row {
                path: shown.clone(),
                row: i + 1,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(path = %shown, postings = postings.len(), "postings loaded");
    Ok(postings)
}
