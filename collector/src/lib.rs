//! Vacancy collector for the hh.ru search API.
//!
//! Pages through `GET /vacancies` for a keyword, optionally enriches each
//! vacancy with its full record, and writes the postings as CSV, TSV or JSON.

pub mod api;
pub mod client;
pub mod collector;
pub mod error;
pub mod normalize;
pub mod output;
pub mod query;
pub mod settings;

pub use client::{HhClient, PageSource};
pub use collector::{CollectOptions, Collector, Postings, ResultSet};
pub use error::{CollectError, Result};
pub use output::{OutputFormat, collect_to_file, write_result_set};
pub use query::Query;
pub use settings::Settings;
