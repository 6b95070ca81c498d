//! Writing a ResultSet to disk.
//!
//! Files are written to a temporary sibling and renamed into place once
//! complete, so a failed run never leaves a half-written destination.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use common::{COLUMNS, Delimiter, write_row};
use tempfile::NamedTempFile;
use tracing::info;

use crate::client::PageSource;
use crate::collector::{Collector, ResultSet};
use crate::error::Result;
use crate::query::Query;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn ext(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }

    fn delimiter(self) -> Option<Delimiter> {
        match self {
            OutputFormat::Csv => Some(Delimiter::Comma),
            OutputFormat::Tsv => Some(Delimiter::Tab),
            OutputFormat::Json => None,
        }
    }
}

/// Serialize `set` in `format`: header plus one row per posting, or a JSON array.
pub fn write_postings<W: Write>(mut w: W, set: &ResultSet, format: OutputFormat) -> Result<()> {
    match format.delimiter() {
        Some(delim) => {
            write_row(&mut w, &COLUMNS, delim)?;
            for posting in set {
                write_row(&mut w, &posting.to_row(), delim)?;
            }
        }
        None => {
            let postings: Vec<_> = set.iter().collect();
            serde_json::to_writer_pretty(&mut w, &postings).map_err(std::io::Error::from)?;
            writeln!(w)?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Write `set` to `path`, replacing any existing file atomically.
pub fn write_result_set(set: &ResultSet, path: &Path, format: OutputFormat) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let tmp = NamedTempFile::new_in(dir)?;
    write_postings(BufWriter::new(tmp.as_file()), set, format)?;
    tmp.persist(path).map_err(|e| e.error)?;

    info!(path = %path.display(), postings = set.len(), "result set written");
    Ok(())
}

/// Run a collection and write the result. On error nothing is written.
pub fn collect_to_file<S: PageSource>(
    collector: &Collector<S>,
    query: &Query,
    path: &Path,
    format: OutputFormat,
) -> Result<ResultSet> {
    let set = collector.collect(query)?;
    write_result_set(&set, path, format)?;
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Posting, parse_rows};
    use tempfile::TempDir;

    fn posting(id: &str, salary_from: Option<i64>) -> Posting {
        Posting {
            id: id.to_string(),
            title: "Rust, async".to_string(),
            employer: "Acme".to_string(),
            salary_from,
            salary_to: None,
            currency: salary_from.map(|_| "RUR".to_string()),
            description: "Line one\nline two".to_string(),
            city: None,
            address: None,
            url: format!("https://hh.ru/vacancy/{id}"),
            skills: vec!["Rust".to_string(), "Tokio".to_string()],
            schedule: None,
            roles: vec![],
            published_at: None,
            experience: None,
        }
    }

    fn set() -> ResultSet {
        let mut set = ResultSet::default();
        set.push(posting("1", Some(100_000)));
        set.push(posting("2", None));
        set
    }

    #[test]
    fn test_csv_has_header_and_one_row_per_posting() {
        let mut buf = Vec::new();
        write_postings(&mut buf, &set(), OutputFormat::Csv).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let rows = parse_rows(&text, Delimiter::Comma);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], COLUMNS.to_vec());
        assert_eq!(rows[1][3], "100000");
        assert_eq!(rows[2][3], "");
        assert_eq!(rows[2][5], "");
        assert_eq!(Posting::from_row(&rows[1]).unwrap(), posting("1", Some(100_000)));
    }

    #[test]
    fn test_json_output_is_an_array() {
        let mut buf = Vec::new();
        write_postings(&mut buf, &set(), OutputFormat::Json).unwrap();
        let parsed: Vec<Posting> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].salary_from, None);
    }

    #[test]
    fn test_format_flag_names_match_extensions() {
        use clap::ValueEnum;

        for format in OutputFormat::value_variants() {
            let name = format.to_possible_value().unwrap();
            assert_eq!(name.get_name(), format.ext());
            assert_eq!(OutputFormat::from_str(format.ext(), false).unwrap(), *format);
        }
        assert_eq!(OutputFormat::from_str("TSV", true).unwrap(), OutputFormat::Tsv);
        assert!(OutputFormat::from_str("xlsx", true).is_err());
    }

    #[test]
    fn test_write_creates_parent_and_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data").join("vacancies.tsv");

        write_result_set(&set(), &path, OutputFormat::Tsv).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        assert_eq!(parse_rows(&first, Delimiter::Tab).len(), 3);
        assert!(first.starts_with("id\tname\t"));

        let mut smaller = ResultSet::default();
        smaller.push(posting("9", None));
        write_result_set(&smaller, &path, OutputFormat::Tsv).unwrap();
        let second = fs::read_to_string(&path).unwrap();
        assert_eq!(parse_rows(&second, Delimiter::Tab).len(), 2);

        // No temp files left behind
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }
}
