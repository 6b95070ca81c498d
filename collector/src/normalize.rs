//! Turns API vacancies into flat `Posting`s.

use std::sync::LazyLock;

use common::Posting;
use regex::{Captures, Regex};

use crate::api::{Snippet, VacancyDetail, VacancyItem};

/// Matches HTML tags (capturing the tag name) and character entities.
static MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<\s*/?\s*([A-Za-z0-9]*)[^>]*>|&[^;\s]*;").expect("markup pattern is valid")
});

/// Tags that separate text visually; inline tags like `<b>` or
/// `<highlighttext>` can sit in the middle of a word.
const BLOCK_TAGS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "td", "th",
    "table",
];

/// Strips HTML tags and entities, then collapses runs of whitespace.
///
/// Inline tags vanish without a trace, block tags and `&nbsp;` become a space.
pub fn clean_html(html: &str) -> String {
    let stripped = MARKUP.replace_all(html, |caps: &Captures<'_>| match caps.get(1) {
        Some(tag) if BLOCK_TAGS.iter().any(|b| tag.as_str().eq_ignore_ascii_case(b)) => " ",
        Some(_) => "",
        None => entity(&caps[0]),
    });
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn entity(raw: &str) -> &'static str {
    match raw {
        "&nbsp;" => " ",
        "&amp;" => "&",
        "&quot;" => "\"",
        "&lt;" => "<",
        "&gt;" => ">",
        _ => "",
    }
}

/// Builds a `Posting` from a search-result item and, when fetched, its full vacancy.
///
/// Without a detail the description falls back to the snippet and skills are empty.
pub fn posting_from_item(item: VacancyItem, detail: Option<VacancyDetail>) -> Posting {
    let salary = item.salary.unwrap_or_default();
    let address = item.address.unwrap_or_default();

    let (description, skills) = match detail {
        Some(detail) => (
            clean_html(&detail.description),
            detail.key_skills.into_iter().map(|s| s.name).collect(),
        ),
        None => (snippet_text(item.snippet.as_ref()), Vec::new()),
    };

    // Address city is more precise than the search area, but often missing
    let city = address.city.or_else(|| item.area.map(|a| a.name));

    Posting {
        id: item.id,
        title: item.name.trim().to_string(),
        employer: item.employer.name.trim().to_string(),
        salary_from: salary.from,
        salary_to: salary.to,
        currency: salary.currency,
        description,
        city,
        address: address.raw,
        url: item.alternate_url,
        skills,
        schedule: item.schedule.map(|s| s.name),
        roles: item.professional_roles.into_iter().map(|r| r.name).collect(),
        published_at: item.published_at.as_deref().and_then(date_part),
        experience: item.experience.and_then(|e| e.id),
    }
}

fn snippet_text(snippet: Option<&Snippet>) -> String {
    let Some(snippet) = snippet else {
        return String::new();
    };
    [&snippet.requirement, &snippet.responsibility]
        .into_iter()
        .flatten()
        .map(|s| clean_html(s))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `2024-02-12T10:00:00+0300` -> `2024-02-12`
fn date_part(timestamp: &str) -> Option<String> {
    timestamp.get(..10).map(str::to_string)
}
