//! Wire types for the vacancy search API.
//!
//! Only the fields the collector reads are modelled. Objects the API sends as
//! `null` (salary, address, snippet parts) are `Option`s; missing required
//! fields fail deserialization and surface as a parse error.

use serde::Deserialize;

/// One page of `GET /vacancies` results.
#[derive(Debug, Deserialize, Clone)]
pub struct SearchPage {
    pub items: Vec<VacancyItem>,
    #[serde(default)]
    pub found: u64,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
}

/// A vacancy as it appears in search results.
#[derive(Debug, Deserialize, Clone)]
pub struct VacancyItem {
    pub id: String,
    pub name: String,
    pub employer: Employer,
    #[serde(default)]
    pub salary: Option<Salary>,
    #[serde(default)]
    pub area: Option<Named>,
    #[serde(default)]
    pub address: Option<Address>,
    pub alternate_url: String,
    #[serde(default)]
    pub snippet: Option<Snippet>,
    #[serde(default)]
    pub schedule: Option<Named>,
    #[serde(default)]
    pub experience: Option<Named>,
    #[serde(default)]
    pub professional_roles: Vec<Named>,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// Full vacancy from `GET /vacancies/{id}`.
#[derive(Debug, Deserialize, Clone)]
pub struct VacancyDetail {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key_skills: Vec<KeySkill>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Employer {
    pub name: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Salary {
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Address {
    pub city: Option<String>,
    pub raw: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Snippet {
    pub requirement: Option<String>,
    pub responsibility: Option<String>,
}

/// `{ "id": ..., "name": ... }` dictionary entries (area, schedule, experience, roles).
#[derive(Debug, Deserialize, Clone)]
pub struct Named {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeySkill {
    pub name: String,
}
