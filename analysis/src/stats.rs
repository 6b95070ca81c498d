//! Skill frequency, salary distribution and experience/salary statistics.

use std::collections::HashMap;

use common::Posting;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

/// Count in how many postings each skill appears, most frequent first.
///
/// Skills are matched case-insensitively and shown with their first spelling.
pub fn skill_frequency(postings: &[Posting]) -> Vec<SkillCount> {
    let mut counts: HashMap<String, SkillCount> = HashMap::new();

    for posting in postings {
        let mut seen_here: Vec<String> = Vec::new();
        for skill in &posting.skills {
            let key = skill.trim().to_lowercase();
            if key.is_empty() || seen_here.contains(&key) {
                continue;
            }
            seen_here.push(key.clone());
            counts
                .entry(key)
                .or_insert_with(|| SkillCount {
                    skill: skill.trim().to_string(),
                    count: 0,
                })
                .count += 1;
        }
    }

    let mut ranked: Vec<_> = counts.into_values().collect();
    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.skill.to_lowercase().cmp(&b.skill.to_lowercase()))
    });
    ranked
}

/// Point estimate of a posting's salary: midpoint of the bounds, or whichever bound exists.
pub fn salary_estimate(posting: &Posting) -> Option<f64> {
    match (posting.salary_from, posting.salary_to) {
        (Some(from), Some(to)) => Some((from as f64 + to as f64) / 2.0),
        (Some(one), None) | (None, Some(one)) => Some(one as f64),
        (None, None) => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Inclusive lower bound; the bucket spans `[lower, lower + width)`.
    pub lower: i64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalaryStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub bucket_width: i64,
    /// Contiguous buckets from the one holding `min` to the one holding `max`.
    pub histogram: Vec<Bucket>,
}

fn in_currency(posting: &Posting, currency: &str) -> bool {
    posting
        .currency
        .as_deref()
        .is_some_and(|c| c.eq_ignore_ascii_case(currency))
}

fn salaries_in(postings: &[Posting], currency: &str) -> Vec<f64> {
    postings
        .iter()
        .filter(|p| in_currency(p, currency))
        .filter_map(salary_estimate)
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of a non-empty, sorted slice.
fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Upper bound on histogram length; wider salary ranges get wider buckets.
pub const MAX_BUCKETS: usize = 200;

/// Smallest multiple of `requested` that spans `lo..=hi` in at most [`MAX_BUCKETS`] buckets.
fn fit_bucket_width(lo: i64, hi: i64, requested: i64) -> i64 {
    let span = i128::from(hi) - i128::from(lo);
    let requested = i128::from(requested);
    // n buckets of width w cover any range up to (n - 1) * w wide
    let limit = (MAX_BUCKETS - 1) as i128;
    if span <= limit * requested - 1 {
        return clamp_i64(requested);
    }
    let needed = span / limit + 1;
    let multiples = (needed + requested - 1) / requested;
    clamp_i64(multiples * requested)
}

fn clamp_i64(v: i128) -> i64 {
    i64::try_from(v).unwrap_or(if v < 0 { i64::MIN } else { i64::MAX })
}

/// Distribution of salary estimates in `currency`. `None` when no posting has one.
pub fn salary_distribution(
    postings: &[Posting],
    currency: &str,
    bucket_width: i64,
) -> Option<SalaryStats> {
    let mut values = salaries_in(postings, currency);
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let lo = values[0] as i64;
    let hi = values[values.len() - 1] as i64;
    let width = fit_bucket_width(lo, hi, bucket_width.max(1));
    let bucket_of = |v: f64| i128::from(v as i64).div_euclid(i128::from(width));
    let first = bucket_of(values[0]);
    let last = bucket_of(values[values.len() - 1]);

    let mut histogram: Vec<Bucket> = (first..=last)
        .map(|b| Bucket {
            lower: clamp_i64(b * i128::from(width)),
            count: 0,
        })
        .collect();
    for &v in &values {
        // `fit_bucket_width` keeps every index below MAX_BUCKETS
        let idx = usize::try_from(bucket_of(v) - first).unwrap_or(0);
        histogram[idx].count += 1;
    }

    Some(SalaryStats {
        count: values.len(),
        min: values[0],
        max: values[values.len() - 1],
        mean: mean(&values),
        median: median(&values),
        bucket_width: width,
        histogram,
    })
}

/// Experience levels used by the search API, in increasing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExperienceLevel {
    NoExperience,
    Between1And3,
    Between3And6,
    MoreThan6,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::NoExperience,
        ExperienceLevel::Between1And3,
        ExperienceLevel::Between3And6,
        ExperienceLevel::MoreThan6,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "noExperience" => Some(Self::NoExperience),
            "between1And3" => Some(Self::Between1And3),
            "between3And6" => Some(Self::Between3And6),
            "moreThan6" => Some(Self::MoreThan6),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NoExperience => "no experience",
            Self::Between1And3 => "1-3 years",
            Self::Between3And6 => "3-6 years",
            Self::MoreThan6 => "6+ years",
        }
    }

    fn ordinal(self) -> f64 {
        self as u8 as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelStats {
    pub level: ExperienceLevel,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceReport {
    /// Levels that have at least one salary, in increasing order.
    pub levels: Vec<LevelStats>,
    /// Pearson correlation between experience level and salary.
    pub correlation: Option<f64>,
}

/// Salary per experience level, plus how strongly the two correlate.
pub fn experience_salary(postings: &[Posting], currency: &str) -> ExperienceReport {
    let pairs: Vec<(ExperienceLevel, f64)> = postings
        .iter()
        .filter(|p| in_currency(p, currency))
        .filter_map(|p| {
            let level = p.experience.as_deref().and_then(ExperienceLevel::from_id)?;
            Some((level, salary_estimate(p)?))
        })
        .collect();

    let levels = ExperienceLevel::ALL
        .into_iter()
        .filter_map(|level| {
            let mut values: Vec<f64> = pairs
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, v)| *v)
                .collect();
            if values.is_empty() {
                return None;
            }
            values.sort_by(f64::total_cmp);
            Some(LevelStats {
                level,
                count: values.len(),
                mean: mean(&values),
                median: median(&values),
            })
        })
        .collect();

    let xs: Vec<f64> = pairs.iter().map(|(l, _)| l.ordinal()).collect();
    let ys: Vec<f64> = pairs.iter().map(|(_, v)| *v).collect();

    ExperienceReport {
        levels,
        correlation: pearson(&xs, &ys),
    }
}

/// Pearson correlation coefficient; `None` for fewer than two points or zero variance.
fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() < 2 || xs.len() != ys.len() {
        return None;
    }
    let (mx, my) = (mean(xs), mean(ys));
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some(cov / (vx.sqrt() * vy.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(
        id: u32,
        salary: (Option<i64>, Option<i64>),
        experience: &str,
        skills: &[&str],
    ) -> Posting {
        Posting {
            id: id.to_string(),
            title: "Developer".to_string(),
            employer: "Acme".to_string(),
            salary_from: salary.0,
            salary_to: salary.1,
            currency: Some("RUR".to_string()),
            description: String::new(),
            city: None,
            address: None,
            url: String::new(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            schedule: None,
            roles: vec![],
            published_at: None,
            experience: Some(experience.to_string()),
        }
    }

    #[test]
    fn test_skill_frequency_ranks_and_merges_case() {
        let postings = vec![
            posting(1, (None, None), "noExperience", &["Rust", "SQL"]),
            posting(2, (None, None), "noExperience", &["rust", "Docker"]),
            posting(3, (None, None), "noExperience", &["SQL", "RUST", "Rust"]),
        ];
        let ranked = skill_frequency(&postings);
        assert_eq!(
            ranked,
            vec![
                SkillCount {
                    skill: "Rust".to_string(),
                    count: 3
                },
                SkillCount {
                    skill: "SQL".to_string(),
                    count: 2
                },
                SkillCount {
                    skill: "Docker".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_salary_estimate() {
        let both = posting(1, (Some(100), Some(200)), "noExperience", &[]);
        let from = posting(2, (Some(100), None), "noExperience", &[]);
        let to = posting(3, (None, Some(80)), "noExperience", &[]);
        let none = posting(4, (None, None), "noExperience", &[]);
        assert_eq!(salary_estimate(&both), Some(150.0));
        assert_eq!(salary_estimate(&from), Some(100.0));
        assert_eq!(salary_estimate(&to), Some(80.0));
        assert_eq!(salary_estimate(&none), None);
    }

    #[test]
    fn test_salary_distribution() {
        let mut postings = vec![
            posting(1, (Some(40_000), Some(60_000)), "noExperience", &[]),
            posting(2, (Some(120_000), None), "noExperience", &[]),
            posting(3, (None, Some(130_000)), "noExperience", &[]),
            posting(4, (None, None), "noExperience", &[]),
        ];
        let mut usd = posting(5, (Some(5_000), None), "noExperience", &[]);
        usd.currency = Some("USD".to_string());
        postings.push(usd);

        let stats = salary_distribution(&postings, "rur", 50_000).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.min, 50_000.0);
        assert_eq!(stats.max, 130_000.0);
        assert_eq!(stats.median, 120_000.0);
        assert_eq!(stats.mean, 100_000.0);
        assert_eq!(
            stats.histogram,
            vec![
                Bucket {
                    lower: 50_000,
                    count: 1
                },
                Bucket {
                    lower: 100_000,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_salary_distribution_keeps_empty_buckets() {
        let postings = vec![
            posting(1, (Some(10), None), "noExperience", &[]),
            posting(2, (Some(35), None), "noExperience", &[]),
        ];
        let stats = salary_distribution(&postings, "RUR", 10).unwrap();
        let counts: Vec<_> = stats.histogram.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 1]);
        assert_eq!(stats.median, 22.5);
    }

    #[test]
    fn test_wide_salary_range_widens_buckets() {
        let postings = vec![
            posting(1, (Some(0), None), "noExperience", &[]),
            posting(2, (Some(2_000_000_000), None), "noExperience", &[]),
        ];
        let stats = salary_distribution(&postings, "RUR", 1).unwrap();

        assert!(stats.histogram.len() <= MAX_BUCKETS);
        assert!(stats.bucket_width > 1);
        assert_eq!(stats.histogram.first().unwrap().count, 1);
        assert_eq!(stats.histogram.last().unwrap().count, 1);
        let total: usize = stats.histogram.iter().map(|b| b.count).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_extreme_salaries_do_not_overflow() {
        let postings = vec![
            posting(1, (Some(i64::MIN), Some(i64::MIN)), "noExperience", &[]),
            posting(2, (Some(i64::MAX), Some(i64::MAX)), "moreThan6", &[]),
        ];
        assert_eq!(salary_estimate(&postings[1]), Some(i64::MAX as f64));

        let stats = salary_distribution(&postings, "RUR", 10).unwrap();
        assert!(stats.histogram.len() <= MAX_BUCKETS);
        let total: usize = stats.histogram.iter().map(|b| b.count).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_no_salaries_means_no_distribution() {
        let postings = vec![posting(1, (None, None), "noExperience", &[])];
        assert!(salary_distribution(&postings, "RUR", 1000).is_none());
    }

    #[test]
    fn test_experience_salary_groups_and_correlates() {
        let postings = vec![
            posting(1, (Some(50), None), "noExperience", &[]),
            posting(2, (Some(70), None), "noExperience", &[]),
            posting(3, (Some(100), None), "between1And3", &[]),
            posting(4, (Some(200), None), "moreThan6", &[]),
            posting(5, (None, None), "between3And6", &[]),
            posting(6, (Some(999), None), "unknown", &[]),
        ];
        let report = experience_salary(&postings, "RUR");

        let levels: Vec<_> = report.levels.iter().map(|l| (l.level, l.count)).collect();
        assert_eq!(
            levels,
            vec![
                (ExperienceLevel::NoExperience, 2),
                (ExperienceLevel::Between1And3, 1),
                (ExperienceLevel::MoreThan6, 1),
            ]
        );
        assert_eq!(report.levels[0].mean, 60.0);
        let r = report.correlation.unwrap();
        assert!(r > 0.9 && r <= 1.0, "correlation {r}");
    }

    #[test]
    fn test_single_level_has_no_correlation() {
        let postings = vec![
            posting(1, (Some(50), None), "between1And3", &[]),
            posting(2, (Some(70), None), "between1And3", &[]),
        ];
        assert_eq!(experience_salary(&postings, "RUR").correlation, None);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let r = pearson(&[0.0, 1.0, 2.0], &[30.0, 20.0, 10.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }
}
