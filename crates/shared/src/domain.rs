use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(#[serde(deserialize_with = "string_or_number")] pub String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(CaseStudyId);
id_newtype!(ArticleId);

/// Datasets in the wild carry both `"id": 3` and `"id": "3"`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Chronological sort key with month precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    /// Parses the ISO-like `YYYY-MM` form used by case studies.
    pub fn parse_year_month(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
            .ok()
            .map(Self)
    }

    /// Parses the compact `MMM YYYY` form used by journal articles
    /// (`JAN 2026`, `Nov 2025`).
    pub fn parse_month_year(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace();
        let (month, year) = (parts.next()?, parts.next()?);
        if parts.next().is_some() || month.len() != 3 || !month.is_ascii() {
            return None;
        }

        let month = format!(
            "{}{}",
            month[..1].to_ascii_uppercase(),
            month[1..].to_ascii_lowercase()
        );
        NaiveDate::parse_from_str(&format!("01 {month} {year}"), "%d %b %Y")
            .ok()
            .map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

/// Records that can be ordered by publication month.
pub trait Dated {
    fn month_key(&self) -> Option<MonthKey>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    pub id: CaseStudyId,
    pub client: String,
    pub sector: String,
    pub title: String,
    pub summary: String,
    pub image_url: String,
    pub outcome: String,
    pub content: String,
    pub completed_date: String,
}

impl Dated for CaseStudy {
    fn month_key(&self) -> Option<MonthKey> {
        MonthKey::parse_year_month(&self.completed_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalArticle {
    pub id: ArticleId,
    pub title: String,
    pub date: String,
    pub author: String,
    pub excerpt: String,
    pub image: String,
    pub content: String,
}

impl Dated for JournalArticle {
    fn month_key(&self) -> Option<MonthKey> {
        MonthKey::parse_month_year(&self.date)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentCatalog {
    pub case_studies: Vec<CaseStudy>,
    pub articles: Vec<JournalArticle>,
}

impl ContentCatalog {
    pub fn is_empty(&self) -> bool {
        self.case_studies.is_empty() && self.articles.is_empty()
    }

    pub fn article(&self, id: &ArticleId) -> Option<&JournalArticle> {
        self.articles.iter().find(|article| &article.id == id)
    }

    pub fn case_study(&self, id: &CaseStudyId) -> Option<&CaseStudy> {
        self.case_studies.iter().find(|study| &study.id == id)
    }
}
