use serde::{Deserialize, Serialize};

use crate::{
    domain::{CaseStudy, ContentCatalog, JournalArticle},
    error::ContentError,
};

/// On-disk / over-the-wire shape of the content dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    #[serde(default)]
    pub case_studies: Vec<CaseStudy>,
    #[serde(default)]
    pub articles: Vec<JournalArticle>,
}

impl CatalogDocument {
    pub fn into_catalog(self) -> ContentCatalog {
        ContentCatalog {
            case_studies: self.case_studies,
            articles: self.articles,
        }
    }
}

pub fn parse_catalog(raw: &str) -> Result<ContentCatalog, ContentError> {
    let document: CatalogDocument = serde_json::from_str(raw)?;
    Ok(document.into_catalog())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_dataset() {
        let raw = r#"{
            "caseStudies": [{
                "id": 1,
                "client": "Northwind",
                "sector": "Logistics",
                "title": "Routing overhaul",
                "summary": "s",
                "imageUrl": "/img/nw.jpg",
                "outcome": "-30% idle time",
                "content": "c",
                "completedDate": "2025-06"
            }],
            "articles": [{
                "id": "a-1",
                "title": "Pricing time",
                "date": "NOV 2025",
                "author": "R. Vale",
                "excerpt": "e",
                "image": "/img/a1.jpg",
                "content": "c"
            }]
        }"#;

        let catalog = parse_catalog(raw).expect("parse");
        assert_eq!(catalog.case_studies[0].id.as_str(), "1");
        assert_eq!(catalog.case_studies[0].image_url, "/img/nw.jpg");
        assert_eq!(catalog.articles[0].date, "NOV 2025");
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let catalog = parse_catalog("{}").expect("parse");
        assert!(catalog.is_empty());
    }

    #[test]
    fn malformed_dataset_is_a_decode_error() {
        let err = parse_catalog("{\"articles\": 4}").expect_err("must fail");
        assert!(matches!(err, ContentError::Decode(_)));
    }
}
