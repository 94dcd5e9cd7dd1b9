use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::ContentCatalog,
    error::ContentError,
    protocol::{parse_catalog, CatalogDocument},
};
use tracing::{debug, info};
use url::Url;

/// Where the case-study and journal dataset comes from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn load_catalog(&self) -> Result<ContentCatalog>;

    /// Short human-readable origin, used in log lines.
    fn describe(&self) -> String;
}

pub struct MissingContentSource;

#[async_trait]
impl ContentSource for MissingContentSource {
    async fn load_catalog(&self) -> Result<ContentCatalog> {
        Err(anyhow!("no content source configured"))
    }

    fn describe(&self) -> String {
        "missing".to_string()
    }
}

/// Serves a catalog that is already in memory.
pub struct StaticContentSource {
    catalog: ContentCatalog,
}

impl StaticContentSource {
    pub fn new(catalog: ContentCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ContentSource for StaticContentSource {
    async fn load_catalog(&self) -> Result<ContentCatalog> {
        Ok(self.catalog.clone())
    }

    fn describe(&self) -> String {
        format!(
            "static ({} case studies, {} articles)",
            self.catalog.case_studies.len(),
            self.catalog.articles.len()
        )
    }
}

pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ContentSource for JsonFileSource {
    async fn load_catalog(&self) -> Result<ContentCatalog> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| ContentError::io(self.path.display().to_string(), err.to_string()))?;
        let catalog = parse_catalog(&raw)?;
        debug!(
            path = %self.path.display(),
            case_studies = catalog.case_studies.len(),
            articles = catalog.articles.len(),
            "read content dataset from file"
        );
        Ok(catalog)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

pub struct HttpContentSource {
    http: Client,
    url: Url,
}

impl HttpContentSource {
    pub fn new(url: Url) -> Result<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!("content url must use http:// or https://, got {url}"));
        }
        Ok(Self {
            http: Client::new(),
            url,
        })
    }

    pub fn parse(raw_url: &str) -> Result<Self> {
        let url = Url::parse(raw_url.trim())
            .map_err(|err| anyhow!("invalid content url '{raw_url}': {err}"))?;
        Self::new(url)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn load_catalog(&self) -> Result<ContentCatalog> {
        let fetch_error = |err: reqwest::Error| ContentError::fetch(self.url.as_str(), err.to_string());
        let document: CatalogDocument = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(fetch_error)?
            .error_for_status()
            .map_err(fetch_error)?
            .json()
            .await
            .map_err(|err| ContentError::Decode(err.to_string()))?;
        info!(url = %self.url, "fetched content dataset");
        Ok(document.into_catalog())
    }

    fn describe(&self) -> String {
        format!("http {}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use shared::domain::{ArticleId, JournalArticle};

    use super::*;

    fn article(id: &str, date: &str) -> JournalArticle {
        JournalArticle {
            id: ArticleId::new(id),
            title: format!("Article {id}"),
            date: date.to_string(),
            author: "Staff".to_string(),
            excerpt: String::new(),
            image: String::new(),
            content: String::new(),
        }
    }

    #[tokio::test]
    async fn static_source_returns_its_catalog() {
        let catalog = ContentCatalog {
            case_studies: Vec::new(),
            articles: vec![article("a", "JAN 2026")],
        };
        let source = StaticContentSource::new(catalog.clone());
        assert_eq!(source.load_catalog().await.expect("load"), catalog);
    }

    #[tokio::test]
    async fn file_source_reads_dataset() {
        let document = CatalogDocument {
            case_studies: Vec::new(),
            articles: vec![article("a", "MAR 2025"), article("b", "NOV 2025")],
        };
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(serde_json::to_string(&document).expect("json").as_bytes())
            .expect("write");

        let source = JsonFileSource::new(file.path());
        let catalog = source.load_catalog().await.expect("load");
        assert_eq!(catalog.articles.len(), 2);
        assert!(catalog.case_studies.is_empty());
    }

    #[tokio::test]
    async fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = JsonFileSource::new(dir.path().join("absent.json"));
        let err = source.load_catalog().await.expect_err("must fail");
        assert!(matches!(
            err.downcast_ref::<ContentError>(),
            Some(ContentError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn missing_source_always_fails() {
        assert!(MissingContentSource.load_catalog().await.is_err());
    }

    #[test]
    fn http_source_rejects_non_http_urls() {
        assert!(HttpContentSource::parse("ftp://example.com/content.json").is_err());
        assert!(HttpContentSource::parse("not a url").is_err());
        let source = HttpContentSource::parse("https://example.com/content.json").expect("https");
        assert_eq!(source.url().path(), "/content.json");
    }
}
