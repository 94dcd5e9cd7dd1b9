use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use content::ContentSource;
use shared::domain::{
    ArticleId, CaseStudy, CaseStudyId, ContentCatalog, JournalArticle,
};

use crate::{
    adapters::{HeadlessViewport, MemoryHistory},
    renderer::ImmediatePageLoader,
    SiteDependencies,
};

pub fn article(id: &str, date: &str) -> JournalArticle {
    JournalArticle {
        id: ArticleId::new(id),
        title: format!("Article {id}"),
        date: date.to_string(),
        author: "Editorial".to_string(),
        excerpt: format!("Excerpt {id}"),
        image: format!("/img/{id}.jpg"),
        content: format!("Body {id}"),
    }
}

pub fn case_study(id: &str, completed_date: &str) -> CaseStudy {
    CaseStudy {
        id: CaseStudyId::new(id),
        client: format!("Client {id}"),
        sector: "Retail".to_string(),
        title: format!("Case {id}"),
        summary: String::new(),
        image_url: format!("/img/{id}.jpg"),
        outcome: String::new(),
        content: String::new(),
        completed_date: completed_date.to_string(),
    }
}

pub fn sample_catalog() -> ContentCatalog {
    ContentCatalog {
        case_studies: vec![
            case_study("cs-mar", "2025-03"),
            case_study("cs-nov", "2025-11"),
            case_study("cs-jun", "2025-06"),
        ],
        articles: vec![
            article("a-jan", "JAN 2026"),
            article("a-nov", "NOV 2025"),
            article("a-mar", "MAR 2025"),
        ],
    }
}

/// Content source that counts how often it was asked.
pub struct CountingSource {
    catalog: Option<ContentCatalog>,
    calls: AtomicUsize,
}

impl CountingSource {
    pub fn ok(catalog: ContentCatalog) -> Arc<Self> {
        Arc::new(Self {
            catalog: Some(catalog),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            catalog: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for CountingSource {
    async fn load_catalog(&self) -> Result<ContentCatalog> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.catalog
            .clone()
            .ok_or_else(|| anyhow!("content endpoint unavailable"))
    }

    fn describe(&self) -> String {
        "counting".to_string()
    }
}

pub struct Harness {
    pub history: Arc<MemoryHistory>,
    pub viewport: Arc<HeadlessViewport>,
    pub source: Arc<CountingSource>,
}

impl Harness {
    pub fn new(initial_address: &str, source: Arc<CountingSource>) -> Self {
        Self {
            history: MemoryHistory::new(initial_address),
            viewport: HeadlessViewport::new(),
            source,
        }
    }

    pub fn dependencies(&self) -> SiteDependencies {
        SiteDependencies {
            navigation: self.history.clone(),
            viewport: self.viewport.clone(),
            content: self.source.clone(),
            pages: Arc::new(ImmediatePageLoader),
        }
    }
}
