use std::{cmp::Reverse, sync::Arc, time::Duration};

use anyhow::Result;
use content::ContentSource;
use shared::domain::{CaseStudy, ContentCatalog, Dated, JournalArticle};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error, info, warn};

use crate::SiteEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Scheduled,
    Loaded,
    Failed,
}

/// Newest first; records whose date cannot be parsed go last, in input order.
pub fn sorted_by_recency<T: Dated + Clone>(items: &[T]) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| Reverse(item.month_key()));
    sorted
}

pub fn most_recent<T: Dated>(items: &[T]) -> Option<&T> {
    items.iter().min_by_key(|item| Reverse(item.month_key()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomePreview {
    pub case_study: Option<CaseStudy>,
    pub article: Option<JournalArticle>,
}

impl HomePreview {
    pub fn from_catalog(catalog: &ContentCatalog) -> Self {
        Self {
            case_study: most_recent(&catalog.case_studies).cloned(),
            article: most_recent(&catalog.articles).cloned(),
        }
    }
}

pub struct DeferredContentLoader {
    source: Arc<dyn ContentSource>,
    delay: Duration,
    state: LoadState,
    catalog: ContentCatalog,
    task: Option<JoinHandle<()>>,
}

impl DeferredContentLoader {
    pub fn new(source: Arc<dyn ContentSource>, delay: Duration) -> Self {
        Self {
            source,
            delay,
            state: LoadState::Idle,
            catalog: ContentCatalog::default(),
            task: None,
        }
    }

    /// Starts the delayed load. Only the first call per loader does anything.
    pub fn schedule(&mut self, events: &mpsc::UnboundedSender<SiteEvent>) -> bool {
        if self.state != LoadState::Idle {
            return false;
        }

        let source = Arc::clone(&self.source);
        let events = events.clone();
        let delay = self.delay;
        info!(
            delay_ms = delay.as_millis() as u64,
            source = %source.describe(),
            "scheduled deferred content load"
        );
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = source.load_catalog().await;
            let _ = events.send(SiteEvent::CatalogLoaded(result));
        }));
        self.state = LoadState::Scheduled;
        true
    }

    pub fn on_loaded(&mut self, result: Result<ContentCatalog>) -> bool {
        self.task = None;
        if self.state != LoadState::Scheduled {
            warn!(state = ?self.state, "ignoring unexpected content load result");
            return false;
        }

        match result {
            Ok(catalog) => {
                info!(
                    case_studies = catalog.case_studies.len(),
                    articles = catalog.articles.len(),
                    "content catalog loaded"
                );
                self.catalog = catalog;
                self.state = LoadState::Loaded;
                true
            }
            Err(err) => {
                // Not retried; the site keeps rendering empty collections.
                let message = format!("{err:#}");
                error!(error = %message, "content catalog load failed");
                self.state = LoadState::Failed;
                false
            }
        }
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("cancelled deferred content load");
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }
}

#[cfg(test)]
#[path = "tests/content_loader_tests.rs"]
mod tests;
