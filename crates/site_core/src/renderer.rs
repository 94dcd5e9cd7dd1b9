//! Turns the current view into a single mountable frame.
//!
//! Page implementations other than Home are fetched on demand through a
//! [`PageLoader`]. The navigator never sees this: a frame whose page is still
//! loading simply carries [`PageBody::Loading`] until the chunk arrives.

use std::{collections::HashMap, sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::{CaseStudy, ContentCatalog, JournalArticle};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error, info};

use crate::{
    content_loader::{sorted_by_recency, HomePreview},
    navigator::{PageKind, ViewState},
    SiteEvent,
};

#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn load_page(&self, page: PageKind) -> Result<()>;
}

pub struct ImmediatePageLoader;

#[async_trait]
impl PageLoader for ImmediatePageLoader {
    async fn load_page(&self, _page: PageKind) -> Result<()> {
        Ok(())
    }
}

/// Simulates fetching a page chunk over the network.
pub struct DelayedPageLoader {
    latency: Duration,
}

impl DelayedPageLoader {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl PageLoader for DelayedPageLoader {
    async fn load_page(&self, page: PageKind) -> Result<()> {
        tokio::time::sleep(self.latency).await;
        debug!(page = page.name(), "page chunk fetched");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageProps {
    Home {
        preview: HomePreview,
        case_studies: Vec<CaseStudy>,
    },
    ArticleDetail {
        article: JournalArticle,
    },
    ArticleList {
        articles: Vec<JournalArticle>,
    },
    CaseStudyDetail {
        study: CaseStudy,
    },
    CaseStudyList {
        case_studies: Vec<CaseStudy>,
    },
    MediaGallery,
    PrivacyPolicy,
    TermsOfService,
}

impl PageProps {
    pub fn for_view(view: &ViewState, catalog: &ContentCatalog) -> Self {
        match view {
            ViewState::Home => Self::Home {
                preview: HomePreview::from_catalog(catalog),
                case_studies: sorted_by_recency(&catalog.case_studies),
            },
            ViewState::ArticleDetail { article, .. } => Self::ArticleDetail {
                article: article.clone(),
            },
            ViewState::ArticleList => Self::ArticleList {
                articles: sorted_by_recency(&catalog.articles),
            },
            ViewState::CaseStudyDetail { study, .. } => Self::CaseStudyDetail {
                study: study.clone(),
            },
            ViewState::CaseStudyList => Self::CaseStudyList {
                case_studies: sorted_by_recency(&catalog.case_studies),
            },
            ViewState::MediaGallery => Self::MediaGallery,
            ViewState::PrivacyPolicy => Self::PrivacyPolicy,
            ViewState::TermsOfService => Self::TermsOfService,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    Loading,
    Ready(PageProps),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayProps {
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Bumped on every transition; echoed back in mount-complete signals.
    pub revision: u64,
    pub view: ViewState,
    pub body: PageBody,
    pub overlay: OverlayProps,
}

impl Frame {
    pub fn page(&self) -> PageKind {
        self.view.kind()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.body, PageBody::Ready(_))
    }

    pub fn props(&self) -> Option<&PageProps> {
        match &self.body {
            PageBody::Ready(props) => Some(props),
            PageBody::Loading => None,
        }
    }
}

enum Chunk {
    Loading(JoinHandle<()>),
    Ready,
}

pub struct ViewRenderer {
    loader: Arc<dyn PageLoader>,
    chunks: HashMap<PageKind, Chunk>,
}

impl ViewRenderer {
    pub fn new(loader: Arc<dyn PageLoader>) -> Self {
        let mut chunks = HashMap::new();
        chunks.insert(PageKind::Home, Chunk::Ready);
        Self { loader, chunks }
    }

    pub fn render(
        &mut self,
        revision: u64,
        view: &ViewState,
        catalog: &ContentCatalog,
        overlay: OverlayProps,
        events: &mpsc::UnboundedSender<SiteEvent>,
    ) -> Frame {
        let body = if self.ensure_loaded(view.kind(), events) {
            PageBody::Ready(PageProps::for_view(view, catalog))
        } else {
            PageBody::Loading
        };
        Frame {
            revision,
            view: view.clone(),
            body,
            overlay,
        }
    }

    pub fn on_page_loaded(&mut self, page: PageKind, result: Result<()>) {
        match result {
            Ok(()) => {
                info!(page = page.name(), "page implementation loaded");
                self.chunks.insert(page, Chunk::Ready);
            }
            Err(err) => {
                // Forget the attempt so the next render of this page retries.
                let message = format!("{err:#}");
                error!(page = page.name(), error = %message, "page implementation failed to load");
                self.chunks.remove(&page);
            }
        }
    }

    pub fn is_loaded(&self, page: PageKind) -> bool {
        matches!(self.chunks.get(&page), Some(Chunk::Ready))
    }

    pub fn shutdown(&mut self) {
        self.chunks.retain(|_, chunk| match chunk {
            Chunk::Loading(task) => {
                task.abort();
                false
            }
            Chunk::Ready => true,
        });
    }

    fn ensure_loaded(&mut self, page: PageKind, events: &mpsc::UnboundedSender<SiteEvent>) -> bool {
        match self.chunks.get(&page) {
            Some(Chunk::Ready) => return true,
            Some(Chunk::Loading(_)) => return false,
            None => {}
        }

        let loader = Arc::clone(&self.loader);
        let events = events.clone();
        debug!(page = page.name(), "loading page implementation");
        let task = tokio::spawn(async move {
            let result = loader.load_page(page).await;
            let _ = events.send(SiteEvent::PageLoaded { page, result });
        });
        self.chunks.insert(page, Chunk::Loading(task));
        false
    }
}
