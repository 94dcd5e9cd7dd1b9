use std::{ops::ControlFlow, sync::Arc, time::Duration};

use anyhow::Result;
use content::ContentSource;
use futures::StreamExt;
use shared::domain::{CaseStudy, ContentCatalog, JournalArticle};
use thiserror::Error;
use tokio::{
    sync::{broadcast, mpsc, watch},
    task::JoinHandle,
};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::{debug, info, warn};

pub mod adapters;
pub mod content_loader;
pub mod history_bridge;
pub mod navigator;
pub mod renderer;
pub mod scroll;

pub use content_loader::{DeferredContentLoader, HomePreview, LoadState};
pub use history_bridge::{HistoryBridge, NavigateOptions, NavigationEvent};
pub use navigator::{CanonicalPath, DetailOrigin, Navigator, PageKind, ViewState};
pub use renderer::{Frame, OverlayProps, PageBody, PageLoader, PageProps, ViewRenderer};
pub use scroll::{ScrollCoordinator, ScrollTarget, ScrollTrigger};

const DEFAULT_CONTENT_LOAD_DELAY: Duration = Duration::from_millis(100);

pub trait NavigationService: Send + Sync {
    fn current_address(&self) -> String;
    fn push_address(&self, address: &str);
    /// Addresses reached by back/forward; pushes are not echoed.
    fn subscribe(&self) -> broadcast::Receiver<String>;
}

pub trait ViewportService: Send + Sync {
    fn scroll_to_origin(&self);
    /// Returns false when no element with this id is mounted.
    fn scroll_into_view(&self, anchor: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteConfig {
    pub content_load_delay: Duration,
    pub scroll_trigger: ScrollTrigger,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_load_delay: DEFAULT_CONTENT_LOAD_DELAY,
            scroll_trigger: ScrollTrigger::MountSignal,
        }
    }
}

pub struct SiteDependencies {
    pub navigation: Arc<dyn NavigationService>,
    pub viewport: Arc<dyn ViewportService>,
    pub content: Arc<dyn ContentSource>,
    pub pages: Arc<dyn PageLoader>,
}

#[derive(Debug)]
pub enum SiteEvent {
    Navigate(NavigationEvent),
    SelectArticle(JournalArticle),
    SelectCaseStudy(CaseStudy),
    ViewAllArticles,
    ViewAllCaseStudies,
    Close,
    ScrollRequest(String),
    SetOverlayOpen(bool),
    ViewMounted {
        revision: u64,
    },
    ScrollTimerFired {
        ticket: u64,
    },
    CatalogLoaded(Result<ContentCatalog>),
    PageLoaded {
        page: PageKind,
        result: Result<()>,
    },
    Shutdown,
}

impl SiteEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SiteEvent::Navigate(event) if event.skip_history => "history_replay",
            SiteEvent::Navigate(_) => "navigate",
            SiteEvent::SelectArticle(_) => "select_article",
            SiteEvent::SelectCaseStudy(_) => "select_case_study",
            SiteEvent::ViewAllArticles => "view_all_articles",
            SiteEvent::ViewAllCaseStudies => "view_all_case_studies",
            SiteEvent::Close => "close",
            SiteEvent::ScrollRequest(_) => "scroll_request",
            SiteEvent::SetOverlayOpen(_) => "set_overlay_open",
            SiteEvent::ViewMounted { .. } => "view_mounted",
            SiteEvent::ScrollTimerFired { .. } => "scroll_timer_fired",
            SiteEvent::CatalogLoaded(_) => "catalog_loaded",
            SiteEvent::PageLoaded { .. } => "page_loaded",
            SiteEvent::Shutdown => "shutdown",
        }
    }
}

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("site orchestrator has shut down")]
    Closed,
}

pub struct Orchestrator {
    navigator: Navigator,
    history: HistoryBridge,
    scroll: ScrollCoordinator,
    content: DeferredContentLoader,
    renderer: ViewRenderer,
    overlay: OverlayProps,
    revision: u64,
    events: mpsc::UnboundedSender<SiteEvent>,
    frames: watch::Sender<Frame>,
    catalog: watch::Sender<Arc<ContentCatalog>>,
    history_task: Option<JoinHandle<()>>,
    torn_down: bool,
}

impl Orchestrator {
    pub fn new(
        config: SiteConfig,
        dependencies: SiteDependencies,
        events: mpsc::UnboundedSender<SiteEvent>,
    ) -> (Self, watch::Receiver<Frame>) {
        let navigator = Navigator::new();
        let initial = Frame {
            revision: 0,
            view: navigator.view().clone(),
            body: PageBody::Ready(PageProps::for_view(
                navigator.view(),
                &ContentCatalog::default(),
            )),
            overlay: OverlayProps::default(),
        };
        let (frames, frames_rx) = watch::channel(initial);
        let (catalog, _) = watch::channel(Arc::new(ContentCatalog::default()));

        let orchestrator = Self {
            navigator,
            history: HistoryBridge::new(dependencies.navigation),
            scroll: ScrollCoordinator::new(dependencies.viewport, config.scroll_trigger),
            content: DeferredContentLoader::new(dependencies.content, config.content_load_delay),
            renderer: ViewRenderer::new(dependencies.pages),
            overlay: OverlayProps::default(),
            revision: 0,
            events,
            frames,
            catalog,
            history_task: None,
            torn_down: false,
        };
        (orchestrator, frames_rx)
    }

    /// Renders the address shown at startup, starts listening for
    /// back/forward and schedules the deferred content load.
    pub fn mount(&mut self) {
        let from = self.navigator.view().kind();
        if self.history.replay_initial(&mut self.navigator).is_some() {
            self.finish_transition(from, None);
        } else {
            self.publish();
        }

        self.history_task = Some(self.spawn_history_forwarder());
        self.content.schedule(&self.events);
        info!(
            page = self.navigator.view().kind().name(),
            "site orchestrator mounted"
        );
    }

    pub fn handle(&mut self, event: SiteEvent) -> ControlFlow<()> {
        if self.torn_down {
            return ControlFlow::Break(());
        }
        debug!(event = event.name(), "handling site event");

        match event {
            SiteEvent::Navigate(event) => {
                let from = self.navigator.view().kind();
                self.history
                    .navigate_to(&mut self.navigator, &event.path, event.options());
                self.finish_transition(from, None);
            }
            SiteEvent::SelectArticle(article) => {
                let from = self.navigator.view().kind();
                self.navigator.select_article(article);
                self.finish_transition(from, None);
            }
            SiteEvent::SelectCaseStudy(study) => {
                let from = self.navigator.view().kind();
                self.navigator.select_case_study(study);
                self.finish_transition(from, None);
            }
            SiteEvent::ViewAllArticles => {
                return self.handle(SiteEvent::Navigate(NavigationEvent::user(
                    CanonicalPath::Insights.as_str(),
                )));
            }
            SiteEvent::ViewAllCaseStudies => {
                return self.handle(SiteEvent::Navigate(NavigationEvent::user(
                    CanonicalPath::CaseStudies.as_str(),
                )));
            }
            SiteEvent::Close => {
                if let Some(target) = self.navigator.close_target() {
                    let from = self.navigator.view().kind();
                    self.history.return_to(&mut self.navigator, target.path);
                    self.finish_transition(from, target.section.map(str::to_string));
                }
            }
            SiteEvent::ScrollRequest(anchor) => {
                if self.navigator.view().is_home() {
                    self.scroll.cancel();
                    self.scroll.resolve(&ScrollTarget::Anchor(anchor));
                } else {
                    let from = self.navigator.view().kind();
                    self.history
                        .return_to(&mut self.navigator, CanonicalPath::Root);
                    self.finish_transition(from, Some(anchor));
                }
            }
            SiteEvent::SetOverlayOpen(open) => {
                if self.overlay.open != open {
                    self.overlay.open = open;
                    self.publish();
                }
            }
            SiteEvent::ViewMounted { revision } => {
                self.scroll.on_view_mounted(revision);
            }
            SiteEvent::ScrollTimerFired { ticket } => {
                self.scroll.on_timer_fired(ticket);
            }
            SiteEvent::CatalogLoaded(result) => {
                if self.content.on_loaded(result) {
                    self.catalog
                        .send_replace(Arc::new(self.content.catalog().clone()));
                    self.publish();
                }
            }
            SiteEvent::PageLoaded { page, result } => {
                self.renderer.on_page_loaded(page, result);
                if self.navigator.view().kind() == page {
                    self.publish();
                }
            }
            SiteEvent::Shutdown => {
                self.teardown();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Stops every timer and background task. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.content.cancel();
        self.scroll.cancel();
        self.renderer.shutdown();
        if let Some(task) = self.history_task.take() {
            task.abort();
        }
        info!("site orchestrator torn down");
    }

    pub fn view(&self) -> &ViewState {
        self.navigator.view()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn content_state(&self) -> LoadState {
        self.content.state()
    }

    pub fn pending_scroll(&self) -> Option<&ScrollTarget> {
        self.scroll.pending_target()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn subscribe_catalog(&self) -> watch::Receiver<Arc<ContentCatalog>> {
        self.catalog.subscribe()
    }

    fn finish_transition(&mut self, from: PageKind, section: Option<String>) {
        self.revision += 1;
        let to = self.navigator.view().kind();
        info!(
            from = from.name(),
            to = to.name(),
            revision = self.revision,
            "view transition"
        );
        self.scroll.on_transition(
            &scroll::Transition {
                revision: self.revision,
                from,
                to,
                section,
            },
            &self.events,
        );
        self.publish();
    }

    fn publish(&mut self) {
        let frame = self.renderer.render(
            self.revision,
            self.navigator.view(),
            self.content.catalog(),
            self.overlay,
            &self.events,
        );
        self.frames.send_replace(frame);
    }

    fn spawn_history_forwarder(&self) -> JoinHandle<()> {
        let mut notifications = BroadcastStream::new(self.history.subscribe());
        let events = self.events.clone();
        tokio::spawn(async move {
            while let Some(notification) = notifications.next().await {
                match notification {
                    Ok(address) => {
                        let event = SiteEvent::Navigate(NavigationEvent::replay(address));
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                    Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                        warn!(skipped, "history notifications lagged");
                    }
                }
            }
        })
    }
}

#[derive(Clone)]
pub struct ViewCallbacks {
    events: mpsc::UnboundedSender<SiteEvent>,
}

impl ViewCallbacks {
    pub fn dispatch(&self, event: SiteEvent) -> Result<(), SiteError> {
        let name = event.name();
        self.events.send(event).map_err(|_| SiteError::Closed)?;
        debug!(event = name, "queued site event");
        Ok(())
    }

    pub fn navigate(&self, path: impl Into<String>) -> Result<(), SiteError> {
        self.dispatch(SiteEvent::Navigate(NavigationEvent::user(path)))
    }

    pub fn select_article(&self, article: JournalArticle) -> Result<(), SiteError> {
        self.dispatch(SiteEvent::SelectArticle(article))
    }

    pub fn select_case_study(&self, study: CaseStudy) -> Result<(), SiteError> {
        self.dispatch(SiteEvent::SelectCaseStudy(study))
    }

    pub fn view_all_articles(&self) -> Result<(), SiteError> {
        self.dispatch(SiteEvent::ViewAllArticles)
    }

    pub fn view_all_case_studies(&self) -> Result<(), SiteError> {
        self.dispatch(SiteEvent::ViewAllCaseStudies)
    }

    pub fn close(&self) -> Result<(), SiteError> {
        self.dispatch(SiteEvent::Close)
    }

    pub fn scroll_to(&self, anchor: impl Into<String>) -> Result<(), SiteError> {
        self.dispatch(SiteEvent::ScrollRequest(anchor.into()))
    }

    pub fn set_overlay_open(&self, open: bool) -> Result<(), SiteError> {
        self.dispatch(SiteEvent::SetOverlayOpen(open))
    }

    pub fn view_mounted(&self, revision: u64) -> Result<(), SiteError> {
        self.dispatch(SiteEvent::ViewMounted { revision })
    }
}

/// A running orchestrator. Dropping the handle tears the site down.
pub struct SiteHandle {
    callbacks: ViewCallbacks,
    frames: watch::Receiver<Frame>,
    catalog: watch::Receiver<Arc<ContentCatalog>>,
    task: Option<JoinHandle<()>>,
}

impl SiteHandle {
    pub fn callbacks(&self) -> ViewCallbacks {
        self.callbacks.clone()
    }

    pub fn frame(&self) -> Frame {
        self.frames.borrow().clone()
    }

    pub fn subscribe_frames(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    pub fn catalog(&self) -> Arc<ContentCatalog> {
        Arc::clone(&self.catalog.borrow())
    }

    pub async fn shutdown(mut self) {
        let _ = self.callbacks.events.send(SiteEvent::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SiteHandle {
    fn drop(&mut self) {
        let _ = self.callbacks.events.send(SiteEvent::Shutdown);
    }
}

pub fn spawn_site(config: SiteConfig, dependencies: SiteDependencies) -> SiteHandle {
    let (events, mut inbox) = mpsc::unbounded_channel();
    let (mut orchestrator, frames) = Orchestrator::new(config, dependencies, events.clone());
    let catalog = orchestrator.subscribe_catalog();
    orchestrator.mount();

    let task = tokio::spawn(async move {
        while let Some(event) = inbox.recv().await {
            if orchestrator.handle(event).is_break() {
                break;
            }
        }
        orchestrator.teardown();
    });

    SiteHandle {
        callbacks: ViewCallbacks { events },
        frames,
        catalog,
        task: Some(task),
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
