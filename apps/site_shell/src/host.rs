//! Stand-in for the browser's view layer: mounts every published frame,
//! reports mount completion and prints what would be on screen.

use std::sync::Arc;

use site_core::{
    adapters::{HeadlessViewport, ScrollRecord},
    navigator::HOME_SECTIONS,
    Frame, PageBody, PageProps, ViewCallbacks,
};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

pub fn spawn_host(
    mut frames: watch::Receiver<Frame>,
    viewport: Arc<HeadlessViewport>,
    callbacks: ViewCallbacks,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let initial = frames.borrow_and_update().clone();
        mount(&initial, &viewport, &callbacks);
        while frames.changed().await.is_ok() {
            let frame = frames.borrow_and_update().clone();
            mount(&frame, &viewport, &callbacks);
        }
        debug!("frame stream closed; view host exiting");
    })
}

fn mount(frame: &Frame, viewport: &HeadlessViewport, callbacks: &ViewCallbacks) {
    println!("{}", describe_frame(frame));
    if !frame.is_ready() {
        return;
    }

    if frame.view.is_home() {
        viewport.set_anchors(HOME_SECTIONS.iter().copied());
    } else {
        viewport.set_anchors(Vec::<String>::new());
    }
    if let Err(err) = callbacks.view_mounted(frame.revision) {
        warn!(revision = frame.revision, error = %err, "could not report mounted view");
    }
}

pub fn describe_frame(frame: &Frame) -> String {
    let overlay = if frame.overlay.open { "open" } else { "closed" };
    let body = match &frame.body {
        PageBody::Loading => "loading".to_string(),
        PageBody::Ready(props) => describe_props(props),
    };
    format!(
        "[rev {}] {} | {} | overlay {}",
        frame.revision,
        frame.page().name(),
        body,
        overlay
    )
}

fn describe_props(props: &PageProps) -> String {
    match props {
        PageProps::Home {
            preview,
            case_studies,
        } => format!(
            "{} case studies, featured study: {}, latest article: {}",
            case_studies.len(),
            preview
                .case_study
                .as_ref()
                .map_or("none", |study| study.title.as_str()),
            preview
                .article
                .as_ref()
                .map_or("none", |article| article.title.as_str()),
        ),
        PageProps::ArticleDetail { article } => {
            format!("{} ({}, {})", article.title, article.author, article.date)
        }
        PageProps::ArticleList { articles } => format!("{} articles", articles.len()),
        PageProps::CaseStudyDetail { study } => format!("{} for {}", study.title, study.client),
        PageProps::CaseStudyList { case_studies } => {
            format!("{} case studies", case_studies.len())
        }
        PageProps::MediaGallery | PageProps::PrivacyPolicy | PageProps::TermsOfService => {
            "static page".to_string()
        }
    }
}

pub fn describe_scroll(record: &ScrollRecord) -> String {
    match record {
        ScrollRecord::Origin => "scrolled to top".to_string(),
        ScrollRecord::Anchor(anchor) => format!("scrolled to #{anchor}"),
    }
}
