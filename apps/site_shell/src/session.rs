use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use content::ContentSource;
use shared::domain::{ArticleId, CaseStudyId};
use site_core::{
    adapters::{HeadlessViewport, MemoryHistory},
    spawn_site, Frame, PageLoader, SiteConfig, SiteDependencies, SiteHandle,
};
use tracing::{debug, info, warn};

use crate::{host, script::Command};

/// Pause after each scripted interaction so the view host can mount.
const SETTLE: Duration = Duration::from_millis(20);

pub struct SessionReport {
    pub history: Vec<String>,
    pub last_frame: Frame,
}

/// Spawns a site at `address`, plays `commands` against it and shuts it down.
///
/// `article`/`study` lines resolve against the catalog the site itself
/// loaded; before the deferred load lands they are skipped.
pub async fn run_session(
    address: String,
    config: SiteConfig,
    content: Arc<dyn ContentSource>,
    pages: Arc<dyn PageLoader>,
    commands: &[Command],
) -> Result<SessionReport> {
    let history = MemoryHistory::new(address);
    let viewport = HeadlessViewport::new();
    let site = spawn_site(
        config,
        SiteDependencies {
            navigation: history.clone(),
            viewport: viewport.clone(),
            content,
            pages,
        },
    );
    let host = host::spawn_host(site.subscribe_frames(), viewport.clone(), site.callbacks());

    tokio::time::sleep(SETTLE).await;
    for command in commands {
        run_command(&site, &history, command).await?;
        tokio::time::sleep(SETTLE).await;
        for record in viewport.take_log() {
            println!("  {}", host::describe_scroll(&record));
        }
    }

    let last_frame = site.frame();
    site.shutdown().await;
    host.await.context("view host task failed")?;
    info!(entries = history.len(), "session finished");
    Ok(SessionReport {
        history: history.entries(),
        last_frame,
    })
}

async fn run_command(site: &SiteHandle, history: &MemoryHistory, command: &Command) -> Result<()> {
    debug!(command = command.name(), "running script command");
    let callbacks = site.callbacks();
    match command {
        Command::Go(path) => callbacks.navigate(path.clone())?,
        Command::Article(id) => {
            let catalog = site.catalog();
            match catalog.article(&ArticleId::new(id.as_str())) {
                Some(article) => callbacks.select_article(article.clone())?,
                None => warn!(%id, "no article with this id in the loaded catalog"),
            }
        }
        Command::Study(id) => {
            let catalog = site.catalog();
            match catalog.case_study(&CaseStudyId::new(id.as_str())) {
                Some(study) => callbacks.select_case_study(study.clone())?,
                None => warn!(%id, "no case study with this id in the loaded catalog"),
            }
        }
        Command::AllArticles => callbacks.view_all_articles()?,
        Command::AllStudies => callbacks.view_all_case_studies()?,
        Command::Close => callbacks.close()?,
        Command::Back => {
            if history.back().is_none() {
                warn!("already at the oldest history entry");
            }
        }
        Command::Forward => {
            if history.forward().is_none() {
                warn!("already at the newest history entry");
            }
        }
        Command::Scroll(anchor) => callbacks.scroll_to(anchor.clone())?,
        Command::Overlay(open) => callbacks.set_overlay_open(*open)?,
        Command::Wait(duration) => tokio::time::sleep(*duration).await,
    }
    Ok(())
}
