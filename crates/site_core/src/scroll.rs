use std::{sync::Arc, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use crate::{
    navigator::{PageKind, TOP_ANCHOR},
    SiteEvent, ViewportService,
};

/// What releases a scroll that waits for the Home page to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTrigger {
    MountSignal,
    FixedDelay(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollTarget {
    Top,
    Anchor(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    Origin,
    Anchor,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub revision: u64,
    pub from: PageKind,
    pub to: PageKind,
    /// Home section to land on, if the transition returns to one.
    pub section: Option<String>,
}

struct PendingScroll {
    ticket: u64,
    revision: u64,
    target: ScrollTarget,
    timer: Option<JoinHandle<()>>,
}

pub struct ScrollCoordinator {
    viewport: Arc<dyn ViewportService>,
    trigger: ScrollTrigger,
    pending: Option<PendingScroll>,
    next_ticket: u64,
}

impl ScrollCoordinator {
    pub fn new(viewport: Arc<dyn ViewportService>, trigger: ScrollTrigger) -> Self {
        Self {
            viewport,
            trigger,
            pending: None,
            next_ticket: 0,
        }
    }

    pub fn on_transition(
        &mut self,
        transition: &Transition,
        events: &mpsc::UnboundedSender<SiteEvent>,
    ) {
        self.cancel();

        if transition.to != PageKind::Home {
            // New top-level views mount at the top; nothing to wait for.
            self.resolve(&ScrollTarget::Top);
            return;
        }

        match &transition.section {
            Some(section) => self.schedule(
                transition.revision,
                ScrollTarget::Anchor(section.clone()),
                events,
            ),
            None if transition.from != PageKind::Home => {
                self.resolve(&ScrollTarget::Top);
            }
            None => {}
        }
    }

    pub fn on_view_mounted(&mut self, revision: u64) -> Option<ScrollOutcome> {
        if self.trigger != ScrollTrigger::MountSignal {
            return None;
        }
        if !self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.revision == revision)
        {
            return None;
        }
        let pending = self.pending.take()?;
        Some(self.resolve(&pending.target))
    }

    pub fn on_timer_fired(&mut self, ticket: u64) -> Option<ScrollOutcome> {
        if !self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.ticket == ticket)
        {
            return None;
        }
        let pending = self.pending.take()?;
        Some(self.resolve(&pending.target))
    }

    /// Drops any pending scroll; safe to call repeatedly.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            if let Some(timer) = pending.timer {
                timer.abort();
            }
            debug!(
                ticket = pending.ticket,
                revision = pending.revision,
                "cancelled pending scroll"
            );
        }
    }

    pub fn resolve(&self, target: &ScrollTarget) -> ScrollOutcome {
        match target {
            ScrollTarget::Top => {
                self.viewport.scroll_to_origin();
                ScrollOutcome::Origin
            }
            ScrollTarget::Anchor(anchor) => {
                if self.viewport.scroll_into_view(anchor) {
                    ScrollOutcome::Anchor
                } else if anchor == TOP_ANCHOR {
                    self.viewport.scroll_to_origin();
                    ScrollOutcome::Origin
                } else {
                    debug!(%anchor, "scroll target not mounted; ignoring");
                    ScrollOutcome::Missing
                }
            }
        }
    }

    pub fn pending_target(&self) -> Option<&ScrollTarget> {
        self.pending.as_ref().map(|pending| &pending.target)
    }

    fn schedule(
        &mut self,
        revision: u64,
        target: ScrollTarget,
        events: &mpsc::UnboundedSender<SiteEvent>,
    ) {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let timer = match self.trigger {
            ScrollTrigger::MountSignal => None,
            ScrollTrigger::FixedDelay(delay) => {
                let events = events.clone();
                Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = events.send(SiteEvent::ScrollTimerFired { ticket });
                }))
            }
        };
        debug!(ticket, revision, ?target, "scheduled scroll");
        self.pending = Some(PendingScroll {
            ticket,
            revision,
            target,
            timer,
        });
    }
}
