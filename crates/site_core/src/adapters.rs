use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::sync::broadcast;
use tracing::debug;

use crate::{NavigationService, ViewportService};

struct HistoryStack {
    entries: Vec<String>,
    cursor: usize,
}

/// Session history with browser semantics: pushing truncates the forward
/// stack, and only back/forward emit change notifications.
pub struct MemoryHistory {
    stack: Mutex<HistoryStack>,
    notifications: broadcast::Sender<String>,
}

impl MemoryHistory {
    pub fn new(initial_address: impl Into<String>) -> Arc<Self> {
        let (notifications, _) = broadcast::channel(64);
        Arc::new(Self {
            stack: Mutex::new(HistoryStack {
                entries: vec![initial_address.into()],
                cursor: 0,
            }),
            notifications,
        })
    }

    pub fn back(&self) -> Option<String> {
        self.traverse(-1)
    }

    pub fn forward(&self) -> Option<String> {
        self.traverse(1)
    }

    pub fn entries(&self) -> Vec<String> {
        self.stack().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.stack().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack().entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.stack().cursor
    }

    fn traverse(&self, delta: isize) -> Option<String> {
        let address = {
            let mut stack = self.stack();
            let target = stack.cursor.checked_add_signed(delta)?;
            let address = stack.entries.get(target)?.clone();
            stack.cursor = target;
            address
        };
        debug!(%address, delta, "history traversal");
        let _ = self.notifications.send(address.clone());
        Some(address)
    }

    fn stack(&self) -> MutexGuard<'_, HistoryStack> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NavigationService for MemoryHistory {
    fn current_address(&self) -> String {
        let stack = self.stack();
        stack.entries[stack.cursor].clone()
    }

    fn push_address(&self, address: &str) {
        let mut stack = self.stack();
        let keep = stack.cursor + 1;
        stack.entries.truncate(keep);
        stack.entries.push(address.to_string());
        stack.cursor = keep;
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.notifications.subscribe()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollRecord {
    Origin,
    Anchor(String),
}

#[derive(Default)]
struct ViewportState {
    anchors: HashSet<String>,
    log: Vec<ScrollRecord>,
}

#[derive(Default)]
pub struct HeadlessViewport {
    state: Mutex<ViewportState>,
}

impl HeadlessViewport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_anchors<I, S>(&self, anchors: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state().anchors = anchors.into_iter().map(Into::into).collect();
    }

    pub fn log(&self) -> Vec<ScrollRecord> {
        self.state().log.clone()
    }

    pub fn take_log(&self) -> Vec<ScrollRecord> {
        std::mem::take(&mut self.state().log)
    }

    fn state(&self) -> MutexGuard<'_, ViewportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ViewportService for HeadlessViewport {
    fn scroll_to_origin(&self) {
        debug!("scroll to origin");
        self.state().log.push(ScrollRecord::Origin);
    }

    fn scroll_into_view(&self, anchor: &str) -> bool {
        let mut state = self.state();
        if !state.anchors.contains(anchor) {
            return false;
        }
        debug!(%anchor, "scroll into view");
        state.log.push(ScrollRecord::Anchor(anchor.to_string()));
        true
    }
}
