use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;
use url::Url;

use crate::{
    navigator::{CanonicalPath, Navigator, ViewState},
    NavigationService,
};

const ADDRESS_BASE: &str = "http://localhost/";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Apply the path without recording a history entry (back/forward replay).
    pub skip_history: bool,
}

impl NavigateOptions {
    pub const REPLAY: Self = Self { skip_history: true };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub path: String,
    pub skip_history: bool,
}

impl NavigationEvent {
    pub fn user(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            skip_history: false,
        }
    }

    pub fn replay(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            skip_history: true,
        }
    }

    pub fn options(&self) -> NavigateOptions {
        NavigateOptions {
            skip_history: self.skip_history,
        }
    }
}

/// Path component only; query and fragment are dropped.
pub fn address_path(raw: &str) -> String {
    let raw = raw.trim();
    Url::parse(ADDRESS_BASE)
        .and_then(|base| base.join(raw))
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub struct HistoryBridge {
    navigation: Arc<dyn NavigationService>,
}

impl HistoryBridge {
    pub fn new(navigation: Arc<dyn NavigationService>) -> Self {
        Self { navigation }
    }

    pub fn navigate_to<'a>(
        &mut self,
        navigator: &'a mut Navigator,
        path: &str,
        options: NavigateOptions,
    ) -> &'a ViewState {
        let path = address_path(path);
        if !options.skip_history {
            self.navigation.push_address(&path);
            debug!(%path, "pushed history entry");
        }
        navigator.apply_path(&path)
    }

    pub fn replay_initial<'a>(&mut self, navigator: &'a mut Navigator) -> Option<&'a ViewState> {
        let path = self.current_path();
        if path == CanonicalPath::Root.as_str() {
            return None;
        }
        debug!(%path, "replaying initial address");
        Some(self.navigate_to(navigator, &path, NavigateOptions::REPLAY))
    }

    /// In-app "back". Detail views never touch the address bar, so closing
    /// one may land on the address already shown; no entry is pushed then.
    pub fn return_to<'a>(
        &mut self,
        navigator: &'a mut Navigator,
        path: CanonicalPath,
    ) -> &'a ViewState {
        let options = NavigateOptions {
            skip_history: self.current_path() == path.as_str(),
        };
        self.navigate_to(navigator, path.as_str(), options)
    }

    pub fn current_path(&self) -> String {
        address_path(&self.navigation.current_address())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.navigation.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/history_bridge_tests.rs"]
mod tests;
