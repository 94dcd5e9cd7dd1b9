use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
    time::Duration,
};

use anyhow::{anyhow, Context};
use content::{ContentSource, HttpContentSource, JsonFileSource, MissingContentSource};
use serde::Deserialize;
use site_core::{
    renderer::{DelayedPageLoader, ImmediatePageLoader},
    PageLoader, ScrollTrigger, SiteConfig,
};
use tracing::warn;
use url::Url;

const SETTINGS_FILE: &str = "site.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollMode {
    /// Wait for the host's mount-complete signal.
    Mount,
    /// Wait a fixed `scroll_delay_ms` after the transition.
    Delay,
}

impl FromStr for ScrollMode {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mount" => Ok(Self::Mount),
            "delay" => Ok(Self::Delay),
            other => Err(anyhow!("unknown scroll mode '{other}', expected mount or delay")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub content_path: Option<PathBuf>,
    pub content_url: Option<String>,
    pub content_load_delay_ms: u64,
    pub scroll_mode: ScrollMode,
    pub scroll_delay_ms: u64,
    pub page_load_latency_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content_path: None,
            content_url: None,
            content_load_delay_ms: 100,
            scroll_mode: ScrollMode::Mount,
            scroll_delay_ms: 100,
            page_load_latency_ms: 0,
        }
    }
}

impl Settings {
    pub fn site_config(&self) -> SiteConfig {
        let scroll_trigger = match self.scroll_mode {
            ScrollMode::Mount => ScrollTrigger::MountSignal,
            ScrollMode::Delay => ScrollTrigger::FixedDelay(Duration::from_millis(self.scroll_delay_ms)),
        };
        SiteConfig {
            content_load_delay: Duration::from_millis(self.content_load_delay_ms),
            scroll_trigger,
        }
    }

    /// A URL wins over a file path when both are set.
    pub fn content_source(&self) -> anyhow::Result<Arc<dyn ContentSource>> {
        if let Some(raw_url) = &self.content_url {
            if self.content_path.is_some() {
                warn!(url = %raw_url, "both content_url and content_path set; using the url");
            }
            let url = Url::parse(raw_url.trim())
                .with_context(|| format!("invalid content_url '{raw_url}'"))?;
            return Ok(Arc::new(HttpContentSource::new(url)?));
        }
        if let Some(path) = &self.content_path {
            return Ok(Arc::new(JsonFileSource::new(path)));
        }
        Ok(Arc::new(MissingContentSource))
    }

    pub fn page_loader(&self) -> Arc<dyn PageLoader> {
        if self.page_load_latency_ms == 0 {
            Arc::new(ImmediatePageLoader)
        } else {
            Arc::new(DelayedPageLoader::new(Duration::from_millis(
                self.page_load_latency_ms,
            )))
        }
    }

    fn apply(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let parse_ms = |value: &str| {
            value
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{key} must be a number of milliseconds, got '{value}'"))
        };
        match key {
            "content_path" => self.content_path = Some(PathBuf::from(value)),
            "content_url" => self.content_url = Some(value.to_string()),
            "content_load_delay_ms" => self.content_load_delay_ms = parse_ms(value)?,
            "scroll_mode" => self.scroll_mode = value.parse()?,
            "scroll_delay_ms" => self.scroll_delay_ms = parse_ms(value)?,
            "page_load_latency_ms" => self.page_load_latency_ms = parse_ms(value)?,
            other => return Err(anyhow!("unknown setting '{other}'")),
        }
        Ok(())
    }
}

const KEYS: [&str; 6] = [
    "content_path",
    "content_url",
    "content_load_delay_ms",
    "scroll_mode",
    "scroll_delay_ms",
    "page_load_latency_ms",
];

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// Defaults, then the settings file, then `SITE_*` and `APP__*` variables.
/// Bad values are logged and skipped.
pub fn load_settings_from(file: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(file) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                for (key, value) in &file_cfg {
                    if let Err(err) = settings.apply(key, value) {
                        warn!(file = %file.display(), error = %err, "ignoring setting");
                    }
                }
            }
            Err(err) => warn!(file = %file.display(), error = %err, "unreadable settings file"),
        }
    }

    for key in KEYS {
        let upper = key.to_ascii_uppercase();
        for name in [format!("SITE_{upper}"), format!("APP__{upper}")] {
            if let Some(value) = env(&name) {
                if let Err(err) = settings.apply(key, &value) {
                    warn!(variable = %name, error = %err, "ignoring environment override");
                }
            }
        }
    }

    settings
}
