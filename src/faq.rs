use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::FaqConfig;
use crate::error::FaqError;

pub const DEFAULT_TABS: [&str; 5] = ["Docs 4", "Plugins", "Automations", "Pricing", "Community"];
pub const FALLBACK_NOTICE: &str = "Failed to load FAQs — showing defaults.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub q: String,
    pub a: String,
}

impl FaqItem {
    fn new(q: &str, a: &str) -> Self {
        Self {
            q: q.to_string(),
            a: a.to_string(),
        }
    }
}

pub fn default_items() -> Vec<FaqItem> {
    vec![
        FaqItem::new(
            "Do I have to open Port 22 to use on site?",
            "No. Netlink documents for engineers are securely available over HTTPS on standard ports (443 or 80). If you’re behind a corporate firewall, outgoing HTTPS is usually sufficient.",
        ),
        FaqItem::new(
            "From what platform can I cancel my subscription?",
            "You can cancel from the billing section inside your account dashboard. For team plans, only admins can manage billing and cancellations.",
        ),
        FaqItem::new(
            "Can I cancel my docs without prior notice?",
            "Yes — docs access ends immediately on cancellation. For enterprise agreements, please check contract terms or contact support for migration help.",
        ),
        FaqItem::new(
            "If I add users after generation, will they see docs?",
            "New users will see generated docs according to their assigned role and permission settings. Manage access from the team settings page.",
        ),
        FaqItem::new(
            "Is my data secure?",
            "We use TLS for data-in-transit and AES-256 for data-at-rest. We also support role-based access controls and audit logs for enterprise customers.",
        ),
    ]
}

/// Where FAQ items come from when not using the built-in list
#[async_trait]
pub trait FaqSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<FaqItem>, FaqError>;
}

/// GETs a JSON array of `{ "q": .., "a": .. }` objects
pub struct HttpFaqSource {
    client: Client,
    url: String,
}

impl HttpFaqSource {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl FaqSource for HttpFaqSource {
    async fn fetch(&self) -> Result<Vec<FaqItem>, FaqError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(FaqError::Status(response.status().as_u16()));
        }
        let items: Vec<FaqItem> = response.json().await?;
        if items.is_empty() {
            return Err(FaqError::Empty);
        }
        Ok(items)
    }
}

/// Accordion over FAQ items with tab selection and a keyboard cursor
#[derive(Debug, Clone)]
pub struct FaqState {
    items: Vec<FaqItem>,
    active_tab: usize,
    open: Option<usize>,
    cursor: usize,
    loading: bool,
    error: Option<String>,
}

impl FaqState {
    pub fn new(config: &FaqConfig) -> Self {
        let items = default_items();
        let open = config.initial_open.filter(|i| *i < items.len());
        Self {
            items,
            active_tab: 0,
            open,
            cursor: open.unwrap_or(0),
            loading: config.url.is_some(),
            error: None,
        }
    }

    pub fn items(&self) -> &[FaqItem] {
        &self.items
    }

    pub fn tabs(&self) -> &'static [&'static str] {
        &DEFAULT_TABS
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < DEFAULT_TABS.len() {
            self.active_tab = index;
        }
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// Open `index`, or close it when it is already the open item
    pub fn toggle(&mut self, index: usize) {
        if index >= self.items.len() {
            return;
        }
        self.open = if self.open == Some(index) { None } else { Some(index) };
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn next(&mut self) {
        if !self.items.is_empty() {
            self.cursor = (self.cursor + 1) % self.items.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.items.is_empty() {
            self.cursor = (self.cursor + self.items.len() - 1) % self.items.len();
        }
    }

    pub fn toggle_cursor(&mut self) {
        self.toggle(self.cursor);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Apply the outcome of a remote load. Failures keep the current items.
    pub fn finish_load(&mut self, result: Result<Vec<FaqItem>, FaqError>) {
        self.loading = false;
        match result {
            Ok(items) => {
                info!(count = items.len(), "FAQ items loaded");
                self.items = items;
                self.open = Some(0);
                self.cursor = 0;
                self.error = None;
            }
            Err(e) => {
                warn!("FAQ load failed, keeping defaults: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }
}

/// A FAQ fetch running in the background. Dropping it abandons the fetch so a
/// late result never reaches a torn-down view.
pub struct FaqLoad {
    handle: JoinHandle<Result<Vec<FaqItem>, FaqError>>,
}

impl FaqLoad {
    pub fn spawn(source: Arc<dyn FaqSource>) -> Self {
        let handle = tokio::spawn(async move { source.fetch().await });
        Self { handle }
    }

    /// Wait for the fetch. Safe to abandon and call again; a panicked fetch
    /// counts as "no data".
    pub async fn wait(&mut self) -> Result<Vec<FaqItem>, FaqError> {
        match (&mut self.handle).await {
            Ok(result) => result,
            Err(e) => {
                warn!("FAQ fetch task failed: {}", e);
                Err(FaqError::Empty)
            }
        }
    }

    pub async fn finish(mut self) -> Result<Vec<FaqItem>, FaqError> {
        self.wait().await
    }
}

impl Drop for FaqLoad {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
