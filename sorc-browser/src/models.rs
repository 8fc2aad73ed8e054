use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BrowserError;

/// Tab identifier. Allocated from a counter and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TabId {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_digits(s)
            .map(TabId)
            .ok_or_else(|| BrowserError::InvalidInput("Enter a number!".to_string()))
    }
}

/// Parses input made only of ASCII digits. Signs and surrounding
/// whitespace are rejected.
pub(crate) fn parse_digits<T: FromStr>(input: &str) -> Option<T> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub url: String,
}

impl Link {
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
        }
    }
}

/// A successfully fetched and extracted document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub url: String,
    pub content: String,
    pub links: Vec<Link>,
    pub loaded_at: DateTime<Utc>,
}

impl Page {
    pub fn new(url: String, content: String, links: Vec<Link>) -> Self {
        Self {
            url,
            content,
            links,
            loaded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub visited_at: DateTime<Utc>,
}

impl From<Page> for HistoryEntry {
    fn from(page: Page) -> Self {
        Self {
            url: page.url,
            visited_at: page.loaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub page: Option<Page>,
    /// Previously visited pages, most recent last.
    pub history: Vec<HistoryEntry>,
    pub scroll_offset: usize,
    pub link_offset: usize,
}

impl Tab {
    pub fn new(id: TabId) -> Self {
        Self {
            id,
            page: None,
            history: Vec::new(),
            scroll_offset: 0,
            link_offset: 0,
        }
    }

    pub fn current_url(&self) -> Option<&str> {
        self.page.as_ref().map(|page| page.url.as_str())
    }

    pub fn content(&self) -> Option<&str> {
        self.page.as_ref().map(|page| page.content.as_str())
    }

    pub fn links(&self) -> &[Link] {
        self.page.as_ref().map_or(&[], |page| page.links.as_slice())
    }

    /// Title shown in the tab list.
    pub fn title(&self) -> &str {
        self.current_url().unwrap_or("New Tab")
    }

    pub fn history_urls(&self) -> Vec<&str> {
        self.history.iter().map(|entry| entry.url.as_str()).collect()
    }
}

/// Proxy applied to every outgoing request, per scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub http: String,
    pub https: String,
}

impl ProxyConfig {
    /// Routes both schemes through the same proxy.
    pub fn uniform(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            http: url.clone(),
            https: url,
        }
    }
}
