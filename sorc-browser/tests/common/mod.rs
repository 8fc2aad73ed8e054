#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use sorc_browser::{BrowserError, Fetcher, ProxyConfig};

/// Serves canned pages and records every request it sees.
#[derive(Default)]
pub struct MockFetcher {
    pages: RefCell<HashMap<String, String>>,
    calls: RefCell<Vec<(String, Option<ProxyConfig>)>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, body: &str) -> Self {
        self.add_page(url, body);
        self
    }

    pub fn add_page(&self, url: &str, body: &str) {
        self.pages.borrow_mut().insert(url.to_string(), body.to_string());
    }

    pub fn remove_page(&self, url: &str) {
        self.pages.borrow_mut().remove(url);
    }

    pub fn calls(&self) -> Vec<(String, Option<ProxyConfig>)> {
        self.calls.borrow().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn last_proxy(&self) -> Option<ProxyConfig> {
        self.calls.borrow().last().and_then(|(_, proxy)| proxy.clone())
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str, proxy: Option<&ProxyConfig>) -> Result<String, BrowserError> {
        self.calls
            .borrow_mut()
            .push((url.to_string(), proxy.cloned()));
        self.pages
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| BrowserError::Fetch(format!("404 Not Found for url ({url})")))
    }
}

/// The two-page site used by most scenarios.
pub fn example_site() -> MockFetcher {
    MockFetcher::new()
        .with_page(
            "http://example.com",
            r#"<html><body><h1>Example</h1><a href="/about">About</a></body></html>"#,
        )
        .with_page(
            "http://example.com/about",
            r#"<html><body><p>About us</p><a href="/">Home</a><a href="team">Team</a></body></html>"#,
        )
}
