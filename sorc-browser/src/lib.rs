pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod http_client;
pub mod models;
pub mod tabs;
pub mod ui;

// Re-export commonly used types
pub use browser::{Browser, Flow, MenuChoice, Notice, Prompt};
pub use config::BrowserConfig;
pub use error::BrowserError;
pub use extract::{extract, Extracted};
pub use http_client::{Fetcher, HttpClient};
pub use models::{HistoryEntry, Link, Page, ProxyConfig, Tab, TabId};
pub use tabs::TabStore;
