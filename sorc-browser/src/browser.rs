//! The menu-driven session: one submitted line of input at a time.
//!
//! `Browser` knows nothing about terminals. The binary feeds it lines typed
//! into the prompt bar and renders whatever state it is left in; tests feed
//! it canned lines instead.

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::config::BrowserConfig;
use crate::error::BrowserError;
use crate::http_client::Fetcher;
use crate::models::{parse_digits, ProxyConfig, Tab, TabId};
use crate::tabs::TabStore;
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    FollowLink,
    GoBack,
    EnterUrl,
    NewTab,
    SwitchTab,
    CloseTab,
    ViewHistory,
    SetProxy,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 9] = [
        MenuChoice::FollowLink,
        MenuChoice::GoBack,
        MenuChoice::EnterUrl,
        MenuChoice::NewTab,
        MenuChoice::SwitchTab,
        MenuChoice::CloseTab,
        MenuChoice::ViewHistory,
        MenuChoice::SetProxy,
        MenuChoice::Exit,
    ];

    pub fn key(self) -> usize {
        self as usize + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::FollowLink => "Follow a link",
            MenuChoice::GoBack => "Go back",
            MenuChoice::EnterUrl => "Enter a new URL",
            MenuChoice::NewTab => "Create a new tab",
            MenuChoice::SwitchTab => "Switch to a tab",
            MenuChoice::CloseTab => "Close a tab",
            MenuChoice::ViewHistory => "View history",
            MenuChoice::SetProxy => "Set proxy",
            MenuChoice::Exit => "Exit",
        }
    }
}

impl FromStr for MenuChoice {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .ok()
            .and_then(|key| key.checked_sub(1))
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or_else(|| BrowserError::InvalidInput("Invalid choice!".to_string()))
    }
}

/// What the next submitted line will be interpreted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Menu,
    LinkNumber,
    NewUrl,
    SwitchTab,
    CloseTab,
    Proxy,
    /// A message (or the history table) is on screen until the next line.
    Acknowledge,
}

impl Prompt {
    pub fn label(self) -> &'static str {
        match self {
            Prompt::Menu => "Your choice: ",
            Prompt::LinkNumber => "Enter link number: ",
            Prompt::NewUrl => "Enter a new URL: ",
            Prompt::SwitchTab => "Enter tab ID: ",
            Prompt::CloseTab => "Enter tab ID to close: ",
            Prompt::Proxy => "Enter proxy (e.g., http://proxy.example.com:8080): ",
            Prompt::Acknowledge => "Press Enter to continue...",
        }
    }

    pub fn is_cancellable(self) -> bool {
        !matches!(self, Prompt::Menu | Prompt::Acknowledge)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl From<BrowserError> for Notice {
    fn from(err: BrowserError) -> Self {
        Notice::Error(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Session state shared by every tab: the tab store, the proxy setting and
/// the prompt currently awaiting input.
pub struct Browser<F> {
    config: BrowserConfig,
    fetcher: F,
    store: TabStore,
    proxy: Option<ProxyConfig>,
    prompt: Prompt,
    notices: Vec<Notice>,
    showing_history: bool,
}

impl<F: Fetcher> Browser<F> {
    pub fn new(config: BrowserConfig, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            store: TabStore::new(),
            proxy: None,
            prompt: Prompt::Menu,
            notices: Vec::new(),
            showing_history: false,
        }
    }

    /// Handles one line of input according to the current prompt.
    pub fn submit(&mut self, line: &str) -> Flow {
        self.notices.clear();
        match self.prompt {
            Prompt::Menu => return self.choose(line),
            Prompt::LinkNumber => self.follow_link(line),
            Prompt::NewUrl => self.enter_url(line),
            Prompt::SwitchTab => self.switch_tab(line),
            Prompt::CloseTab => self.close_tab(line),
            Prompt::Proxy => self.set_proxy(line),
            Prompt::Acknowledge => {
                self.showing_history = false;
                self.prompt = Prompt::Menu;
            }
        }
        Flow::Continue
    }

    /// Feeds lines until one of them exits the session or the lines run out.
    pub fn run_lines<I>(&mut self, lines: I) -> Flow
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for line in lines {
            if self.submit(line.as_ref()) == Flow::Exit {
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    /// Abandons a pending sub-prompt and returns to the menu untouched.
    pub fn cancel(&mut self) {
        if self.prompt.is_cancellable() {
            self.notices.clear();
            self.prompt = Prompt::Menu;
        }
    }

    fn choose(&mut self, line: &str) -> Flow {
        let choice = match line.parse::<MenuChoice>() {
            Ok(choice) => choice,
            Err(err) => {
                self.pause(err.into());
                return Flow::Continue;
            }
        };

        match choice {
            MenuChoice::FollowLink => {
                if self.active_tab().links().is_empty() {
                    self.pause(Notice::Error("No links on this page!".to_string()));
                } else {
                    self.prompt = Prompt::LinkNumber;
                }
            }
            MenuChoice::GoBack => {
                let id = self.store.active_id();
                if let Err(err) = self.store.go_back(id, &self.fetcher, self.proxy.as_ref()) {
                    self.pause(err.into());
                }
            }
            MenuChoice::EnterUrl => self.prompt = Prompt::NewUrl,
            MenuChoice::NewTab => {
                self.store.new_tab();
            }
            MenuChoice::SwitchTab => self.prompt = Prompt::SwitchTab,
            MenuChoice::CloseTab => {
                if self.store.len() == 1 {
                    self.pause(BrowserError::LastTab.into());
                } else {
                    self.prompt = Prompt::CloseTab;
                }
            }
            MenuChoice::ViewHistory => {
                if self.active_tab().history.is_empty() {
                    self.pause(BrowserError::EmptyHistory.into());
                } else {
                    self.showing_history = true;
                    self.prompt = Prompt::Acknowledge;
                }
            }
            MenuChoice::SetProxy => self.prompt = Prompt::Proxy,
            MenuChoice::Exit => return Flow::Exit,
        }
        Flow::Continue
    }

    fn follow_link(&mut self, line: &str) {
        let Some(number) = parse_digits::<usize>(line) else {
            self.notices.push(Notice::Error("Enter a number!".to_string()));
            return;
        };
        let links = self.active_tab().links();
        let selected = number
            .checked_sub(1)
            .and_then(|index| links.get(index))
            .map(|link| link.url.clone());
        let Some(url) = selected else {
            self.notices.push(Notice::Error("Invalid link number!".to_string()));
            return;
        };

        self.prompt = Prompt::Menu;
        let id = self.store.active_id();
        if let Err(err) = self.store.navigate(id, &url, &self.fetcher, self.proxy.as_ref()) {
            self.pause(err.into());
        }
    }

    /// The address is fetched once; a failure keeps the prompt open so the
    /// user can correct it (or cancel).
    fn enter_url(&mut self, line: &str) {
        let url = self.config.normalize_url(line);
        match self.fetcher.fetch(&url, self.proxy.as_ref()) {
            Ok(markup) => {
                self.prompt = Prompt::Menu;
                let id = self.store.active_id();
                if let Err(err) = self.store.commit(id, &url, &markup) {
                    self.pause(err.into());
                }
            }
            Err(err) => {
                self.notices.push(err.into());
                self.notices.push(Notice::Error("Invalid URL!".to_string()));
            }
        }
    }

    fn switch_tab(&mut self, line: &str) {
        let notice = match parse_tab_id(line).and_then(|id| self.store.switch_tab(id).map(|_| id)) {
            Ok(id) => Notice::Info(format!("Switched to tab {id}")),
            Err(err) => err.into(),
        };
        self.pause(notice);
    }

    fn close_tab(&mut self, line: &str) {
        let notice = match parse_tab_id(line).and_then(|id| self.store.close_tab(id).map(|_| id)) {
            Ok(id) => Notice::Info(format!("Closed tab {id}")),
            Err(err) => err.into(),
        };
        self.pause(notice);
    }

    fn set_proxy(&mut self, line: &str) {
        let proxy_url = line.trim();
        let notice = if proxy_url.is_empty() {
            self.proxy = None;
            info!("proxy disabled");
            Notice::Info("Proxy disabled.".to_string())
        } else {
            self.proxy = Some(ProxyConfig::uniform(proxy_url));
            info!(proxy = proxy_url, "proxy set");
            Notice::Info(format!("Proxy set: {proxy_url}"))
        };
        self.pause(notice);
    }

    fn pause(&mut self, notice: Notice) {
        self.notices.push(notice);
        self.prompt = Prompt::Acknowledge;
    }

    /// Scrolls the page text by wrapped rows. `width` is the number of
    /// columns the text is wrapped to on screen (see `ui::content_width`).
    pub fn scroll_down(&mut self, lines: usize, width: u16) {
        let tab = self.store.active_tab_mut();
        let max = tab
            .content()
            .map_or(0, |content| ui::wrapped_rows(content, width).saturating_sub(1));
        tab.scroll_offset = tab.scroll_offset.saturating_add(lines).min(max);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let tab = self.store.active_tab_mut();
        tab.scroll_offset = tab.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_links_down(&mut self, rows: usize) {
        let tab = self.store.active_tab_mut();
        let max = tab.links().len().saturating_sub(1);
        tab.link_offset = tab.link_offset.saturating_add(rows).min(max);
    }

    pub fn scroll_links_up(&mut self, rows: usize) {
        let tab = self.store.active_tab_mut();
        tab.link_offset = tab.link_offset.saturating_sub(rows);
    }

    pub fn active_tab(&self) -> &Tab {
        self.store.active_tab()
    }

    pub fn store(&self) -> &TabStore {
        &self.store
    }

    pub fn proxy(&self) -> Option<&ProxyConfig> {
        self.proxy.as_ref()
    }

    pub fn prompt(&self) -> Prompt {
        self.prompt
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn showing_history(&self) -> bool {
        self.showing_history
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

fn parse_tab_id(line: &str) -> crate::error::Result<TabId> {
    line.parse()
}
