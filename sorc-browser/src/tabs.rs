use std::collections::BTreeMap;

use tracing::info;

use crate::error::{BrowserError, Result};
use crate::extract::extract;
use crate::http_client::Fetcher;
use crate::models::{HistoryEntry, Page, ProxyConfig, Tab, TabId};

/// Owns every open tab and the active-tab pointer.
///
/// A fresh store always holds one tab, and the store refuses to close the
/// last one, so `active` always names an existing tab.
#[derive(Debug)]
pub struct TabStore {
    tabs: BTreeMap<TabId, Tab>,
    next_id: u32,
    active: TabId,
}

impl TabStore {
    pub fn new() -> Self {
        let mut store = Self {
            tabs: BTreeMap::new(),
            next_id: 1,
            active: TabId(1),
        };
        store.new_tab();
        store
    }

    pub fn new_tab(&mut self) -> TabId {
        let id = TabId(self.next_id);
        self.next_id += 1;
        self.tabs.insert(id, Tab::new(id));
        self.active = id;
        info!(tab = %id, "opened tab");
        id
    }

    pub fn switch_tab(&mut self, id: TabId) -> Result<()> {
        if !self.tabs.contains_key(&id) {
            return Err(BrowserError::NotFound(id));
        }
        self.active = id;
        Ok(())
    }

    /// Closes a tab. When the active tab goes away the lowest remaining id
    /// (the oldest open tab) becomes active.
    pub fn close_tab(&mut self, id: TabId) -> Result<()> {
        if self.tabs.len() == 1 {
            return Err(BrowserError::LastTab);
        }
        if self.tabs.remove(&id).is_none() {
            return Err(BrowserError::NotFound(id));
        }
        if self.active == id {
            if let Some(first) = self.tabs.keys().next() {
                self.active = *first;
            }
        }
        info!(tab = %id, active = %self.active, "closed tab");
        Ok(())
    }

    /// Fetches `url` and, only if that succeeds, makes it the tab's page.
    pub fn navigate(
        &mut self,
        id: TabId,
        url: &str,
        fetcher: &impl Fetcher,
        proxy: Option<&ProxyConfig>,
    ) -> Result<()> {
        self.tab(id)?;
        let markup = fetcher.fetch(url, proxy)?;
        self.commit(id, url, &markup)
    }

    /// Installs already fetched markup as the tab's page, pushing the page
    /// being replaced (if any) onto the history stack.
    pub fn commit(&mut self, id: TabId, url: &str, markup: &str) -> Result<()> {
        let tab = self.tab_mut(id)?;
        let extracted = extract(markup, url);
        let page = Page::new(url.to_string(), extracted.text, extracted.links);
        if let Some(previous) = tab.page.replace(page) {
            tab.history.push(HistoryEntry::from(previous));
        }
        tab.scroll_offset = 0;
        tab.link_offset = 0;
        info!(tab = %id, url, links = tab.links().len(), "navigated");
        Ok(())
    }

    /// Pops the most recent history entry and loads it again. The entry is
    /// consumed even when the reload fails; the page is left as it was.
    pub fn go_back(
        &mut self,
        id: TabId,
        fetcher: &impl Fetcher,
        proxy: Option<&ProxyConfig>,
    ) -> Result<()> {
        let entry = self
            .tab_mut(id)?
            .history
            .pop()
            .ok_or(BrowserError::EmptyHistory)?;
        let markup = fetcher.fetch(&entry.url, proxy)?;

        info!(tab = %id, url = %entry.url, "went back");
        let extracted = extract(&markup, &entry.url);
        let tab = self.tab_mut(id)?;
        tab.page = Some(Page::new(entry.url, extracted.text, extracted.links));
        tab.scroll_offset = 0;
        tab.link_offset = 0;
        Ok(())
    }

    pub fn active_id(&self) -> TabId {
        self.active
    }

    pub fn active_tab(&self) -> &Tab {
        &self.tabs[&self.active]
    }

    pub fn active_tab_mut(&mut self) -> &mut Tab {
        let active = self.active;
        self.tabs
            .get_mut(&active)
            .unwrap_or_else(|| unreachable!("active tab {active} is not in the store"))
    }

    pub fn get(&self, id: TabId) -> Option<&Tab> {
        self.tabs.get(&id)
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.tabs.contains_key(&id)
    }

    /// Tabs in ascending id order, which is also creation order.
    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.values()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    fn tab(&self, id: TabId) -> Result<&Tab> {
        self.tabs.get(&id).ok_or(BrowserError::NotFound(id))
    }

    fn tab_mut(&mut self, id: TabId) -> Result<&mut Tab> {
        self.tabs.get_mut(&id).ok_or(BrowserError::NotFound(id))
    }
}

impl Default for TabStore {
    fn default() -> Self {
        Self::new()
    }
}
