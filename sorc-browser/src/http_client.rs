use anyhow::{Context, Result};
use reqwest::{Client, Proxy};
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use crate::config::BrowserConfig;
use crate::error::BrowserError;
use crate::models::ProxyConfig;

/// Something that can retrieve a document body for a URL.
pub trait Fetcher {
    fn fetch(&self, url: &str, proxy: Option<&ProxyConfig>) -> crate::error::Result<String>;
}

/// Blocking GET over reqwest. Each call waits for the request to finish;
/// there are no retries and no timeout beyond reqwest's defaults.
pub struct HttpClient {
    direct: Client,
    user_agent: String,
    runtime: Runtime,
}

impl HttpClient {
    pub fn new(config: &BrowserConfig) -> Result<Self> {
        let direct = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to build HTTP client")?;

        let runtime = Runtime::new().context("Failed to create tokio runtime")?;

        Ok(Self {
            direct,
            user_agent: config.user_agent.clone(),
            runtime,
        })
    }

    fn client_for(&self, proxy: Option<&ProxyConfig>) -> Result<Client, reqwest::Error> {
        let Some(proxy) = proxy else {
            return Ok(self.direct.clone());
        };
        Client::builder()
            .user_agent(self.user_agent.as_str())
            .proxy(Proxy::http(proxy.http.as_str())?)
            .proxy(Proxy::https(proxy.https.as_str())?)
            .build()
    }

    pub fn fetch_page(&self, url: &str, proxy: Option<&ProxyConfig>) -> Result<String, reqwest::Error> {
        let client = self.client_for(proxy)?;
        self.runtime.block_on(async {
            client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await
        })
    }
}

impl Fetcher for HttpClient {
    fn fetch(&self, url: &str, proxy: Option<&ProxyConfig>) -> crate::error::Result<String> {
        debug!(url, proxied = proxy.is_some(), "fetching page");
        self.fetch_page(url, proxy).map_err(|err| {
            warn!(url, error = %err, "fetch failed");
            BrowserError::Fetch(err.to_string())
        })
    }
}
