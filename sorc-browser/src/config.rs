/// Scheme prepended to typed addresses that carry none.
pub const DEFAULT_SCHEME: &str = "http://";

/// Schemes accepted as-is when typed into the address prompt.
pub const KNOWN_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Static settings for a browsing session. There is no config file and no
/// command line; everything comes from `Default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    pub user_agent: String,
    pub default_scheme: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("SorcBrowser/{}", env!("CARGO_PKG_VERSION")),
            default_scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}

impl BrowserConfig {
    /// Turns user input into a fetchable address, adding the default scheme
    /// when the input does not start with a known one.
    pub fn normalize_url(&self, input: &str) -> String {
        let input = input.trim();
        if KNOWN_SCHEMES.iter().any(|scheme| input.starts_with(scheme)) {
            input.to_string()
        } else {
            format!("{}{}", self.default_scheme, input)
        }
    }
}
