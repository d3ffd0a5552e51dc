//! Control panel and WebDriver configuration.

use std::time::Duration;

use serde::Deserialize;

/// Where the appliance lives, how to log in, and how to reach a browser.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Base URL of the appliance's web interface.
    pub url: String,
    /// Login name on the control panel.
    pub username: String,
    /// Login password on the control panel.
    pub password: String,
    /// WebDriver endpoint (chromedriver, geckodriver, selenium).
    pub webdriver_url: String,
    /// Ask the browser to run without a window.
    pub headless: bool,
    /// Maximum wait for each element, in seconds.
    pub step_timeout_secs: u64,
    /// Maximum wait for page loads, in seconds.
    pub navigation_timeout_secs: u64,
}

impl PanelConfig {
    #[must_use]
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    /// Whether both login name and password are set.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Absolute URL for `path` on the appliance.
    #[must_use]
    pub fn page_url(&self, path: &str) -> String {
        format!("{}{path}", self.url.trim_end_matches('/'))
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            url: "http://192.168.1.6:8080".to_string(),
            username: String::new(),
            password: String::new(),
            webdriver_url: "http://localhost:4444".to_string(),
            headless: true,
            step_timeout_secs: 30,
            navigation_timeout_secs: 60,
        }
    }
}

impl std::fmt::Debug for PanelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("webdriver_url", &self.webdriver_url)
            .field("headless", &self.headless)
            .field("step_timeout_secs", &self.step_timeout_secs)
            .field("navigation_timeout_secs", &self.navigation_timeout_secs)
            .finish()
    }
}
