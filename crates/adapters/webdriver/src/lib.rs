//! # okofen-adapter-webdriver
//!
//! Drives the boiler's embedded web control panel through a real browser
//! using the [WebDriver](https://www.w3.org/TR/webdriver2/) protocol
//! ([fantoccini](https://docs.rs/fantoccini)).
//!
//! ## How it works
//!
//! Every command opens a fresh browser session, logs in on `/login.cgi`,
//! follows the heating circuit link and reads the `ModeAuto` / `ModeArrêt`
//! indicators. Element lookups are XPath expressions built from the panel's
//! visible labels (see [`locators`]). Waits poll until an element is
//! *displayed*, not merely present in the DOM.
//!
//! Dropping a [`PanelPage`] without closing it still ends the WebDriver
//! session: fantoccini deletes the session once its last client handle goes
//! away, which is how a deadline tears the browser down.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `okofen-app` and `okofen-domain`.

mod config;
pub mod locators;

pub use config::PanelConfig;

use std::sync::Arc;
use std::time::Duration;

use fantoccini::elements::Element;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder, Locator};
use tokio::time::Instant;

use okofen_app::ports::{ControlPanel, Indicator, PanelDriver, PanelSession};
use okofen_domain::error::ActuationError;
use okofen_domain::mode::Mode;

/// Delay between two visibility checks.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Opens [`PanelPage`] sessions against a WebDriver endpoint.
#[derive(Debug, Clone)]
pub struct WebDriverPanel {
    config: Arc<PanelConfig>,
}

impl WebDriverPanel {
    #[must_use]
    pub fn new(config: PanelConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    fn capabilities(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut chrome_args = vec!["--no-sandbox", "--disable-dev-shm-usage"];
        let mut firefox_args = Vec::new();
        if self.config.headless {
            chrome_args.push("--headless=new");
            firefox_args.push("-headless");
        }
        let mut caps = serde_json::Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            serde_json::json!({ "args": chrome_args }),
        );
        caps.insert(
            "moz:firefoxOptions".to_string(),
            serde_json::json!({ "args": firefox_args }),
        );
        caps
    }
}

impl PanelDriver for WebDriverPanel {
    type Session = PanelPage;

    async fn open_session(&self) -> Result<PanelPage, ActuationError> {
        if !self.config.has_credentials() {
            return Err(ActuationError::MissingConfig("appliance username and password"));
        }

        tracing::debug!(
            webdriver = %self.config.webdriver_url,
            headless = self.config.headless,
            "opening browser session"
        );
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());
        let client = builder
            .connect(&self.config.webdriver_url)
            .await
            .map_err(|err| ActuationError::driver("open browser session", err))?;

        client
            .update_timeouts(TimeoutConfiguration::new(
                None,
                Some(self.config.navigation_timeout()),
                None,
            ))
            .await
            .map_err(|err| ActuationError::driver("configure timeouts", err))?;

        Ok(PanelPage {
            client,
            config: Arc::clone(&self.config),
        })
    }
}

/// One open browser session on the control panel.
pub struct PanelPage {
    client: Client,
    config: Arc<PanelConfig>,
}

impl PanelPage {
    async fn goto(&self, path: &str, step: &'static str) -> Result<(), ActuationError> {
        let url = self.config.page_url(path);
        tracing::debug!(%url, "navigating");
        self.client
            .goto(&url)
            .await
            .map_err(|err| ActuationError::driver(step, err))
    }

    async fn find_all(
        &self,
        xpath: &str,
        step: &'static str,
    ) -> Result<Vec<Element>, ActuationError> {
        self.client
            .find_all(Locator::XPath(xpath))
            .await
            .map_err(|err| ActuationError::driver(step, err))
    }

    /// Poll until an element matching `xpath` is displayed.
    async fn find_visible(
        &self,
        xpath: &str,
        step: &'static str,
        timeout: Duration,
    ) -> Result<Element, ActuationError> {
        let deadline = Instant::now() + timeout;
        loop {
            for element in self.find_all(xpath, step).await? {
                // Stale elements report an error; treat them as hidden.
                if element.is_displayed().await.unwrap_or(false) {
                    return Ok(element);
                }
            }
            if Instant::now() >= deadline {
                return Err(ActuationError::NotVisible { step, timeout });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn click_visible(
        &self,
        xpath: &str,
        step: &'static str,
        timeout: Duration,
    ) -> Result<(), ActuationError> {
        let element = self.find_visible(xpath, step, timeout).await?;
        element
            .click()
            .await
            .map_err(|err| ActuationError::driver(step, err))
    }

    async fn fill(
        &self,
        label: &str,
        value: &str,
        step: &'static str,
    ) -> Result<(), ActuationError> {
        let field = self
            .find_visible(&locators::input_after_label(label), step, self.config.step_timeout())
            .await?;
        field
            .clear()
            .await
            .map_err(|err| ActuationError::driver(step, err))?;
        field
            .send_keys(value)
            .await
            .map_err(|err| ActuationError::driver(step, err))
    }
}

impl ControlPanel for PanelPage {
    async fn is_indicator_present(&self, indicator: Indicator) -> Result<bool, ActuationError> {
        let xpath = locators::text(locators::indicator_label(indicator));
        Ok(!self.find_all(&xpath, "mode indicator").await?.is_empty())
    }

    async fn wait_indicator_visible(
        &self,
        indicator: Indicator,
        timeout: Duration,
    ) -> Result<(), ActuationError> {
        let xpath = locators::text(locators::indicator_label(indicator));
        self.find_visible(&xpath, "mode indicator", timeout).await?;
        Ok(())
    }

    async fn open_mode_selector(&self, indicator: Indicator) -> Result<(), ActuationError> {
        let xpath = locators::text(locators::indicator_label(indicator));
        self.click_visible(&xpath, "mode indicator", self.config.step_timeout())
            .await
    }

    async fn select_mode(&self, target: Mode) -> Result<(), ActuationError> {
        let xpath = locators::mode_button(target);
        self.click_visible(&xpath, "mode button", self.config.step_timeout())
            .await
    }
}

impl PanelSession for PanelPage {
    async fn login(&self) -> Result<(), ActuationError> {
        let timeout = self.config.step_timeout();
        self.goto(locators::LOGIN_PATH, "login page").await?;
        self.find_visible(&locators::row(locators::LANGUAGE_ROW), "login page", timeout)
            .await?;

        tracing::debug!(username = %self.config.username, "filling credentials");
        self.fill(locators::USERNAME_LABEL, &self.config.username, "username field")
            .await?;
        self.fill(locators::PASSWORD_LABEL, &self.config.password, "password field")
            .await?;
        self.click_visible(&locators::button(locators::LOGIN_BUTTON), "login button", timeout)
            .await
    }

    async fn open_heating_circuit(&self) -> Result<(), ActuationError> {
        let timeout = self.config.step_timeout();
        self.goto(locators::HOME_PATH, "home page").await?;
        self.click_visible(
            &locators::link(locators::HEATING_CIRCUIT_LINK),
            "heating circuit link",
            timeout,
        )
        .await?;
        self.find_visible(
            &locators::text(locators::HEATING_CIRCUIT_MARKER),
            "heating circuit page",
            timeout,
        )
        .await?;
        Ok(())
    }

    async fn confirm(&self, timeout: Duration) -> Result<(), ActuationError> {
        self.click_visible(
            &locators::button(locators::CONFIRM_BUTTON),
            "confirmation button",
            timeout,
        )
        .await
    }

    async fn return_home(&self) -> Result<(), ActuationError> {
        let links = self
            .find_all(&locators::link(locators::HOME_LINK), "home link")
            .await?;
        match links.first() {
            Some(link) => link
                .click()
                .await
                .map_err(|err| ActuationError::driver("home link", err)),
            None => Ok(()),
        }
    }

    async fn close(self) -> Result<(), ActuationError> {
        self.client
            .close()
            .await
            .map_err(|err| ActuationError::driver("close browser session", err))
    }
}
