//! Chromium adapter for the [`BrowserPage`] seam.
//!
//! Drives a headless Chromium over CDP via `chromiumoxide`. The one
//! non-obvious part is HTTP status capture: CDP does not hand back the
//! navigation response directly, so a listener for `EventResponseReceived`
//! is attached before each `goto` and the first main-document (HTML)
//! response observed during the navigation supplies the status.

use std::time::Duration;

use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::EventResponseReceived;
use futures::StreamExt;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{BrowserCookie, BrowserError, BrowserPage};

/// Upper bound on one navigation, load wait included.
const NAVIGATION_TIMEOUT_SECS: u64 = 30;

/// How long to wait for CDP to report the main document response.
const STATUS_CAPTURE_TIMEOUT_SECS: u64 = 10;

/// A launched headless browser plus its detached CDP handler task.
///
/// The handler task must keep polling for the lifetime of the browser;
/// dropping it stalls every in-flight CDP call.
pub struct BrowserHandle {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserHandle {
    /// Opens a fresh tab.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Page`] if the tab cannot be created.
    pub async fn new_page(&self) -> Result<ChromiumPage, BrowserError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::page("new_page", e.to_string()))?;
        Ok(ChromiumPage { page })
    }

    /// Closes the browser and stops the handler task.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "browser wait failed");
        }
        self.handler_task.abort();
    }
}

/// Launches a headless Chromium and spawns its CDP handler loop.
///
/// The browser presents the same User-Agent the download client sends, so
/// the session the challenge layer establishes stays coherent across both.
///
/// # Errors
///
/// Returns [`BrowserError::Page`] if the browser cannot be configured or
/// launched.
pub async fn launch_browser(user_agent: &str) -> Result<BrowserHandle, BrowserError> {
    let config = BrowserConfig::builder()
        .arg(format!("--user-agent={user_agent}"))
        .build()
        .map_err(|e| BrowserError::page("browser_config", e))?;

    let (browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| BrowserError::page("browser_launch", e.to_string()))?;

    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!(error = %e, "CDP handler event error");
            }
        }
    });

    Ok(BrowserHandle {
        browser,
        handler_task,
    })
}

/// One Chromium tab implementing the crawl-facing page contract.
pub struct ChromiumPage {
    page: Page,
}

#[async_trait::async_trait]
impl BrowserPage for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<u16, BrowserError> {
        let mut events = self
            .page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| BrowserError::page("event_listener", e.to_string()))?;

        // The first HTML response observed during the navigation is the main
        // document, redirects included; subresources report other mime types.
        let (status_tx, status_rx) = oneshot::channel::<u16>();
        let capture = tokio::spawn(async move {
            let deadline = tokio::time::sleep(Duration::from_secs(STATUS_CAPTURE_TIMEOUT_SECS));
            tokio::pin!(deadline);
            loop {
                tokio::select! {
                    maybe_event = events.next() => {
                        let Some(event) = maybe_event else { break };
                        let mime = event.response.mime_type.to_lowercase();
                        if mime.starts_with("text/html")
                            || mime.starts_with("application/xhtml+xml")
                        {
                            let status = u16::try_from(event.response.status).unwrap_or(0);
                            let _ = status_tx.send(status);
                            break;
                        }
                    }
                    () = &mut deadline => break,
                }
            }
        });

        let navigation = tokio::time::timeout(
            Duration::from_secs(NAVIGATION_TIMEOUT_SECS),
            self.page.goto(url),
        )
        .await;

        match navigation {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                capture.abort();
                return Err(BrowserError::navigation(url, e.to_string()));
            }
            Err(_) => {
                capture.abort();
                return Err(BrowserError::navigation(url, "navigation timed out"));
            }
        }

        // The capture task resolves as soon as the document response lands;
        // when CDP never reports one, assume the load that just completed
        // was served successfully.
        match tokio::time::timeout(Duration::from_secs(5), status_rx).await {
            Ok(Ok(status)) => {
                debug!(url, status, "captured navigation status");
                Ok(status)
            }
            _ => {
                debug!(url, "no document response captured, assuming 200");
                Ok(200)
            }
        }
    }

    async fn exists(&self, selector: &str) -> Result<bool, BrowserError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| BrowserError::page(format!("find_elements {selector}"), e.to_string()))?;
        Ok(!elements.is_empty())
    }

    async fn collect_attribute(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<String>, BrowserError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|e| BrowserError::page(format!("find_elements {selector}"), e.to_string()))?;

        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            let value = element
                .attribute(attribute)
                .await
                .map_err(|e| BrowserError::page(format!("attribute {attribute}"), e.to_string()))?;
            if let Some(value) = value {
                values.push(value);
            }
        }
        Ok(values)
    }

    async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| BrowserError::page(format!("find_element {selector}"), e.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::page(format!("click {selector}"), e.to_string()))?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<(), BrowserError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::page(format!("evaluate {script}"), e.to_string()))?;
        Ok(())
    }

    async fn wait_for_load(&self) -> Result<(), BrowserError> {
        tokio::time::timeout(
            Duration::from_secs(NAVIGATION_TIMEOUT_SECS),
            self.page.wait_for_navigation(),
        )
        .await
        .map_err(|_| BrowserError::page("wait_for_navigation", "timed out"))?
        .map_err(|e| BrowserError::page("wait_for_navigation", e.to_string()))?;
        Ok(())
    }

    async fn cookies(&self) -> Result<Vec<BrowserCookie>, BrowserError> {
        let cookies = self
            .page
            .get_cookies()
            .await
            .map_err(|e| BrowserError::page("get_cookies", e.to_string()))?;
        Ok(cookies
            .into_iter()
            .map(|c| BrowserCookie::new(c.name, c.value))
            .collect())
    }
}
