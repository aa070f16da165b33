//! Shared test doubles: a scripted fake browser page and a recording
//! document sink.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use harvester_core::browser::{BrowserCookie, BrowserError, BrowserPage};
use harvester_core::crawl::DocumentSink;
use url::Url;

/// One scripted navigation result.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPage {
    /// Status reported by `goto` (e.g. 200, 404).
    pub status: u16,
    /// Hrefs returned for the document-link selector, in document order.
    pub hrefs: Vec<String>,
    /// Whether the robot-check control is present after the load.
    pub robot_check: bool,
    /// Whether the age gate is present after the load.
    pub age_gate: bool,
    /// Whether `goto` fails at the transport level instead.
    pub transport_error: bool,
    /// Whether `evaluate` fails on this page.
    pub evaluate_fails: bool,
    /// Whether `click` fails on this page.
    pub click_fails: bool,
}

impl ScriptedPage {
    pub fn ok(hrefs: &[&str]) -> Self {
        Self {
            status: 200,
            hrefs: hrefs.iter().map(|s| (*s).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            ..Self::default()
        }
    }

    pub fn transport_error() -> Self {
        Self {
            transport_error: true,
            ..Self::default()
        }
    }

    pub fn with_robot_check(mut self) -> Self {
        self.robot_check = true;
        self
    }

    pub fn with_age_gate(mut self) -> Self {
        self.age_gate = true;
        self
    }

    pub fn with_failing_evaluate(mut self) -> Self {
        self.evaluate_fails = true;
        self
    }

    pub fn with_failing_click(mut self) -> Self {
        self.click_fails = true;
        self
    }
}

/// Fake browser page: each `goto` consumes the next scripted page.
#[derive(Debug, Default)]
pub struct FakeBrowser {
    script: Mutex<VecDeque<ScriptedPage>>,
    current: Mutex<Option<ScriptedPage>>,
    pub cookies: Vec<BrowserCookie>,
    pub goto_log: Mutex<Vec<String>>,
    pub evaluated: Mutex<Vec<String>>,
    pub clicked: Mutex<Vec<String>>,
}

impl FakeBrowser {
    pub fn scripted(pages: Vec<ScriptedPage>) -> Self {
        Self {
            script: Mutex::new(pages.into()),
            ..Self::default()
        }
    }

    pub fn with_cookies(mut self, cookies: Vec<BrowserCookie>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn goto_count(&self) -> usize {
        self.goto_log.lock().unwrap().len()
    }

    fn current(&self) -> Option<ScriptedPage> {
        self.current.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserPage for FakeBrowser {
    async fn goto(&self, url: &str) -> Result<u16, BrowserError> {
        self.goto_log.lock().unwrap().push(url.to_string());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(page) if page.transport_error => {
                *self.current.lock().unwrap() = None;
                Err(BrowserError::navigation(url, "connection reset"))
            }
            Some(page) => {
                let status = page.status;
                *self.current.lock().unwrap() = Some(page);
                Ok(status)
            }
            // Script exhausted: the site would answer 404 from here on.
            None => {
                *self.current.lock().unwrap() = None;
                Ok(404)
            }
        }
    }

    async fn exists(&self, selector: &str) -> Result<bool, BrowserError> {
        let Some(page) = self.current() else {
            return Ok(false);
        };
        if selector.contains("robot") {
            Ok(page.robot_check)
        } else if selector.contains("age") {
            Ok(page.age_gate)
        } else {
            Ok(!page.hrefs.is_empty())
        }
    }

    async fn collect_attribute(
        &self,
        _selector: &str,
        _attribute: &str,
    ) -> Result<Vec<String>, BrowserError> {
        Ok(self.current().map(|p| p.hrefs).unwrap_or_default())
    }

    async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        self.clicked.lock().unwrap().push(selector.to_string());
        let mut current = self.current.lock().unwrap();
        if let Some(page) = current.as_mut() {
            if page.click_fails {
                return Err(BrowserError::page("click", "element detached"));
            }
            page.age_gate = false;
        }
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<(), BrowserError> {
        self.evaluated.lock().unwrap().push(script.to_string());
        if self.current().is_some_and(|p| p.evaluate_fails) {
            return Err(BrowserError::page("evaluate", "script threw"));
        }
        Ok(())
    }

    async fn wait_for_load(&self) -> Result<(), BrowserError> {
        Ok(())
    }

    async fn cookies(&self) -> Result<Vec<BrowserCookie>, BrowserError> {
        Ok(self.cookies.clone())
    }
}

/// Sink that records every delivery instead of downloading.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub deliveries: Mutex<Vec<Delivery>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub url: String,
    pub dataset: u32,
    pub cookie_header: Option<String>,
}

impl RecordingSink {
    pub fn delivered_urls(&self) -> Vec<String> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.url.clone())
            .collect()
    }
}

#[async_trait]
impl DocumentSink for RecordingSink {
    async fn deliver(&self, url: &Url, dataset: u32, cookie_header: Option<&str>) {
        self.deliveries.lock().unwrap().push(Delivery {
            url: url.to_string(),
            dataset,
            cookie_header: cookie_header.map(str::to_string),
        });
    }
}
