// src/browser.rs
//
// Browser capability used by the scrape stages. The pipeline only needs to
// navigate, wait, click, read the title, scroll, and snapshot elements
// matching a CSS selector. `ChromeDriver` implements it over headless_chrome;
// tests script a fake.

use std::{collections::HashMap, ffi::OsStr, sync::Arc, thread, time::Duration};

use headless_chrome::{Browser, LaunchOptions, Tab};
use serde::Deserialize;
use tracing::debug;

use crate::error::ScrapeError;

/// Detached snapshot of a DOM element (and a few levels of children).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attrs: HashMap<String, String>,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|x| x == class))
            .unwrap_or(false)
    }

    /// Depth-first walk over this node and all descendants.
    pub fn descendants(&self) -> Vec<&Node> {
        let mut out = vec![self];
        let mut i = 0;
        while i < out.len() {
            let n = out[i];
            out.extend(n.children.iter());
            i += 1;
        }
        out
    }
}

/// One live page in one browser session. Dropping it tears the session down.
pub trait PageSession {
    fn navigate(&mut self, url: &str) -> Result<(), ScrapeError>;

    /// `Ok(false)` when the selector did not show up in time.
    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<bool, ScrapeError>;

    fn click(&mut self, selector: &str) -> Result<(), ScrapeError>;

    fn title(&mut self) -> Result<String, ScrapeError>;

    fn query(&mut self, selector: &str) -> Result<Vec<Node>, ScrapeError>;

    fn scroll_to_bottom(&mut self) -> Result<(), ScrapeError>;

    fn page_height(&mut self) -> Result<u64, ScrapeError>;

    /// Let the page render for `delay`.
    fn settle(&mut self, delay: Duration) {
        thread::sleep(delay);
    }
}

/// Opens browser sessions. One session per discovery run and per profile.
pub trait Driver: Send + Sync {
    fn open(&self, proxy: Option<&str>) -> Result<Box<dyn PageSession>, ScrapeError>;
}

/* ---------------- headless_chrome ---------------- */

pub struct ChromeDriver {
    pub headless: bool,
    pub navigation_timeout: Duration,
}

impl ChromeDriver {
    pub fn new(headless: bool, navigation_timeout: Duration) -> Self {
        Self { headless, navigation_timeout }
    }
}

impl Driver for ChromeDriver {
    fn open(&self, proxy: Option<&str>) -> Result<Box<dyn PageSession>, ScrapeError> {
        let args = [OsStr::new("--disable-blink-features=AutomationControlled")];
        let options = LaunchOptions::default_builder()
            .headless(self.headless)
            .proxy_server(proxy)
            .args(args.to_vec())
            .idle_browser_timeout(self.navigation_timeout * 4)
            .build()
            .map_err(|e| ScrapeError::Browser(format!("launch options: {e}")))?;

        debug!(proxy = proxy.unwrap_or("None"), headless = self.headless, "Launching browser");
        let browser = Browser::new(options).map_err(|e| ScrapeError::Browser(e.to_string()))?;
        let tab = browser.new_tab().map_err(|e| ScrapeError::Browser(e.to_string()))?;
        tab.set_default_timeout(self.navigation_timeout);

        Ok(Box::new(ChromePage { _browser: browser, tab }))
    }
}

/// Holds the browser so the Chrome process lives exactly as long as the page.
struct ChromePage {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromePage {
    fn eval(&self, js: &str) -> Result<Option<serde_json::Value>, ScrapeError> {
        self.tab
            .evaluate(js, false)
            .map(|obj| obj.value)
            .map_err(|e| ScrapeError::Browser(format!("evaluate: {e}")))
    }
}

impl PageSession for ChromePage {
    fn navigate(&mut self, url: &str) -> Result<(), ScrapeError> {
        let nav_err = |e: &dyn std::fmt::Display| ScrapeError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        };
        self.tab.navigate_to(url).map_err(|e| nav_err(&e))?;
        self.tab.wait_until_navigated().map_err(|e| nav_err(&e))?;
        Ok(())
    }

    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<bool, ScrapeError> {
        Ok(self.tab.wait_for_element_with_custom_timeout(selector, timeout).is_ok())
    }

    fn click(&mut self, selector: &str) -> Result<(), ScrapeError> {
        let el = self
            .tab
            .find_element(selector)
            .map_err(|e| ScrapeError::Browser(format!("find {selector}: {e}")))?;
        el.click()
            .map_err(|e| ScrapeError::Browser(format!("click {selector}: {e}")))?;
        Ok(())
    }

    fn title(&mut self) -> Result<String, ScrapeError> {
        self.tab
            .get_title()
            .map_err(|e| ScrapeError::Browser(format!("title: {e}")))
    }

    fn query(&mut self, selector: &str) -> Result<Vec<Node>, ScrapeError> {
        let value = self.eval(&snapshot_script(selector, SNAPSHOT_DEPTH))?;
        let json = match value {
            Some(serde_json::Value::String(s)) => s,
            _ => return Ok(Vec::new()),
        };
        serde_json::from_str(&json).map_err(|e| ScrapeError::Browser(format!("snapshot {selector}: {e}")))
    }

    fn scroll_to_bottom(&mut self) -> Result<(), ScrapeError> {
        self.eval("window.scrollBy(0, document.body.scrollHeight)")?;
        Ok(())
    }

    fn page_height(&mut self) -> Result<u64, ScrapeError> {
        let v = self.eval("document.body.scrollHeight")?;
        Ok(v.and_then(|v| v.as_f64()).map(|h| h.max(0.0) as u64).unwrap_or(0))
    }
}

const SNAPSHOT_DEPTH: u32 = 4;

/// JS returning a JSON string of `Node`s for every element matching `selector`.
fn snapshot_script(selector: &str, depth: u32) -> String {
    // serde_json string escaping is valid JS string-literal escaping
    let sel = serde_json::Value::String(selector.to_string()).to_string();
    format!(
        r#"(() => {{
    const snap = (el, depth) => ({{
        tag: el.tagName.toLowerCase(),
        text: (el.innerText || el.textContent || '').trim(),
        attrs: Object.fromEntries(Array.from(el.attributes).map(a => [a.name, a.value])),
        children: depth > 0 ? Array.from(el.children).map(c => snap(c, depth - 1)) : [],
    }});
    return JSON.stringify(Array.from(document.querySelectorAll({sel})).map(e => snap(e, {depth})));
}})()"#
    )
}
