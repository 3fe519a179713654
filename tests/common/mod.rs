// tests/common/mod.rs
//
// Scripted stand-ins for the browser, the LLM and the website fetch, shared
// by the integration tests.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use lead_scrape::{
    browser::{Driver, Node, PageSession},
    config::consts::*,
    enrich::{Enricher, WebsiteFetcher},
    error::{LlmError, ScrapeError},
    llm::Llm,
    retry::{RetryPolicy, Sleeper},
};

pub fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("lead_scrape_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

/* ---------------- DOM builders ---------------- */

pub fn el(tag: &str, text: &str, attrs: &[(&str, &str)], children: Vec<Node>) -> Node {
    Node {
        tag: tag.to_string(),
        text: text.to_string(),
        attrs: attrs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        children,
    }
}

pub fn page_url(slug: &str) -> String {
    format!("{SITE_ORIGIN}/{slug}")
}

/// Advertiser anchor as it shows up in the result list.
pub fn ad_link(href: &str, name: &str) -> Node {
    let class = format!("x1i10hfl {ADVERTISER_LINK_MARKER}");
    el("a", name, &[("href", href), ("class", class.as_str())], vec![])
}

pub fn icon_row(icon: &str, value: &str) -> Node {
    let src = format!("https://static.xx.fbcdn.net/rsrc.php/v4/{icon}");
    el("div", value, &[], vec![
        el("div", "", &[], vec![el("img", "", &[("src", src.as_str())], vec![])]),
        el("div", value, &[], vec![el("span", value, &[], vec![])]),
    ])
}

/* ---------------- fake site ---------------- */

#[derive(Clone, Debug, Default)]
pub struct FakeProfile {
    pub title: String,
    /// Intro fragments for the pattern strategy.
    pub intro: Vec<String>,
    /// (icon, value) rows for the icon strategy.
    pub rows: Vec<(&'static str, String)>,
    pub description: String,
    pub followers: String,
    pub login_popup: bool,
    /// Navigation fails.
    pub broken: bool,
    /// Body never shows up.
    pub blank: bool,
}

#[derive(Debug, Default)]
pub struct FakeSite {
    /// Result-list snapshots, one per scroll round; the last one repeats.
    pub listing: Vec<Vec<Node>>,
    pub profiles: HashMap<String, FakeProfile>,
    /// Fail the search navigation itself.
    pub search_down: bool,
    /// Scroll round (1-based) whose link query errors.
    pub listing_fails_at: Option<usize>,
}

#[derive(Clone, Default)]
pub struct FakeDriver {
    pub site: Arc<FakeSite>,
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
    pub visited: Arc<Mutex<Vec<String>>>,
}

impl FakeDriver {
    pub fn new(site: FakeSite) -> Self {
        Self { site: Arc::new(site), ..Self::default() }
    }

    pub fn opened(&self) -> usize { self.opened.load(Ordering::SeqCst) }
    pub fn closed(&self) -> usize { self.closed.load(Ordering::SeqCst) }
    pub fn visited(&self) -> Vec<String> { self.visited.lock().unwrap().clone() }
}

impl Driver for FakeDriver {
    fn open(&self, _proxy: Option<&str>) -> Result<Box<dyn PageSession>, ScrapeError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePage {
            site: self.site.clone(),
            closed: self.closed.clone(),
            visited: self.visited.clone(),
            url: String::new(),
            round: 0,
        }))
    }
}

pub struct FakePage {
    site: Arc<FakeSite>,
    closed: Arc<AtomicUsize>,
    visited: Arc<Mutex<Vec<String>>>,
    url: String,
    round: usize,
}

impl FakePage {
    fn on_listing(&self) -> bool {
        self.url.contains("/ads/library/")
    }

    fn profile(&self) -> Option<&FakeProfile> {
        self.site.profiles.get(&self.url)
    }

    fn snapshot(&self) -> usize {
        self.round.min(self.site.listing.len().saturating_sub(1))
    }
}

impl Drop for FakePage {
    fn drop(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

impl PageSession for FakePage {
    fn navigate(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.visited.lock().unwrap().push(url.to_string());
        let fail = if url.contains("/ads/library/") {
            self.site.search_down
        } else {
            self.site.profiles.get(url).map(|p| p.broken).unwrap_or(true)
        };
        if fail {
            return Err(ScrapeError::Navigation { url: url.to_string(), reason: "net::ERR_TIMED_OUT".into() });
        }
        self.url = url.to_string();
        Ok(())
    }

    fn wait_for(&mut self, selector: &str, _timeout: Duration) -> Result<bool, ScrapeError> {
        let Some(p) = self.profile() else { return Ok(self.on_listing()) };
        Ok(match selector {
            "body" => !p.blank,
            LOGIN_MODAL_CLOSE_SELECTOR => p.login_popup,
            _ => false,
        })
    }

    fn click(&mut self, _selector: &str) -> Result<(), ScrapeError> {
        Ok(())
    }

    fn title(&mut self) -> Result<String, ScrapeError> {
        Ok(self.profile().map(|p| p.title.clone()).unwrap_or_default())
    }

    fn query(&mut self, selector: &str) -> Result<Vec<Node>, ScrapeError> {
        if self.on_listing() {
            if selector != ADVERTISER_LINK_SELECTOR {
                return Ok(Vec::new());
            }
            if self.site.listing_fails_at == Some(self.round + 1) {
                return Err(ScrapeError::Browser("target closed".into()));
            }
            return Ok(self.site.listing.get(self.snapshot()).cloned().unwrap_or_default());
        }

        let Some(p) = self.profile() else { return Ok(Vec::new()) };
        let nodes = match selector {
            INTRO_TEXT_SELECTOR => p.intro.iter().map(|t| el("span", t, &[], vec![])).collect(),
            CONTACT_ROW_SELECTOR => p.rows.iter().map(|(icon, v)| icon_row(icon, v)).collect(),
            DESCRIPTION_SELECTOR if !p.description.is_empty() => vec![el("span", &p.description, &[], vec![])],
            FOLLOWERS_SELECTOR if !p.followers.is_empty() => {
                vec![el("span", "Page · Education", &[], vec![]), el("span", &p.followers, &[], vec![])]
            }
            _ => Vec::new(),
        };
        Ok(nodes)
    }

    fn scroll_to_bottom(&mut self) -> Result<(), ScrapeError> {
        self.round += 1;
        Ok(())
    }

    /// Grows with every snapshot, flat once the last one is reached.
    fn page_height(&mut self) -> Result<u64, ScrapeError> {
        Ok(1_000 * (self.snapshot() as u64 + 1))
    }

    fn settle(&mut self, _delay: Duration) {}
}

/* ---------------- LLM + website ---------------- */

/// Which prompt a call used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ask {
    Classify,
    Summary,
    Insight,
}

fn ask_of(system: &str) -> Ask {
    if system.contains("classification") {
        Ask::Classify
    } else if system.contains("strategist") {
        Ask::Insight
    } else {
        Ask::Summary
    }
}

type Reply = dyn Fn(Ask, &str) -> Result<String, LlmError> + Send + Sync;

#[derive(Clone)]
pub struct FakeLlm {
    reply: Arc<Reply>,
    pub calls: Arc<Mutex<Vec<(Ask, String)>>>,
}

impl FakeLlm {
    pub fn new(reply: impl Fn(Ask, &str) -> Result<String, LlmError> + Send + Sync + 'static) -> Self {
        Self { reply: Arc::new(reply), calls: Arc::default() }
    }

    /// Category from the text's first word, canned summary and insight.
    pub fn canned() -> Self {
        Self::new(|ask, user| {
            Ok(match ask {
                Ask::Classify if user.to_lowercase().contains("tuition") => "Edutech".to_string(),
                Ask::Classify if user.to_lowercase().contains("pharma") => "Pharma and Healthcare".to_string(),
                Ask::Classify => "Other".to_string(),
                Ask::Summary => "A coaching centre.".to_string(),
                Ask::Insight => "Pitch admissions tooling.".to_string(),
            })
        })
    }

    pub fn calls(&self) -> Vec<(Ask, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, ask: Ask) -> usize {
        self.calls().iter().filter(|(a, _)| *a == ask).count()
    }
}

impl Llm for FakeLlm {
    fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let ask = ask_of(system);
        self.calls.lock().unwrap().push((ask, user.to_string()));
        (self.reply)(ask, user)
    }
}

#[derive(Clone, Default)]
pub struct FakeFetcher {
    pub pages: Arc<HashMap<String, String>>,
    pub fetched: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub fn with(pages: &[(&str, &str)]) -> Self {
        let pages = pages.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Self { pages: Arc::new(pages), fetched: Arc::default() }
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl WebsiteFetcher for FakeFetcher {
    fn fetch_text(&self, url: &str) -> String {
        self.fetched.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().unwrap_or_default()
    }
}

/// Records requested waits instead of sleeping.
#[derive(Clone, Default)]
pub struct FakeSleeper {
    pub slept: Arc<Mutex<Vec<Duration>>>,
}

impl FakeSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

impl Sleeper for FakeSleeper {
    fn sleep(&self, d: Duration) {
        self.slept.lock().unwrap().push(d);
    }
}

pub fn enricher(llm: &FakeLlm, fetcher: &FakeFetcher) -> Enricher {
    enricher_with_sleeper(llm, fetcher, &FakeSleeper::default())
}

pub fn enricher_with_sleeper(llm: &FakeLlm, fetcher: &FakeFetcher, sleeper: &FakeSleeper) -> Enricher {
    Enricher::new(Box::new(llm.clone()), Box::new(fetcher.clone()))
        .with_retry(RetryPolicy::default(), Box::new(sleeper.clone()))
}
