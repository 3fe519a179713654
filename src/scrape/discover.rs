// src/scrape/discover.rs
//
// Link discovery: scroll the ad-library result list and yield each advertiser
// page not seen before. `Discovery` is a lazy iterator over one browser
// session; it cannot be restarted.

use std::{collections::{HashSet, VecDeque}, time::Duration};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::{
    browser::{Driver, Node, PageSession},
    config::{consts::*, options::{Country, Timings}},
    core::sanitize::{canonicalize_url, encode_query, normalize_ws},
    error::ScrapeError,
    lead::LinkRecord,
    store::FingerprintStore,
    worker::CancelToken,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub country: Country,
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
}

impl SearchQuery {
    pub fn url(&self) -> String {
        let mut url = format!(
            "{SITE_ORIGIN}/ads/library/?active_status=all&ad_type=all&country={}&q={}",
            self.country.code(),
            encode_query(&self.keyword),
        );
        if let Some(d) = self.date_min {
            url.push_str(&format!("&start_date[min]={}", d.format("%Y-%m-%d")));
        }
        if let Some(d) = self.date_max {
            url.push_str(&format!("&start_date[max]={}", d.format("%Y-%m-%d")));
        }
        url
    }
}

pub struct Discovery<'a> {
    page: Box<dyn PageSession>,
    known: &'a FingerprintStore,
    settle: Duration,
    cancel: CancelToken,

    seen: HashSet<String>,
    known_hits: HashSet<String>,
    pending: VecDeque<LinkRecord>,
    prev_height: u64,
    round: u32,
    done: bool,
}

impl<'a> Discovery<'a> {
    /// Open a session and load the result list. Failure here ends the run.
    pub fn start(
        driver: &dyn Driver,
        proxy: Option<&str>,
        query: &SearchQuery,
        known: &'a FingerprintStore,
        timings: &Timings,
        cancel: CancelToken,
    ) -> Result<Self, ScrapeError> {
        let url = query.url();
        info!("Searching ad library: {url} (proxy {})", proxy.unwrap_or("None"));

        let mut page = driver.open(proxy)?;
        page.navigate(&url)?;
        debug!("Waiting for page to load...");
        page.settle(timings.initial_render);

        Ok(Self {
            page,
            known,
            settle: timings.scroll_settle,
            cancel,
            seen: HashSet::new(),
            known_hits: HashSet::new(),
            pending: VecDeque::new(),
            prev_height: 0,
            round: 0,
            done: false,
        })
    }

    /// Distinct links skipped because they were already in the fingerprint store.
    pub fn skipped(&self) -> usize { self.known_hits.len() }

    pub fn found(&self) -> usize { self.seen.len() }

    /// One extract-scroll-compare cycle. `Ok(true)` when the page stopped growing.
    fn scroll_round(&mut self) -> Result<bool, ScrapeError> {
        self.round += 1;
        debug!("[Scroll {}] Collecting page links...", self.round);

        for node in self.page.query(ADVERTISER_LINK_SELECTOR)? {
            self.accept(&node);
        }

        self.page.scroll_to_bottom()?;
        self.page.settle(self.settle);
        let height = self.page.page_height()?;
        if height == self.prev_height {
            info!("Reached end of page.");
            return Ok(true);
        }
        self.prev_height = height;
        Ok(false)
    }

    fn accept(&mut self, node: &Node) {
        let Some(href) = node.attr("href") else { return };
        if !href.starts_with(SITE_ORIGIN) || !node.has_class(ADVERTISER_LINK_MARKER) {
            return;
        }

        let id = canonicalize_url(href);
        if self.seen.contains(&id) {
            return;
        }
        if self.known.is_known(&id) {
            self.known_hits.insert(id);
            return;
        }

        let name = normalize_ws(&node.text);
        self.seen.insert(id.clone());
        info!("[{}] New link: {id} | Name: {name}", self.seen.len());
        self.pending.push_back(LinkRecord { display_name: name, identifier: id });
    }

    fn finish(&mut self) {
        if !self.done {
            self.done = true;
            info!("Skipped {} already-known links.", self.skipped());
        }
    }
}

impl Iterator for Discovery<'_> {
    type Item = LinkRecord;

    fn next(&mut self) -> Option<LinkRecord> {
        loop {
            if let Some(link) = self.pending.pop_front() {
                return Some(link);
            }
            if self.done {
                return None;
            }
            if self.cancel.is_cancelled() {
                info!("Discovery cancelled after {} scroll rounds.", self.round);
                self.finish();
                continue;
            }
            match self.scroll_round() {
                Ok(true) => self.finish(),
                Ok(false) => {}
                Err(e) => {
                    warn!("Discovery stopped early: {e}");
                    self.finish();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_carries_country_keyword_and_bounds() {
        let q = SearchQuery {
            keyword: s!("Whatsapp Kerala"),
            country: Country::India,
            date_min: NaiveDate::from_ymd_opt(2025, 7, 1),
            date_max: None,
        };
        assert_eq!(
            q.url(),
            "https://www.facebook.com/ads/library/?active_status=all&ad_type=all&country=IN&q=Whatsapp%20Kerala&start_date[min]=2025-07-01"
        );

        let q = SearchQuery { date_min: None, date_max: NaiveDate::from_ymd_opt(2025, 7, 21), ..q };
        assert!(q.url().ends_with("&q=Whatsapp%20Kerala&start_date[max]=2025-07-21"));
    }
}
