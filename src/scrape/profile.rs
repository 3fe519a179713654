// src/scrape/profile.rs
//
// Per-page contact scrape. Each page gets its own browser session, which is
// dropped on every exit path.

use tracing::{debug, info, warn};

use crate::{
    browser::{Driver, PageSession},
    config::{consts::*, options::Timings},
    core::sanitize::strip_title_suffix,
    error::SkipReason,
    lead::{LinkRecord, ProfileRecord},
};

use super::extract::ContactExtractor;

pub struct ProfileScraper<'a> {
    pub driver: &'a dyn Driver,
    pub proxy: Option<&'a str>,
    pub timings: &'a Timings,
    pub extractor: &'a dyn ContactExtractor,
}

impl ProfileScraper<'_> {
    pub fn enrich_profile(&self, link: &LinkRecord) -> Result<ProfileRecord, SkipReason> {
        let url = link.identifier.as_str();
        info!("Navigating to {url} with proxy {}", self.proxy.unwrap_or("None"));

        let mut page = self
            .driver
            .open(self.proxy)
            .map_err(|e| SkipReason::Session(e.to_string()))?;
        let page = page.as_mut();

        page.navigate(url)?;
        if !page.wait_for("body", self.timings.body_wait)? {
            return Err(SkipReason::NotRendered(self.timings.body_wait));
        }

        self.close_login_popup(page);

        let title = match page.title() {
            Ok(t) => strip_title_suffix(&t, TITLE_SUFFIX),
            Err(e) => {
                debug!("No title for {url}: {e}");
                s!()
            }
        };
        let display_name = if title.is_empty() { link.display_name.clone() } else { title };

        let mut record = ProfileRecord::new(url, display_name);
        record.followers = fetch_followers(page);

        let contacts = self.extractor.extract(page)?;
        contacts.apply_to(&mut record);

        info!(
            "Scraped {}: phone='{}' whatsapp='{}' email='{}' website='{}' followers='{}'",
            record.display_name, record.phone, record.whatsapp, record.email, record.website, record.followers
        );
        debug!("Browser session closed.");
        Ok(record)
    }

    /// The login modal is optional; a timeout just means it never showed.
    fn close_login_popup(&self, page: &mut dyn PageSession) {
        debug!("Checking for login popup...");
        match page.wait_for(LOGIN_MODAL_CLOSE_SELECTOR, self.timings.modal_wait) {
            Ok(true) => match page.click(LOGIN_MODAL_CLOSE_SELECTOR) {
                Ok(()) => {
                    info!("Login popup closed.");
                    page.settle(self.timings.modal_dismiss);
                }
                Err(e) => warn!("Login popup present but not closable: {e}"),
            },
            Ok(false) => debug!("No login popup detected."),
            Err(e) => debug!("Login popup check failed: {e}"),
        }
    }
}

/// First text fragment mentioning followers, or empty.
fn fetch_followers(page: &mut dyn PageSession) -> String {
    match page.query(FOLLOWERS_SELECTOR) {
        Ok(nodes) => nodes
            .iter()
            .map(|n| n.text.trim())
            .find(|t| t.to_lowercase().contains(FOLLOWERS_NEEDLE))
            .map(String::from)
            .unwrap_or_default(),
        Err(e) => {
            debug!("Followers lookup failed: {e}");
            s!()
        }
    }
}
