// src/enrich.rs
//
// Classification and website-based enrichment. Every LLM call goes through
// the retry policy; everything here is best-effort and never fails a record.

use std::time::Duration;

use reqwest::blocking::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use crate::{
    config::consts::*,
    core::sanitize::{normalize_ws, truncate_chars},
    error::LlmError,
    lead::{Category, Enrichment, ProfileRecord},
    llm::Llm,
    retry::{RetryPolicy, Sleeper, ThreadSleeper},
};

const CLASSIFY_PROMPT: &str = "You are a lead classification assistant for B2B data enrichment.
Your task is to classify each company description into **one** of the following categories:

- Edutech
- Pharma and Healthcare
- Ecommerce
- IT and Tech
- Logistics
- Professional Services
- Other

Only return the category name. Do not explain.";

const SUMMARY_PROMPT: &str = "You summarize company websites for a B2B sales team.
Given the raw text of a company's website, write a short factual summary (at most 4 sentences)
of what the company does, who it serves, and what it sells. Do not invent details.";

const INSIGHT_PROMPT: &str = "You are a B2B sales strategist.
Given a summary of a company, write one or two sentences on how to pitch to this company
and which of its needs a sales rep should lead with. Be concrete and brief.";

/* ---------------- website text ---------------- */

pub trait WebsiteFetcher: Send + Sync {
    /// Visible text of the page, capped. Empty on any failure.
    fn fetch_text(&self, url: &str) -> String;
}

pub struct HttpFetcher {
    client: Option<Client>,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(WEBSITE_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build();
        match client {
            Ok(c) => Self { client: Some(c) },
            Err(e) => {
                warn!("Website fetching disabled: {e}");
                Self { client: None }
            }
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self { Self::new() }
}

impl WebsiteFetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> String {
        let Some(client) = &self.client else { return s!() };
        let url = with_scheme(url);
        debug!("Fetching website {url}");

        let html = match client.get(&url).send().and_then(|r| r.error_for_status()).and_then(|r| r.text()) {
            Ok(h) => h,
            Err(e) => {
                warn!("Website fetch failed for {url}: {e}");
                return s!();
            }
        };
        s!(truncate_chars(&body_text(&html), WEBSITE_TEXT_CAP))
    }
}

/// Bare domains get `https://`.
pub fn with_scheme(url: &str) -> String {
    let u = url.trim();
    if u.starts_with("http://") || u.starts_with("https://") {
        s!(u)
    } else {
        format!("https://{u}")
    }
}

/// Whitespace-normalized text of `<body>`, without script/style contents.
pub fn body_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let Ok(sel) = Selector::parse("body") else { return s!() };
    let Some(body) = doc.select(&sel).next() else { return s!() };

    let mut parts: Vec<&str> = Vec::new();
    for node in body.descendants() {
        let Some(text) = node.value().as_text() else { continue };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element())
            .map(|e| matches!(e.name(), "script" | "style" | "noscript" | "template"))
            .unwrap_or(false);
        if !hidden {
            parts.push(&**text);
        }
    }
    normalize_ws(&parts.join(" "))
}

/* ---------------- enricher ---------------- */

pub struct Enricher {
    llm: Box<dyn Llm>,
    fetcher: Box<dyn WebsiteFetcher>,
    retry: RetryPolicy,
    sleeper: Box<dyn Sleeper>,
}

impl Enricher {
    pub fn new(llm: Box<dyn Llm>, fetcher: Box<dyn WebsiteFetcher>) -> Self {
        Self { llm, fetcher, retry: RetryPolicy::default(), sleeper: Box::new(ThreadSleeper) }
    }

    pub fn with_retry(mut self, retry: RetryPolicy, sleeper: Box<dyn Sleeper>) -> Self {
        self.retry = retry;
        self.sleeper = sleeper;
        self
    }

    fn ask(&self, what: &str, system: &str, user: &str) -> Result<String, LlmError> {
        self.retry.run(self.sleeper.as_ref(), what, || self.llm.complete(system, user))
    }

    pub fn classify(&self, text: &str) -> Result<Category, LlmError> {
        self.ask("Classification", CLASSIFY_PROMPT, text).map(|a| Category::from_label(&a))
    }

    pub fn summarize_website(&self, raw_page_text: &str) -> Result<String, LlmError> {
        self.ask("Website summary", SUMMARY_PROMPT, raw_page_text)
    }

    pub fn generate_insight(&self, summary: &str) -> Result<String, LlmError> {
        self.ask("Sales insight", INSIGHT_PROMPT, summary)
    }

    pub fn enrich(&self, profile: &ProfileRecord) -> Enrichment {
        let category = match self.classify(profile.classification_text()) {
            Ok(c) => c,
            Err(e) => {
                warn!("Classification failed for {}: {e}; using Other", profile.identifier);
                Category::Other
            }
        };
        info!("Classified {} as {category}", profile.display_name);

        let mut out = Enrichment { category, ..Enrichment::default() };
        if profile.description.trim().is_empty() {
            debug!("No description for {}; skipping summary and insight", profile.identifier);
            return out;
        }
        let Some(site) = profile.primary_website() else {
            debug!("No website for {}; skipping summary and insight", profile.identifier);
            return out;
        };

        let text = self.fetcher.fetch_text(site);
        if text.is_empty() {
            return out;
        }

        out.website_summary = self.summarize_website(&text).unwrap_or_else(|e| {
            warn!("Website summary failed for {site}: {e}");
            s!()
        });
        if !out.website_summary.is_empty() {
            out.sales_insight = self.generate_insight(&out.website_summary).unwrap_or_else(|e| {
                warn!("Sales insight failed for {site}: {e}");
                s!()
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_added_only_when_missing() {
        assert_eq!(with_scheme("acme.in"), "https://acme.in");
        assert_eq!(with_scheme(" http://acme.in "), "http://acme.in");
    }

    #[test]
    fn body_text_skips_scripts_and_head() {
        let html = "<html><head><title>T</title><style>p{}</style></head>\
                    <body><h1>Acme  Tutors</h1><script>var x=1;</script>\
                    <p>Coaching\n for <b>NEET</b></p></body></html>";
        assert_eq!(body_text(html), "Acme Tutors Coaching for NEET");
    }

    #[test]
    fn body_text_of_garbage_is_empty_or_plain() {
        assert_eq!(body_text(""), "");
        assert_eq!(body_text("just text"), "just text");
    }
}
