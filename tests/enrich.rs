// tests/enrich.rs
mod common;

use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use common::{enricher, enricher_with_sleeper, Ask, FakeFetcher, FakeLlm, FakeSleeper};
use lead_scrape::{
    error::LlmError,
    lead::{Category, ProfileRecord},
};

fn acme() -> ProfileRecord {
    let mut p = ProfileRecord::new("https://www.facebook.com/acme", "Acme Tutors");
    p.phone = "9876543210".into();
    p.website = "acme.in, acme-tutors.com".into();
    p.description = "Tuition centre for NEET aspirants".into();
    p
}

#[test]
fn full_enrichment_uses_description_and_first_website() {
    let llm = FakeLlm::canned();
    let fetcher = FakeFetcher::with(&[("acme.in", "Acme Tutors coaches NEET students in Kochi")]);
    let e = enricher(&llm, &fetcher).enrich(&acme());

    assert_eq!(e.category, Category::Edutech);
    assert_eq!(e.website_summary, "A coaching centre.");
    assert_eq!(e.sales_insight, "Pitch admissions tooling.");
    assert_eq!(fetcher.fetched(), vec!["acme.in"]);

    let calls = llm.calls();
    assert_eq!(calls[0], (Ask::Classify, "Tuition centre for NEET aspirants".to_string()));
    assert_eq!(calls[1], (Ask::Summary, "Acme Tutors coaches NEET students in Kochi".to_string()));
    assert_eq!(calls[2], (Ask::Insight, "A coaching centre.".to_string()));
}

#[test]
fn without_description_name_is_classified_and_nothing_fetched() {
    let llm = FakeLlm::canned();
    let fetcher = FakeFetcher::with(&[("acme.in", "text")]);
    let mut p = acme();
    p.description.clear();
    p.display_name = "Zen Pharma".into();

    let e = enricher(&llm, &fetcher).enrich(&p);
    assert_eq!(e.category, Category::PharmaHealthcare);
    assert_eq!(e.website_summary, "");
    assert_eq!(e.sales_insight, "");
    assert!(fetcher.fetched().is_empty());
    assert_eq!(llm.calls().len(), 1);
}

#[test]
fn without_website_or_site_text_only_classification_runs() {
    let llm = FakeLlm::canned();
    let fetcher = FakeFetcher::default();

    let mut no_site = acme();
    no_site.website.clear();
    let e = enricher(&llm, &fetcher).enrich(&no_site);
    assert_eq!(e.website_summary, "");
    assert!(fetcher.fetched().is_empty());

    // site listed but fetch came back empty
    let e = enricher(&llm, &fetcher).enrich(&acme());
    assert_eq!(e.website_summary, "");
    assert_eq!(e.sales_insight, "");
    assert_eq!(fetcher.fetched(), vec!["acme.in"]);
    assert_eq!(llm.count(Ask::Summary), 0);
}

#[test]
fn permanent_classification_error_falls_back_to_other() {
    let llm = FakeLlm::new(|ask, _| match ask {
        Ask::Classify => Err(LlmError::Api { status: 401, body: "bad key".into() }),
        _ => Ok("x".into()),
    });
    let sleeper = FakeSleeper::default();
    let e = enricher_with_sleeper(&llm, &FakeFetcher::default(), &sleeper).enrich(&acme());

    assert_eq!(e.category, Category::Other);
    assert_eq!(llm.count(Ask::Classify), 1);
    assert!(sleeper.slept().is_empty());
}

#[test]
fn transient_errors_are_retried_with_bounded_backoff() {
    let failures = AtomicUsize::new(0);
    let llm = FakeLlm::new(move |ask, _| match ask {
        Ask::Classify if failures.fetch_add(1, Ordering::SeqCst) < 2 => Err(LlmError::Network("reset".into())),
        Ask::Classify => Ok("Logistics".into()),
        _ => Ok("x".into()),
    });
    let sleeper = FakeSleeper::default();
    let e = enricher_with_sleeper(&llm, &FakeFetcher::default(), &sleeper).enrich(&acme());

    assert_eq!(e.category, Category::Logistics);
    assert_eq!(llm.count(Ask::Classify), 3);

    let waits = sleeper.slept();
    assert_eq!(waits.len(), 2);
    assert!(waits[0] >= Duration::from_secs(1) && waits[0] <= Duration::from_secs(1));
    assert!(waits[1] >= Duration::from_secs(1) && waits[1] <= Duration::from_secs(2));
}

#[test]
fn retries_stop_after_max_attempts() {
    let llm = FakeLlm::new(|_, _| Err(LlmError::Api { status: 503, body: "busy".into() }));
    let sleeper = FakeSleeper::default();
    let e = enricher_with_sleeper(&llm, &FakeFetcher::with(&[("acme.in", "site")]), &sleeper).enrich(&acme());

    assert_eq!(e.category, Category::Other);
    assert_eq!(e.website_summary, "");
    assert_eq!(e.sales_insight, "");
    // classify 3 + summary 3, no insight for an empty summary
    assert_eq!(llm.count(Ask::Classify), 3);
    assert_eq!(llm.count(Ask::Summary), 3);
    assert_eq!(llm.count(Ask::Insight), 0);
    assert_eq!(sleeper.slept().len(), 4);
}
