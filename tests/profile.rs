// tests/profile.rs
mod common;

use std::collections::HashMap;

use common::{page_url, FakeDriver, FakeProfile, FakeSite};
use lead_scrape::{
    config::{
        consts::*,
        options::{Strategy, Timings},
    },
    error::SkipReason,
    lead::LinkRecord,
    scrape::{extractor_for, ProfileScraper},
};

fn site() -> FakeSite {
    let mut profiles = HashMap::new();
    profiles.insert(page_url("acme"), FakeProfile {
        title: "Acme Tutors | Facebook".into(),
        intro: vec!["98765 43210".into(), "Mail hello@acme.in".into(), "acme.in".into(), "Page · Education".into()],
        rows: vec![
            (ICON_PHONE, "098765 43210".into()),
            (ICON_WHATSAPP, "+91 98765 43210".into()),
            (ICON_EMAIL, "hello@acme.in".into()),
            (ICON_WEBSITE, "acme.in".into()),
            (ICON_ADDRESS, "MG Road, Kochi".into()),
        ],
        description: "Tuition centre for NEET".into(),
        followers: "1.2K followers".into(),
        login_popup: true,
        ..FakeProfile::default()
    });
    profiles.insert(page_url("untitled"), FakeProfile { rows: vec![(ICON_EMAIL, "x@y.in".into())], ..FakeProfile::default() });
    profiles.insert(page_url("down"), FakeProfile { broken: true, ..FakeProfile::default() });
    profiles.insert(page_url("blank"), FakeProfile { blank: true, ..FakeProfile::default() });
    FakeSite { profiles, ..FakeSite::default() }
}

fn link(slug: &str, name: &str) -> LinkRecord {
    LinkRecord { display_name: name.into(), identifier: page_url(slug) }
}

#[test]
fn icon_strategy_reads_every_channel() {
    let driver = FakeDriver::new(site());
    let timings = Timings::default();
    let extractor = extractor_for(Strategy::IconAnchored);
    let scraper = ProfileScraper { driver: &driver, proxy: None, timings: &timings, extractor: extractor.as_ref() };

    let r = scraper.enrich_profile(&link("acme", "Acme")).unwrap();
    assert_eq!(r.display_name, "Acme Tutors");
    assert_eq!(r.identifier, page_url("acme"));
    assert_eq!(r.phone, "098765 43210");
    assert_eq!(r.whatsapp, "+91 98765 43210");
    assert_eq!(r.email, "hello@acme.in");
    assert_eq!(r.website, "acme.in");
    assert_eq!(r.address, "MG Road, Kochi");
    assert_eq!(r.description, "Tuition centre for NEET");
    assert_eq!(r.followers, "1.2K followers");
    assert_eq!(driver.closed(), 1);
}

#[test]
fn pattern_strategy_classifies_intro_fragments() {
    let driver = FakeDriver::new(site());
    let timings = Timings::default();
    let extractor = extractor_for(Strategy::Pattern);
    let scraper = ProfileScraper { driver: &driver, proxy: Some("1.2.3.4:80"), timings: &timings, extractor: extractor.as_ref() };

    let r = scraper.enrich_profile(&link("acme", "Acme")).unwrap();
    assert_eq!(r.phone, "98765 43210");
    assert_eq!(r.email, "hello@acme.in");
    assert_eq!(r.website, "acme.in");
    assert_eq!(r.whatsapp, "");
    assert_eq!(r.address, "");
}

#[test]
fn empty_title_falls_back_to_discovered_name() {
    let driver = FakeDriver::new(site());
    let timings = Timings::default();
    let extractor = extractor_for(Strategy::IconAnchored);
    let scraper = ProfileScraper { driver: &driver, proxy: None, timings: &timings, extractor: extractor.as_ref() };

    let r = scraper.enrich_profile(&link("untitled", "From Listing")).unwrap();
    assert_eq!(r.display_name, "From Listing");
    assert_eq!(r.email, "x@y.in");
    assert_eq!(r.followers, "");
}

#[test]
fn failures_skip_the_page_and_release_the_session() {
    let driver = FakeDriver::new(site());
    let timings = Timings::default();
    let extractor = extractor_for(Strategy::IconAnchored);
    let scraper = ProfileScraper { driver: &driver, proxy: None, timings: &timings, extractor: extractor.as_ref() };

    assert!(matches!(scraper.enrich_profile(&link("down", "Down")), Err(SkipReason::Navigation(_))));
    assert!(matches!(scraper.enrich_profile(&link("blank", "Blank")), Err(SkipReason::NotRendered(_))));
    assert!(matches!(scraper.enrich_profile(&link("unknown", "?")), Err(SkipReason::Navigation(_))));

    assert_eq!(driver.opened(), 3);
    assert_eq!(driver.closed(), 3);
}
