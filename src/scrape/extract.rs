// src/scrape/extract.rs
//
// Contact extraction from a rendered page. Two strategies:
//   Pattern      : classify intro text fragments by their shape
//   IconAnchored : read the value next to each known contact icon
// Both fill the same `Contacts` accumulator.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{
    browser::{Node, PageSession},
    config::{consts::*, options::Strategy},
    error::ScrapeError,
    lead::ProfileRecord,
};

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s]{7,}$").expect("phone regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+").expect("email regex")
});

static DOMAIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("domain regex"));

/* ---------------- accumulator ---------------- */

/// Insertion-ordered set of non-empty values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueSet(Vec<String>);

impl ValueSet {
    pub fn insert(&mut self, value: &str) -> bool {
        let v = value.trim();
        if v.is_empty() || self.0.iter().any(|x| x == v) {
            return false;
        }
        self.0.push(s!(v));
        true
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn joined(&self) -> String {
        self.0.join(MULTI_VALUE_SEP)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contacts {
    pub phone: ValueSet,
    pub whatsapp: ValueSet,
    pub email: ValueSet,
    pub website: ValueSet,
    pub address: ValueSet,
    pub description: String,
}

impl Contacts {
    pub fn apply_to(&self, r: &mut ProfileRecord) {
        r.phone = self.phone.joined();
        r.whatsapp = self.whatsapp.joined();
        r.email = self.email.joined();
        r.website = self.website.joined();
        r.address = self.address.joined();
        r.description = self.description.clone();
    }
}

pub trait ContactExtractor {
    fn extract(&self, page: &mut dyn PageSession) -> Result<Contacts, ScrapeError>;
}

pub fn extractor_for(strategy: Strategy) -> Box<dyn ContactExtractor + Send + Sync> {
    match strategy {
        Strategy::Pattern => Box::new(PatternExtractor),
        Strategy::IconAnchored => Box::new(IconExtractor),
    }
}

/* ---------------- pattern-based ---------------- */

pub struct PatternExtractor;

impl ContactExtractor for PatternExtractor {
    fn extract(&self, page: &mut dyn PageSession) -> Result<Contacts, ScrapeError> {
        let nodes = page.query(INTRO_TEXT_SELECTOR)?;
        debug!("Found {} intro section span elements.", nodes.len());
        let texts: Vec<&str> = nodes.iter().map(|n| n.text.as_str()).collect();
        Ok(classify_fragments(&texts))
    }
}

/// Sort intro fragments into phone / email / website by shape.
/// A fragment may land in more than one bucket.
pub fn classify_fragments<S: AsRef<str>>(fragments: &[S]) -> Contacts {
    let mut c = Contacts::default();
    for frag in fragments {
        let text = frag.as_ref().trim();
        if text.is_empty() {
            continue;
        }
        if is_phone(text) {
            c.phone.insert(text);
        }
        if let Some(m) = EMAIL_RE.find(text) {
            c.email.insert(m.as_str());
        }
        if is_website(text) {
            c.website.insert(text);
        }
    }
    c
}

pub fn is_phone(text: &str) -> bool {
    PHONE_RE.is_match(text)
}

/// Domain-shaped and not pointing back at the host site.
pub fn is_website(text: &str) -> bool {
    DOMAIN_RE.is_match(text) && !text.to_ascii_lowercase().contains(SITE_DOMAIN)
}

/* ---------------- icon-anchored ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactKind { Phone, WhatsApp, Email, Website, Address }

const ICONS: &[(&str, ContactKind)] = &[
    (ICON_PHONE, ContactKind::Phone),
    (ICON_WHATSAPP, ContactKind::WhatsApp),
    (ICON_EMAIL, ContactKind::Email),
    (ICON_WEBSITE, ContactKind::Website),
    (ICON_ADDRESS, ContactKind::Address),
];

pub fn icon_kind(src: &str) -> Option<ContactKind> {
    ICONS.iter().find(|(needle, _)| src.contains(needle)).map(|(_, k)| *k)
}

pub struct IconExtractor;

impl ContactExtractor for IconExtractor {
    fn extract(&self, page: &mut dyn PageSession) -> Result<Contacts, ScrapeError> {
        let rows = page.query(CONTACT_ROW_SELECTOR)?;
        debug!("Found {} contact rows.", rows.len());
        let mut c = read_icon_rows(&rows);

        c.description = page
            .query(DESCRIPTION_SELECTOR)?
            .iter()
            .map(|n| n.text.trim())
            .find(|t| !t.is_empty())
            .map(String::from)
            .unwrap_or_default();
        Ok(c)
    }
}

/// For each row: locate the child holding a known icon, then take the text
/// of the sibling after it (or the first other sibling with text).
pub fn read_icon_rows(rows: &[Node]) -> Contacts {
    let mut c = Contacts::default();

    for row in rows {
        let Some((icon_ix, kind)) = row.children.iter().enumerate().find_map(|(i, child)| {
            child
                .descendants()
                .into_iter()
                .filter(|n| n.tag == "img")
                .find_map(|img| img.attr("src").and_then(icon_kind))
                .map(|k| (i, k))
        }) else {
            continue;
        };

        let value = row
            .children
            .get(icon_ix + 1)
            .map(|n| n.text.trim())
            .filter(|t| !t.is_empty())
            .or_else(|| {
                row.children
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != icon_ix)
                    .map(|(_, n)| n.text.trim())
                    .find(|t| !t.is_empty())
            });

        let Some(value) = value else { continue };
        let bucket = match kind {
            ContactKind::Phone => &mut c.phone,
            ContactKind::WhatsApp => &mut c.whatsapp,
            ContactKind::Email => &mut c.email,
            ContactKind::Website => &mut c.website,
            ContactKind::Address => &mut c.address,
        };
        bucket.insert(value);
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn el(tag: &str, text: &str, attrs: &[(&str, &str)], children: Vec<Node>) -> Node {
        Node {
            tag: s!(tag),
            text: s!(text),
            attrs: attrs.iter().map(|(k, v)| (s!(*k), s!(*v))).collect::<HashMap<_, _>>(),
            children,
        }
    }

    fn icon_row(icon: &str, value: &str) -> Node {
        let src = format!("https://static.xx.fbcdn.net/rsrc.php/{icon}");
        el("div", value, &[], vec![
            el("div", "", &[], vec![el("img", "", &[("src", src.as_str())], vec![])]),
            el("div", value, &[], vec![el("span", value, &[], vec![])]),
        ])
    }

    #[test]
    fn fragments_are_sorted_by_shape() {
        let c = classify_fragments(&[
            "98765 43210",
            "Write to hello@acme.in today",
            "acme.in",
            "facebook.com/acme",
            "12345",
            "Page · Education",
        ]);
        assert_eq!(c.phone.joined(), "98765 43210");
        assert_eq!(c.email.joined(), "hello@acme.in");
        assert_eq!(c.website.joined(), "acme.in");
    }

    #[test]
    fn repeated_matches_are_deduplicated_in_order() {
        let c = classify_fragments(&["9876543210", "acme.in", "9876543210", "1122334455", "acme.in"]);
        assert_eq!(c.phone.joined(), "9876543210, 1122334455");
        assert_eq!(c.website.len(), 1);
    }

    #[test]
    fn website_excludes_host_domain() {
        assert!(is_website("acme-tutors.co"));
        assert!(!is_website("m.Facebook.com"));
        assert!(!is_website("not a domain"));
    }

    #[test]
    fn icon_rows_map_to_fields() {
        let rows = vec![
            icon_row(ICON_PHONE, "098765 43210"),
            icon_row(ICON_WHATSAPP, "+91 98765 43210"),
            icon_row(ICON_EMAIL, "info@acme.in"),
            icon_row(ICON_WEBSITE, "acme.in"),
            icon_row(ICON_ADDRESS, "12 MG Road, Kochi"),
            icon_row("unknown.png", "ignored"),
        ];
        let c = read_icon_rows(&rows);
        assert_eq!(c.phone.joined(), "098765 43210");
        assert_eq!(c.whatsapp.joined(), "+91 98765 43210");
        assert_eq!(c.email.joined(), "info@acme.in");
        assert_eq!(c.website.joined(), "acme.in");
        assert_eq!(c.address.joined(), "12 MG Road, Kochi");
    }

    #[test]
    fn icon_row_without_value_is_skipped() {
        let rows = vec![el("div", "", &[], vec![
            el("div", "", &[], vec![el("img", "", &[("src", ICON_EMAIL)], vec![])]),
        ])];
        assert!(read_icon_rows(&rows).email.is_empty());
    }

    #[test]
    fn contacts_apply_joins_values() {
        let mut c = Contacts::default();
        c.phone.insert("1");
        c.phone.insert("2");
        c.description = s!("Tuition centre");
        let mut r = ProfileRecord::new("id", "n");
        c.apply_to(&mut r);
        assert_eq!(r.phone, "1, 2");
        assert_eq!(r.description, "Tuition centre");
        assert_eq!(r.email, "");
    }
}
