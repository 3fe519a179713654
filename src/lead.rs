// src/lead.rs
//
// Records flowing through the pipeline, in creation order:
// LinkRecord (discovery) → ProfileRecord (profile scrape) → EnrichedRecord
// (classification + grade). Column names double as CSV headers so the master
// stores can be read back with serde.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{config::options::GradePolicy, grade};

/// Anything stored under a unique identifier (merge key).
pub trait Keyed {
    fn key(&self) -> &str;
}

/// One flat output row. The same headers/cells feed both CSV and XLSX.
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

/* ---------------- LinkRecord ---------------- */

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    #[serde(rename = "Page Name", default)]
    pub display_name: String,
    #[serde(rename = "Page Link")]
    pub identifier: String,
}

impl Keyed for LinkRecord {
    fn key(&self) -> &str { &self.identifier }
}

impl TableRow for LinkRecord {
    fn headers() -> &'static [&'static str] {
        &["Page Name", "Page Link"]
    }
    fn cells(&self) -> Vec<String> {
        cells![self.display_name, self.identifier]
    }
}

/* ---------------- ProfileRecord ---------------- */

/// Contact data scraped from one page. Empty string = absent.
/// Multi-valued fields hold a `", "`-joined, de-duplicated list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileRecord {
    pub identifier: String,
    pub display_name: String,
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub website: String,
    pub address: String,
    pub description: String,
    pub followers: String,
}

impl ProfileRecord {
    pub fn new(identifier: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    /// Text used to classify the business: description, else the page name.
    pub fn classification_text(&self) -> &str {
        if self.description.trim().is_empty() { &self.display_name } else { &self.description }
    }

    /// First website when several were found.
    pub fn primary_website(&self) -> Option<&str> {
        self.website
            .split(',')
            .map(str::trim)
            .find(|w| !w.is_empty())
    }
}

/* ---------------- Category ---------------- */

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Edutech,
    #[serde(rename = "Pharma and Healthcare")]
    PharmaHealthcare,
    Ecommerce,
    #[serde(rename = "IT and Tech")]
    ItTech,
    Logistics,
    #[serde(rename = "Professional Services")]
    ProfessionalServices,
    #[default]
    Other,
}

impl Category {
    pub const ALL: &'static [Category] = &[
        Category::Edutech,
        Category::PharmaHealthcare,
        Category::Ecommerce,
        Category::ItTech,
        Category::Logistics,
        Category::ProfessionalServices,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Edutech => "Edutech",
            Category::PharmaHealthcare => "Pharma and Healthcare",
            Category::Ecommerce => "Ecommerce",
            Category::ItTech => "IT and Tech",
            Category::Logistics => "Logistics",
            Category::ProfessionalServices => "Professional Services",
            Category::Other => "Other",
        }
    }

    /// Map a free-form model answer onto a label. Unknown answers are `Other`.
    pub fn from_label(answer: &str) -> Category {
        let norm = normalize_label(answer);
        if norm.is_empty() {
            return Category::Other;
        }
        Category::ALL
            .iter()
            .copied()
            .find(|c| normalize_label(c.label()) == norm)
            .or_else(|| {
                // Tolerate chatty answers like "Category: Logistics."
                Category::ALL
                    .iter()
                    .copied()
                    .filter(|c| *c != Category::Other)
                    .find(|c| norm.contains(&normalize_label(c.label())))
            })
            .unwrap_or(Category::Other)
    }
}

fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/* ---------------- Grade ---------------- */

/// Completeness grade. Ordering is A (best) → F.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade { A, B, C, D, E, F }

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        };
        f.write_str(c)
    }
}

/* ---------------- EnrichedRecord ---------------- */

/// LLM-derived fields for one profile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub category: Category,
    pub website_summary: String,
    pub sales_insight: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnrichedRecord {
    pub display_name: String,
    pub identifier: String,
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub website: String,
    pub address: String,
    pub description: String,
    pub followers: String,
    pub category: Category,
    pub website_summary: String,
    pub sales_insight: String,
    grade: Grade,
}

impl EnrichedRecord {
    /// Combine a profile with its enrichment. The grade is derived here and
    /// nowhere else; `None` means grade F (the record is not kept).
    pub fn build(profile: ProfileRecord, enrichment: Enrichment, policy: GradePolicy) -> Option<Self> {
        let grade = grade::grade_profile(&profile, policy);
        if grade == Grade::F {
            return None;
        }
        Some(Self {
            display_name: profile.display_name,
            identifier: profile.identifier,
            phone: profile.phone,
            whatsapp: profile.whatsapp,
            email: profile.email,
            website: profile.website,
            address: profile.address,
            description: profile.description,
            followers: profile.followers,
            category: enrichment.category,
            website_summary: enrichment.website_summary,
            sales_insight: enrichment.sales_insight,
            grade,
        })
    }

    pub fn grade(&self) -> Grade { self.grade }

    /// Presentation subset written to `leads_final`.
    pub fn summary(&self) -> LeadSummary<'_> { LeadSummary(self) }
}

impl Keyed for EnrichedRecord {
    fn key(&self) -> &str { &self.identifier }
}

impl TableRow for EnrichedRecord {
    fn headers() -> &'static [&'static str] {
        &[
            "page_name", "facebook_url", "phone_numbers", "whatsapp_numbers", "emails",
            "websites", "address", "description", "followers", "category",
            "website_summary", "sales_insight", "grade",
        ]
    }
    fn cells(&self) -> Vec<String> {
        cells![
            self.display_name, self.identifier, self.phone, self.whatsapp, self.email,
            self.website, self.address, self.description, self.followers, self.category,
            self.website_summary, self.sales_insight, self.grade,
        ]
    }
}

/* ---------------- StoredLead ---------------- */

/// A lead row as read back from a table on disk. The stored `grade` column
/// is not read: `into_lead` grades the row again from its contact fields.
#[derive(Clone, Debug, Deserialize)]
pub struct StoredLead {
    #[serde(rename = "page_name", default)]
    pub display_name: String,
    #[serde(rename = "facebook_url")]
    pub identifier: String,
    #[serde(rename = "phone_numbers", default)]
    pub phone: String,
    #[serde(rename = "whatsapp_numbers", default)]
    pub whatsapp: String,
    #[serde(rename = "emails", default)]
    pub email: String,
    #[serde(rename = "websites", default)]
    pub website: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub followers: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub website_summary: String,
    #[serde(default)]
    pub sales_insight: String,
}

impl StoredLead {
    /// Rebuild the record through the grader. `None` for rows that grade F.
    pub fn into_lead(self, policy: GradePolicy) -> Option<EnrichedRecord> {
        let profile = ProfileRecord {
            identifier: self.identifier,
            display_name: self.display_name,
            phone: self.phone,
            whatsapp: self.whatsapp,
            email: self.email,
            website: self.website,
            address: self.address,
            description: self.description,
            followers: self.followers,
        };
        let enrichment = Enrichment {
            category: self.category,
            website_summary: self.website_summary,
            sales_insight: self.sales_insight,
        };
        EnrichedRecord::build(profile, enrichment, policy)
    }
}

/// Borrowed view with the `leads_final` column subset.
pub struct LeadSummary<'a>(pub &'a EnrichedRecord);

impl TableRow for LeadSummary<'_> {
    fn headers() -> &'static [&'static str] {
        &[
            "Business_Name", "category", "phone_numbers", "whatsapp_numbers", "emails",
            "websites", "address", "grade", "website_summary", "sales_insight",
        ]
    }
    fn cells(&self) -> Vec<String> {
        let r = self.0;
        cells![
            r.display_name, r.category, r.phone, r.whatsapp, r.email,
            r.website, r.address, r.grade, r.website_summary, r.sales_insight,
        ]
    }
}

/// Best grade first; ties keep their scrape order.
pub fn sort_by_grade(records: &mut [EnrichedRecord]) {
    records.sort_by_key(|r| r.grade);
}
