// src/store.rs
//
// Cross-session stores under the run root:
//   all_links.csv : every page identifier ever discovered (fingerprints)
//   all_leads.csv : every graded lead ever kept
// A missing file is always the empty store, so the first run just works.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::{
    config::{
        consts::{ALL_LEADS_FILE, ALL_LINKS_FILE},
        options::GradePolicy,
    },
    core::sanitize::canonicalize_url,
    error::ScrapeError,
    lead::{EnrichedRecord, LinkRecord, StoredLead},
};

pub fn master_links_path(root: &Path) -> PathBuf {
    root.join(ALL_LINKS_FILE)
}

pub fn master_leads_path(root: &Path) -> PathBuf {
    root.join(format!("{ALL_LEADS_FILE}.csv"))
}

/// Read every row of a headed CSV file into `T`.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, csv::Error> {
    let mut rdr = csv::Reader::from_path(path)?;
    rdr.deserialize().collect()
}

/* ---------------- fingerprints ---------------- */

/// Identifiers seen in earlier sessions. Read-only: it only grows through
/// the master-links merge at the end of a run.
#[derive(Clone, Debug, Default)]
pub struct FingerprintStore {
    ids: HashSet<String>,
}

impl FingerprintStore {
    /// Lenient: an absent or malformed file is the empty store.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("No existing {} found, starting fresh.", path.display());
            return Self::default();
        }
        match read_rows::<LinkRecord>(path) {
            Ok(rows) => {
                let store = Self::from_ids(rows.into_iter().map(|r| r.identifier));
                info!("Loaded {} existing links from {}.", store.len(), path.display());
                store
            }
            Err(e) => {
                warn!("Ignoring unreadable {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = ids
            .into_iter()
            .map(|s| canonicalize_url(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        Self { ids }
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize { self.ids.len() }
    pub fn is_empty(&self) -> bool { self.ids.is_empty() }
}

/* ---------------- master tables ---------------- */

/// Master link table for the merge. Same leniency as the fingerprints.
pub fn load_master_links(root: &Path) -> Vec<LinkRecord> {
    let path = master_links_path(root);
    if !path.exists() {
        return Vec::new();
    }
    match read_rows::<LinkRecord>(&path) {
        Ok(rows) => rows.into_iter().filter(|r| !r.identifier.trim().is_empty()).collect(),
        Err(e) => {
            warn!("Ignoring unreadable {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// Lead table written by an earlier run. Every row is graded again under
/// `policy`; rows that come back F are dropped.
pub fn read_leads(path: &Path, policy: GradePolicy) -> Result<Vec<EnrichedRecord>, csv::Error> {
    let rows = read_rows::<StoredLead>(path)?;
    let mut leads = Vec::with_capacity(rows.len());
    for row in rows {
        let id = row.identifier.clone();
        match row.into_lead(policy) {
            Some(lead) => leads.push(lead),
            None => warn!("Dropping stored lead {id}: no contact channels (grade F)."),
        }
    }
    Ok(leads)
}

/// Master lead table. Missing is empty; unparsable ends the run, since
/// overwriting it would lose every earlier lead.
pub fn load_master_leads(root: &Path, policy: GradePolicy) -> Result<Vec<EnrichedRecord>, ScrapeError> {
    let path = master_leads_path(root);
    if !path.exists() {
        return Ok(Vec::new());
    }
    read_leads(&path, policy).map_err(|e| ScrapeError::CorruptStore {
        path: path.clone(),
        reason: e.to_string(),
    })
}
