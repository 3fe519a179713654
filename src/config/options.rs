// src/config/options.rs
use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use chrono::NaiveDate;
use rand::seq::IndexedRandom;

use super::consts::*;

/// Everything one run needs to know from the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub keyword: String,
    pub country: Country,
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
    pub strategy: Strategy,
    pub grade_policy: GradePolicy,
    pub headless: bool,
    pub zip_bundle: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            keyword: s!(),
            country: Country::India,
            date_min: None,
            date_max: None,
            strategy: Strategy::IconAnchored,
            grade_policy: GradePolicy::WhatsAppForA,
            headless: true,
            zip_bundle: false,
        }
    }
}

impl RunOptions {
    pub fn validate(&self) -> Result<(), String> {
        if self.keyword.trim().is_empty() {
            return Err(s!("Search keyword is empty"));
        }
        if let (Some(a), Some(b)) = (self.date_min, self.date_max) {
            if a > b {
                return Err(format!("Start date {a} is after end date {b}"));
            }
        }
        Ok(())
    }
}

/// Parse an optional `YYYY-MM-DD` field; blank means "no bound".
pub fn parse_date_bound(text: &str) -> Result<Option<NaiveDate>, String> {
    let t = text.trim();
    if t.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| format!("Invalid date '{t}' (expected YYYY-MM-DD): {e}"))
}

/* ---------------- Country ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Country {
    All,
    India,
    UnitedStates,
    UnitedKingdom,
    UnitedArabEmirates,
    Australia,
    Canada,
    Singapore,
    Germany,
    France,
}

impl Country {
    pub const SUPPORTED: &'static [Country] = &[
        Country::All,
        Country::India,
        Country::UnitedStates,
        Country::UnitedKingdom,
        Country::UnitedArabEmirates,
        Country::Australia,
        Country::Canada,
        Country::Singapore,
        Country::Germany,
        Country::France,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Country::All => "ALL",
            Country::India => "IN",
            Country::UnitedStates => "US",
            Country::UnitedKingdom => "GB",
            Country::UnitedArabEmirates => "AE",
            Country::Australia => "AU",
            Country::Canada => "CA",
            Country::Singapore => "SG",
            Country::Germany => "DE",
            Country::France => "FR",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Country {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let want = s.trim().to_ascii_uppercase();
        Country::SUPPORTED
            .iter()
            .copied()
            .find(|c| c.code() == want)
            .ok_or_else(|| format!("Unsupported country code: {s}"))
    }
}

/* ---------------- Extraction strategy ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Classify intro text fragments by shape.
    Pattern,
    /// Read the value next to each known contact icon.
    IconAnchored,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pattern" => Ok(Strategy::Pattern),
            "icon" | "icon-anchored" => Ok(Strategy::IconAnchored),
            other => Err(format!("Unknown strategy: {other}")),
        }
    }
}

/* ---------------- Grade policy ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradePolicy {
    /// A = (phone or WhatsApp) + email + website.
    Classic,
    /// As Classic, and A additionally requires a WhatsApp number.
    WhatsAppForA,
}

impl FromStr for GradePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(GradePolicy::Classic),
            "whatsapp" | "whatsapp-for-a" => Ok(GradePolicy::WhatsAppForA),
            other => Err(format!("Unknown grade policy: {other}")),
        }
    }
}

/* ---------------- Browser timing ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timings {
    pub initial_render: Duration,
    pub scroll_settle: Duration,
    pub navigation: Duration,
    pub body_wait: Duration,
    pub modal_wait: Duration,
    pub modal_dismiss: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            initial_render: Duration::from_millis(INITIAL_RENDER_WAIT_MS),
            scroll_settle: Duration::from_millis(SCROLL_DELAY_MS),
            navigation: Duration::from_millis(NAVIGATION_TIMEOUT_MS),
            body_wait: Duration::from_millis(BODY_WAIT_MS),
            modal_wait: Duration::from_millis(MODAL_WAIT_MS),
            modal_dismiss: Duration::from_millis(MODAL_DISMISS_PAUSE_MS),
        }
    }
}

/* ---------------- Environment ---------------- */

/// Settings read from the process environment (after `.env` is loaded).
#[derive(Clone, Debug, Default)]
pub struct EnvSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub proxies: Vec<String>,
    pub root: PathBuf,
}

impl EnvSettings {
    pub fn from_env() -> Self {
        let var = |k: &str| std::env::var(k).ok().filter(|v| !v.trim().is_empty());

        Self {
            api_key: var(ENV_API_KEY),
            base_url: var(ENV_BASE_URL).unwrap_or_else(|| s!(DEFAULT_LLM_BASE_URL)),
            model: var(ENV_MODEL).unwrap_or_else(|| s!(DEFAULT_MODEL)),
            proxies: var(ENV_PROXIES).map(|v| parse_proxy_pool(&v)).unwrap_or_default(),
            root: var(ENV_ROOT).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// One proxy for the whole run, or direct connection when the pool is empty.
    pub fn pick_proxy(&self) -> Option<String> {
        self.proxies.choose(&mut rand::rng()).cloned()
    }
}

pub fn parse_proxy_pool(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_codes_parse_case_insensitively() {
        assert_eq!("in".parse::<Country>().unwrap(), Country::India);
        assert_eq!(" gb ".parse::<Country>().unwrap(), Country::UnitedKingdom);
        assert!("XX".parse::<Country>().is_err());
    }

    #[test]
    fn blank_date_is_no_bound() {
        assert_eq!(parse_date_bound("  ").unwrap(), None);
        assert_eq!(
            parse_date_bound("2025-07-21").unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 21)
        );
        assert!(parse_date_bound("21/07/2025").is_err());
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let opts = RunOptions {
            keyword: s!("whatsapp kerala"),
            date_min: NaiveDate::from_ymd_opt(2025, 8, 1),
            date_max: NaiveDate::from_ymd_opt(2025, 7, 1),
            ..RunOptions::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn proxy_pool_ignores_blanks() {
        let pool = parse_proxy_pool("http://a:1, ,http://b:2,");
        assert_eq!(pool, vec!["http://a:1", "http://b:2"]);
    }
}
