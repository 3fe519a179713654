// src/config/consts.rs

// Target site
pub const SITE_ORIGIN: &str = "https://www.facebook.com";
pub const SITE_DOMAIN: &str = "facebook.com";
pub const TITLE_SUFFIX: &str = " | Facebook";

// Selectors (site markup, subject to drift)
pub const ADVERTISER_LINK_SELECTOR: &str = "a[href^='https://www.facebook.com/']";
pub const ADVERTISER_LINK_MARKER: &str = "xt0psk2";
pub const LOGIN_MODAL_CLOSE_SELECTOR: &str = "div[aria-label='Close']";
pub const INTRO_TEXT_SELECTOR: &str = "span.x193iq5w[dir='auto']";
pub const CONTACT_ROW_SELECTOR: &str = "div.x9f619.x1n2onr6.x1ja2u2z > div.x78zum5";
pub const DESCRIPTION_SELECTOR: &str = "div.x2b8uid span.x193iq5w";
pub const FOLLOWERS_SELECTOR: &str = "span";
pub const FOLLOWERS_NEEDLE: &str = "followers";

// Icon fingerprints: substrings of the intro icons' image sources.
// Placeholder names; replace with the ones the live page serves.
pub const ICON_PHONE: &str = "Dc7-7AgwkwS.png";
pub const ICON_WHATSAPP: &str = "1dbWN6Alpdz.png";
pub const ICON_EMAIL: &str = "2PIcyqpptfD.png";
pub const ICON_WEBSITE: &str = "BQdeC67wT9z.png";
pub const ICON_ADDRESS: &str = "8k_Y-oVxbuU.png";

// Browser timing (ms)
pub const INITIAL_RENDER_WAIT_MS: u64 = 5_000;
pub const SCROLL_DELAY_MS: u64 = 3_000;
pub const NAVIGATION_TIMEOUT_MS: u64 = 30_000;
pub const BODY_WAIT_MS: u64 = 10_000;
pub const MODAL_WAIT_MS: u64 = 5_000;
pub const MODAL_DISMISS_PAUSE_MS: u64 = 1_000;

// LLM
pub const DEFAULT_MODEL: &str = "gpt-4-1106-preview";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const LLM_TEMPERATURE: f32 = 0.2;
pub const LLM_TIMEOUT_SECS: u64 = 60;
pub const RETRY_MAX_ATTEMPTS: u32 = 3;
pub const RETRY_MIN_BACKOFF_MS: u64 = 1_000;
pub const RETRY_MAX_BACKOFF_MS: u64 = 5_000;

// Website fetch
pub const WEBSITE_TEXT_CAP: usize = 5_000;
pub const WEBSITE_TIMEOUT_SECS: u64 = 15;
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

// Persistence (relative to the cross-session root)
pub const ALL_LINKS_FILE: &str = "all_links.csv";
pub const ALL_LEADS_FILE: &str = "all_leads";
pub const SESSION_PREFIX: &str = "session_";
pub const SESSION_TIME_FMT: &str = "%d-%m-%y_%H-%M-%S";
pub const LINKS_FILE: &str = "links";
pub const LEADS_FILE: &str = "leads";
pub const LEADS_FINAL_FILE: &str = "leads_final";
pub const SESSION_LOG_FILE: &str = "scraper.log";
pub const MULTI_VALUE_SEP: &str = ", ";

// Environment
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_MODEL: &str = "LEAD_SCRAPE_MODEL";
pub const ENV_PROXIES: &str = "LEAD_SCRAPE_PROXIES";
pub const ENV_ROOT: &str = "LEAD_SCRAPE_ROOT";
pub const DEFAULT_LOG_FILTER: &str = "lead_scrape=debug,info";

// GUI
pub const LOG_TICK_MS: u64 = 250;
pub const LOG_PANEL_MAX_LINES: usize = 5_000;
