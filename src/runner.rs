// src/runner.rs
//
// One full run: fingerprints → discovery → per-page scrape → enrichment →
// grading → session files → master merge. Stages only read earlier output.

use std::{
    path::{Path, PathBuf},
    sync::mpsc::Sender,
    time::Duration,
};

use chrono::Local;
use tracing::{error, info, warn};

use crate::{
    browser::{ChromeDriver, Driver},
    config::{
        consts::*,
        options::{EnvSettings, RunOptions, Timings},
    },
    enrich::{Enricher, HttpFetcher},
    error::ScrapeError,
    file::{write_csv, write_table, zip_dir},
    grade::grade_profile,
    lead::{sort_by_grade, EnrichedRecord, Grade, LeadSummary, LinkRecord},
    llm::OpenAiClient,
    log::session_subscriber,
    merge::{merge, new_in_session},
    progress::{NullProgress, Progress, Stage},
    scrape::{extractor_for, Discovery, ProfileScraper, SearchQuery},
    session::SessionDir,
    store::{load_master_leads, load_master_links, master_links_path, FingerprintStore},
    worker::{CancelToken, Event},
};

/// Everything a run needs, built once and passed down.
pub struct RunContext {
    pub driver: Box<dyn Driver>,
    pub enricher: Enricher,
    pub timings: Timings,
    pub root: PathBuf,
    pub proxy: Option<String>,
    pub events: Option<Sender<Event>>,
    pub cancel: CancelToken,
    pub echo_stderr: bool,
}

impl RunContext {
    /// Production wiring: Chrome, the chat-completion client, HTTP website fetch.
    pub fn from_env(env: &EnvSettings, opts: &RunOptions) -> Result<Self, ScrapeError> {
        let timings = Timings::default();
        let llm = OpenAiClient::from_settings(env).map_err(|e| ScrapeError::Config(e.to_string()))?;
        Ok(Self {
            driver: Box::new(ChromeDriver::new(opts.headless, timings.navigation)),
            enricher: Enricher::new(Box::new(llm), Box::new(HttpFetcher::new())),
            timings,
            root: env.root.clone(),
            proxy: env.pick_proxy(),
            events: None,
            cancel: CancelToken::default(),
            echo_stderr: false,
        })
    }

    pub fn with_events(mut self, events: Sender<Event>, cancel: CancelToken) -> Self {
        self.events = Some(events);
        self.cancel = cancel;
        self
    }
}

/// Summary of what was produced.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub session_dir: PathBuf,
    pub new_links: usize,
    pub skipped_known: usize,
    pub pages_scraped: usize,
    pub pages_skipped: usize,
    pub dropped_f: usize,
    /// Leads this run added to the master table.
    pub new_leads: usize,
    pub leads: Vec<EnrichedRecord>,
    pub files_written: Vec<PathBuf>,
    pub bundle: Option<PathBuf>,
    pub cancelled: bool,
}

/// Create the session directory, route this thread's logging into it, run.
pub fn start(
    ctx: &RunContext,
    opts: &RunOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, ScrapeError> {
    let session = SessionDir::create(&ctx.root, Local::now())?;
    let subscriber = session_subscriber(&session.log_path(), ctx.events.clone(), ctx.echo_stderr)?;
    let _guard = tracing::subscriber::set_default(subscriber);

    let result = run(ctx, opts, &session, progress);
    if let Err(e) = &result {
        error!("Run failed: {e}");
    }
    result
}

/// Top-level pipeline against an existing session directory.
pub fn run(
    ctx: &RunContext,
    opts: &RunOptions,
    session: &SessionDir,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, ScrapeError> {
    let mut null = NullProgress;
    let progress: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut null,
    };
    let result = pipeline(ctx, opts, session, progress);
    progress.finish();
    result
}

fn pipeline(
    ctx: &RunContext,
    opts: &RunOptions,
    session: &SessionDir,
    progress: &mut dyn Progress,
) -> Result<RunSummary, ScrapeError> {
    opts.validate().map_err(ScrapeError::Config)?;

    let mut summary = RunSummary { session_dir: session.path().to_path_buf(), ..RunSummary::default() };
    info!(
        "Session {} | keyword '{}' | country {} | dates {}..{}",
        session.name(),
        opts.keyword,
        opts.country,
        opts.date_min.map(|d| d.to_string()).unwrap_or_default(),
        opts.date_max.map(|d| d.to_string()).unwrap_or_default(),
    );
    info!("Using proxy {}", ctx.proxy.as_deref().unwrap_or("None"));

    // Read both masters before any browser work: a corrupt lead master ends the run here.
    let master_leads = load_master_leads(&ctx.root, opts.grade_policy)?;
    let known = FingerprintStore::load(&master_links_path(&ctx.root));

    /* ---------- discovery ---------- */
    progress.stage(Stage::Discovering);
    let links = discover_links(ctx, opts, &known, &mut summary)?;
    if links.is_empty() {
        info!("No new links to add.");
        return Ok(summary);
    }

    summary.files_written.extend(write_table(session.path(), LINKS_FILE, &links)?);
    let merged_links = merge(&load_master_links(&ctx.root), &links);
    write_csv(&master_links_path(&ctx.root), &merged_links)?;
    info!("Updated {ALL_LINKS_FILE} with new links ({} total).", merged_links.len());

    if ctx.cancel.is_cancelled() {
        summary.cancelled = true;
        warn!("Run cancelled before page scraping.");
        return Ok(summary);
    }

    /* ---------- profiles, enrichment, grading ---------- */
    progress.stage(Stage::Profiles);
    progress.begin(links.len());
    let mut leads = scrape_leads(ctx, opts, &links, progress, &mut summary);
    sort_by_grade(&mut leads);

    /* ---------- persistence ---------- */
    progress.stage(Stage::Saving);
    let finals: Vec<LeadSummary<'_>> = leads.iter().map(EnrichedRecord::summary).collect();
    summary.files_written.extend(write_table(session.path(), LEADS_FILE, &leads)?);
    summary.files_written.extend(write_table(session.path(), LEADS_FINAL_FILE, &finals)?);

    summary.new_leads = new_in_session(&master_leads, &leads).len();
    let merged_leads = merge(&master_leads, &leads);
    summary.files_written.extend(write_table(&ctx.root, ALL_LEADS_FILE, &merged_leads)?);
    info!("Updated {ALL_LEADS_FILE} ({} new, {} total).", summary.new_leads, merged_leads.len());

    info!(
        "Done .... Scraped {} leads ({} pages scraped, {} skipped, {} graded F).",
        leads.len(),
        summary.pages_scraped,
        summary.pages_skipped,
        summary.dropped_f,
    );
    summary.leads = leads;

    if opts.zip_bundle {
        summary.bundle = Some(zip_dir(session.path())?);
    }
    Ok(summary)
}

fn discover_links(
    ctx: &RunContext,
    opts: &RunOptions,
    known: &FingerprintStore,
    summary: &mut RunSummary,
) -> Result<Vec<LinkRecord>, ScrapeError> {
    let query = SearchQuery {
        keyword: opts.keyword.clone(),
        country: opts.country,
        date_min: opts.date_min,
        date_max: opts.date_max,
    };

    let mut discovery = Discovery::start(
        ctx.driver.as_ref(),
        ctx.proxy.as_deref(),
        &query,
        known,
        &ctx.timings,
        ctx.cancel.clone(),
    )?;
    let links: Vec<LinkRecord> = discovery.by_ref().collect();

    summary.new_links = links.len();
    summary.skipped_known = discovery.skipped();
    summary.cancelled = ctx.cancel.is_cancelled();
    info!("Scraped {} new unique page links.", links.len());
    Ok(links)
}

fn scrape_leads(
    ctx: &RunContext,
    opts: &RunOptions,
    links: &[LinkRecord],
    progress: &mut dyn Progress,
    summary: &mut RunSummary,
) -> Vec<EnrichedRecord> {
    let extractor = extractor_for(opts.strategy);
    let scraper = ProfileScraper {
        driver: ctx.driver.as_ref(),
        proxy: ctx.proxy.as_deref(),
        timings: &ctx.timings,
        extractor: extractor.as_ref(),
    };

    let mut leads = Vec::new();
    for (i, link) in links.iter().enumerate() {
        if ctx.cancel.is_cancelled() {
            summary.cancelled = true;
            warn!("Run cancelled; {} pages left unscraped.", links.len() - i);
            break;
        }
        info!("Scraping URL: {}", link.identifier);

        match scraper.enrich_profile(link) {
            Ok(profile) => {
                summary.pages_scraped += 1;
                // F never leaves this loop, so it is not worth LLM calls either
                if grade_profile(&profile, opts.grade_policy) == Grade::F {
                    summary.dropped_f += 1;
                    info!("Dropping {} (no contact channels, grade F).", link.identifier);
                } else {
                    let enrichment = ctx.enricher.enrich(&profile);
                    if let Some(lead) = EnrichedRecord::build(profile, enrichment, opts.grade_policy) {
                        info!("Lead {} graded {} ({}).", lead.display_name, lead.grade(), lead.category);
                        leads.push(lead);
                    }
                }
            }
            Err(reason) => {
                summary.pages_skipped += 1;
                error!("Error scraping {}: {reason}", link.identifier);
            }
        }
        progress.item_done(&link.identifier);
    }
    leads
}

/// Pause used by front ends between polls; kept here so CLI and GUI agree.
pub fn log_tick() -> Duration {
    Duration::from_millis(LOG_TICK_MS)
}

/// Root-relative path helper for display.
pub fn display_path(root: &Path, p: &Path) -> String {
    p.strip_prefix(root).unwrap_or(p).display().to_string()
}
