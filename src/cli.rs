// src/cli.rs
use std::{path::PathBuf, time::Duration};

use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};

use crate::{
    config::consts::SCROLL_DELAY_MS,
    config::options::{parse_date_bound, Country, EnvSettings, GradePolicy, RunOptions, Strategy},
    runner::{self, RunContext},
};

/// Scrape ad-library advertisers into graded lead sheets.
#[derive(Debug, Parser)]
#[command(name = "lead_scrape", version, about)]
pub struct Args {
    /// Search keyword, e.g. "Whatsapp Kerala"
    #[arg(short, long)]
    pub keyword: String,

    /// Country code (ALL, IN, US, GB, AE, AU, CA, SG, DE, FR)
    #[arg(short, long, default_value = "IN")]
    pub country: Country,

    /// Earliest ad start date, YYYY-MM-DD
    #[arg(long)]
    pub from: Option<String>,

    /// Latest ad start date, YYYY-MM-DD
    #[arg(long)]
    pub to: Option<String>,

    /// Contact extraction: "icon" or "pattern"
    #[arg(long, default_value = "icon")]
    pub strategy: Strategy,

    /// Grade policy: "whatsapp" (A needs WhatsApp) or "classic"
    #[arg(long, default_value = "whatsapp")]
    pub grading: GradePolicy,

    /// Pause after each scroll of the result list, in milliseconds
    #[arg(long, default_value_t = SCROLL_DELAY_MS)]
    pub settle_ms: u64,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Also write <session>.zip next to the session folder
    #[arg(long)]
    pub zip: bool,

    /// Cross-session root directory (overrides LEAD_SCRAPE_ROOT)
    #[arg(short, long)]
    pub root: Option<PathBuf>,
}

impl Args {
    pub fn to_run_options(&self) -> Result<RunOptions> {
        let opts = RunOptions {
            keyword: self.keyword.trim().to_string(),
            country: self.country,
            date_min: parse_date_bound(self.from.as_deref().unwrap_or("")).map_err(|e| eyre!(e))?,
            date_max: parse_date_bound(self.to.as_deref().unwrap_or("")).map_err(|e| eyre!(e))?,
            strategy: self.strategy,
            grade_policy: self.grading,
            headless: !self.headed,
            zip_bundle: self.zip,
        };
        opts.validate().map_err(|e| eyre!(e))?;
        Ok(opts)
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let opts = args.to_run_options()?;

    let mut env = EnvSettings::from_env();
    if let Some(root) = &args.root {
        env.root = root.clone();
    }

    let mut ctx = RunContext::from_env(&env, &opts).wrap_err("Cannot set up the run")?;
    ctx.echo_stderr = true;
    ctx.timings.scroll_settle = Duration::from_millis(args.settle_ms);

    let summary = runner::start(&ctx, &opts, None).wrap_err("Run failed")?;

    println!("Session: {}", summary.session_dir.display());
    println!(
        "New links: {} (skipped {} known) | pages scraped: {} | skipped: {} | leads: {} ({} new to master)",
        summary.new_links,
        summary.skipped_known,
        summary.pages_scraped,
        summary.pages_skipped,
        summary.leads.len(),
        summary.new_leads,
    );
    for p in &summary.files_written {
        println!("  {}", runner::display_path(&env.root, p));
    }
    if let Some(b) = &summary.bundle {
        println!("Bundle: {}", b.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_map_to_run_options() {
        let args = Args::try_parse_from([
            "lead_scrape", "-k", "Whatsapp Kerala", "-c", "gb", "--from", "2025-07-01",
            "--strategy", "pattern", "--grading", "classic", "--zip",
        ])
        .unwrap();
        let opts = args.to_run_options().unwrap();
        assert_eq!(opts.country, Country::UnitedKingdom);
        assert_eq!(opts.strategy, Strategy::Pattern);
        assert_eq!(opts.grade_policy, GradePolicy::Classic);
        assert!(opts.zip_bundle && opts.headless);
        assert!(opts.date_min.is_some() && opts.date_max.is_none());
    }

    #[test]
    fn bad_date_is_rejected() {
        let args = Args::try_parse_from(["lead_scrape", "-k", "x", "--to", "07/21/2025"]).unwrap();
        assert!(args.to_run_options().is_err());
    }
}
