// src/config/state.rs
use super::options::{parse_date_bound, Country, GradePolicy, RunOptions, Strategy};

/// Search form as typed by the user. Text fields stay raw until Start.
#[derive(Clone, Debug)]
pub struct FormState {
    pub keyword: String,
    pub country: Country,
    pub date_min_text: String,
    pub date_max_text: String,
    pub strategy: Strategy,
    pub grade_policy: GradePolicy,
    pub headless: bool,
}

impl Default for FormState {
    fn default() -> Self {
        let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
        let defaults = RunOptions::default();
        Self {
            keyword: s!(),
            country: defaults.country,
            date_min_text: today.clone(),
            date_max_text: today,
            strategy: defaults.strategy,
            grade_policy: defaults.grade_policy,
            headless: defaults.headless,
        }
    }
}

impl FormState {
    /// Turn the form into run options, or a message for the status line.
    pub fn to_run_options(&self) -> Result<RunOptions, String> {
        let opts = RunOptions {
            keyword: self.keyword.trim().to_string(),
            country: self.country,
            date_min: parse_date_bound(&self.date_min_text)?,
            date_max: parse_date_bound(&self.date_max_text)?,
            strategy: self.strategy,
            grade_policy: self.grade_policy,
            headless: self.headless,
            zip_bundle: false,
        };
        opts.validate()?;
        Ok(opts)
    }
}

#[derive(Clone, Debug)]
pub struct GuiState {
    pub window_w: u32,
    pub window_h: u32,
    pub form: FormState,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            window_w: 1100,
            window_h: 760,
            form: FormState::default(),
        }
    }
}
