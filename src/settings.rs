use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::parser::NameExceptions;
use crate::record::CommitteeType;

const ENV_PREFIX: &str = "COMMITTEES";
const DEFAULT_FILE: &str = "committees";

/// Run settings: built-in defaults, then `committees.toml` (or `--config`),
/// then `COMMITTEES_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub feed_base: String,
    /// Legislative session year; defaults to the current one.
    pub session: Option<i32>,
    pub committee_types: Vec<String>,
    /// Names with an inner capital that segmentation must leave whole.
    pub name_exceptions: Vec<String>,
    pub content_selector: String,
    pub topics_path: PathBuf,
    pub output_dir: PathBuf,
    pub delimiter: String,
    pub max_retries: u32,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            feed_base: "http://docs.legis.wisconsin.gov/feed".to_string(),
            session: None,
            committee_types: CommitteeType::ALL.iter().map(|t| t.to_string()).collect(),
            name_exceptions: vec!["VanderMeer".to_string()],
            content_selector: "div.span5".to_string(),
            topics_path: PathBuf::from("committee_topics.txt"),
            output_dir: PathBuf::from("."),
            delimiter: "|".to_string(),
            max_retries: 3,
            user_agent: concat!("committee_roster/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_FILE).required(false),
        };
        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("committee_types")
                    .with_list_parse_key("name_exceptions"),
            )
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.delimiter()?;
        self.committee_types()?;
        Ok(())
    }

    pub fn delimiter(&self) -> Result<char, ConfigError> {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c != '"' && c != '\n' && c != '\r' => Ok(c),
            _ => Err(ConfigError::Delimiter(self.delimiter.clone())),
        }
    }

    pub fn committee_types(&self) -> Result<Vec<CommitteeType>, ConfigError> {
        self.committee_types.iter().map(|t| t.parse()).collect()
    }

    pub fn exceptions(&self) -> NameExceptions {
        NameExceptions::new(self.name_exceptions.iter().cloned())
    }

    pub fn session(&self) -> i32 {
        self.session
            .unwrap_or_else(|| current_session(Local::now().date_naive()))
    }

    pub fn feed_url(&self, committee_type: CommitteeType) -> String {
        format!(
            "{}/{}/committees/{}",
            self.feed_base.trim_end_matches('/'),
            self.session(),
            committee_type
        )
    }
}

/// Sessions start in odd years and span two calendar years.
pub fn current_session(today: NaiveDate) -> i32 {
    let year = today.year();
    if year % 2 == 0 {
        year - 1
    } else {
        year
    }
}

// ── Tests ──
