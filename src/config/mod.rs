//! Configuration management

use super::types::RekonError;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default source-side skip list, relative to the working directory
pub const DEFAULT_SOURCE_SKIP_LIST: &str = "rekon-source-skip.txt";

/// Default destination-side skip list, relative to the working directory
pub const DEFAULT_DESTINATION_SKIP_LIST: &str = "rekon-destination-skip.txt";

/// Which timestamp decides a content divergence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    /// Last modification time
    #[default]
    Modified,

    /// Creation time (where the platform records one)
    Created,
}

/// Console language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Zh,
}

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "rekon", version, about = "Interactively reconcile a backup with its source")]
pub struct Cli {
    /// Source folder (asked interactively when omitted)
    pub source: Option<PathBuf>,

    /// Destination folder (asked interactively when omitted)
    pub destination: Option<PathBuf>,

    /// Do not actually copy or replace any files
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Timestamp compared between sides
    #[arg(long, value_enum)]
    pub time_mode: Option<TimeMode>,

    /// Suffixes of source-only entries to ignore
    #[arg(long, value_name = "FILE")]
    pub source_skip_list: Option<PathBuf>,

    /// Suffixes of destination-only entries to ignore
    #[arg(long, value_name = "FILE")]
    pub destination_skip_list: Option<PathBuf>,

    /// TOML settings file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Console language
    #[arg(long, value_enum)]
    pub lang: Option<Lang>,

    /// Wait for Enter before exiting
    #[arg(long)]
    pub pause_on_exit: bool,

    /// Log traversal and decisions to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Settings read from the optional TOML file
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub source_skip_list: Option<PathBuf>,
    pub destination_skip_list: Option<PathBuf>,
    pub time_mode: Option<TimeMode>,
    pub lang: Option<Lang>,
    pub dry_run: Option<bool>,
}

impl FileSettings {
    pub fn load(path: &Path) -> Result<Self, RekonError> {
        let text = fs::read_to_string(path).map_err(|e| {
            RekonError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&text)
            .map_err(|e| RekonError::Config(format!("Invalid {}: {}", path.display(), e)))
    }
}

/// Run configuration, immutable once validated
#[derive(Debug, Clone)]
pub struct Config {
    /// Source directory
    pub source: PathBuf,

    /// Destination directory
    pub destination: PathBuf,

    /// Report decisions without touching the filesystem
    pub dry_run: bool,

    pub time_mode: TimeMode,

    pub source_skip_list: PathBuf,

    pub destination_skip_list: PathBuf,

    pub lang: Lang,

    pub pause_on_exit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            dry_run: false,
            time_mode: TimeMode::Modified,
            source_skip_list: PathBuf::from(DEFAULT_SOURCE_SKIP_LIST),
            destination_skip_list: PathBuf::from(DEFAULT_DESTINATION_SKIP_LIST),
            lang: Lang::En,
            pause_on_exit: false,
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = RekonError;

    /// Merge command-line flags over the settings file. Roots are not
    /// validated here since they may still have to be asked for.
    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let file = match &cli.config {
            Some(path) => FileSettings::load(path)?,
            None => FileSettings::default(),
        };
        let defaults = Config::default();

        Ok(Self {
            source: cli.source.unwrap_or_default(),
            destination: cli.destination.unwrap_or_default(),
            dry_run: cli.dry_run || file.dry_run.unwrap_or(false),
            time_mode: cli.time_mode.or(file.time_mode).unwrap_or_default(),
            source_skip_list: cli
                .source_skip_list
                .or(file.source_skip_list)
                .unwrap_or(defaults.source_skip_list),
            destination_skip_list: cli
                .destination_skip_list
                .or(file.destination_skip_list)
                .unwrap_or(defaults.destination_skip_list),
            lang: cli.lang.or(file.lang).unwrap_or_default(),
            pause_on_exit: cli.pause_on_exit,
        })
    }
}

/// Check that `path` exists and is a directory
pub fn validate_root(path: &Path) -> Result<(), RekonError> {
    if path.as_os_str().is_empty() || !path.exists() {
        return Err(RekonError::Validation(format!(
            "Folder not found: {}",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(RekonError::Validation(format!(
            "Not a folder: {}",
            path.display()
        )));
    }
    Ok(())
}

impl Config {
    /// Whether a root still has to be asked for
    pub fn missing_roots(&self) -> bool {
        self.source.as_os_str().is_empty() || self.destination.as_os_str().is_empty()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), RekonError> {
        validate_root(&self.source)?;
        validate_root(&self.destination)?;

        let source = fs::canonicalize(&self.source)?;
        let destination = fs::canonicalize(&self.destination)?;

        if source == destination {
            return Err(RekonError::Validation(
                "Source and destination cannot be the same".to_string(),
            ));
        }
        if destination.starts_with(&source) || source.starts_with(&destination) {
            return Err(RekonError::Validation(
                "Source and destination cannot contain each other".to_string(),
            ));
        }

        Ok(())
    }
}
