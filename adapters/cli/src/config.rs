use std::{fs, path::Path, str::FromStr};

use anyhow::{Context, Result};
use log::LevelFilter;
use maze_chase_core::Difficulty;
use serde::Deserialize;

/// Settings read from an optional TOML file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) hard: Option<bool>,
    pub(crate) seed: Option<u64>,
    pub(crate) log_level: Option<String>,
    pub(crate) json: Option<bool>,
}

impl FileConfig {
    /// Loads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Values supplied on the command line; `None` and `false` defer to the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) hard: bool,
    pub(crate) seed: Option<u64>,
    pub(crate) log_level: Option<String>,
    pub(crate) json: bool,
}

/// Fully resolved settings for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) difficulty: Difficulty,
    pub(crate) seed: u64,
    pub(crate) log_level: Option<LevelFilter>,
    pub(crate) json: bool,
}

/// Merges command line values over file values over defaults.
///
/// `entropy` is only consulted when neither source names a seed.
pub(crate) fn resolve<F>(overrides: Overrides, file: FileConfig, entropy: F) -> Result<Settings>
where
    F: FnOnce() -> u64,
{
    let hard = overrides.hard || file.hard.unwrap_or(false);
    let seed = overrides.seed.or(file.seed).unwrap_or_else(entropy);
    let log_level = overrides
        .log_level
        .or(file.log_level)
        .map(|level| {
            LevelFilter::from_str(&level).with_context(|| format!("unknown log level `{level}`"))
        })
        .transpose()?;

    Ok(Settings {
        difficulty: Difficulty::from_hard_flag(hard),
        seed,
        log_level,
        json: overrides.json || file.json.unwrap_or(false),
    })
}
