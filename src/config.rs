use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const DB_ENV: &str = "POCKETLEDGER_DB";
pub(crate) const LOG_ENV: &str = "POCKETLEDGER_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";
const DB_FILE: &str = "pocketledger.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) log_filter: String,
}

impl Config {
    /// Resolve configuration from the process arguments and environment.
    ///
    /// Returns the config and the arguments left once `--db` is consumed.
    pub(crate) fn from_env(args: &[String]) -> Result<(Self, Vec<String>)> {
        Self::resolve(args, |key| std::env::var(key).ok(), default_db_path)
    }

    fn resolve(
        args: &[String],
        env: impl Fn(&str) -> Option<String>,
        fallback: impl FnOnce() -> Result<PathBuf>,
    ) -> Result<(Self, Vec<String>)> {
        let (mut flags, rest) = crate::run::take_flag(args, "--db")?;

        let db_path = match flags.pop().or_else(|| env(DB_ENV).filter(|v| !v.trim().is_empty())) {
            Some(path) => PathBuf::from(shellexpand(&path)),
            None => fallback()?,
        };

        let log_filter = env(LOG_ENV)
            .or_else(|| env("RUST_LOG"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok((Self { db_path, log_filter }, rest))
    }
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "pocketledger", "PocketLedger")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join(DB_FILE))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
