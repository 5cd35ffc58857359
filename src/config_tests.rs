#![allow(clippy::unwrap_used)]

use super::*;
use std::collections::HashMap;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn resolve_with(list: &[&str], vars: &[(&str, &str)]) -> Result<(Config, Vec<String>)> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::resolve(
        &args(list),
        |key| vars.get(key).cloned(),
        || Ok(PathBuf::from("/data/pocketledger.db")),
    )
}

#[test]
fn test_flag_wins_over_env() {
    let (config, rest) =
        resolve_with(&["--db", "/tmp/a.db", "summary"], &[(DB_ENV, "/tmp/b.db")]).unwrap();
    assert_eq!(config.db_path, PathBuf::from("/tmp/a.db"));
    assert_eq!(rest, args(&["summary"]));
}

#[test]
fn test_last_flag_wins() {
    let (config, rest) = resolve_with(&["list", "--db", "/tmp/a.db", "--db", "/tmp/c.db"], &[]).unwrap();
    assert_eq!(config.db_path, PathBuf::from("/tmp/c.db"));
    assert_eq!(rest, args(&["list"]));
}

#[test]
fn test_env_used_without_flag() {
    let (config, _) = resolve_with(&[], &[(DB_ENV, "/tmp/b.db")]).unwrap();
    assert_eq!(config.db_path, PathBuf::from("/tmp/b.db"));
}

#[test]
fn test_blank_env_falls_back() {
    let (config, _) = resolve_with(&[], &[(DB_ENV, "  ")]).unwrap();
    assert_eq!(config.db_path, PathBuf::from("/data/pocketledger.db"));
}

#[test]
fn test_missing_flag_value() {
    assert!(resolve_with(&["--db"], &[]).is_err());
}

#[test]
fn test_log_filter_precedence() {
    let (config, _) = resolve_with(&[], &[]).unwrap();
    assert_eq!(config.log_filter, "warn");

    let (config, _) = resolve_with(&[], &[("RUST_LOG", "info")]).unwrap();
    assert_eq!(config.log_filter, "info");

    let (config, _) =
        resolve_with(&[], &[("RUST_LOG", "info"), (LOG_ENV, "pocketledger=debug")]).unwrap();
    assert_eq!(config.log_filter, "pocketledger=debug");
}

#[test]
fn test_shellexpand_plain_path() {
    assert_eq!(shellexpand("/tmp/x.db"), "/tmp/x.db");
}
