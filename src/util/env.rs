//! Environment helpers: centralized dotenv loading and ergonomic getters.
//! Call `init_env()` once early in each binary (or rely on lazy Once).
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Once;

use tracing::info;

static INIT: Once = Once::new();

/// Load .env exactly once. Safe to call many times.
pub fn init_env() {
    INIT.call_once(|| {
        let _ = dotenv::dotenv();
    });
}

/// Get optional env var (None if unset or empty).
pub fn env_opt(key: &str) -> Option<String> {
    init_env();
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Optional path-valued env var.
pub fn env_path(key: &str) -> Option<PathBuf> {
    env_opt(key).map(|v| PathBuf::from(v.trim()))
}

/// Get parsed value with default fallback.
pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match env_opt(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or(default),
        None => default,
    }
}

/// Log a consolidated snapshot of the given keys (unset keys log as empty).
pub fn log_snapshot(title: &str, keys: &[&str]) {
    let snapshot: Vec<(&str, String)> = keys
        .iter()
        .map(|&k| (k, env_opt(k).unwrap_or_default()))
        .collect();
    info!(target: "preflight", title, snapshot = ?snapshot, "configuration snapshot");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_falls_back_on_garbage_and_blank() {
        std::env::set_var("VGSALES_TEST_PARSE_GARBAGE", "not-a-number");
        std::env::set_var("VGSALES_TEST_PARSE_BLANK", "   ");
        assert_eq!(env_parse("VGSALES_TEST_PARSE_GARBAGE", 7usize), 7);
        assert_eq!(env_parse("VGSALES_TEST_PARSE_BLANK", 9usize), 9);
        assert_eq!(env_opt("VGSALES_TEST_PARSE_BLANK"), None);
    }
}
