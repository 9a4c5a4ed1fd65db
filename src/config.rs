//! Configuration loader — merges env vars, .env file, and config.toml.

use common::{Error, ServiceConfig};
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "config.toml";

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn parse_port(raw: &str) -> Result<u16, Error> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(Error::Config("PORT must be an integer in 1..=65535".into())),
    }
}

fn validate_config(config: &ServiceConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.port == 0 {
        issues.push("port must be > 0".into());
    }
    if config.steam.language.trim().is_empty() {
        issues.push("steam.language must not be empty".into());
    }
    if config.steam.base_url.trim().is_empty() {
        issues.push("steam.base_url must not be empty".into());
    }
    if config.steam.timeout_secs == 0 {
        issues.push("steam.timeout_secs must be > 0".into());
    }
    if config.cache.ttl_secs == 0 {
        issues.push("cache.ttl_secs must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Apply environment overrides, read through `var` so tests can supply their own.
fn apply_env_overrides<F>(config: &mut ServiceConfig, var: F) -> Result<(), Error>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = var("PORT").filter(|v| !v.trim().is_empty()) {
        config.port = parse_port(&raw)?;
    }
    if let Some(key) = var("STEAM_API_KEY") {
        config.steam_api_key = key;
    }
    if let Some(raw) = var("STEAM_APP_ID") {
        let parsed = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::Config("STEAM_APP_ID must be an integer".into()))?;
        config.steam.app_id = parsed;
    }
    if let Some(lang) = var("STEAM_LANGUAGE") {
        config.steam.language = lang.trim().to_string();
    }
    if let Some(url) = var("STEAM_API_BASE_URL") {
        let normalized = url.trim().trim_end_matches('/').to_string();
        if normalized.is_empty() {
            tracing::warn!("Ignoring empty STEAM_API_BASE_URL override");
        } else {
            tracing::info!("Using STEAM_API_BASE_URL override: {}", normalized);
            config.steam.base_url = normalized;
        }
    }
    if let Some(raw) = var("UPSTREAM_TIMEOUT_SECS") {
        config.steam.timeout_secs = parse_positive_u64(&raw, "UPSTREAM_TIMEOUT_SECS")?;
    }
    if let Some(raw) = var("CACHE_TTL_SECS") {
        config.cache.ttl_secs = parse_positive_u64(&raw, "CACHE_TTL_SECS")?;
    }
    if let Some(dir) = var("STATIC_DIR").filter(|v| !v.trim().is_empty()) {
        config.static_dir = dir.trim().into();
    }
    Ok(())
}

fn read_config_file(path: &Path) -> Result<ServiceConfig, Error> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Load service configuration from environment and optional config file.
///
/// An explicit `path` must exist; otherwise `config.toml` is used when present.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Defaults, then the config file if any.
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                read_config_file(default_path)?
            } else {
                ServiceConfig::default()
            }
        }
    };

    // 3. Override with environment variables (highest priority).
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    // 4. The key only gates refreshes, so its absence is not fatal here.
    validate_config(&config)?;

    Ok(config)
}
