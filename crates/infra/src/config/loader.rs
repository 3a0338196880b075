//! Configuration loader
//!
//! Loads [`ConnectionConfig`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the environment if one is present
//! 2. Loads from environment variables when `SELLERLINK_MARKETPLACE_ID` is set
//! 3. Otherwise falls back to a config file found by probing
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SELLERLINK_MARKETPLACE_ID`: Marketplace id (required for env loading)
//! - `SELLERLINK_BATCH_SIZE`: Items per batch
//! - `SELLERLINK_DELAY_BETWEEN_BATCHES_MS`: Pause between batches
//! - `SELLERLINK_MAX_CONCURRENT_BATCHES`: Batches in flight at once
//! - `SELLERLINK_CONTINUE_ON_ERROR`: Keep going after a failed batch
//!   (true/false)
//! - `SELLERLINK_MAX_RETRIES`: Retries per batch
//! - `SELLERLINK_INITIAL_RETRY_DELAY_MS`: First backoff delay
//! - `SELLERLINK_USE_EXPONENTIAL_BACKOFF`: Double the delay per retry
//!   (true/false)
//! - `SELLERLINK_MODULE_VERSIONS`: Default versions as
//!   `capability=version,capability=version`
//!
//! Unset optional variables keep their defaults.
//!
//! ## File Locations
//! The loader probes, in order, the current directory, its parent and its
//! grandparent for `sellerlink.toml`, `sellerlink.json`, `config.toml` and
//! `config.json`.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sellerlink_common::error::{ErrorKind, ErrorRecord, ErrorResult};
use sellerlink_core::{ConnectionConfig, ModuleVersionDefaults};

/// Marketplace id (required for env loading)
pub const ENV_MARKETPLACE_ID: &str = "SELLERLINK_MARKETPLACE_ID";
/// Items per batch
pub const ENV_BATCH_SIZE: &str = "SELLERLINK_BATCH_SIZE";
/// Pause between batches, ms
pub const ENV_DELAY_BETWEEN_BATCHES_MS: &str = "SELLERLINK_DELAY_BETWEEN_BATCHES_MS";
/// Batches in flight at once
pub const ENV_MAX_CONCURRENT_BATCHES: &str = "SELLERLINK_MAX_CONCURRENT_BATCHES";
/// `true`/`false`
pub const ENV_CONTINUE_ON_ERROR: &str = "SELLERLINK_CONTINUE_ON_ERROR";
/// Retries per batch
pub const ENV_MAX_RETRIES: &str = "SELLERLINK_MAX_RETRIES";
/// First retry delay, ms
pub const ENV_INITIAL_RETRY_DELAY_MS: &str = "SELLERLINK_INITIAL_RETRY_DELAY_MS";
/// `true`/`false`
pub const ENV_USE_EXPONENTIAL_BACKOFF: &str = "SELLERLINK_USE_EXPONENTIAL_BACKOFF";
/// `cap=version,cap=version`
pub const ENV_MODULE_VERSIONS: &str = "SELLERLINK_MODULE_VERSIONS";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["sellerlink.toml", "sellerlink.json", "config.toml", "config.json"];

/// Directory levels probed above the starting directory
const PROBE_PARENT_LEVELS: usize = 2;

fn config_error(context: &str, message: impl Into<String>) -> ErrorRecord {
    ErrorRecord::new(ErrorKind::InitializationError, message).with_context(context)
}

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns an `InitializationError` if:
/// - An environment variable has an invalid value
/// - No config file is found when the environment is not configured
/// - The file format is invalid
/// - The loaded configuration fails validation
pub fn load() -> ErrorResult<ConnectionConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable .env file"),
    }

    if std::env::var_os(ENV_MARKETPLACE_ID).is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        Ok(config)
    } else {
        tracing::debug!("{ENV_MARKETPLACE_ID} not set, trying config file");
        load_from_file(None)
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns an `InitializationError` (context `config.env`) if
/// `SELLERLINK_MARKETPLACE_ID` is missing or any variable fails to parse.
pub fn load_from_env() -> ErrorResult<ConnectionConfig> {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Build configuration from any key lookup, applying the environment
/// variable rules.
pub fn load_from_lookup<F>(lookup: F) -> ErrorResult<ConnectionConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let marketplace_id = lookup(ENV_MARKETPLACE_ID).ok_or_else(|| {
        config_error("config.env", format!("Missing required environment variable: {ENV_MARKETPLACE_ID}"))
    })?;

    let mut config = ConnectionConfig::new(marketplace_id);
    let batch = &mut config.batch;

    if let Some(value) = parse_var::<usize>(&lookup, ENV_BATCH_SIZE)? {
        batch.batch_size = value;
    }
    if let Some(ms) = parse_var::<u64>(&lookup, ENV_DELAY_BETWEEN_BATCHES_MS)? {
        batch.delay_between_batches = Duration::from_millis(ms);
    }
    if let Some(value) = parse_var::<usize>(&lookup, ENV_MAX_CONCURRENT_BATCHES)? {
        batch.max_concurrent_batches = value;
    }
    if let Some(value) = bool_var(&lookup, ENV_CONTINUE_ON_ERROR)? {
        batch.continue_on_error = value;
    }
    if let Some(value) = parse_var::<u32>(&lookup, ENV_MAX_RETRIES)? {
        batch.max_retries = value;
    }
    if let Some(ms) = parse_var::<u64>(&lookup, ENV_INITIAL_RETRY_DELAY_MS)? {
        batch.initial_retry_delay = Duration::from_millis(ms);
    }
    if let Some(value) = bool_var(&lookup, ENV_USE_EXPONENTIAL_BACKOFF)? {
        batch.use_exponential_backoff = value;
    }
    if let Some(raw) = lookup(ENV_MODULE_VERSIONS) {
        config.module_versions = ModuleVersionDefaults::from_str(&raw)?;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations starting at the
/// current directory. Format is chosen by extension.
///
/// # Errors
/// Returns an `InitializationError` (context `config.file`) if the file is
/// missing or unreadable, and (context `config.parse`) if it does not parse.
pub fn load_from_file(path: Option<PathBuf>) -> ErrorResult<ConnectionConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(config_error(
                    "config.file",
                    format!("Config file not found: {}", p.display()),
                ));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            config_error("config.file", "No config file found in any of the standard locations")
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(|e| {
        config_error("config.file", format!("Failed to read {}: {e}", config_path.display()))
    })?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration text; the format comes from the path's extension.
pub fn parse_config(contents: &str, path: &Path) -> ErrorResult<ConnectionConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| config_error("config.parse", format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| config_error("config.parse", format!("Invalid JSON format: {e}"))),
        _ => Err(config_error("config.parse", format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file, starting from the current directory
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    probe_config_paths_from(&cwd)
}

/// First existing config file in `start` or up to two parents above it
pub fn probe_config_paths_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(PROBE_PARENT_LEVELS + 1)
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> ErrorResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| config_error("config.env", format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off`
/// (case-insensitive).
fn bool_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> ErrorResult<Option<bool>> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        other => Err(config_error("config.env", format!("Invalid boolean for {key}: '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use tempfile::TempDir;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_bool_parsing() {
        let lookup = lookup_from(&[("A", "YES"), ("B", "off"), ("C", "maybe")]);
        assert_eq!(bool_var(&lookup, "A").unwrap(), Some(true));
        assert_eq!(bool_var(&lookup, "B").unwrap(), Some(false));
        assert_eq!(bool_var(&lookup, "MISSING").unwrap(), None);

        let err = bool_var(&lookup, "C").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InitializationError);
        assert_eq!(err.context(), "config.env");
    }

    /// Validates a full set of variables overrides every default.
    #[test]
    fn test_load_from_lookup_all_vars_set() {
        let config = load_from_lookup(lookup_from(&[
            (ENV_MARKETPLACE_ID, "ATVPDKIKX0DER"),
            (ENV_BATCH_SIZE, "5"),
            (ENV_DELAY_BETWEEN_BATCHES_MS, "0"),
            (ENV_MAX_CONCURRENT_BATCHES, "3"),
            (ENV_CONTINUE_ON_ERROR, "false"),
            (ENV_MAX_RETRIES, "7"),
            (ENV_INITIAL_RETRY_DELAY_MS, "250"),
            (ENV_USE_EXPONENTIAL_BACKOFF, "0"),
            (ENV_MODULE_VERSIONS, "easyShip=2022-03-23,vendors=v1"),
        ]))
        .unwrap();

        assert_eq!(config.marketplace_id, "ATVPDKIKX0DER");
        assert_eq!(config.batch.batch_size, 5);
        assert_eq!(config.batch.delay_between_batches, Duration::ZERO);
        assert_eq!(config.batch.max_concurrent_batches, 3);
        assert!(!config.batch.continue_on_error);
        assert_eq!(config.batch.max_retries, 7);
        assert_eq!(config.batch.initial_retry_delay, Duration::from_millis(250));
        assert!(!config.batch.use_exponential_backoff);
        assert_eq!(config.module_versions.get("easyShip"), Some("2022-03-23"));
    }

    #[test]
    fn test_load_from_lookup_defaults() {
        let config = load_from_lookup(lookup_from(&[(ENV_MARKETPLACE_ID, "A1PA6795UKMFR9")])).unwrap();
        assert_eq!(config.batch, sellerlink_common::resilience::BatchConfig::default());
        assert!(config.module_versions.is_empty());
    }

    #[test]
    fn test_load_from_lookup_errors() {
        let err = load_from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err.context(), "config.env");

        let err = load_from_lookup(lookup_from(&[
            (ENV_MARKETPLACE_ID, "MP"),
            (ENV_BATCH_SIZE, "lots"),
        ]))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InitializationError);
        assert!(err.message().contains(ENV_BATCH_SIZE));

        let err = load_from_lookup(lookup_from(&[(ENV_MARKETPLACE_ID, "MP"), (ENV_BATCH_SIZE, "0")]))
            .unwrap_err();
        assert_eq!(err.context(), "batch_config.validate");
    }

    /// Validates the process environment path end to end.
    #[test]
    fn test_load_from_env() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var(ENV_MARKETPLACE_ID, "A1F83G8C2ARO7P");
        std::env::set_var(ENV_MAX_RETRIES, "1");

        let result = load_from_env();

        std::env::remove_var(ENV_MARKETPLACE_ID);
        std::env::remove_var(ENV_MAX_RETRIES);

        let config = result.unwrap();
        assert_eq!(config.marketplace_id, "A1F83G8C2ARO7P");
        assert_eq!(config.batch.max_retries, 1);
    }

    #[test]
    fn test_load_from_file_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sellerlink.toml");
        std::fs::write(
            &path,
            r#"
marketplaceId = "ATVPDKIKX0DER"

[moduleVersions]
easyShip = "2022-03-23"

[batch]
batchSize = 10
continueOnError = false
maxDelayMs = 30000
"#,
        )
        .unwrap();

        let config = load_from_file(Some(path)).unwrap();
        assert_eq!(config.marketplace_id, "ATVPDKIKX0DER");
        assert_eq!(config.module_versions.get("easyShip"), Some("2022-03-23"));
        assert_eq!(config.batch.batch_size, 10);
        assert!(!config.batch.continue_on_error);
        assert_eq!(config.batch.max_retry_delay, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_load_from_file_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"marketplaceId": "A1PA6795UKMFR9", "batch": {"maxRetries": 0}}"#)
            .unwrap();

        let config = load_from_file(Some(path)).unwrap();
        assert_eq!(config.marketplace_id, "A1PA6795UKMFR9");
        assert_eq!(config.batch.max_retries, 0);
    }

    #[test]
    fn test_load_from_file_errors() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/sellerlink.toml"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InitializationError);
        assert_eq!(err.context(), "config.file");

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "marketplaceId": "#).unwrap();
        let err = load_from_file(Some(path)).unwrap_err();
        assert_eq!(err.context(), "config.parse");

        let path = dir.path().join("config.toml");
        std::fs::write(&path, "batch = { batchSize = 5 }\n").unwrap();
        let err = load_from_file(Some(path)).unwrap_err();
        assert_eq!(err.context(), "connection_config.validate");
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let err = parse_config("marketplaceId: x", Path::new("sellerlink.yaml")).unwrap_err();
        assert_eq!(err.context(), "config.parse");
    }

    /// Validates probing order and parent-directory search.
    ///
    /// Assertions:
    /// - A file in a parent directory is found from a nested start.
    /// - `sellerlink.*` is preferred over `config.*` in the same directory.
    /// - Nothing is found more than two levels up.
    #[test]
    fn test_probe_config_paths_from() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        let deep = nested.join("c");
        std::fs::create_dir_all(&deep).unwrap();

        assert_eq!(probe_config_paths_from(&nested), None);

        std::fs::write(root.path().join("config.json"), "{}").unwrap();
        assert_eq!(probe_config_paths_from(&nested), Some(root.path().join("config.json")));
        assert_eq!(probe_config_paths_from(&deep), None);

        std::fs::write(root.path().join("sellerlink.toml"), "").unwrap();
        assert_eq!(probe_config_paths_from(&nested), Some(root.path().join("sellerlink.toml")));
    }
}
