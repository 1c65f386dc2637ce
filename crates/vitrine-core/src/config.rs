use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let brands_csv_url = require("VITRINE_BRANDS_CSV_URL")?;
    let catalog_csv_url = require("VITRINE_CATALOG_CSV_URL")?;

    // Optional here; the enrichment subcommands require them at their own
    // entry points so a plain `build` run does not need enrichment secrets.
    let mirror_log_url = lookup("VITRINE_MIRROR_LOG_URL").ok();
    let drive_api_key = lookup("VITRINE_DRIVE_API_KEY").ok();
    let video_base_url = lookup("VITRINE_VIDEO_BASE_URL").ok();

    let drive_api_base = or_default(
        "VITRINE_DRIVE_API_BASE",
        "https://www.googleapis.com/drive/v3",
    );

    let output_path = PathBuf::from(or_default("VITRINE_OUTPUT_PATH", "./public/data.json"));
    let report_path = PathBuf::from(or_default(
        "VITRINE_REPORT_PATH",
        "./public/build-report.json",
    ));
    let placeholder_thumbnail = or_default(
        "VITRINE_PLACEHOLDER_THUMBNAIL",
        "images/placeholder.webp",
    );
    let public_dir = PathBuf::from(or_default("VITRINE_PUBLIC_DIR", "./public"));

    let http_timeout_secs = parse_u64("VITRINE_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("VITRINE_USER_AGENT", "vitrine/0.1 (catalog-pipeline)");
    let batch_size = parse_usize("VITRINE_BATCH_SIZE", "5")?;
    let bind_addr = parse_addr("VITRINE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("VITRINE_LOG_LEVEL", "info");

    Ok(AppConfig {
        brands_csv_url,
        catalog_csv_url,
        mirror_log_url,
        drive_api_base,
        drive_api_key,
        video_base_url,
        output_path,
        report_path,
        placeholder_thumbnail,
        public_dir,
        http_timeout_secs,
        user_agent,
        batch_size,
        bind_addr,
        log_level,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid values.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("VITRINE_BRANDS_CSV_URL", "https://example.com/brands.csv");
        m.insert("VITRINE_CATALOG_CSV_URL", "https://example.com/catalog.csv");
        m
    }

    #[test]
    fn build_app_config_fails_without_brands_url() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "VITRINE_BRANDS_CSV_URL"),
            "expected MissingEnvVar(VITRINE_BRANDS_CSV_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_without_catalog_url() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("VITRINE_BRANDS_CSV_URL", "https://example.com/brands.csv");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "VITRINE_CATALOG_CSV_URL"),
            "expected MissingEnvVar(VITRINE_CATALOG_CSV_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_required_vars_and_applies_defaults() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).expect("config should load");
        assert_eq!(cfg.brands_csv_url, "https://example.com/brands.csv");
        assert_eq!(cfg.catalog_csv_url, "https://example.com/catalog.csv");
        assert_eq!(cfg.drive_api_base, "https://www.googleapis.com/drive/v3");
        assert_eq!(cfg.placeholder_thumbnail, "images/placeholder.webp");
        assert_eq!(cfg.http_timeout_secs, 30);
        assert_eq!(cfg.batch_size, 5);
        assert!(cfg.drive_api_key.is_none());
        assert!(cfg.mirror_log_url.is_none());
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map = full_env();
        map.insert("VITRINE_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VITRINE_BIND_ADDR"),
            "expected InvalidEnvVar(VITRINE_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_with_invalid_batch_size() {
        let mut map = full_env();
        map.insert("VITRINE_BATCH_SIZE", "five");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VITRINE_BATCH_SIZE"),
            "expected InvalidEnvVar(VITRINE_BATCH_SIZE), got: {result:?}"
        );
    }

    #[test]
    fn require_drive_api_key_fails_when_absent() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let err = cfg.require_drive_api_key().unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingEnvVar(ref v) if v == "VITRINE_DRIVE_API_KEY")
        );
    }

    #[test]
    fn require_drive_api_key_returns_value_when_set() {
        let mut map = full_env();
        map.insert("VITRINE_DRIVE_API_KEY", "k-123");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.require_drive_api_key().unwrap(), "k-123");
    }
}
