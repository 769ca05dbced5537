//! Centralized configuration (environment variables + defaults).

use std::env;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_SHEET: &str = "User";
pub const DEFAULT_PRODUCT_SHEET: &str = "Product";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

/// Google Sheets connection settings.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    /// OAuth bearer token. Without it every call reports the store as unavailable.
    pub access_token: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// `None` runs the in-memory development store.
    pub sheets: Option<SheetsConfig>,
    pub user_sheet: String,
    pub product_sheet: String,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs = match var("SHEETS_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue("SHEETS_TIMEOUT_SECS".to_string()))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let sheets = var("GOOGLE_SHEETS_SPREADSHEET_ID").map(|spreadsheet_id| SheetsConfig {
            spreadsheet_id,
            access_token: var("GOOGLE_SHEETS_ACCESS_TOKEN"),
            api_base: var("GOOGLE_SHEETS_API_BASE")
                .unwrap_or_else(|| DEFAULT_SHEETS_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: Duration::from_secs(timeout_secs.max(1)),
        });

        Ok(AppConfig {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            sheets,
            user_sheet: var("USER_SHEET").unwrap_or_else(|| DEFAULT_USER_SHEET.to_string()),
            product_sheet: var("PRODUCT_SHEET").unwrap_or_else(|| DEFAULT_PRODUCT_SHEET.to_string()),
        })
    }

    pub fn dev_mode(&self) -> bool {
        self.sheets.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_to_development_mode() {
        let cfg = load(&[]).unwrap();
        assert!(cfg.dev_mode());
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(cfg.user_sheet, "User");
        assert_eq!(cfg.product_sheet, "Product");
    }

    #[test]
    fn spreadsheet_id_selects_google_backend() {
        let cfg = load(&[
            ("GOOGLE_SHEETS_SPREADSHEET_ID", "abc123"),
            ("GOOGLE_SHEETS_API_BASE", "http://localhost:9000/v4/"),
            ("SHEETS_TIMEOUT_SECS", "3"),
        ])
        .unwrap();
        let sheets = cfg.sheets.unwrap();
        assert_eq!(sheets.spreadsheet_id, "abc123");
        assert_eq!(sheets.access_token, None);
        assert_eq!(sheets.api_base, "http://localhost:9000/v4");
        assert_eq!(sheets.timeout, Duration::from_secs(3));
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = load(&[("SHEETS_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for SHEETS_TIMEOUT_SECS");
    }
}
