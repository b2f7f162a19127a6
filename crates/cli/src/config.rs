//! Environment-driven configuration.

use splitledger_observability::LogFormat;

pub const FALLBACK_CURRENCY_VAR: &str = "SPLITLEDGER_FALLBACK_CURRENCY";
pub const LOG_FORMAT_VAR: &str = "SPLITLEDGER_LOG_FORMAT";

const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Currency assigned to drafts that do not name one.
    pub fallback_currency: String,
    pub log_format: LogFormat,
    /// `(variable, value)` pairs that were set but not understood.
    pub rejected: Vec<(&'static str, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_currency: DEFAULT_CURRENCY.to_string(),
            log_format: LogFormat::default(),
            rejected: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a closure over a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(FALLBACK_CURRENCY_VAR) {
            let currency = raw.trim();
            if is_currency_code(currency) {
                config.fallback_currency = currency.to_ascii_uppercase();
            } else if !currency.is_empty() {
                config.rejected.push((FALLBACK_CURRENCY_VAR, raw));
            }
        }

        if let Some(raw) = lookup(LOG_FORMAT_VAR) {
            if !raw.trim().is_empty() {
                match LogFormat::parse(&raw) {
                    Some(format) => config.log_format = format,
                    None => config.rejected.push((LOG_FORMAT_VAR, raw)),
                }
            }
        }

        config
    }

    /// Report ignored variables. Call after tracing is initialized.
    pub fn log_rejected(&self) {
        for (var, value) in &self.rejected {
            tracing::warn!(var, value = value.as_str(), "ignoring unrecognised setting; using default");
        }
    }
}

/// ISO 4217 shape: three ASCII letters.
fn is_currency_code(raw: &str) -> bool {
    raw.len() == 3 && raw.chars().all(|c| c.is_ascii_alphabetic())
}
