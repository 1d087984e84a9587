use crate::error::{Result, TtsError};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Key/value configuration handed to a TTS plugin.
///
/// Values keep their original type; string accessors accept numbers as well
/// so `duration_stretch = 1.2` and `"1.2"` behave alike.
#[derive(Clone, Debug, Default)]
pub struct TtsConfig {
    values: Map<String, Value>,
}

impl TtsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file (path via MIMIC_TTS_CONFIG or ./mimic_tts.toml).
    /// Missing or broken files fall back to an empty bundle.
    pub fn load() -> Self {
        let path = std::env::var("MIMIC_TTS_CONFIG").unwrap_or_else(|_| "mimic_tts.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(target = "tts", path = %path, "No TOML config found; using defaults");
            return Self::default();
        }
        match Self::load_from(p) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(target = "tts", path = %path, error = %e, "Failed to load TOML config; using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(s)?;
        let values = serde_json::to_value(table)
            .map_err(|e| TtsError::InvalidConfig(e.to_string()))?;
        match values {
            Value::Object(values) => Ok(Self { values }),
            other => Err(TtsError::InvalidConfig(format!(
                "expected a table, got {}",
                other
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String form of a string or number. Empty strings, booleans, nulls,
    /// arrays and tables count as absent.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn get_str_or(&self, key: &str, default: &str) -> String {
        self.get_str(key).unwrap_or_else(|| default.to_string())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }
}
