//! INI configuration adapter.
//!
//! Section and key names are case-insensitive. A value that is present but
//! does not parse as the requested number is logged and replaced by the
//! caller's default.

use crate::domain::error::AnalysisError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;
use tracing::warn;

pub struct FileConfigAdapter {
    ini: Ini,
    source: String,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let mut ini = Ini::new();
        ini.load(path).map_err(|reason| AnalysisError::ConfigParse {
            file: source.clone(),
            reason,
        })?;
        Ok(Self { ini, source })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut ini = Ini::new();
        ini.read(content.to_string())?;
        Ok(Self {
            ini,
            source: "<inline>".to_string(),
        })
    }

    fn numeric<T>(&self, section: &str, key: &str, parsed: Result<Option<T>, String>, default: T) -> T {
        match parsed {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(reason) => {
                warn!(source = %self.source, section, key, %reason, "ignoring unparseable config value");
                default
            }
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.ini.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.numeric(section, key, self.ini.getint(section, key), default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.numeric(section, key, self.ini.getfloat(section, key), default)
    }

    fn keys(&self, section: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .ini
            .get_map_ref()
            .get(&section.to_lowercase())
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}
