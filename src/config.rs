use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ReportError};
use crate::reporter::Options;

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
    #[serde(default, skip_serializing_if = "Options::is_empty")]
    pub options: Options,
}

pub fn config_path() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return PathBuf::from(xdg).join("tsreport").join("config.json");
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tsreport")
        .join("config.json")
}

fn non_blank(value: &serde_json::Value) -> Option<String> {
    let s = value.as_str()?;
    (!s.trim().is_empty()).then(|| s.to_string())
}

pub fn load_config_from(path: &std::path::Path) -> Config {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(_) => return Config::default(),
    };
    let raw: serde_json::Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("ignoring unreadable config {}: {e}", path.display());
            return Config::default();
        }
    };
    let obj = match raw.as_object() {
        Some(o) => o,
        None => return Config::default(),
    };

    let options = obj
        .get("options")
        .and_then(|v| v.as_object())
        .map(|opts| {
            opts.iter()
                .filter_map(|(k, v)| non_blank(v).map(|v| (k.clone(), v)))
                .collect()
        })
        .unwrap_or_default();

    Config {
        reporter: obj.get("reporter").and_then(non_blank),
        options,
    }
}

pub fn load_config() -> Config {
    load_config_from(&config_path())
}

pub fn save_config_to(path: &std::path::Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    let content = format!("{json}\n");

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, &content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&temp_path, perms)?;
    }

    std::fs::rename(&temp_path, path)?;
    log::debug!("saved config to {}", path.display());
    Ok(())
}

/// Splits `KEY=VALUE`; the value may itself contain `=`.
pub fn parse_option(value: &str) -> Result<(String, String)> {
    let (key, val) = value
        .split_once('=')
        .ok_or_else(|| ReportError::InvalidOption(value.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ReportError::InvalidOption(value.to_string()));
    }
    Ok((key.to_string(), val.to_string()))
}

pub fn parse_options(values: &[String]) -> Result<Options> {
    values.iter().map(String::as_str).map(parse_option).collect()
}
