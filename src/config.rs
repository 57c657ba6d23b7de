//! Runtime settings read from the environment (and `.env`)

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::services::dashboard_service::{DashboardSettings, DEFAULT_CHART_POINTS};
use crate::services::rules_service::Thresholds;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REPO_URL: &str = "https://github.com/";
pub const DEFAULT_CHART_OUTPUT: &str = "usdbrl_chart.png";
pub const DEFAULT_CHART_SIZE: (u32, u32) = (900, 320);

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub chart_output: PathBuf,
    pub chart_size: (u32, u32),
    pub dashboard: DashboardSettings,
    pub webhook_url: Option<String>,
    pub thresholds: Thresholds,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let chart_points: usize = parse_or(&get, "CHART_POINTS", DEFAULT_CHART_POINTS)?;
        if chart_points == 0 {
            return Err(invalid("CHART_POINTS", "0", "must be at least 1"));
        }

        let width: u32 = parse_or(&get, "CHART_WIDTH", DEFAULT_CHART_SIZE.0)?;
        let height: u32 = parse_or(&get, "CHART_HEIGHT", DEFAULT_CHART_SIZE.1)?;
        if width == 0 || height == 0 {
            return Err(invalid(
                "CHART_WIDTH/CHART_HEIGHT",
                &format!("{}x{}", width, height),
                "must be non-zero",
            ));
        }

        Ok(Self {
            base_url: get("DASHBOARD_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            chart_output: PathBuf::from(
                get("CHART_OUTPUT").unwrap_or_else(|| DEFAULT_CHART_OUTPUT.to_string()),
            ),
            chart_size: (width, height),
            dashboard: DashboardSettings {
                repo_url: get("REPO_URL").unwrap_or_else(|| DEFAULT_REPO_URL.to_string()),
                chart_points,
            },
            webhook_url: get("DISCORD_WEBHOOK_URL"),
            thresholds: Thresholds {
                below: parse_opt(&get, "NOTIFY_BELOW")?,
                above: parse_opt(&get, "NOTIFY_ABOVE")?,
            },
        })
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_opt<T, G>(get: &G, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| invalid(key, &raw, &e.to_string())),
        None => Ok(None),
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(get, key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.chart_output, PathBuf::from(DEFAULT_CHART_OUTPUT));
        assert_eq!(cfg.chart_size, DEFAULT_CHART_SIZE);
        assert_eq!(cfg.dashboard.chart_points, 60);
        assert_eq!(cfg.dashboard.repo_url, DEFAULT_REPO_URL);
        assert!(cfg.webhook_url.is_none());
        assert!(!cfg.thresholds.is_configured());
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("DASHBOARD_BASE_URL", "https://example.github.io/cofre"),
            ("CHART_OUTPUT", "out/chart.svg"),
            ("CHART_WIDTH", "640"),
            ("CHART_HEIGHT", "240"),
            ("CHART_POINTS", "30"),
            ("DISCORD_WEBHOOK_URL", "https://discord.com/api/webhooks/1/abc"),
            ("NOTIFY_BELOW", "5.0"),
            ("NOTIFY_ABOVE", "5.5"),
        ])
        .unwrap();

        assert_eq!(cfg.base_url, "https://example.github.io/cofre");
        assert_eq!(cfg.chart_output, PathBuf::from("out/chart.svg"));
        assert_eq!(cfg.chart_size, (640, 240));
        assert_eq!(cfg.dashboard.chart_points, 30);
        assert!(cfg.webhook_url.is_some());
        assert_eq!(cfg.thresholds.below, Some(5.0));
        assert_eq!(cfg.thresholds.above, Some(5.5));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let cfg = config(&[("DISCORD_WEBHOOK_URL", "   "), ("NOTIFY_BELOW", "")]).unwrap();
        assert!(cfg.webhook_url.is_none());
        assert!(cfg.thresholds.below.is_none());
    }

    #[test]
    fn test_invalid_values() {
        let err = config(&[("CHART_POINTS", "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "CHART_POINTS"));

        assert!(config(&[("CHART_POINTS", "0")]).is_err());
        assert!(config(&[("CHART_WIDTH", "0")]).is_err());
        assert!(config(&[("NOTIFY_ABOVE", "five")]).is_err());
    }
}
