// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Checker configuration, with defaults and environment overrides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Element types the cleaner keeps one instance of, in processing order.
pub const DEFAULT_WHITELIST: [&str; 12] = [
    "IfcWall",
    "IfcDoor",
    "IfcWindow",
    "IfcSlab",
    "IfcColumn",
    "IfcBeam",
    "IfcRoof",
    "IfcStair",
    "IfcRamp",
    "IfcSpace",
    "IfcZone",
    "IfcCovering",
];

/// What a path-based operation does when a file cannot be opened or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Return the error to the caller.
    Strict,
    /// Log it and fall back to an empty result.
    #[default]
    Tolerant,
}

impl FromStr for FailureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(FailureMode::Strict),
            "tolerant" => Ok(FailureMode::Tolerant),
            other => Err(format!("unknown failure mode '{}'", other)),
        }
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureMode::Strict => f.write_str("strict"),
            FailureMode::Tolerant => f.write_str("tolerant"),
        }
    }
}

/// Checker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Error policy for catalog operations and the cleaner.
    pub failure_mode: FailureMode,
    /// Log progress and swallowed errors at info/warn.
    pub diagnostics: bool,
    /// Element types retained by the cleaner.
    pub whitelist: Vec<String>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            failure_mode: FailureMode::default(),
            diagnostics: false,
            whitelist: DEFAULT_WHITELIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CheckerConfig {
    /// Load configuration from environment variables.
    ///
    /// - `IFC_CHECKER_FAILURE_MODE`: `strict` or `tolerant`
    /// - `IFC_CHECKER_DIAGNOSTICS`: `1`, `true`, `yes` or `on`
    /// - `IFC_CHECKER_WHITELIST`: comma-separated type names
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CheckerConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            failure_mode: lookup("IFC_CHECKER_FAILURE_MODE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.failure_mode),
            diagnostics: lookup("IFC_CHECKER_DIAGNOSTICS")
                .map(|v| {
                    matches!(
                        v.trim().to_ascii_lowercase().as_str(),
                        "1" | "true" | "yes" | "on"
                    )
                })
                .unwrap_or(defaults.diagnostics),
            whitelist: lookup("IFC_CHECKER_WHITELIST")
                .map(|v| split_list(&v))
                .filter(|list| !list.is_empty())
                .unwrap_or(defaults.whitelist),
        }
    }

    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    pub fn with_whitelist<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = types.into_iter().map(Into::into).collect();
        self
    }

    /// True when failures are returned instead of absorbed
    pub fn is_strict(&self) -> bool {
        self.failure_mode == FailureMode::Strict
    }
}

/// Split a comma-separated list, dropping blanks
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CheckerConfig::default();
        assert_eq!(config.failure_mode, FailureMode::Tolerant);
        assert!(!config.diagnostics);
        assert_eq!(config.whitelist.len(), 12);
        assert_eq!(config.whitelist[0], "IfcWall");
        assert_eq!(config.whitelist[11], "IfcCovering");
    }

    #[test]
    fn test_from_lookup() {
        let config = CheckerConfig::from_lookup(lookup(&[
            ("IFC_CHECKER_FAILURE_MODE", "Strict"),
            ("IFC_CHECKER_DIAGNOSTICS", "1"),
            ("IFC_CHECKER_WHITELIST", "IfcWall, IfcDoor,,"),
        ]));
        assert!(config.is_strict());
        assert!(config.diagnostics);
        assert_eq!(config.whitelist, vec!["IfcWall", "IfcDoor"]);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let config = CheckerConfig::from_lookup(lookup(&[
            ("IFC_CHECKER_FAILURE_MODE", "sometimes"),
            ("IFC_CHECKER_WHITELIST", " , "),
        ]));
        assert_eq!(config, CheckerConfig::default());
    }

    #[test]
    fn test_builder_setters() {
        let config = CheckerConfig::default()
            .with_failure_mode(FailureMode::Strict)
            .with_diagnostics(true)
            .with_whitelist(["IfcSlab"]);
        assert!(config.is_strict());
        assert!(config.diagnostics);
        assert_eq!(config.whitelist, vec!["IfcSlab"]);
    }

    #[test]
    fn test_serde() {
        let config: CheckerConfig =
            serde_json::from_str(r#"{"failure_mode":"strict"}"#).unwrap();
        assert!(config.is_strict());
        assert_eq!(config.whitelist.len(), DEFAULT_WHITELIST.len());

        let json = serde_json::to_string(&FailureMode::Tolerant).unwrap();
        assert_eq!(json, r#""tolerant""#);
    }
}
