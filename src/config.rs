//! Sweep configuration: embedded defaults from defaults.toml plus command-line overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Structure to deserialize the defaults from TOML
#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    marker: String,
    #[serde(default)]
    extensions: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
}

// Embed the TOML file directly in the binary at compile time
const DEFAULTS_TOML: &str = include_str!("../defaults.toml");

/// Everything a sweep needs to know, passed explicitly to the scanner
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Directory to sweep
    pub root: PathBuf,
    /// Identifier whose calls are removed (e.g. `console.log`)
    pub marker: String,
    /// File extensions to consider, lowercase without the leading dot
    pub extensions: Vec<String>,
    /// Directory names that are never descended into
    pub exclude: Vec<String>,
}

impl SweepConfig {
    /// Build a config for `root` from the embedded defaults
    pub fn from_defaults(root: impl Into<PathBuf>) -> Result<Self> {
        let defaults: DefaultsConfig =
            toml::from_str(DEFAULTS_TOML).context("Failed to parse defaults TOML file")?;

        Ok(SweepConfig {
            root: root.into(),
            marker: defaults.marker,
            extensions: defaults
                .extensions
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect(),
            exclude: defaults.exclude,
        })
    }

    /// Replace the marker
    pub fn with_marker(mut self, marker: &str) -> Self {
        self.marker = marker.to_string();
        self
    }

    /// Add extensions on top of the defaults, skipping duplicates
    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        for ext in extensions {
            let ext = normalize_extension(ext);
            if !ext.is_empty() && !self.extensions.contains(&ext) {
                self.extensions.push(ext);
            }
        }
        self
    }

    /// Add excluded directory names, optionally dropping the defaults first
    pub fn with_excludes(mut self, excludes: &[String], keep_defaults: bool) -> Self {
        if !keep_defaults {
            self.exclude.clear();
        }
        for name in excludes {
            if !self.exclude.contains(name) {
                self.exclude.push(name.clone());
            }
        }
        self
    }

    /// Check if a file has one of the configured extensions
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.extensions.contains(&ext))
    }
}

/// Lowercase and strip a leading dot, so `.TS` and `ts` mean the same thing
fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let config = SweepConfig::from_defaults(".").unwrap();
        assert_eq!(config.marker, "console.log");
        assert!(config.extensions.contains(&"js".to_string()));
        assert!(config.extensions.contains(&"tsx".to_string()));
        assert!(config.exclude.contains(&"node_modules".to_string()));
        assert_eq!(config.root, PathBuf::from("."));
    }

    #[test]
    fn test_matches_extension() {
        let config = SweepConfig::from_defaults(".").unwrap();
        assert!(config.matches_extension(Path::new("src/app.ts")));
        assert!(config.matches_extension(Path::new("src/App.TSX")));
        assert!(!config.matches_extension(Path::new("src/main.rs")));
        assert!(!config.matches_extension(Path::new("Makefile")));
    }

    #[test]
    fn test_with_extensions_normalizes() {
        let config = SweepConfig::from_defaults(".")
            .unwrap()
            .with_extensions(&[".VUE".to_string(), "js".to_string()]);
        assert!(config.matches_extension(Path::new("component.vue")));
        assert_eq!(config.extensions.iter().filter(|e| *e == "js").count(), 1);
    }

    #[test]
    fn test_with_excludes_keeps_defaults() {
        let config = SweepConfig::from_defaults(".")
            .unwrap()
            .with_excludes(&["vendor".to_string()], true);
        assert!(config.exclude.contains(&"vendor".to_string()));
        assert!(config.exclude.contains(&"node_modules".to_string()));
    }

    #[test]
    fn test_with_excludes_without_defaults() {
        let config = SweepConfig::from_defaults(".")
            .unwrap()
            .with_excludes(&["vendor".to_string()], false);
        assert_eq!(config.exclude, vec!["vendor".to_string()]);
    }

    #[test]
    fn test_with_marker() {
        let config = SweepConfig::from_defaults(".")
            .unwrap()
            .with_marker("console.debug");
        assert_eq!(config.marker, "console.debug");
    }
}
