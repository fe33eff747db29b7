//! Configuration management for Delphi
//!
//! Handles loading, validating, and saving the insight thresholds, the
//! keyword vocabulary, the audit fallback policy, and default table paths.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{DelphiError, Result};

pub const CONFIG_ENV_VAR: &str = "DELPHI_CONFIG";

const LOCAL_CONFIG_PATHS: [&str; 4] = [".delphi.json", "delphi.json", ".delphi.yaml", "delphi.yaml"];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub insight: InsightConfig,
  #[serde(default)]
  pub audit: AuditConfig,
  #[serde(default)]
  pub data: DataConfig,
}

/// Knobs for negative-sentiment insight derivation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
  /// Reviews scoring strictly below this are negative
  #[serde(default = "default_negative_threshold")]
  pub negative_threshold: f64,
  /// Candidate pain-point keywords, in tie-break order
  #[serde(default = "default_keywords")]
  pub keywords: Vec<String>,
  /// Negative share above which the scope is Critical
  #[serde(default = "default_critical_above")]
  pub critical_above: f64,
  /// Negative share above which the scope is Significant
  #[serde(default = "default_significant_above")]
  pub significant_above: f64,
  /// How many ranked keywords the report shows
  #[serde(default = "default_max_pain_points")]
  pub max_pain_points: usize,
}

fn default_negative_threshold() -> f64 {
  -0.3
}
fn default_keywords() -> Vec<String> {
  ["stitching", "size", "waterproof", "smell", "grip", "durability", "quality", "price", "warmth"]
    .iter()
    .map(|k| k.to_string())
    .collect()
}
fn default_critical_above() -> f64 {
  0.25
}
fn default_significant_above() -> f64 {
  0.10
}
fn default_max_pain_points() -> usize {
  5
}

impl Default for InsightConfig {
  fn default() -> Self {
    Self {
      negative_threshold: default_negative_threshold(),
      keywords: default_keywords(),
      critical_above: default_critical_above(),
      significant_above: default_significant_above(),
      max_pain_points: default_max_pain_points(),
    }
  }
}

impl InsightConfig {
  pub fn validate(&self) -> Result<()> {
    let bounds = [
      ("negative_threshold", self.negative_threshold),
      ("critical_above", self.critical_above),
      ("significant_above", self.significant_above),
    ];
    if let Some((name, _)) = bounds.iter().find(|(_, v)| !v.is_finite()) {
      return Err(DelphiError::InvalidConfig(format!("insight.{name} must be a finite number")));
    }

    for (name, value) in &bounds[1..] {
      if !(0.0..=1.0).contains(value) {
        return Err(DelphiError::InvalidConfig(format!(
          "insight.{name} must be a proportion between 0 and 1, got {value}"
        )));
      }
    }

    if self.critical_above < self.significant_above {
      return Err(DelphiError::InvalidConfig(format!(
        "insight.critical_above ({}) must not be below insight.significant_above ({})",
        self.critical_above, self.significant_above
      )));
    }

    if self.keywords.iter().any(|k| k.trim().is_empty()) {
      return Err(DelphiError::InvalidConfig("insight.keywords must not contain blank entries".into()));
    }

    Ok(())
  }
}

/// What to do when the audit table cannot be loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditFallback {
  /// Warn and continue with an empty audit log
  #[default]
  SubstituteEmpty,
  /// Treat the failure like any other load error
  Fail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
  #[serde(default)]
  pub on_missing: AuditFallback,
}

/// Default table locations, overridable from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reviews: Option<PathBuf>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub audit: Option<PathBuf>,
}

impl DataConfig {
  fn resolve_against(&mut self, base: &Path) {
    for table in [&mut self.reviews, &mut self.audit].into_iter().flatten() {
      if table.is_relative() {
        *table = base.join(&*table);
      }
    }
  }
}

fn is_yaml(path: &Path) -> bool {
  matches!(path.extension().and_then(|e| e.to_str()), Some("yaml") | Some("yml"))
}

impl Config {
  /// Load configuration from a file (YAML for `.yaml`/`.yml`, JSON otherwise).
  ///
  /// Relative table paths are taken relative to the file's directory.
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| DelphiError::io(path, e))?;
    let mut config: Config =
      if is_yaml(path) { serde_yaml::from_str(&content)? } else { serde_json::from_str(&content)? };
    config.insight.validate()?;
    if let Some(base) = path.parent() {
      config.data.resolve_against(base);
    }
    Ok(config)
  }

  /// Locate the configuration file to use, if any.
  ///
  /// Order: `DELPHI_CONFIG`, then the working directory, then the user
  /// config directory.
  pub fn discover() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
      if !explicit.trim().is_empty() {
        return Some(PathBuf::from(explicit));
      }
    }

    if let Some(local) = LOCAL_CONFIG_PATHS.iter().map(PathBuf::from).find(|p| p.exists()) {
      return Some(local);
    }

    dirs::config_dir().map(|dir| dir.join("delphi").join("config.json")).filter(|p| p.exists())
  }

  /// Load the discovered configuration or defaults
  pub fn load() -> Result<Self> {
    match Self::discover() {
      Some(path) => {
        tracing::debug!("loading configuration from {}", path.display());
        Self::load_from_file(path)
      }
      None => Ok(Config::default()),
    }
  }

  /// Save configuration to a file
  pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
    let path = path.as_ref();
    let content =
      if is_yaml(path) { serde_yaml::to_string(self)? } else { serde_json::to_string_pretty(self)? };
    std::fs::write(path, content).map_err(|e| DelphiError::io(path, e))?;
    Ok(())
  }
}
