use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DelphiError>;

#[derive(Error, Debug)]
pub enum DelphiError {
  #[error("Failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Malformed CSV in {path}: {source}")]
  Csv {
    path: PathBuf,
    #[source]
    source: csv::Error,
  },

  #[error("Malformed JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Malformed YAML: {0}")]
  Yaml(#[from] serde_yaml::Error),

  #[error("Unsupported table format '{extension}' for {path} (expected .csv or .json)")]
  UnsupportedFormat { path: PathBuf, extension: String },

  #[error("No {table} table configured")]
  MissingTable { table: &'static str },

  #[error("Unknown product '{product}'. Available: {available}")]
  UnknownProduct { product: String, available: String },

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),
}

impl DelphiError {
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    DelphiError::Io { path: path.into(), source }
  }

  pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
    DelphiError::Csv { path: path.into(), source }
  }
}
