//! Table sources for reviews and the ingestion audit log.
//!
//! Tables arrive as CSV exports or JSON arrays of row objects; the file
//! extension picks the parser.

use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config::AuditFallback;
use crate::model::{AuditEntry, ReviewRecord};
use crate::{DelphiError, Result};

pub trait ReviewSource {
  fn load_reviews(&self) -> Result<Vec<ReviewRecord>>;
}

pub trait AuditSource {
  fn load_audit(&self) -> Result<Vec<AuditEntry>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
  Csv,
  Json,
}

impl TableFormat {
  pub fn from_path(path: &Path) -> Result<Self> {
    let extension =
      path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).unwrap_or_default();
    match extension.as_str() {
      "csv" => Ok(TableFormat::Csv),
      "json" => Ok(TableFormat::Json),
      _ => Err(DelphiError::UnsupportedFormat { path: path.to_path_buf(), extension }),
    }
  }
}

/// A table stored in a local file. The format is checked when the table is
/// read, so an unsupported audit file goes through the same fallback as a
/// missing one.
#[derive(Debug, Clone)]
pub struct TableFile {
  path: PathBuf,
}

impl TableFile {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  fn rows<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
    let format = TableFormat::from_path(&self.path)?;
    let file = std::fs::File::open(&self.path).map_err(|e| DelphiError::io(&self.path, e))?;
    match format {
      TableFormat::Csv => read_csv(file).map_err(|e| DelphiError::csv(&self.path, e)),
      TableFormat::Json => Ok(serde_json::from_reader(std::io::BufReader::new(file))?),
    }
  }
}

impl ReviewSource for TableFile {
  fn load_reviews(&self) -> Result<Vec<ReviewRecord>> {
    let rows = self.rows()?;
    tracing::debug!("loaded {} review rows from {}", rows.len(), self.path.display());
    Ok(rows)
  }
}

impl AuditSource for TableFile {
  fn load_audit(&self) -> Result<Vec<AuditEntry>> {
    let rows = self.rows()?;
    tracing::debug!("loaded {} audit rows from {}", rows.len(), self.path.display());
    Ok(rows)
  }
}

/// Deserialize every row of a headed CSV stream
pub fn read_csv<T: DeserializeOwned, R: Read>(reader: R) -> std::result::Result<Vec<T>, csv::Error> {
  csv::ReaderBuilder::new()
    .has_headers(true)
    .trim(csv::Trim::All)
    .from_reader(reader)
    .deserialize()
    .collect()
}

/// Why the audit log was replaced by an empty one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditGap {
  NotConfigured,
  Unavailable(String),
}

/// Both tables, loaded once per report
#[derive(Debug, Clone, Default)]
pub struct Tables {
  pub reviews: Vec<ReviewRecord>,
  pub audit: Vec<AuditEntry>,
  /// Set when `audit` is a substitute for a log that could not be read
  pub audit_gap: Option<AuditGap>,
}

/// Load the review table and the audit log.
///
/// A review failure is fatal. An audit failure (or no audit source at all)
/// follows `fallback`.
pub fn load_tables(
  reviews: &dyn ReviewSource,
  audit: Option<&dyn AuditSource>,
  fallback: AuditFallback,
) -> Result<Tables> {
  let reviews = reviews.load_reviews()?;

  let (audit, audit_gap) = match (audit.map(|source| source.load_audit()), fallback) {
    (Some(Ok(entries)), _) => (entries, None),
    (Some(Err(e)), AuditFallback::SubstituteEmpty) => {
      tracing::debug!("audit log unavailable, substituting an empty log: {e}");
      (Vec::new(), Some(AuditGap::Unavailable(e.to_string())))
    }
    (None, AuditFallback::SubstituteEmpty) => {
      tracing::debug!("no audit log configured, substituting an empty log");
      (Vec::new(), Some(AuditGap::NotConfigured))
    }
    (Some(Err(e)), AuditFallback::Fail) => return Err(e),
    (None, AuditFallback::Fail) => return Err(DelphiError::MissingTable { table: "audit" }),
  };

  Ok(Tables { reviews, audit, audit_gap })
}
