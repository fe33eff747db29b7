//! Review and audit rows as they arrive from the upstream tables.
//!
//! Column names follow the warehouse convention (`PRODUCT`, `SENTIMENT_SCORE`,
//! ...) so the same structs read CSV exports and JSON dumps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Coarse sentiment bucket assigned upstream from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SentimentLabel {
  Positive,
  Neutral,
  Negative,
}

impl SentimentLabel {
  pub const ALL: [SentimentLabel; 3] =
    [SentimentLabel::Positive, SentimentLabel::Neutral, SentimentLabel::Negative];

  pub fn as_str(&self) -> &'static str {
    match self {
      SentimentLabel::Positive => "Positive",
      SentimentLabel::Neutral => "Neutral",
      SentimentLabel::Negative => "Negative",
    }
  }

  pub fn parse(value: &str) -> Option<Self> {
    match value.trim().to_ascii_lowercase().as_str() {
      "positive" => Some(SentimentLabel::Positive),
      "neutral" => Some(SentimentLabel::Neutral),
      "negative" => Some(SentimentLabel::Negative),
      _ => None,
    }
  }
}

impl fmt::Display for SentimentLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for SentimentLabel {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    SentimentLabel::parse(&s).ok_or_else(|| {
      serde::de::Error::custom(format!(
        "expected Positive, Neutral or Negative sentiment label, got '{s}'"
      ))
    })
  }
}

/// One scored review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ReviewRecord {
  pub product: String,
  pub date: NaiveDate,
  pub sentiment_score: f64,
  pub sentiment_label: SentimentLabel,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub translated_review: String,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub summary: String,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub filename: String,
}

/// Missing and null text cells both read as an empty string
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Processing outcome for one ingested source file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuditStatus {
  Success,
  InvalidFormat,
  EmptyFile,
  /// Any other failure reason, kept verbatim
  Failed(String),
}

impl AuditStatus {
  pub fn parse(value: &str) -> Self {
    match value.trim() {
      "SUCCESS" => AuditStatus::Success,
      "FAILED: Invalid Format" => AuditStatus::InvalidFormat,
      "FAILED: Empty File" => AuditStatus::EmptyFile,
      other => AuditStatus::Failed(other.to_string()),
    }
  }

  pub fn is_success(&self) -> bool {
    matches!(self, AuditStatus::Success)
  }
}

impl fmt::Display for AuditStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AuditStatus::Success => f.write_str("SUCCESS"),
      AuditStatus::InvalidFormat => f.write_str("FAILED: Invalid Format"),
      AuditStatus::EmptyFile => f.write_str("FAILED: Empty File"),
      AuditStatus::Failed(reason) => f.write_str(reason),
    }
  }
}

impl Serialize for AuditStatus {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for AuditStatus {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(AuditStatus::parse(&s))
  }
}

/// One row of the ingestion audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AuditEntry {
  pub file_path: String,
  pub file_size: u64,
  #[serde(deserialize_with = "deserialize_timestamp")]
  pub last_modified: DateTime<Utc>,
  pub status: AuditStatus,
}

/// Accepts RFC 3339 or the warehouse's `YYYY-MM-DD HH:MM:SS[.fff]` (read as UTC).
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
  D: Deserializer<'de>,
{
  let s = String::deserialize(deserializer)?;
  parse_timestamp(&s).ok_or_else(|| {
    serde::de::Error::custom(format!("expected RFC 3339 or 'YYYY-MM-DD HH:MM:SS' timestamp, got '{s}'"))
  })
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
  let value = value.trim();
  if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
    return Some(ts.with_timezone(&Utc));
  }
  ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    .map(|naive| naive.and_utc())
}
