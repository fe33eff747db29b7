//! Ingestion health computed from the audit log.

use serde::Serialize;

use crate::model::{AuditEntry, AuditStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
  pub status: AuditStatus,
  pub count: usize,
  /// Percentage of all audited files, 0-100
  pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditHealth {
  pub total_files: usize,
  /// Most frequent status first; ties keep first-seen order
  pub statuses: Vec<StatusCount>,
  pub success_pct: f64,
  pub fail_pct: f64,
  pub anomalies: Vec<AuditEntry>,
}

impl AuditHealth {
  pub fn is_healthy(&self) -> bool {
    self.anomalies.is_empty()
  }
}

pub fn audit_health(entries: &[AuditEntry]) -> AuditHealth {
  let total_files = entries.len();

  let mut statuses: Vec<StatusCount> = Vec::new();
  for entry in entries {
    match statuses.iter_mut().find(|s| s.status == entry.status) {
      Some(existing) => existing.count += 1,
      None => statuses.push(StatusCount { status: entry.status.clone(), count: 1, percent: 0.0 }),
    }
  }
  for status in &mut statuses {
    status.percent = status.count as f64 / total_files as f64 * 100.0;
  }
  statuses.sort_by(|a, b| b.count.cmp(&a.count));

  let success_pct = statuses.iter().find(|s| s.status.is_success()).map_or(0.0, |s| s.percent);
  let anomalies: Vec<AuditEntry> = entries.iter().filter(|e| !e.status.is_success()).cloned().collect();

  if !anomalies.is_empty() {
    tracing::debug!("{} of {total_files} audited files failed ingestion", anomalies.len());
  }

  AuditHealth { total_files, statuses, success_pct, fail_pct: 100.0 - success_pct, anomalies }
}
