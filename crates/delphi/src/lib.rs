//! Delphi - Product Review Intelligence
//!
//! Reads a scored product-review table and an ingestion audit log, then
//! reports per-scope sentiment analytics, a severity-graded negative-theme
//! insight with keyword ranking, and pipeline health.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod dashboard;
mod error;
pub mod health;
pub mod insight;
pub mod model;
pub mod render;
pub mod scope;
pub mod source;

pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{DelphiError, Result};
pub use insight::{derive_insight, InsightEngine, InsightReport, SeverityTier};
pub use model::{AuditEntry, AuditStatus, ReviewRecord, SentimentLabel};
pub use scope::ProductScope;
