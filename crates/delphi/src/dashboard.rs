//! One complete report for a product scope.

use serde::Serialize;

use crate::analytics::{self, AnalyticsView, Kpis, SummaryEntry};
use crate::health::{self, AuditHealth};
use crate::insight::{InsightEngine, InsightReport};
use crate::model::ReviewRecord;
use crate::scope::ProductScope;
use crate::source::Tables;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
  pub scope: ProductScope,
  pub kpis: Kpis,
  pub analytics: AnalyticsView,
  pub summaries: Vec<SummaryEntry>,
  pub insight: InsightReport,
  pub health: AuditHealth,
  pub rows: Vec<ReviewRecord>,
}

impl Dashboard {
  /// Recompute every view from scratch for `scope`
  pub fn build(tables: &Tables, scope: ProductScope, engine: &InsightEngine) -> Self {
    let scoped = scope.apply(&tables.reviews);
    tracing::info!("building report for {} ({} of {} reviews)", scope, scoped.len(), tables.reviews.len());

    Self {
      kpis: analytics::kpis(&scoped, &scope),
      analytics: analytics::analytics_view(&tables.reviews, &scoped, &scope),
      summaries: analytics::summaries(&scoped),
      insight: engine.derive(scoped.iter().copied()),
      health: health::audit_health(&tables.audit),
      rows: scoped.into_iter().cloned().collect(),
      scope,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::InsightConfig;
  use crate::insight::SeverityTier;
  use crate::model::SentimentLabel;
  use chrono::NaiveDate;

  fn review(product: &str, score: f64, text: &str) -> ReviewRecord {
    ReviewRecord {
      product: product.to_string(),
      date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
      sentiment_score: score,
      sentiment_label: if score < 0.0 { SentimentLabel::Negative } else { SentimentLabel::Positive },
      translated_review: text.to_string(),
      summary: String::new(),
      filename: "f.csv".to_string(),
    }
  }

  fn tables() -> Tables {
    Tables {
      reviews: vec![
        review("Boot", -0.8, "stitching came apart"),
        review("Boot", 0.9, "love it"),
        review("Parka", 0.4, "warm"),
        review("Parka", 0.6, "very warm"),
      ],
      audit: Vec::new(),
      audit_gap: None,
    }
  }

  #[test]
  fn test_build_for_single_product() {
    let engine = InsightEngine::new(InsightConfig::default()).unwrap();
    let dashboard = Dashboard::build(&tables(), ProductScope::Product("Boot".into()), &engine);

    assert_eq!(dashboard.kpis.total_reviews, 2);
    assert_eq!(dashboard.rows.len(), 2);
    assert!(dashboard.analytics.comparison.is_none());
    assert_eq!(dashboard.insight.tier, SeverityTier::Critical);
    assert_eq!(dashboard.insight.keywords[0].keyword, "stitching");
    assert!(dashboard.health.is_healthy());
  }

  #[test]
  fn test_build_for_all_products() {
    let engine = InsightEngine::new(InsightConfig::default()).unwrap();
    let dashboard = Dashboard::build(&tables(), ProductScope::All, &engine);

    assert_eq!(dashboard.kpis.total_reviews, 4);
    assert_eq!(dashboard.analytics.comparison.as_ref().unwrap().volumes.len(), 2);
    assert_eq!(dashboard.insight.tier, SeverityTier::Significant);

    let json = serde_json::to_value(&dashboard).unwrap();
    assert_eq!(json["scope"], "All Products");
    assert_eq!(json["insight"]["tier"], "significant");
  }
}
