//! Aggregate views over the scoped review table: headline KPIs, per-product
//! comparison, the sentiment trend, label shares, the severity matrix, and
//! the AI summary feed.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{ReviewRecord, SentimentLabel};
use crate::scope::ProductScope;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
  pub total_reviews: usize,
  /// Mean sentiment score; `None` when the scope is empty
  pub average_sentiment: Option<f64>,
  pub selection: String,
}

pub fn kpis(records: &[&ReviewRecord], scope: &ProductScope) -> Kpis {
  Kpis {
    total_reviews: records.len(),
    average_sentiment: mean(records.iter().map(|r| r.sentiment_score)),
    selection: scope.label().to_string(),
  }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
  let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
  (n > 0).then(|| sum / n as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductAverage {
  pub product: String,
  pub average_sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductVolume {
  pub product: String,
  pub count: usize,
}

/// Cross-product comparison, only meaningful for the whole table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductComparison {
  /// Ascending by average sentiment, so the weakest product leads
  pub averages: Vec<ProductAverage>,
  /// Alphabetical by product
  pub volumes: Vec<ProductVolume>,
}

pub fn product_comparison(records: &[ReviewRecord]) -> ProductComparison {
  let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
  for record in records {
    let entry = groups.entry(record.product.as_str()).or_insert((0.0, 0));
    entry.0 += record.sentiment_score;
    entry.1 += 1;
  }

  let mut averages: Vec<ProductAverage> = groups
    .iter()
    .map(|(product, (sum, n))| ProductAverage {
      product: product.to_string(),
      average_sentiment: sum / *n as f64,
    })
    .collect();
  averages.sort_by(|a, b| a.average_sentiment.total_cmp(&b.average_sentiment));

  let volumes = groups
    .iter()
    .map(|(product, (_, n))| ProductVolume { product: product.to_string(), count: *n })
    .collect();

  ProductComparison { averages, volumes }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
  pub date: NaiveDate,
  pub product: String,
  pub score: f64,
  pub filename: String,
}

/// Net score of one product on one date (the stacked-bar segment)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSegment {
  pub product: String,
  pub net_score: f64,
  pub reviews: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendDay {
  pub date: NaiveDate,
  pub segments: Vec<TrendSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentTrend {
  pub points: Vec<TrendPoint>,
  pub days: Vec<TrendDay>,
}

pub fn sentiment_trend(records: &[&ReviewRecord]) -> SentimentTrend {
  let mut points: Vec<TrendPoint> = records
    .iter()
    .map(|r| TrendPoint {
      date: r.date,
      product: r.product.clone(),
      score: r.sentiment_score,
      filename: r.filename.clone(),
    })
    .collect();
  points.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.product.cmp(&b.product)));

  let mut by_day: BTreeMap<NaiveDate, BTreeMap<&str, (f64, usize)>> = BTreeMap::new();
  for point in &points {
    let segment = by_day.entry(point.date).or_default().entry(point.product.as_str()).or_insert((0.0, 0));
    segment.0 += point.score;
    segment.1 += 1;
  }

  let days = by_day
    .into_iter()
    .map(|(date, products)| TrendDay {
      date,
      segments: products
        .into_iter()
        .map(|(product, (net_score, reviews))| TrendSegment {
          product: product.to_string(),
          net_score,
          reviews,
        })
        .collect(),
    })
    .collect();

  SentimentTrend { points, days }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelShare {
  pub label: SentimentLabel,
  pub count: usize,
  /// Share of the scope in [0, 1]
  pub share: f64,
}

/// Label counts in Positive, Neutral, Negative order; absent labels omitted
pub fn label_distribution(records: &[&ReviewRecord]) -> Vec<LabelShare> {
  let total = records.len();
  SentimentLabel::ALL
    .iter()
    .filter_map(|label| {
      let count = records.iter().filter(|r| r.sentiment_label == *label).count();
      (count > 0).then(|| LabelShare { label: *label, count, share: count as f64 / total as f64 })
    })
    .collect()
}

/// One dot on the severity map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityPoint {
  pub date: NaiveDate,
  pub score: f64,
  pub label: SentimentLabel,
  pub magnitude: f64,
  pub product: String,
  pub filename: String,
}

pub fn severity_matrix(records: &[&ReviewRecord]) -> Vec<SeverityPoint> {
  records
    .iter()
    .map(|r| SeverityPoint {
      date: r.date,
      score: r.sentiment_score,
      label: r.sentiment_label,
      magnitude: r.sentiment_score.abs(),
      product: r.product.clone(),
      filename: r.filename.clone(),
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
  pub header: String,
  pub summary: String,
  pub translated_review: String,
}

/// AI summaries, newest first; same-day entries keep table order
pub fn summaries(records: &[&ReviewRecord]) -> Vec<SummaryEntry> {
  let mut ordered = records.to_vec();
  ordered.sort_by(|a, b| b.date.cmp(&a.date));

  ordered
    .into_iter()
    .map(|r| SummaryEntry {
      header: format!(
        "{} | {} | {}:{:?} | File: {}",
        r.product, r.date, r.sentiment_label, r.sentiment_score, r.filename
      ),
      summary: r.summary.clone(),
      translated_review: r.translated_review.clone(),
    })
    .collect()
}

/// Everything the analytics section shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsView {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub comparison: Option<ProductComparison>,
  pub trend: SentimentTrend,
  pub labels: Vec<LabelShare>,
  pub severity: Vec<SeverityPoint>,
}

pub fn analytics_view(
  all_records: &[ReviewRecord],
  scoped: &[&ReviewRecord],
  scope: &ProductScope,
) -> AnalyticsView {
  AnalyticsView {
    comparison: scope.is_all().then(|| product_comparison(all_records)),
    trend: sentiment_trend(scoped),
    labels: label_distribution(scoped),
    severity: severity_matrix(scoped),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn review(product: &str, day: u32, score: f64, label: SentimentLabel) -> ReviewRecord {
    ReviewRecord {
      product: product.to_string(),
      date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
      sentiment_score: score,
      sentiment_label: label,
      translated_review: format!("{product} review on day {day}"),
      summary: format!("{product} summary"),
      filename: format!("batch_{day}.csv"),
    }
  }

  fn sample() -> Vec<ReviewRecord> {
    vec![
      review("Parka", 2, 0.5, SentimentLabel::Positive),
      review("Boot", 1, -0.5, SentimentLabel::Negative),
      review("Parka", 1, 0.1, SentimentLabel::Neutral),
      review("Boot", 2, 0.7, SentimentLabel::Positive),
      review("Boot", 2, -0.9, SentimentLabel::Negative),
    ]
  }

  #[test]
  fn test_kpis() {
    let records = sample();
    let scoped: Vec<&ReviewRecord> = records.iter().collect();
    let kpis = kpis(&scoped, &ProductScope::All);
    assert_eq!(kpis.total_reviews, 5);
    assert!((kpis.average_sentiment.unwrap() - (-0.02)).abs() < 1e-9);
    assert_eq!(kpis.selection, "All Products");
  }

  #[test]
  fn test_kpis_empty_scope_has_no_average() {
    let kpis = kpis(&[], &ProductScope::Product("Glove".into()));
    assert_eq!(kpis.total_reviews, 0);
    assert!(kpis.average_sentiment.is_none());
  }

  #[test]
  fn test_product_comparison() {
    let comparison = product_comparison(&sample());

    let order: Vec<&str> = comparison.averages.iter().map(|a| a.product.as_str()).collect();
    assert_eq!(order, vec!["Boot", "Parka"]);
    assert!((comparison.averages[0].average_sentiment - (-0.7 / 3.0)).abs() < 1e-9);
    assert!((comparison.averages[1].average_sentiment - 0.3).abs() < 1e-9);

    assert_eq!(
      comparison.volumes,
      vec![
        ProductVolume { product: "Boot".into(), count: 3 },
        ProductVolume { product: "Parka".into(), count: 2 },
      ]
    );
  }

  #[test]
  fn test_sentiment_trend_groups_by_day_and_product() {
    let records = sample();
    let scoped: Vec<&ReviewRecord> = records.iter().collect();
    let trend = sentiment_trend(&scoped);

    assert_eq!(trend.points.len(), 5);
    assert_eq!(trend.points[0].date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    assert_eq!(trend.points[0].product, "Boot");

    assert_eq!(trend.days.len(), 2);
    let day_two = &trend.days[1];
    assert_eq!(day_two.segments[0].product, "Boot");
    assert_eq!(day_two.segments[0].reviews, 2);
    assert!((day_two.segments[0].net_score - (-0.2)).abs() < 1e-9);
  }

  #[test]
  fn test_label_distribution_order_and_shares() {
    let records = sample();
    let scoped: Vec<&ReviewRecord> = records.iter().collect();
    let labels = label_distribution(&scoped);

    let order: Vec<SentimentLabel> = labels.iter().map(|l| l.label).collect();
    assert_eq!(order, SentimentLabel::ALL.to_vec());
    assert_eq!(labels[2].count, 2);
    assert!((labels[2].share - 0.4).abs() < 1e-9);

    let positives_only = vec![&records[0]];
    assert_eq!(label_distribution(&positives_only).len(), 1);
    assert!(label_distribution(&[]).is_empty());
  }

  #[test]
  fn test_severity_matrix_magnitude() {
    let records = sample();
    let scoped: Vec<&ReviewRecord> = records.iter().collect();
    let matrix = severity_matrix(&scoped);
    assert_eq!(matrix.len(), 5);
    assert_eq!(matrix[4].magnitude, 0.9);
    assert_eq!(matrix[4].label, SentimentLabel::Negative);
  }

  #[test]
  fn test_summaries_newest_first_and_stable() {
    let records = sample();
    let scoped: Vec<&ReviewRecord> = records.iter().collect();
    let entries = summaries(&scoped);

    assert_eq!(entries[0].header, "Parka | 2024-05-02 | Positive:0.5 | File: batch_2.csv");
    assert!(entries[1].header.starts_with("Boot | 2024-05-02 | Positive:0.7"));
    assert!(entries[2].header.starts_with("Boot | 2024-05-02 | Negative:-0.9"));
    assert!(entries[4].header.starts_with("Parka | 2024-05-01"));
  }

  #[test]
  fn test_summary_header_keeps_fraction_on_whole_scores() {
    let records = vec![
      review("Parka", 3, 0.0, SentimentLabel::Neutral),
      review("Boot", 2, 1.0, SentimentLabel::Positive),
      review("Boot", 1, -1.0, SentimentLabel::Negative),
    ];
    let scoped: Vec<&ReviewRecord> = records.iter().collect();
    let entries = summaries(&scoped);

    assert_eq!(entries[0].header, "Parka | 2024-05-03 | Neutral:0.0 | File: batch_3.csv");
    assert_eq!(entries[1].header, "Boot | 2024-05-02 | Positive:1.0 | File: batch_2.csv");
    assert_eq!(entries[2].header, "Boot | 2024-05-01 | Negative:-1.0 | File: batch_1.csv");
  }

  #[test]
  fn test_analytics_view_comparison_only_for_all() {
    let records = sample();
    let scope = ProductScope::Product("Boot".into());
    let scoped = scope.apply(&records);

    assert!(analytics_view(&records, &scoped, &scope).comparison.is_none());
    assert!(analytics_view(&records, &scoped, &ProductScope::All).comparison.is_some());
  }
}
