//! Negative-sentiment insight derivation
//!
//! Splits the scoped reviews at the negative threshold, grades the negative
//! share into a severity tier, and ranks the configured pain-point keywords
//! by how many negative reviews mention them.

use regex::Regex;
use serde::Serialize;

use crate::config::InsightConfig;
use crate::model::ReviewRecord;
use crate::{DelphiError, Result};

/// How alarming the negative share of a scope is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
  /// No negative reviews at all
  None,
  Minor,
  Significant,
  Critical,
}

/// Grade a negative share. Tiers are exclusive and checked top-down with
/// strict comparisons, so a share sitting exactly on a bound falls into the
/// lower tier.
pub fn classify(negative_count: usize, proportion: f64, config: &InsightConfig) -> SeverityTier {
  if negative_count == 0 {
    SeverityTier::None
  } else if proportion > config.critical_above {
    SeverityTier::Critical
  } else if proportion > config.significant_above {
    SeverityTier::Significant
  } else {
    SeverityTier::Minor
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
  pub keyword: String,
  /// Number of negative reviews mentioning the keyword at least once
  pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
  /// The top-ranked keyword
  pub driver: String,
  pub text: String,
}

impl Recommendation {
  fn for_driver(driver: &str) -> Self {
    Self {
      driver: driver.to_string(),
      text: format!(
        "Focus resources on addressing {} to effectively reduce the dissatisfaction portion.",
        driver.to_uppercase()
      ),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightReport {
  pub total: usize,
  pub negative_count: usize,
  /// Share of negative reviews in [0, 1]; 0 for an empty scope
  pub negative_proportion: f64,
  pub tier: SeverityTier,
  /// Matched keywords, most frequent first, ties in vocabulary order
  pub keywords: Vec<KeywordCount>,
  pub recommendation: Option<Recommendation>,
}

impl InsightReport {
  pub fn top_keywords(&self, limit: usize) -> &[KeywordCount] {
    &self.keywords[..self.keywords.len().min(limit)]
  }
}

/// Whole-word, case-insensitive matcher over a fixed keyword vocabulary
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
  patterns: Vec<(String, Regex)>,
}

impl KeywordMatcher {
  pub fn new(keywords: &[String]) -> Result<Self> {
    let patterns = keywords
      .iter()
      .map(|keyword| {
        let keyword = keyword.trim();
        Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword)))
          .map(|re| (keyword.to_string(), re))
          .map_err(|e| DelphiError::InvalidConfig(format!("keyword '{keyword}': {e}")))
      })
      .collect::<Result<Vec<_>>>()?;
    Ok(Self { patterns })
  }

  /// Count, per keyword, the texts that mention it; zero counts are dropped
  pub fn rank(&self, texts: &[&str]) -> Vec<KeywordCount> {
    let mut counts: Vec<KeywordCount> = self
      .patterns
      .iter()
      .map(|(keyword, re)| KeywordCount {
        keyword: keyword.clone(),
        count: texts.iter().filter(|text| re.is_match(text)).count(),
      })
      .filter(|kc| kc.count > 0)
      .collect();

    // stable: equal counts keep vocabulary order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
  }
}

/// Derives insight reports for one configuration
#[derive(Debug, Clone)]
pub struct InsightEngine {
  config: InsightConfig,
  matcher: KeywordMatcher,
}

impl InsightEngine {
  pub fn new(config: InsightConfig) -> Result<Self> {
    config.validate()?;
    let matcher = KeywordMatcher::new(&config.keywords)?;
    Ok(Self { config, matcher })
  }

  pub fn config(&self) -> &InsightConfig {
    &self.config
  }

  pub fn derive<'a, I>(&self, records: I) -> InsightReport
  where
    I: IntoIterator<Item = &'a ReviewRecord>,
  {
    let mut total = 0;
    let mut negative_texts = Vec::new();
    for record in records {
      total += 1;
      if record.sentiment_score < self.config.negative_threshold {
        negative_texts.push(record.translated_review.as_str());
      }
    }

    let negative_count = negative_texts.len();
    let negative_proportion = if total > 0 { negative_count as f64 / total as f64 } else { 0.0 };
    let tier = classify(negative_count, negative_proportion, &self.config);

    let keywords =
      if tier == SeverityTier::None { Vec::new() } else { self.matcher.rank(&negative_texts) };
    let recommendation = keywords.first().map(|top| Recommendation::for_driver(&top.keyword));

    tracing::debug!(
      "insight: {negative_count}/{total} negative ({:.1}%), tier {tier:?}, {} keywords matched",
      negative_proportion * 100.0,
      keywords.len()
    );

    InsightReport { total, negative_count, negative_proportion, tier, keywords, recommendation }
  }
}

/// One-shot derivation with a given configuration
pub fn derive_insight<'a, I>(records: I, config: &InsightConfig) -> Result<InsightReport>
where
  I: IntoIterator<Item = &'a ReviewRecord>,
{
  Ok(InsightEngine::new(config.clone())?.derive(records))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::SentimentLabel;
  use chrono::NaiveDate;

  fn review(score: f64, text: &str) -> ReviewRecord {
    ReviewRecord {
      product: "Trail Boot".to_string(),
      date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
      sentiment_score: score,
      sentiment_label: if score < -0.3 {
        SentimentLabel::Negative
      } else if score > 0.3 {
        SentimentLabel::Positive
      } else {
        SentimentLabel::Neutral
      },
      translated_review: text.to_string(),
      summary: String::new(),
      filename: "batch.csv".to_string(),
    }
  }

  fn reviews(negative: usize, total: usize) -> Vec<ReviewRecord> {
    (0..total)
      .map(|i| if i < negative { review(-0.8, "bad") } else { review(0.6, "good") })
      .collect()
  }

  fn engine() -> InsightEngine {
    InsightEngine::new(InsightConfig::default()).unwrap()
  }

  #[test]
  fn test_no_negatives_is_tier_none_without_keywords() {
    let report = engine().derive(&reviews(0, 10));
    assert_eq!(report.total, 10);
    assert_eq!(report.negative_count, 0);
    assert_eq!(report.negative_proportion, 0.0);
    assert_eq!(report.tier, SeverityTier::None);
    assert!(report.keywords.is_empty());
    assert!(report.recommendation.is_none());
  }

  #[test]
  fn test_thirty_percent_is_critical() {
    let report = engine().derive(&reviews(3, 10));
    assert!((report.negative_proportion - 0.30).abs() < 1e-12);
    assert_eq!(report.tier, SeverityTier::Critical);
  }

  #[test]
  fn test_ten_percent_is_minor() {
    let report = engine().derive(&reviews(1, 10));
    assert_eq!(report.tier, SeverityTier::Minor);
  }

  #[test]
  fn test_empty_scope_has_zero_proportion() {
    let report = engine().derive(&Vec::<ReviewRecord>::new());
    assert_eq!(report.total, 0);
    assert_eq!(report.negative_proportion, 0.0);
    assert_eq!(report.tier, SeverityTier::None);
    assert!(report.keywords.is_empty());
  }

  #[test]
  fn test_classify_boundaries_are_strict() {
    let config = InsightConfig::default();
    assert_eq!(classify(1, 0.25, &config), SeverityTier::Significant);
    assert_eq!(classify(1, 0.2500001, &config), SeverityTier::Critical);
    assert_eq!(classify(1, 0.10, &config), SeverityTier::Minor);
    assert_eq!(classify(1, 0.1000001, &config), SeverityTier::Significant);
    assert_eq!(classify(1, 0.01, &config), SeverityTier::Minor);
    assert_eq!(classify(0, 0.0, &config), SeverityTier::None);
  }

  #[test]
  fn test_quarter_of_reviews_is_significant() {
    let report = engine().derive(&reviews(1, 4));
    assert_eq!(report.tier, SeverityTier::Significant);
  }

  #[test]
  fn test_threshold_itself_is_not_negative() {
    let records = vec![review(-0.3, "size"), review(-0.31, "size")];
    let report = engine().derive(&records);
    assert_eq!(report.negative_count, 1);
  }

  #[test]
  fn test_keyword_ranking_and_recommendation() {
    let records = vec![
      review(-0.9, "The size runs small"),
      review(-0.7, "Wrong SIZE and poor grip"),
      review(-0.5, "Arrived late"),
      review(-0.6, "Meh"),
      review(0.9, "size is perfect, stitching great"),
    ];

    let report = engine().derive(&records);
    assert_eq!(report.negative_count, 4);
    assert_eq!(
      report.keywords,
      vec![
        KeywordCount { keyword: "size".to_string(), count: 2 },
        KeywordCount { keyword: "grip".to_string(), count: 1 },
      ]
    );

    let recommendation = report.recommendation.unwrap();
    assert_eq!(recommendation.driver, "size");
    assert!(recommendation.text.contains("SIZE"));
  }

  #[test]
  fn test_whole_word_case_insensitive_matching() {
    let matcher = KeywordMatcher::new(&["grip".to_string()]).unwrap();
    assert_eq!(matcher.rank(&["Good grip"]).len(), 1);
    assert_eq!(matcher.rank(&["GRIP failed."]).len(), 1);
    assert!(matcher.rank(&["nice grippy feel"]).is_empty());
    assert!(matcher.rank(&["handgrip"]).is_empty());
  }

  #[test]
  fn test_ties_keep_vocabulary_order() {
    let vocabulary: Vec<String> = ["warmth", "price", "smell"].iter().map(|s| s.to_string()).collect();
    let matcher = KeywordMatcher::new(&vocabulary).unwrap();

    let ranked = matcher.rank(&["smell and price", "warmth lacking", "price again"]);
    let order: Vec<&str> = ranked.iter().map(|k| k.keyword.as_str()).collect();
    assert_eq!(order, vec!["price", "warmth", "smell"]);
  }

  #[test]
  fn test_keyword_counts_reviews_not_occurrences() {
    let matcher = KeywordMatcher::new(&["size".to_string()]).unwrap();
    let ranked = matcher.rank(&["size size size"]);
    assert_eq!(ranked[0].count, 1);
  }

  #[test]
  fn test_negatives_without_keywords_have_no_recommendation() {
    let records = vec![review(-0.9, "Arrived late"), review(0.5, "fine")];
    let report = engine().derive(&records);
    assert_eq!(report.tier, SeverityTier::Critical);
    assert!(report.keywords.is_empty());
    assert!(report.recommendation.is_none());
  }

  #[test]
  fn test_custom_configuration_is_honoured() {
    let config = InsightConfig {
      negative_threshold: 0.0,
      keywords: vec!["zipper".to_string()],
      ..InsightConfig::default()
    };
    let records = vec![review(-0.1, "zipper jammed"), review(0.2, "zipper fine")];

    let report = derive_insight(&records, &config).unwrap();
    assert_eq!(report.negative_count, 1);
    assert_eq!(report.keywords[0].keyword, "zipper");
  }

  #[test]
  fn test_invalid_configuration_is_rejected() {
    let config = InsightConfig { significant_above: 0.5, critical_above: 0.2, ..InsightConfig::default() };
    assert!(InsightEngine::new(config).is_err());
  }

  #[test]
  fn test_top_keywords_limit() {
    let records = vec![review(-0.9, "stitching size waterproof smell grip durability")];
    let report = engine().derive(&records);
    assert_eq!(report.keywords.len(), 6);
    assert_eq!(report.top_keywords(5).len(), 5);
    assert_eq!(report.top_keywords(10).len(), 6);
  }
}
