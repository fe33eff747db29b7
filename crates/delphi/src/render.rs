//! Terminal rendering of dashboard sections.
//!
//! Every function returns the rendered text so callers decide where it goes.

use colored::*;
use marquee::{callout, heading, Tone};
use std::fmt::Write;

use crate::analytics::{AnalyticsView, Kpis, LabelShare, SummaryEntry};
use crate::config::InsightConfig;
use crate::dashboard::Dashboard;
use crate::health::AuditHealth;
use crate::insight::{InsightReport, SeverityTier};
use crate::model::{AuditEntry, ReviewRecord, SentimentLabel};
use crate::scope::ProductScope;

const BAR_WIDTH: usize = 30;
const LABEL_WIDTH: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
  Analytics,
  Summaries,
  Insights,
  Health,
  Raw,
}

impl Section {
  pub const ALL: [Section; 5] =
    [Section::Analytics, Section::Summaries, Section::Insights, Section::Health, Section::Raw];
}

/// Format a [0, 1] share as a percentage with one decimal
pub fn percent(share: f64) -> String {
  format!("{:.1}%", share * 100.0)
}

fn label_color(label: SentimentLabel) -> Color {
  match label {
    SentimentLabel::Positive => Color::Green,
    SentimentLabel::Neutral => Color::Blue,
    SentimentLabel::Negative => Color::Red,
  }
}

fn bar(value: f64, max: f64) -> String {
  if max <= 0.0 {
    return String::new();
  }
  let cells = ((value.abs() / max) * BAR_WIDTH as f64).round() as usize;
  "█".repeat(cells.clamp(usize::from(value != 0.0), BAR_WIDTH))
}

fn truncate(text: &str, max: usize) -> String {
  if text.chars().count() <= max {
    text.to_string()
  } else {
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
  }
}

pub fn render_kpis(kpis: &Kpis) -> String {
  let average = kpis.average_sentiment.map_or_else(|| "n/a".to_string(), |avg| format!("{avg:.2}"));
  format!(
    "{}  {}   {}  {}   {}  {}\n",
    "Total Reviews Count".dimmed(),
    kpis.total_reviews.to_string().bold(),
    "Avg Sentiment Score".dimmed(),
    average.bold(),
    "Current Selection".dimmed(),
    kpis.selection.bold()
  )
}

fn render_label_shares(out: &mut String, labels: &[LabelShare]) {
  for share in labels {
    let _ = writeln!(
      out,
      "  {:<LABEL_WIDTH$} {} {} ({})",
      share.label.as_str(),
      bar(share.share, 1.0).color(label_color(share.label)),
      percent(share.share),
      share.count
    );
  }
}

pub fn render_analytics(view: &AnalyticsView, width: usize) -> String {
  let mut out = String::new();

  if let Some(comparison) = &view.comparison {
    out.push_str(&heading("1. Global Product Performance Comparison", width));
    out.push_str("Average Sentiment by Product\n");
    for avg in &comparison.averages {
      let colored_bar = if avg.average_sentiment < 0.0 {
        bar(avg.average_sentiment, 1.0).red()
      } else {
        bar(avg.average_sentiment, 1.0).green()
      };
      let _ = writeln!(
        out,
        "  {:<LABEL_WIDTH$} {:>6.2} {}",
        truncate(&avg.product, LABEL_WIDTH),
        avg.average_sentiment,
        colored_bar
      );
    }

    out.push_str("\nVolume of Reviews by Product\n");
    let max = comparison.volumes.iter().map(|v| v.count).max().unwrap_or(0) as f64;
    for volume in &comparison.volumes {
      let _ = writeln!(
        out,
        "  {:<LABEL_WIDTH$} {:>6} {}",
        truncate(&volume.product, LABEL_WIDTH),
        volume.count,
        bar(volume.count as f64, max).cyan()
      );
    }
    out.push('\n');
  }

  out.push_str(&heading("2. Sentiment Trend Analytics (Stacked)", width));
  if view.trend.days.is_empty() {
    out.push_str("  (no reviews in scope)\n");
  }
  for day in &view.trend.days {
    let _ = writeln!(out, "  {}", day.date.to_string().bold());
    for segment in &day.segments {
      let _ = writeln!(
        out,
        "    {:<LABEL_WIDTH$} {:>+7.2} ({} reviews)",
        truncate(&segment.product, LABEL_WIDTH),
        segment.net_score,
        segment.reviews
      );
    }
  }

  out.push('\n');
  out.push_str(&heading("3. Sentiment Categorization", width));
  render_label_shares(&mut out, &view.labels);

  out
}

pub fn render_summaries(entries: &[SummaryEntry], width: usize) -> String {
  let mut out = heading("AI Summaries", width);
  if entries.is_empty() {
    out.push_str("  (no reviews in scope)\n");
  }
  for entry in entries {
    let _ = writeln!(out, "{}", entry.header.bold());
    for line in marquee::wrap_text(&format!("AI Summary: {}", entry.summary), width.saturating_sub(2)) {
      let _ = writeln!(out, "  {line}");
    }
    for line in marquee::wrap_text(
      &format!("Translated Review: {}", entry.translated_review),
      width.saturating_sub(2),
    ) {
      let _ = writeln!(out, "  {}", line.dimmed());
    }
    out.push('\n');
  }
  out
}

/// Headline message for a severity tier
pub fn tier_message(report: &InsightReport, scope: &ProductScope) -> (Tone, String) {
  let share = percent(report.negative_proportion);
  match report.tier {
    SeverityTier::Critical => (
      Tone::Error,
      format!(
        "Critical Quality Alert: Negative feedback represents {share} of total reviews. \
         This indicates a systemic failure in product quality or expectations."
      ),
    ),
    SeverityTier::Significant => (
      Tone::Warning,
      format!(
        "Significant Dissatisfaction: {share} of customers are reporting issues. \
         This exceeds the standard industry tolerance for premium products."
      ),
    ),
    SeverityTier::Minor => (
      Tone::Info,
      format!(
        "Minor Friction Detected: Only {share} of the feedback is negative. \
         While these are isolated cases, we've identified recurring keywords below."
      ),
    ),
    SeverityTier::None => (
      Tone::Success,
      format!("Exemplary Performance: 0% negative feedback within the current scope of {scope}."),
    ),
  }
}

pub fn render_insights(
  report: &InsightReport,
  labels: &[LabelShare],
  scope: &ProductScope,
  config: &InsightConfig,
  width: usize,
) -> String {
  let mut out = heading("Data-Driven Strategic Analysis", width);

  let _ = writeln!(out, "Sentiment Composition: {scope}");
  render_label_shares(&mut out, labels);
  out.push('\n');

  let _ = writeln!(out, "{}", format!("Executive Summary: {scope}").bold());
  let (tone, message) = tier_message(report, scope);
  out.push_str(&callout(tone, &message, width));

  let pain_points = report.top_keywords(config.max_pain_points);
  if !pain_points.is_empty() {
    let share = percent(report.negative_proportion);
    let _ = writeln!(out, "\nKey Pain Points (from {share} negative portion):");
    let chips: Vec<String> =
      pain_points.iter().map(|kc| format!("[{} ({})]", kc.keyword.to_uppercase(), kc.count)).collect();
    let _ = writeln!(out, "  {}", chips.join(" ").yellow().bold());
  }

  if let Some(recommendation) = &report.recommendation {
    let driver = recommendation.driver.to_uppercase();
    let share = percent(report.negative_proportion);
    out.push('\n');
    for (title, text) in [
      (
        "Strategic Insight",
        format!(
          "Despite the overall volume, {driver} is the primary driver behind the {share} negative sentiment."
        ),
      ),
      ("Recommendation", recommendation.text.clone()),
    ] {
      let wrapped = marquee::wrap_text(&format!("{title}: {text}"), width.saturating_sub(4));
      for (i, line) in wrapped.iter().enumerate() {
        let _ = writeln!(out, "  {} {line}", if i == 0 { "*" } else { " " });
      }
    }
  }

  out
}

fn audit_table(out: &mut String, entries: &[AuditEntry]) {
  let _ = writeln!(out, "  {:<40} {:>10} {:<20} {}", "FILE_PATH", "FILE_SIZE", "LAST_MODIFIED", "STATUS");
  for entry in entries {
    let _ = writeln!(
      out,
      "  {:<40} {:>10} {:<20} {}",
      truncate(&entry.file_path, 40),
      entry.file_size,
      entry.last_modified.format("%Y-%m-%d %H:%M:%S"),
      entry.status
    );
  }
}

pub fn render_health(health: &AuditHealth, audit: &[AuditEntry], width: usize) -> String {
  let mut out = heading("Pipeline Integrity & Audit Log", width);

  out.push_str("Ingestion Success Rate\n");
  if health.statuses.is_empty() {
    out.push_str("  (audit log is empty)\n");
  }
  for status in &health.statuses {
    let painted = if status.status.is_success() {
      bar(status.percent, 100.0).green()
    } else {
      bar(status.percent, 100.0).red()
    };
    let _ = writeln!(
      out,
      "  {:<24} {} {:.2}% ({})",
      truncate(&status.status.to_string(), 24),
      painted,
      status.percent,
      status.count
    );
  }

  out.push('\n');
  out.push_str(&heading("Exception Tracking", width));
  if health.is_healthy() {
    out.push_str(&callout(
      Tone::Success,
      &format!("All systems healthy. Current Success Rate: {:.2}%.", health.success_pct),
      width,
    ));
    if !audit.is_empty() {
      out.push_str("\nFull Audit Log\n");
      audit_table(&mut out, audit);
    }
  } else {
    out.push_str(&callout(
      Tone::Warning,
      &format!(
        "Warning: Pipeline Success Rate is {:.2}%. Failure Rate is {:.2}%.",
        health.success_pct, health.fail_pct
      ),
      width,
    ));
    let _ = writeln!(out, "Detected {} anomalies in the S3 bucket:", health.anomalies.len());
    audit_table(&mut out, &health.anomalies);
  }

  out
}

pub fn render_raw(rows: &[ReviewRecord], width: usize) -> String {
  let mut out = heading("Raw Data", width);
  let review_width = width.saturating_sub(LABEL_WIDTH + 10 + 7 + 9 + 16 + 6).max(12);

  let _ = writeln!(
    out,
    "{:<LABEL_WIDTH$} {:<10} {:>7} {:<9} {:<16} {}",
    "PRODUCT", "DATE", "SCORE", "LABEL", "FILENAME", "TRANSLATED_REVIEW"
  );
  for row in rows {
    let _ = writeln!(
      out,
      "{:<LABEL_WIDTH$} {:<10} {:>7.2} {:<9} {:<16} {}",
      truncate(&row.product, LABEL_WIDTH),
      row.date.to_string(),
      row.sentiment_score,
      row.sentiment_label.as_str(),
      truncate(&row.filename, 16),
      truncate(&row.translated_review, review_width)
    );
  }
  out
}

/// Render the headline KPIs followed by `sections`
pub fn render_dashboard(
  dashboard: &Dashboard,
  audit: &[AuditEntry],
  config: &InsightConfig,
  sections: &[Section],
  width: usize,
) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{}", "Product Analysis Dashboard".purple().bold());
  out.push_str(&render_kpis(&dashboard.kpis));

  for section in sections {
    out.push('\n');
    out.push_str(&match section {
      Section::Analytics => render_analytics(&dashboard.analytics, width),
      Section::Summaries => render_summaries(&dashboard.summaries, width),
      Section::Insights => render_insights(
        &dashboard.insight,
        &dashboard.analytics.labels,
        &dashboard.scope,
        config,
        width,
      ),
      Section::Health => render_health(&dashboard.health, audit, width),
      Section::Raw => render_raw(&dashboard.rows, width),
    });
  }

  out
}
