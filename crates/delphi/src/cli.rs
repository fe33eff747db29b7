use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{AuditFallback, Config};
use crate::dashboard::Dashboard;
use crate::insight::InsightEngine;
use crate::render::{self, Section};
use crate::scope::{self, ProductScope, ALL_PRODUCTS};
use crate::source::{self, AuditGap, AuditSource, TableFile};
use crate::DelphiError;

#[derive(Parser, Debug)]
#[command(name = "delphi")]
#[command(
  about = "Delphi - Product Review Intelligence\nSentiment analytics, negative-theme insights and ingestion health"
)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), ", courtesy of Kernelle Software"))]
pub struct Cli {
  #[command(flatten)]
  pub tables: TableArgs,

  #[command(flatten)]
  pub overrides: InsightOverrides,

  /// Product scope: "All Products" or one product identifier
  #[arg(short, long, global = true, default_value = ALL_PRODUCTS)]
  pub product: String,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value = "pretty")]
  pub format: OutputFormat,

  /// Configuration file path (JSON or YAML)
  #[arg(short, long, global = true)]
  pub config: Option<PathBuf>,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Option<Command>,
}

/// Table locations; fall back to `data.reviews` / `data.audit` in the config
#[derive(Args, Debug, Default)]
pub struct TableArgs {
  /// Review table (.csv or .json)
  #[arg(long, global = true, env = "DELPHI_REVIEWS")]
  pub reviews: Option<PathBuf>,

  /// Ingestion audit log (.csv or .json)
  #[arg(long, global = true, env = "DELPHI_AUDIT")]
  pub audit: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct InsightOverrides {
  /// Reviews scoring strictly below this count as negative
  #[arg(long, global = true, allow_negative_numbers = true)]
  pub threshold: Option<f64>,

  /// Comma-separated pain-point keywords, in tie-break order
  #[arg(long, global = true, value_delimiter = ',')]
  pub keywords: Option<Vec<String>>,

  /// Fail instead of continuing when the audit log cannot be loaded
  #[arg(long, global = true)]
  pub strict_audit: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Pretty,
  Json,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
  /// Every section (the default)
  Report,
  /// Product comparison, sentiment trend and label shares
  Analytics,
  /// AI summaries, newest first
  Summaries,
  /// Negative-sentiment severity, pain points and recommendation
  Insights,
  /// Ingestion success rate and failed files
  Health,
  /// The scoped review rows
  Raw,
  /// List the selectable product scopes
  Products,
  /// Print the effective configuration
  Config,
}

impl Command {
  fn sections(self) -> &'static [Section] {
    match self {
      Command::Analytics => &[Section::Analytics],
      Command::Summaries => &[Section::Summaries],
      Command::Insights => &[Section::Insights],
      Command::Health => &[Section::Health],
      Command::Raw => &[Section::Raw],
      Command::Report | Command::Products | Command::Config => &Section::ALL,
    }
  }
}

/// Merge the config file with command-line overrides
pub fn effective_config(cli: &Cli) -> Result<Config> {
  let mut config = match &cli.config {
    Some(path) => Config::load_from_file(path)
      .with_context(|| format!("loading configuration from {}", path.display()))?,
    None => Config::load().context("loading configuration")?,
  };

  if let Some(threshold) = cli.overrides.threshold {
    config.insight.negative_threshold = threshold;
  }
  if let Some(keywords) = &cli.overrides.keywords {
    config.insight.keywords = keywords.iter().map(|k| k.trim().to_string()).collect();
  }
  if cli.overrides.strict_audit {
    config.audit.on_missing = AuditFallback::Fail;
  }
  if let Some(reviews) = &cli.tables.reviews {
    config.data.reviews = Some(reviews.clone());
  }
  if let Some(audit) = &cli.tables.audit {
    config.data.audit = Some(audit.clone());
  }

  config.insight.validate()?;
  Ok(config)
}

fn report_audit_gap(gap: &AuditGap) {
  match gap {
    AuditGap::NotConfigured => {
      marquee::info!("No audit log configured, pipeline health reflects an empty log");
    }
    AuditGap::Unavailable(reason) => {
      marquee::warn!(&format!("Audit log unavailable, pipeline health reflects an empty log: {reason}"));
    }
  }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
  Ok(serde_json::to_string_pretty(value)? + "\n")
}

/// Execute a parsed command line and return what should be printed
pub fn run(cli: &Cli) -> Result<String> {
  let command = cli.command.unwrap_or(Command::Report);
  let config = effective_config(cli)?;

  if command == Command::Config {
    return match cli.format {
      OutputFormat::Json => to_json(&config),
      OutputFormat::Pretty => Ok(serde_yaml::to_string(&config)?),
    };
  }

  let reviews_path = config.data.reviews.clone().ok_or(DelphiError::MissingTable { table: "review" })?;
  let reviews = TableFile::new(reviews_path);
  let audit = config.data.audit.clone().map(TableFile::new);

  let tables = source::load_tables(
    &reviews,
    audit.as_ref().map(|a| a as &dyn AuditSource),
    config.audit.on_missing,
  )
  .context("loading tables")?;
  if let Some(gap) = &tables.audit_gap {
    report_audit_gap(gap);
  }

  if command == Command::Products {
    let options = scope::product_options(&tables.reviews);
    return match cli.format {
      OutputFormat::Json => to_json(&options),
      OutputFormat::Pretty => Ok(options.iter().map(|o| format!("{o}\n")).collect()),
    };
  }

  let scope = ProductScope::parse(&cli.product, &tables.reviews)?;
  let engine = InsightEngine::new(config.insight.clone())?;
  let dashboard = Dashboard::build(&tables, scope, &engine);

  match cli.format {
    OutputFormat::Json => match command {
      Command::Analytics => {
        to_json(&serde_json::json!({ "kpis": dashboard.kpis, "analytics": dashboard.analytics }))
      }
      Command::Summaries => to_json(&dashboard.summaries),
      Command::Insights => to_json(&dashboard.insight),
      Command::Health => to_json(&dashboard.health),
      Command::Raw => to_json(&dashboard.rows),
      _ => to_json(&dashboard),
    },
    OutputFormat::Pretty => Ok(render::render_dashboard(
      &dashboard,
      &tables.audit,
      engine.config(),
      command.sections(),
      marquee::report_width(),
    )),
  }
}
