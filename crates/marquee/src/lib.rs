//! ## Features
//!
//! - Levelled status logging to stderr (info, warn, error)
//! - Report callouts for stdout: tinted, word-wrapped message boxes
//! - Section headings
//! - `tracing` subscriber setup shared by the Delphi binaries
//!
//! ## Usage
//!
//! Status lines: `info!`, `warn!`, `error!`
//!
//! Report blocks: `callout()`, `heading()`

use colored::*;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

const DEFAULT_WIDTH: usize = 80;
const MAX_WIDTH: usize = 100;

/// Core logging function that handles the actual output
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

fn format_prefix(color: Color, prefix: &str) -> String {
  format!("[{}]{:<width$}", prefix.color(color).bold(), "", width = 7 - prefix.len() - 2)
}

fn log_with_prefix(color: Color, prefix: &str, message: &str) {
  let prefix = format_prefix(color, prefix);
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Info level logging - general information
pub fn info(message: &str) {
  log_with_prefix(Color::Blue, "info", message);
}

/// Warning level logging - something needs attention
pub fn warn(message: &str) {
  log_with_prefix(Color::Yellow, "warn", message);
}

/// Error level logging - something went wrong
pub fn error(message: &str) {
  log_with_prefix(Color::Red, "error", message);
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise Delphi logs at info (debug when
/// `verbose`) and everything else at warn. Calling this twice is harmless.
pub fn init_tracing(verbose: bool) {
  let default_filter = if verbose { "delphi=debug,info" } else { "delphi=info,warn" };
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

  let _ = tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
    .with(filter)
    .try_init();
}

/// Width used for wrapped report output, bounded to keep lines readable
pub fn report_width() -> usize {
  console::Term::stdout()
    .size_checked()
    .map(|(_, cols)| (cols as usize).clamp(40, MAX_WIDTH))
    .unwrap_or(DEFAULT_WIDTH)
}

/// Create a banner line of the specified length and character
pub fn banner_line(length: usize, char: char) -> String {
  char.to_string().repeat(length)
}

/// Tone of a report callout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
  Info,
  Warning,
  Error,
  Success,
}

impl Tone {
  fn tag(self) -> &'static str {
    match self {
      Tone::Info => "NOTE",
      Tone::Warning => "WARN",
      Tone::Error => "ALERT",
      Tone::Success => "OK",
    }
  }

  fn color(self) -> Color {
    match self {
      Tone::Info => Color::Blue,
      Tone::Warning => Color::Yellow,
      Tone::Error => Color::Red,
      Tone::Success => Color::Green,
    }
  }
}

/// Render a callout block: a tinted tag on the first line, wrapped body
/// lines behind a gutter bar.
pub fn callout(tone: Tone, message: &str, width: usize) -> String {
  let tag = format!("[{}]", tone.tag());
  let gutter = format!("{} ", "┃".color(tone.color()));
  let body_width = width.saturating_sub(tag.len() + 3).max(20);

  let mut out = String::new();
  for (i, line) in wrap_text(message, body_width).iter().enumerate() {
    out.push_str(&gutter);
    if i == 0 {
      out.push_str(&tag.color(tone.color()).bold().to_string());
    } else {
      out.push_str(&" ".repeat(tag.len()));
    }
    out.push(' ');
    out.push_str(line);
    out.push('\n');
  }
  out
}

/// Render a section heading underlined to `width`
pub fn heading(title: &str, width: usize) -> String {
  format!("{}\n{}\n", title.bold(), banner_line(width, '─').dimmed())
}

/// Wrap text to fit within a specified width
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();

  for paragraph in text.split('\n') {
    if paragraph.trim().is_empty() {
      lines.push(String::new());
      continue;
    }

    let mut current_line = String::new();
    for word in paragraph.split_whitespace() {
      if current_line.is_empty() {
        current_line = word.to_string();
      } else if current_line.chars().count() + 1 + word.chars().count() <= width {
        current_line.push(' ');
        current_line.push_str(word);
      } else {
        lines.push(current_line);
        current_line = word.to_string();
      }
    }

    if !current_line.is_empty() {
      lines.push(current_line);
    }
  }

  lines
}

#[macro_export]
macro_rules! info {
  ($msg:expr) => {
    $crate::info($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! warn {
  ($msg:expr) => {
    $crate::warn($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! error {
  ($msg:expr) => {
    $crate::error($msg); // LCOV_EXCL_LINE
  };
}
