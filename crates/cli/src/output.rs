//! Terminal output for strata commands.
//!
//! Every status line goes through [`Status`]: progress and results on stdout,
//! module problems on stderr. Colors are applied only when the stream
//! supports them.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{AnsiColors, OwoColorize, Stream};
use serde::Serialize;

use strata_lib::util::hash::ObjectHash;

/// Marks an input line under an action in text listings.
pub const ARROW: &str = "→";

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Done,
  Note,
  /// A module whose own configuration is broken.
  Failed,
  /// A module left out because something it depends on failed.
  Skipped,
}

impl Status {
  fn symbol(self) -> &'static str {
    match self {
      Status::Done => "✓",
      Status::Note => "•",
      Status::Failed => "✗",
      Status::Skipped => "⚠",
    }
  }

  fn color(self) -> AnsiColors {
    match self {
      Status::Done => AnsiColors::Green,
      Status::Note => AnsiColors::Blue,
      Status::Failed => AnsiColors::Red,
      Status::Skipped => AnsiColors::Yellow,
    }
  }

  fn to_stderr(self) -> bool {
    matches!(self, Status::Failed | Status::Skipped)
  }

  pub fn print(self, message: &str) {
    if self.to_stderr() {
      let symbol = self.symbol();
      let symbol = symbol.if_supports_color(Stream::Stderr, |s| s.color(self.color()));
      eprintln!("{} {}", symbol, message);
    } else {
      let symbol = self.symbol();
      let symbol = symbol.if_supports_color(Stream::Stdout, |s| s.color(self.color()));
      println!("{} {}", symbol, message);
    }
  }
}

/// Aligned `label: value` lines, printed under a status line.
pub fn print_fields(fields: &[(&str, String)]) {
  let width = fields.iter().map(|(label, _)| label.len() + 1).max().unwrap_or(0);
  for (label, value) in fields {
    let label = format!("{:<width$}", format!("{}:", label), width = width);
    println!("  {} {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
  }
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// The leading part of a graph hash, enough to tell runs apart.
pub fn short_hash(hash: &ObjectHash) -> &str {
  hash.0.get(..12).unwrap_or(&hash.0)
}

pub fn elapsed(duration: Duration) -> String {
  match duration.as_millis() {
    ms if ms < 1_000 => format!("{}ms", ms),
    ms if ms < 60_000 => format!("{:.2}s", duration.as_secs_f64()),
    _ => {
      let secs = duration.as_secs();
      format!("{}m {}s", secs / 60, secs % 60)
    }
  }
}
