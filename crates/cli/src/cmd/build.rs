//! Implementation of the `strata build` command.

use std::process::Command;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::debug;

use super::generate::write_ninja;
use super::{ProjectArgs, compile_project};
use crate::output::{Status, elapsed};

pub fn cmd_build(args: &ProjectArgs, dry_run: bool, targets: &[String]) -> Result<()> {
  let start = Instant::now();
  let (compiler, compilation) = compile_project(args)?;
  let ninja_path = write_ninja(&compiler, &compilation)?;

  if dry_run {
    Status::Note.print(&format!(
      "Dry run: wrote {} ({} actions), ninja not started",
      ninja_path.display(),
      compilation.graph.len()
    ));
    return Ok(());
  }

  let config = compiler.config();
  let mut ninja = Command::new("ninja");
  ninja
    .current_dir(&config.root_dir)
    .arg("-f")
    .arg(config.ninja_file())
    .args(targets);
  debug!(command = ?ninja, "running ninja");

  let status = ninja.status().context("Failed to run ninja (is it installed?)")?;
  if !status.success() {
    bail!("ninja failed with {}", status);
  }

  Status::Done.print(&format!("Build complete in {}", elapsed(start.elapsed())));
  Ok(())
}
