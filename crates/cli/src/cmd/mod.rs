mod build;
mod generate;
mod graph;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use strata_lib::compile::{Compilation, Compiler};
use strata_lib::config::Config;
use strata_lib::consts::{BUILD_FILE_NAME, OUTPUT_DIR_ENV};
use strata_lib::module::ModuleError;

use crate::output::Status;

pub use build::cmd_build;
pub use generate::cmd_generate;
pub use graph::cmd_graph;

/// Where the project lives and where its outputs go.
#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
  /// Top-level build file; its directory is the project root
  #[arg(short = 'f', long = "file", default_value = BUILD_FILE_NAME)]
  pub file: PathBuf,

  /// Output directory, relative to the project root
  #[arg(short = 'o', long = "out", env = OUTPUT_DIR_ENV)]
  pub out: Option<String>,
}

impl ProjectArgs {
  pub fn config(&self) -> Result<Config> {
    let config = Config::for_build_file(&self.file)
      .with_context(|| format!("Build file not found: {}", self.file.display()))?;
    Ok(match &self.out {
      Some(out) if !out.trim().is_empty() => config.with_output_dir(out.as_str()),
      _ => config,
    })
  }
}

/// Evaluate and compile the project, failing after reporting every module error.
pub fn compile_project(args: &ProjectArgs) -> Result<(Compiler, Compilation)> {
  let config = args.config()?;
  let compiler = Compiler::new(config);
  let compilation = compiler
    .compile_file()
    .with_context(|| format!("Failed to compile {}", args.file.display()))?;

  if !compilation.is_success() {
    report_module_errors(&compilation);
    bail!(
      "{} of {} modules failed",
      compilation.module_errors.len(),
      compilation.module_count
    );
  }

  Ok((compiler, compilation))
}

fn report_module_errors(compilation: &Compilation) {
  for (module, errors) in &compilation.module_errors {
    for error in errors {
      let status = match error {
        ModuleError::DependencyFailed(_) => Status::Skipped,
        _ => Status::Failed,
      };
      status.print(&format!("{}: {}", module, error));
    }
  }
}
