//! Implementation of the `strata generate` command.
//!
//! Compiles the build files and writes `<out>/build.ninja`, including a
//! generator edge so ninja re-runs this command when a build file or a globbed
//! directory changes.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use strata_lib::compile::{Compilation, Compiler};
use strata_lib::graph::ninja::{Generator, NinjaWriter};
use strata_lib::util::hash::Hashable;

use super::{ProjectArgs, compile_project};
use crate::output::{Status, elapsed, print_fields, short_hash};

pub fn cmd_generate(args: &ProjectArgs) -> Result<()> {
  let start = Instant::now();
  let (compiler, compilation) = compile_project(args)?;
  let ninja_path = write_ninja(&compiler, &compilation)?;

  Status::Done.print(&format!("Generated {}", ninja_path.display()));
  print_fields(&[
    ("Modules", compilation.module_count.to_string()),
    ("Actions", compilation.graph.len().to_string()),
    ("Build files", compilation.build_files.len().to_string()),
    ("Time", elapsed(start.elapsed())),
  ]);
  Ok(())
}

/// Write the ninja file for `compilation`, returning its path.
pub(super) fn write_ninja(compiler: &Compiler, compilation: &Compilation) -> Result<PathBuf> {
  let config = compiler.config();
  let ninja_file = config.ninja_file();
  let ninja_path = config.root_dir.join(&ninja_file);

  let generator = Generator {
    command: generator_command(&config.build_file, &config.base_output_dir)?,
    ninja_file,
    build_files: compilation.build_files.clone(),
  };

  let written = NinjaWriter::new(&compilation.graph, config.base_output_dir.as_str())
    .generator(generator)
    .write_if_changed(&ninja_path)
    .with_context(|| format!("Failed to write {}", ninja_path.display()))?;

  if !written {
    let hash = compilation.graph.compute_hash().context("Failed to hash action graph")?;
    Status::Note.print(&format!("Unchanged (graph {})", short_hash(&hash)));
  }

  Ok(ninja_path)
}

/// The command ninja runs, from the project root, to regenerate itself.
fn generator_command(build_file: &str, out: &str) -> Result<String> {
  let exe = std::env::current_exe().context("Failed to locate the strata executable")?;
  Ok(format!(
    "{} generate -f {} -o {}",
    shell_quote(&exe.to_string_lossy()),
    shell_quote(build_file),
    shell_quote(out)
  ))
}

fn shell_quote(arg: &str) -> String {
  let safe = !arg.is_empty()
    && arg
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | ':' | '='));
  if safe {
    arg.to_string()
  } else {
    format!("'{}'", arg.replace('\'', r"'\''"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quotes_only_when_needed() {
    assert_eq!(shell_quote("build.lua"), "build.lua");
    assert_eq!(shell_quote("/usr/local/bin/strata"), "/usr/local/bin/strata");
    assert_eq!(shell_quote("my dir/out"), "'my dir/out'");
    assert_eq!(shell_quote("it's"), r"'it'\''s'");
    assert_eq!(shell_quote(""), "''");
  }
}
