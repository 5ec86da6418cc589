//! Implementation of the `strata graph` command.

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};

use strata_lib::graph::ActionGraph;

use super::{ProjectArgs, compile_project};
use crate::output::{ARROW, OutputFormat, print_json};

pub fn cmd_graph(args: &ProjectArgs, format: OutputFormat) -> Result<()> {
  let (_compiler, compilation) = compile_project(args)?;

  if format.is_json() {
    return print_json(&compilation.graph);
  }
  print_text(&compilation.graph);
  Ok(())
}

fn print_text(graph: &ActionGraph) {
  for entry in graph.actions() {
    let action = &entry.action;
    let optional = if action.optional { " (optional)" } else { "" };
    println!(
      "{} {} {}{}",
      entry.module.if_supports_color(Stream::Stdout, |s| s.bold()),
      action.rule_name().if_supports_color(Stream::Stdout, |s| s.cyan()),
      action.outputs.join(" "),
      optional.if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
    for input in &action.implicit_inputs {
      println!("    {} {}", ARROW, input);
    }
  }
}
