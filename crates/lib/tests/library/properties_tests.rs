//! Properties that hold for any project, checked over a few varied ones.

use std::collections::BTreeSet;

use strata_lib::graph::ninja::NinjaWriter;
use strata_lib::inputs::GlobResolver;

use super::common::{compile, project, svc_project};

const MODULES: &[&str] = &[
  r#"go_binary { name = "svc", pkg = ".", testPkg = "./...", srcs = { "*.go" }, vendorFirst = true }"#,
  r#"go_binary { name = "tool", pkg = "./tools", srcs = { "tools/*.go" } }"#,
  r#"zip_archive { name = "docs", srcs = { "docs/**" } }"#,
  r#"zip_archive { name = "bundle", srcs = { "*.txt" }, deps = { "svc", "docs" } }"#,
];

fn full_project(order: &[usize]) -> tempfile::TempDir {
  let build: Vec<&str> = order.iter().map(|&i| MODULES[i]).collect();
  let temp = svc_project(&build.join("\n"));
  for (path, content) in [
    ("tools/gen.go", "package main"),
    ("docs/index.md", "# docs"),
    ("docs/api/v1.md", "# v1"),
    ("notes.txt", "notes"),
  ] {
    let full = temp.path().join(path);
    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
    std::fs::write(full, content).unwrap();
  }
  temp
}

#[test]
fn declaration_order_is_unobservable() {
  let orders: &[&[usize]] = &[&[0, 1, 2, 3], &[3, 2, 1, 0], &[2, 0, 3, 1]];
  let rendered: Vec<String> = orders
    .iter()
    .map(|order| {
      let temp = full_project(order);
      let compilation = compile(temp.path()).unwrap();
      assert!(compilation.is_success());
      NinjaWriter::new(&compilation.graph, "out").render().unwrap()
    })
    .collect();

  assert!(rendered.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn recursive_archive_lists_every_nested_file() {
  let temp = full_project(&[0, 1, 2, 3]);
  let compilation = compile(temp.path()).unwrap();

  let docs = compilation.graph.actions_for("docs").next().unwrap();
  assert_eq!(docs.args["inputFiles"], "docs/api/v1.md docs/index.md");
  let bundle = compilation.graph.actions_for("bundle").next().unwrap();
  assert_eq!(bundle.args["inputFiles"], "notes.txt");
}

#[test]
fn vendor_output_feeds_build() {
  let temp = full_project(&[0, 1, 2, 3]);
  let compilation = compile(temp.path()).unwrap();

  for entry in compilation.graph.actions() {
    if entry.action.rule_name() != "go_vendor" {
      continue;
    }
    let vendor = &entry.action.outputs[0];
    let consumers: Vec<_> = compilation
      .graph
      .actions_for(&entry.module)
      .filter(|a| a.rule_name() == "go_build")
      .collect();
    assert_eq!(consumers.len(), 1);
    assert!(consumers[0].depends_on(vendor));
  }
}

#[test]
fn test_inputs_cover_build_inputs() {
  let temp = full_project(&[0, 1, 2, 3]);
  let compilation = compile(temp.path()).unwrap();

  let test = compilation
    .graph
    .actions_for("svc")
    .find(|a| a.rule_name() == "go_test")
    .unwrap();
  let build = compilation
    .graph
    .actions_for("svc")
    .find(|a| a.rule_name() == "go_build")
    .unwrap();

  let test_inputs: BTreeSet<&String> = test.implicit_inputs.iter().collect();
  assert!(build.implicit_inputs.iter().all(|input| test_inputs.contains(input)));
}

#[test]
fn outputs_are_unique() {
  let temp = full_project(&[0, 1, 2, 3]);
  let compilation = compile(temp.path()).unwrap();

  let mut seen = BTreeSet::new();
  for entry in compilation.graph.actions() {
    for output in &entry.action.outputs {
      assert!(seen.insert(output.clone()), "{} produced twice", output);
    }
  }
}

#[test]
fn glob_resolution_is_idempotent_and_excludes_only_remove() {
  let temp = project(&[
    ("a.go", ""),
    ("b_test.go", ""),
    ("pkg/c.go", ""),
    ("pkg/deep/d.go", ""),
    ("README.md", ""),
  ]);
  let resolver = GlobResolver::new(temp.path());
  let cases: &[(&[&str], &[&str])] = &[
    (&["**/*.go"], &[]),
    (&["**/*.go"], &["*_test.go"]),
    (&["*", "pkg/**"], &["pkg/deep/*"]),
    (&["**"], &["**/*.go"]),
  ];

  for (patterns, excludes) in cases {
    let patterns: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
    let excludes: Vec<String> = excludes.iter().map(|s| s.to_string()).collect();

    let first = resolver.resolve(".", &patterns, &excludes).unwrap();
    let second = resolver.resolve(".", &patterns, &excludes).unwrap();
    assert_eq!(first, second);

    let unfiltered = resolver.resolve(".", &patterns, &[]).unwrap();
    assert!(first.files.iter().all(|f| unfiltered.files.contains(f)));
  }
}
