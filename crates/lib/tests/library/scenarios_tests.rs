//! End-to-end scenarios from build file to action graph.

use strata_lib::compile::CompileError;
use strata_lib::graph::ninja::NinjaWriter;
use strata_lib::module::ModuleError;

use super::common::{compile, project, svc_project};

mod binary {
  use super::*;

  #[test]
  fn vendor_first_without_tests() {
    let temp = svc_project(
      r#"go_binary { name = "svc", pkg = ".", srcs = { "*.go" }, vendorFirst = true }"#,
    );
    let compilation = compile(temp.path()).unwrap();
    let actions: Vec<_> = compilation.graph.actions_for("svc").collect();

    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0].rule_name(), "go_vendor");
    assert_eq!(actions[0].outputs, vec!["vendor"]);
    assert!(actions[0].optional);

    assert_eq!(actions[1].rule_name(), "go_build");
    assert_eq!(actions[1].outputs, vec!["out/bin/svc"]);
    assert_eq!(actions[1].implicit_inputs, vec!["main.go", "util.go", "vendor"]);
  }

  #[test]
  fn test_pkg_adds_test_action() {
    let temp = svc_project(r#"go_binary { name = "svc", testPkg = "./...", srcs = { "*.go" } }"#);
    let compilation = compile(temp.path()).unwrap();
    let actions: Vec<_> = compilation.graph.actions_for("svc").collect();

    assert_eq!(actions.len(), 2);
    let test = actions[1];
    assert_eq!(test.rule_name(), "go_test");
    assert_eq!(test.outputs, vec!["out/reports/svc.txt"]);
    assert_eq!(test.implicit_inputs, vec!["main.go", "util.go", "util_test.go"]);
    assert_eq!(test.args["pkg"], "./...");
  }

  #[test]
  fn excludes_apply_to_every_action() {
    let temp = svc_project(
      r#"go_binary { name = "svc", testPkg = "./...", srcs = { "*.go" }, srcsExclude = { "util*" } }"#,
    );
    let compilation = compile(temp.path()).unwrap();
    for action in compilation.graph.actions_for("svc") {
      assert_eq!(action.implicit_inputs, vec!["main.go"]);
    }
  }
}

mod archive {
  use super::*;

  #[test]
  fn zips_text_files_after_binary() {
    let temp = svc_project(
      r#"
        go_binary { name = "svc", pkg = ".", srcs = { "*.go" } }
        zip_archive { name = "pkg", srcs = { "*.txt" }, deps = { "svc" } }
      "#,
    );
    std::fs::write(temp.path().join("a.txt"), "a").unwrap();
    std::fs::write(temp.path().join("b.txt"), "b").unwrap();

    let compilation = compile(temp.path()).unwrap();
    let zip = compilation.graph.actions_for("pkg").next().unwrap();
    assert_eq!(zip.outputs, vec!["out/archives/pkg"]);
    assert_eq!(zip.args["inputFiles"], "a.txt b.txt");

    let modules: Vec<&str> = compilation.graph.actions().iter().map(|a| a.module.as_str()).collect();
    assert_eq!(modules.last(), Some(&"pkg"));
  }

  #[test]
  fn recursive_pattern_without_matches_is_empty() {
    let temp = svc_project(r#"zip_archive { name = "bins", srcs = { "bin/**" } }"#);
    let compilation = compile(temp.path()).unwrap();
    let zip = compilation.graph.actions_for("bins").next().unwrap();
    assert_eq!(zip.outputs, vec!["out/archives/bins"]);
    assert_eq!(zip.args["inputFiles"], "");
  }

  #[test]
  fn recursive_pattern_collects_nested_files() {
    let temp = project(&[
      ("build.lua", r#"zip_archive { name = "bins", srcs = { "bin/**" } }"#),
      ("bin/app", "app"),
      ("bin/tools/gen", "gen"),
      ("README", "not in bin"),
    ]);
    let compilation = compile(temp.path()).unwrap();
    let zip = compilation.graph.actions_for("bins").next().unwrap();
    assert_eq!(zip.args["inputFiles"], "bin/app bin/tools/gen");
    assert!(compilation.graph.tracked_inputs().contains("bin/tools"));
  }

  #[test]
  fn root_archive_leaves_out_previous_outputs() {
    let temp = project(&[
      ("build.lua", r#"zip_archive { name = "all", srcs = { "**/*" } }"#),
      ("notes.txt", "notes"),
      ("out/archives/all", "stale zip"),
    ]);
    let compilation = compile(temp.path()).unwrap();
    let zip = compilation.graph.actions_for("all").next().unwrap();
    assert_eq!(zip.args["inputFiles"], "build.lua notes.txt");
  }
}

mod errors {
  use super::*;

  #[test]
  fn duplicate_names_abort_before_emission() {
    let temp = svc_project(
      r#"
        go_binary { name = "svc", srcs = { "*.go" } }
        zip_archive { name = "svc", srcs = { "*.go" } }
      "#,
    );
    let err = compile(temp.path()).unwrap_err();
    assert!(matches!(err, CompileError::DuplicateModuleName { ref name, .. } if name == "svc"));
  }

  #[test]
  fn duplicate_names_across_build_files() {
    let temp = project(&[
      ("build.lua", r#"subdirs { "a", "b" }"#),
      ("a/build.lua", r#"zip_archive { name = "dist" }"#),
      ("b/build.lua", r#"zip_archive { name = "dist" }"#),
    ]);
    let err = compile(temp.path()).unwrap_err();
    assert!(matches!(
      err,
      CompileError::DuplicateModuleName { ref first, ref second, .. } if first == "a" && second == "b"
    ));
  }

  #[test]
  fn bad_pattern_only_fails_its_module() {
    let temp = svc_project(
      r#"
        go_binary { name = "broken", srcs = { "[" } }
        go_binary { name = "svc", srcs = { "*.go" } }
      "#,
    );
    let compilation = compile(temp.path()).unwrap();

    let errors = &compilation.module_errors["broken"];
    assert!(matches!(&errors[0], ModuleError::Glob(e) if e.pattern() == "["));
    assert_eq!(compilation.graph.actions_for("broken").count(), 0);
    assert_eq!(compilation.graph.actions_for("svc").count(), 1);
  }

  #[test]
  fn dangling_dependency() {
    let temp = svc_project(r#"zip_archive { name = "pkg", deps = { "svc" } }"#);
    assert!(matches!(
      compile(temp.path()),
      Err(CompileError::DanglingDependency { .. })
    ));
  }

  #[test]
  fn dependency_cycle() {
    let temp = svc_project(
      r#"
        zip_archive { name = "a", deps = { "b" } }
        zip_archive { name = "b", deps = { "a" } }
      "#,
    );
    assert!(matches!(compile(temp.path()), Err(CompileError::DependencyCycle(_))));
  }

  #[test]
  fn evaluation_errors_abort() {
    let temp = svc_project(r#"go_binary { name = "svc", vendor = true }"#);
    assert!(matches!(compile(temp.path()), Err(CompileError::Eval(_))));
  }
}

mod nested {
  use super::*;

  #[test]
  fn modules_live_in_their_build_file_directory() {
    let temp = project(&[
      ("build.lua", r#"subdirs { "cmd/server" } zip_archive { name = "release", srcs = { "README" }, deps = { "server" } }"#),
      ("README", "read me"),
      ("cmd/server/build.lua", r#"go_binary { name = "server", srcs = { "**/*.go" }, vendorFirst = true }"#),
      ("cmd/server/main.go", "package main"),
      ("cmd/server/internal/db.go", "package internal"),
      ("cmd/server/go.mod", "module server"),
    ]);
    let compilation = compile(temp.path()).unwrap();
    assert_eq!(compilation.build_files, vec!["build.lua", "cmd/server/build.lua"]);

    let server: Vec<_> = compilation.graph.actions_for("server").collect();
    assert_eq!(server[0].outputs, vec!["cmd/server/vendor"]);
    assert_eq!(
      server[1].implicit_inputs,
      vec!["cmd/server/internal/db.go", "cmd/server/main.go", "cmd/server/vendor"]
    );
    assert_eq!(server[1].args["outputPath"], "../../out/bin/server");

    let tracked = compilation.graph.tracked_inputs();
    assert!(tracked.contains("cmd/server/internal"));
  }

  #[test]
  fn renders_ninja() {
    let temp = svc_project(r#"go_binary { name = "svc", srcs = { "*.go" }, vendorFirst = true }"#);
    let compilation = compile(temp.path()).unwrap();
    let ninja = NinjaWriter::new(&compilation.graph, "out").render().unwrap();

    assert!(ninja.contains("build vendor: go_vendor | go.mod\n"));
    assert!(ninja.contains("build out/bin/svc: go_build | main.go util.go vendor\n"));
    assert!(ninja.ends_with("default out/bin/svc\n"));
  }
}
