use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use mlua::prelude::*;
use tracing::debug;

use super::{convert, loaders};
use crate::config::Config;
use crate::module::{ModuleDescriptor, ModuleFactory, ModuleRegistry};
use crate::util::path;

/// What evaluation accumulates across every loaded build file.
#[derive(Debug, Default)]
pub struct EvalState {
  pub modules: Vec<ModuleDescriptor>,
  /// Root-relative build files, in load order.
  pub build_files: Vec<String>,
}

/// Create a Lua runtime exposing one global function per registered module
/// type plus `subdirs`.
pub fn create_runtime(config: &Config, registry: &ModuleRegistry, state: Rc<RefCell<EvalState>>) -> LuaResult<Lua> {
  let lua = Lua::new();
  let globals = lua.globals();

  for type_name in registry.type_names() {
    let Some(factory) = registry.factory(type_name) else {
      continue;
    };
    let function = create_module_function(&lua, type_name, factory, state.clone())?;
    globals.set(type_name, function)?;
  }

  globals.set("subdirs", create_subdirs(&lua, config, state)?)?;

  Ok(lua)
}

/// `<type> { name = ..., ... }`: decode the table into a fresh module.
fn create_module_function(
  lua: &Lua,
  type_name: &str,
  factory: ModuleFactory,
  state: Rc<RefCell<EvalState>>,
) -> LuaResult<LuaFunction> {
  let type_name = type_name.to_string();
  lua.create_function(move |lua, props: LuaTable| {
    let props = convert::lua_to_json(LuaValue::Table(props))?;

    let name = props.get("name").and_then(|n| n.as_str()).unwrap_or_default();
    if name.is_empty() {
      return Err(LuaError::external(format!(
        "{} requires a non-empty string 'name'",
        type_name
      )));
    }
    let name = name.to_string();

    let mut module = factory();
    module
      .load_properties(props)
      .map_err(|e| LuaError::external(format!("{} '{}': {}", type_name, name, e)))?;

    let dir = loaders::current_module_dir(lua)?;
    debug!(module = %name, kind = %module.kind(), dir = %dir, "declared module");
    state.borrow_mut().modules.push(ModuleDescriptor::new(dir, module));
    Ok(())
  })
}

/// `subdirs { "a", "b" }`: load `<dir>/a/<build file>` and `<dir>/b/<build file>`.
fn create_subdirs(lua: &Lua, config: &Config, state: Rc<RefCell<EvalState>>) -> LuaResult<LuaFunction> {
  let root = config.root_dir.clone();
  let build_file = config.build_file.clone();

  lua.create_function(move |lua, dirs: Vec<String>| {
    let current = loaders::current_module_dir(lua)?;

    for dir in dirs {
      if dir.trim().is_empty() || Path::new(&dir).is_absolute() {
        return Err(LuaError::external(format!(
          "subdirs: '{}' must be a relative directory",
          dir
        )));
      }
      let module_dir = path::join(&[&current, &dir]);
      if module_dir == current || !path::is_within(&module_dir, &current) || module_dir.starts_with("..") {
        return Err(LuaError::external(format!(
          "subdirs: '{}' must name a directory below '{}'",
          dir, current
        )));
      }

      let relative_file = path::join(&[&module_dir, &build_file]);
      let file = root.join(&relative_file);
      if !file.is_file() {
        return Err(LuaError::external(format!(
          "subdirs: no {} in '{}'",
          build_file, module_dir
        )));
      }

      {
        let mut state = state.borrow_mut();
        if state.build_files.contains(&relative_file) {
          return Err(LuaError::external(format!("subdirs: '{}' is loaded twice", relative_file)));
        }
        state.build_files.push(relative_file);
      }

      // No borrow of `state` may be held here: the nested file declares modules.
      loaders::load_build_file(lua, &file, &module_dir)?;
    }
    Ok(())
  })
}
