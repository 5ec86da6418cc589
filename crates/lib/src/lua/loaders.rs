//! Build file loading with per-file module directories.
//!
//! Each build file runs in its own environment table that falls back to `_G`
//! for reads. The environment carries `__dir`, the root-relative module
//! directory of the file, and the same value is kept in the Lua registry so
//! module functions called from that file know where their module lives.
//! Nested loads (through `subdirs`) save and restore the previous value.

use std::fs;
use std::path::Path;

use mlua::prelude::*;
use tracing::debug;

/// Registry key for the module directory of the file currently executing.
const MODULE_DIR_KEY: &str = "__strata_module_dir";

/// Execute the build file at `path` as the build file of `module_dir`.
pub fn load_build_file(lua: &Lua, path: &Path, module_dir: &str) -> LuaResult<()> {
  let content = fs::read_to_string(path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", path.display(), e)))?;
  debug!(path = %path.display(), dir = %module_dir, "loading build file");

  let prev_dir: Option<String> = lua.named_registry_value(MODULE_DIR_KEY)?;
  lua.set_named_registry_value(MODULE_DIR_KEY, module_dir)?;

  let env = lua.create_table()?;
  env.set("__dir", module_dir)?;

  // Reads fall through to _G; assignments stay local to the file.
  let mt = lua.create_table()?;
  mt.set("__index", lua.globals())?;
  env.set_metatable(Some(mt))?;

  let result = lua
    .load(&content)
    .set_name(format!("@{}", path.display()))
    .set_environment(env)
    .exec();

  // Ignore cleanup errors so the original error is not masked.
  let _ = lua.set_named_registry_value(MODULE_DIR_KEY, prev_dir);

  result
}

/// Module directory of the build file currently executing, `.` outside any file.
pub fn current_module_dir(lua: &Lua) -> LuaResult<String> {
  let dir: Option<String> = lua.named_registry_value(MODULE_DIR_KEY)?;
  Ok(dir.unwrap_or_else(|| ".".to_string()))
}
