//! Lua values to JSON for property decoding.

use mlua::prelude::*;
use serde_json::{Map, Number, Value};

/// Convert a Lua value into JSON.
///
/// Tables with a non-empty sequence part (`t[1] ~= nil`) become arrays of
/// `t[1]..t[#t]`; empty tables become empty arrays, so `srcs = {}` decodes as a
/// list. Every other table must have string keys and becomes an object.
pub fn lua_to_json(value: LuaValue) -> LuaResult<Value> {
  match value {
    LuaValue::Nil => Ok(Value::Null),
    LuaValue::Boolean(b) => Ok(Value::Bool(b)),
    LuaValue::Integer(i) => Ok(Value::from(i)),
    LuaValue::Number(n) => Number::from_f64(n)
      .map(Value::Number)
      .ok_or_else(|| LuaError::external(format!("cannot use non-finite number {} as a property", n))),
    LuaValue::String(s) => Ok(Value::String(s.to_str()?.to_string())),
    LuaValue::Table(t) => table_to_json(t),
    other => Err(LuaError::external(format!(
      "unsupported property value of type {}",
      other.type_name()
    ))),
  }
}

fn table_to_json(table: LuaTable) -> LuaResult<Value> {
  let len = table.raw_len();
  let first: LuaValue = table.raw_get(1)?;
  if len > 0 && !first.is_nil() {
    let mut items = Vec::with_capacity(len);
    for i in 1..=len {
      items.push(lua_to_json(table.raw_get(i)?)?);
    }
    return Ok(Value::Array(items));
  }

  let mut map = Map::new();
  for pair in table.pairs::<LuaValue, LuaValue>() {
    let (key, value) = pair?;
    let LuaValue::String(key) = key else {
      return Err(LuaError::external(format!(
        "property tables must use string keys, found {}",
        key.type_name()
      )));
    };
    map.insert(key.to_str()?.to_string(), lua_to_json(value)?);
  }

  if map.is_empty() {
    Ok(Value::Array(Vec::new()))
  } else {
    Ok(Value::Object(map))
  }
}
