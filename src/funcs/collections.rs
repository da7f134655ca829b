use lithos_gotmpl_core::Error;
use serde_json::{Map, Value};

use super::args::{self, error};

/// Reverses a list. Anything else is returned unchanged.
pub fn reverse(a: &[Value]) -> Result<Value, Error> {
    args::exactly("reverse", a, 1)?;
    match &a[0] {
        Value::Array(items) => Ok(Value::Array(items.iter().rev().cloned().collect())),
        other => Ok(other.clone()),
    }
}

/// Sorts strings by byte length, shortest first.
pub fn sort_by_length(a: &[Value]) -> Result<Value, Error> {
    args::exactly("sortByLength", a, 1)?;
    let mut items = args::strings("sortByLength", a, 0)?;
    items.sort_by_key(String::len);
    Ok(args::string_list(items))
}

/// Sorts key/value pairs by the byte length of their keys, shortest first.
pub fn sort_kv_by_length(a: &[Value]) -> Result<Value, Error> {
    args::exactly("sortKVByLength", a, 1)?;
    let mut keyed = Vec::new();
    for item in args::list("sortKVByLength", a, 0)? {
        match item.get("Key").and_then(Value::as_str) {
            Some(key) => keyed.push((key.len(), item.clone())),
            None => return Err(error("sortKVByLength requires a list of key/value pairs")),
        }
    }

    keyed.sort_by_key(|(len, _)| *len);
    Ok(Value::Array(keyed.into_iter().map(|(_, item)| item).collect()))
}

/// `map K1 V1 K2 V2 ...`
pub fn create_map(a: &[Value]) -> Result<Value, Error> {
    if a.len() % 2 != 0 {
        return Err(error("invalid map call"));
    }

    let mut map = Map::with_capacity(a.len() / 2);
    for pair in a.chunks(2) {
        match &pair[0] {
            Value::String(key) => {
                map.insert(key.clone(), pair[1].clone());
            }
            _ => return Err(error("map keys must be strings")),
        }
    }
    Ok(Value::Object(map))
}
