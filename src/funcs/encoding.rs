use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lithos_gotmpl_core::Error;
use serde_json::{Map, Value};

use super::args::{self, error};

pub fn base64_encode(a: &[Value]) -> Result<Value, Error> {
    args::exactly("base64Encode", a, 1)?;
    Ok(STANDARD.encode(args::string("base64Encode", a, 0)?).into())
}

pub fn base64_decode(a: &[Value]) -> Result<Value, Error> {
    args::exactly("base64Decode", a, 1)?;
    let bytes = STANDARD
        .decode(args::string("base64Decode", a, 0)?)
        .map_err(|err| error(format!("base64Decode: {}", err)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned().into())
}

/// Parses a JSON object. `null` decodes to an empty map, as unmarshalling
/// into a Go map does.
pub fn json(a: &[Value]) -> Result<Value, Error> {
    args::exactly("json", a, 1)?;
    match parse("json", &args::string("json", a, 0)?)? {
        Value::Null => Ok(Value::Object(Map::new())),
        obj @ Value::Object(_) => Ok(obj),
        _ => Err(error("json: expected a JSON object")),
    }
}

/// Parses a JSON array. `null` decodes to an empty list.
pub fn json_array(a: &[Value]) -> Result<Value, Error> {
    args::exactly("jsonArray", a, 1)?;
    match parse("jsonArray", &args::string("jsonArray", a, 0)?)? {
        Value::Null => Ok(Value::Array(vec![])),
        arr @ Value::Array(_) => Ok(arr),
        _ => Err(error("jsonArray: expected a JSON array")),
    }
}

#[inline]
fn parse(name: &str, data: &str) -> Result<Value, Error> {
    serde_json::from_str(data).map_err(|err| error(format!("{}: {}", name, err)))
}
