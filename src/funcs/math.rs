use lithos_gotmpl_core::Error;
use serde_json::Value;

use super::args::{self, error};

#[inline]
fn operands(name: &str, a: &[Value]) -> Result<(i64, i64), Error> {
    args::exactly(name, a, 2)?;
    Ok((args::int(name, a, 0)?, args::int(name, a, 1)?))
}

#[inline]
fn overflow(name: &str) -> Error {
    error(format!("{}: integer overflow", name))
}

pub fn add(a: &[Value]) -> Result<Value, Error> {
    let (x, y) = operands("add", a)?;
    x.checked_add(y).map(Value::from).ok_or_else(|| overflow("add"))
}

pub fn sub(a: &[Value]) -> Result<Value, Error> {
    let (x, y) = operands("sub", a)?;
    x.checked_sub(y).map(Value::from).ok_or_else(|| overflow("sub"))
}

pub fn mul(a: &[Value]) -> Result<Value, Error> {
    let (x, y) = operands("mul", a)?;
    x.checked_mul(y).map(Value::from).ok_or_else(|| overflow("mul"))
}

/// Truncating integer division.
pub fn div(a: &[Value]) -> Result<Value, Error> {
    let (x, y) = operands("div", a)?;
    if y == 0 {
        return Err(error("div: integer divide by zero"));
    }
    x.checked_div(y).map(Value::from).ok_or_else(|| overflow("div"))
}

/// Remainder with the sign of the dividend.
pub fn modulo(a: &[Value]) -> Result<Value, Error> {
    let (x, y) = operands("mod", a)?;
    if y == 0 {
        return Err(error("mod: integer divide by zero"));
    }
    x.checked_rem(y).map(Value::from).ok_or_else(|| overflow("mod"))
}

/// `seq FIRST LAST`, the integers from `FIRST` to `LAST` inclusive, like GNU
/// seq.
pub fn seq(a: &[Value]) -> Result<Value, Error> {
    let (first, last) = operands("seq", a)?;
    Ok(Value::Array((first..=last).map(Value::from).collect()))
}

pub fn atoi(a: &[Value]) -> Result<Value, Error> {
    args::exactly("atoi", a, 1)?;
    let s = args::string("atoi", a, 0)?;
    s.parse::<i64>()
        .map(Value::from)
        .map_err(|_| error(format!("atoi: parsing {:?}: invalid syntax", s)))
}

pub fn parse_bool(a: &[Value]) -> Result<Value, Error> {
    args::exactly("parseBool", a, 1)?;
    let s = args::string("parseBool", a, 0)?;
    match s.as_str() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(Value::Bool(true)),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(Value::Bool(false)),
        _ => Err(error(format!("parseBool: parsing {:?}: invalid syntax", s))),
    }
}
