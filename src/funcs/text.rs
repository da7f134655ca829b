use lithos_gotmpl_core::Error;
use serde_json::Value;

use super::args;

pub fn to_upper(a: &[Value]) -> Result<Value, Error> {
    args::exactly("toUpper", a, 1)?;
    Ok(args::string("toUpper", a, 0)?.to_uppercase().into())
}

pub fn to_lower(a: &[Value]) -> Result<Value, Error> {
    args::exactly("toLower", a, 1)?;
    Ok(args::string("toLower", a, 0)?.to_lowercase().into())
}

/// `trimSuffix S SUFFIX`
pub fn trim_suffix(a: &[Value]) -> Result<Value, Error> {
    args::exactly("trimSuffix", a, 2)?;
    let s = args::string("trimSuffix", a, 0)?;
    let suffix = args::string("trimSuffix", a, 1)?;
    Ok(s.strip_suffix(suffix.as_str()).unwrap_or(&s).to_string().into())
}

/// `contains S SUBSTR`
pub fn contains(a: &[Value]) -> Result<Value, Error> {
    args::exactly("contains", a, 2)?;
    let s = args::string("contains", a, 0)?;
    let substr = args::string("contains", a, 1)?;
    Ok(Value::Bool(s.contains(&substr)))
}

/// `replace S OLD NEW N`, replacing the first `N` matches, or all of them
/// when `N` is negative.
pub fn replace(a: &[Value]) -> Result<Value, Error> {
    args::exactly("replace", a, 4)?;
    let s = args::string("replace", a, 0)?;
    let old = args::string("replace", a, 1)?;
    let new = args::string("replace", a, 2)?;
    let n = args::int("replace", a, 3)?;

    let replaced = match usize::try_from(n) {
        Ok(n) => s.replacen(&old, &new, n),
        Err(_) => s.replace(&old, &new),
    };
    Ok(replaced.into())
}

/// `split S SEP`. An empty separator splits into characters.
pub fn split(a: &[Value]) -> Result<Value, Error> {
    args::exactly("split", a, 2)?;
    let s = args::string("split", a, 0)?;
    let sep = args::string("split", a, 1)?;

    let parts = if sep.is_empty() {
        s.chars().map(String::from).collect()
    } else {
        s.split(sep.as_str()).map(String::from).collect()
    };
    Ok(args::string_list(parts))
}

/// `join LIST SEP`
pub fn join(a: &[Value]) -> Result<Value, Error> {
    args::exactly("join", a, 2)?;
    let items = args::strings("join", a, 0)?;
    let sep = args::string("join", a, 1)?;
    Ok(items.join(&sep).into())
}
