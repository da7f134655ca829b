//! Argument extraction for template functions.

use lithos_gotmpl_core::Error;
use serde_json::Value;

/// Every helper error goes through here, so they all surface as render
/// errors with the helper's message.
#[inline]
pub fn error<S: Into<String>>(message: S) -> Error {
    Error::render(message.into(), None)
}

#[inline]
pub fn exactly(name: &str, args: &[Value], n: usize) -> Result<(), Error> {
    if args.len() == n {
        Ok(())
    } else {
        Err(error(format!(
            "{} requires {} argument(s), got {}",
            name,
            n,
            args.len()
        )))
    }
}

#[inline]
pub fn between(name: &str, args: &[Value], min: usize, max: usize) -> Result<(), Error> {
    if (min..=max).contains(&args.len()) {
        Ok(())
    } else {
        Err(error(format!(
            "{} requires {} to {} arguments, got {}",
            name,
            min,
            max,
            args.len()
        )))
    }
}

#[inline]
pub fn string(name: &str, args: &[Value], i: usize) -> Result<String, Error> {
    args.get(i)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| error(format!("argument {} of {} must be a string", i + 1, name)))
}

#[inline]
pub fn opt_string(name: &str, args: &[Value], i: usize) -> Result<Option<String>, Error> {
    match args.get(i) {
        None => Ok(None),
        Some(_) => string(name, args, i).map(Some),
    }
}

#[inline]
pub fn int(name: &str, args: &[Value], i: usize) -> Result<i64, Error> {
    args.get(i)
        .and_then(Value::as_i64)
        .ok_or_else(|| error(format!("argument {} of {} must be an integer", i + 1, name)))
}

#[inline]
pub fn list<'a>(name: &str, args: &'a [Value], i: usize) -> Result<&'a [Value], Error> {
    match args.get(i) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(error(format!("argument {} of {} must be a list", i + 1, name))),
    }
}

#[inline]
pub fn strings(name: &str, args: &[Value], i: usize) -> Result<Vec<String>, Error> {
    list(name, args, i)?
        .iter()
        .map(|item| {
            item.as_str().map(String::from).ok_or_else(|| {
                error(format!(
                    "argument {} of {} must be a list of strings",
                    i + 1,
                    name
                ))
            })
        })
        .collect()
}

#[inline]
pub fn string_list(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}
