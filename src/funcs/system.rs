use std::env;
use std::fmt::Write;
use std::fs;
use std::io;

use chrono::Local;
use lithos_gotmpl_core::Error;
use serde_json::Value;

use super::args;

/// `getenv KEY [DEFAULT]`. Unset and empty variables yield the default, or
/// the empty string.
pub fn getenv(a: &[Value]) -> Result<Value, Error> {
    lookup_env(a, |key| env::var(key).ok())
}

#[inline]
fn lookup_env<F>(a: &[Value], lookup: F) -> Result<Value, Error>
where
    F: Fn(&str) -> Option<String>,
{
    args::between("getenv", a, 1, 2)?;
    let key = args::string("getenv", a, 0)?;
    let default = args::opt_string("getenv", a, 1)?.unwrap_or_default();

    match lookup(&key) {
        Some(value) if !value.is_empty() => Ok(value.into()),
        _ => Ok(default.into()),
    }
}

/// True unless the path definitely does not exist.
pub fn file_exists(a: &[Value]) -> Result<Value, Error> {
    args::exactly("fileExists", a, 1)?;
    let path = args::string("fileExists", a, 0)?;
    let exists = match fs::metadata(path) {
        Ok(_) => true,
        Err(err) => err.kind() != io::ErrorKind::NotFound,
    };
    Ok(Value::Bool(exists))
}

/// `datetime [FORMAT]`, the current local time as RFC 3339 or in the given
/// strftime format.
pub fn datetime(a: &[Value]) -> Result<Value, Error> {
    args::between("datetime", a, 0, 1)?;
    let now = Local::now();
    let formatted = match args::opt_string("datetime", a, 0)? {
        Some(format) => {
            let mut out = String::new();
            write!(out, "{}", now.format(&format))
                .map_err(|_| args::error(format!("datetime: invalid format {:?}", format)))?;
            out
        }
        None => now.to_rfc3339(),
    };
    Ok(formatted.into())
}

/// Last element of a slash-separated path.
pub fn base(a: &[Value]) -> Result<Value, Error> {
    args::exactly("base", a, 1)?;
    Ok(path_base(&args::string("base", a, 0)?).into())
}

/// Everything but the last element of a slash-separated path, cleaned.
pub fn dir(a: &[Value]) -> Result<Value, Error> {
    args::exactly("dir", a, 1)?;
    Ok(path_dir(&args::string("dir", a, 0)?).into())
}

#[inline]
fn path_base(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }

    match trimmed.rfind('/') {
        Some(i) => trimmed[i + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

#[inline]
fn path_dir(path: &str) -> String {
    let dir = match path.rfind('/') {
        Some(i) => &path[..=i],
        None => "",
    };
    path_clean::clean(dir)
}
