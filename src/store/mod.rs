mod env;
mod file;
mod memory;
mod ssm;

pub use self::env::EnvStore;
pub use self::file::FileStore;
pub use self::memory::MemoryStore;
pub use self::ssm::{SsmOptions, SsmStore};

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use log::{debug, trace};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request for '{key}' failed: {message}")]
    Request { key: String, message: String },
    #[error("couldn't read parameter file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("couldn't parse parameter file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("couldn't start the async runtime")]
    Runtime(#[source] io::Error),
}

/// A key/value parameter store organized as `/`-separated hierarchical paths.
pub trait ParameterStore: Send + Sync {
    /// Exact lookup of a single parameter. A missing parameter is `Ok(None)`.
    fn get_parameter(&self, name: &str) -> Result<Option<String>, StoreError>;

    /// Recursive lookup of every parameter beneath `path`, keyed by full name.
    fn get_parameters_by_path(&self, path: &str)
        -> Result<BTreeMap<String, String>, StoreError>;

    /// Batch-get. Path-like keys are queried by prefix first and fall back to
    /// an exact lookup when nothing lives beneath them.
    #[inline]
    fn get_values(&self, keys: &[&str]) -> Result<BTreeMap<String, String>, StoreError> {
        let mut vars = BTreeMap::new();
        for &key in keys {
            debug!("Processing key={}", key);

            let mut found = BTreeMap::new();
            if is_path(key) {
                trace!("Querying parameters by path {}", key);
                found = self.get_parameters_by_path(key)?;
            }

            if found.is_empty() {
                trace!("Querying parameter {}", key);
                if let Some(value) = self.get_parameter(key)? {
                    found.insert(key.to_string(), value);
                }
            }

            vars.extend(found);
        }

        Ok(vars)
    }
}

#[inline]
pub fn is_path(key: &str) -> bool {
    key.starts_with('/')
}

/// Exposed to templates as an object with `.Key` and `.Value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KvPair {
    pub key: String,
    pub value: String,
}

impl KvPair {
    #[inline]
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Adapts the batch-get of a [`ParameterStore`] into the single-value,
/// defaulted, and collection shapes exposed to templates.
pub struct Client<'s> {
    store: &'s dyn ParameterStore,
}

impl<'s> Client<'s> {
    #[inline]
    pub fn new(store: &'s dyn ParameterStore) -> Self {
        Self { store }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Result<KvPair, StoreError> {
        let mut kv = self.store.get_values(&[name])?;
        let value = kv.remove(name).unwrap_or_default();
        Ok(KvPair::new(name, value))
    }

    /// The value of `name`, or `""` when it is absent. `default` replaces a
    /// failed fetch, not a missing key.
    #[inline]
    pub fn get_value(&self, name: &str, default: Option<&str>) -> Result<String, StoreError> {
        match self.store.get_values(&[name]) {
            Ok(mut kv) => Ok(kv.remove(name).unwrap_or_default()),
            Err(err) => match default {
                Some(default) => {
                    debug!("Using default for {}: {}", name, err);
                    Ok(default.to_string())
                }
                None => Err(err),
            },
        }
    }

    #[inline]
    pub fn get_all(&self, name: &str) -> Result<Vec<KvPair>, StoreError> {
        let kv = self.store.get_values(&[name])?;
        Ok(kv.into_iter().map(|(k, v)| KvPair::new(k, v)).collect())
    }

    #[inline]
    pub fn get_all_values(&self, name: &str) -> Result<Vec<String>, StoreError> {
        let kv = self.store.get_values(&[name])?;
        Ok(kv.into_values().collect())
    }
}
