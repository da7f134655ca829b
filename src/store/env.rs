use std::collections::BTreeMap;
use std::env;

use super::{ParameterStore, StoreError};

/// Reads parameters from environment variables captured when the store is
/// created. `/app/db/host` is looked up as `APP_DB_HOST`.
#[derive(Debug, Clone, Default)]
pub struct EnvStore {
    vars: BTreeMap<String, String>,
}

impl EnvStore {
    /// Captures the process environment. Variables whose name or value is not
    /// valid unicode are skipped.
    #[inline]
    pub fn new() -> Self {
        env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for EnvStore
where
    K: Into<String>,
    V: Into<String>,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ParameterStore for EnvStore {
    #[inline]
    fn get_parameter(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.vars.get(&to_var(name)).cloned())
    }

    #[inline]
    fn get_parameters_by_path(
        &self,
        path: &str,
    ) -> Result<BTreeMap<String, String>, StoreError> {
        let prefix = match to_var(path) {
            var if var.is_empty() => var,
            var => format!("{}_", var.trim_end_matches('_')),
        };

        let vars = self
            .vars
            .iter()
            .filter(|(k, _)| k.starts_with(&prefix))
            .map(|(k, v)| (to_key(k), v.clone()))
            .collect();
        Ok(vars)
    }
}

#[inline]
fn to_var(key: &str) -> String {
    key.trim_start_matches('/').replace('/', "_").to_uppercase()
}

#[inline]
fn to_key(var: &str) -> String {
    format!("/{}", var.to_lowercase().replace('_', "/"))
}
