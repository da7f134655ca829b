use std::collections::BTreeMap;

use super::{ParameterStore, StoreError};

/// Parameters held in memory, keyed by full name.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore(BTreeMap<String, String>);

impl MemoryStore {
    #[inline]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[inline]
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<String>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), value.into())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryStore
where
    K: Into<String>,
    V: Into<String>,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl ParameterStore for MemoryStore {
    #[inline]
    fn get_parameter(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self.0.get(name).cloned())
    }

    #[inline]
    fn get_parameters_by_path(
        &self,
        path: &str,
    ) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(beneath(&self.0, path))
    }
}

/// Every entry strictly beneath the hierarchy `path`.
#[inline]
fn beneath(map: &BTreeMap<String, String>, path: &str) -> BTreeMap<String, String> {
    let prefix = if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    };

    map.range(prefix.clone()..)
        .take_while(|(k, _)| k.starts_with(&prefix))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
