use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value as JsonValue;

use super::{MemoryStore, ParameterStore, StoreError};

/// Parameters loaded once from a YAML, JSON, or TOML document. Nested
/// mappings become `/`-separated paths.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    params: MemoryStore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    #[inline]
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

impl FileStore {
    #[inline]
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StoreError> {
        let path = path.into();
        let contents = fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;

        let params = parse(&contents, Format::of(&path)).map_err(|message| StoreError::Parse {
            path: path.clone(),
            message,
        })?;
        debug!("Loaded {} parameters from {}", params.len(), path.display());

        Ok(Self { path, params })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ParameterStore for FileStore {
    #[inline]
    fn get_parameter(&self, name: &str) -> Result<Option<String>, StoreError> {
        self.params.get_parameter(name)
    }

    #[inline]
    fn get_parameters_by_path(
        &self,
        path: &str,
    ) -> Result<BTreeMap<String, String>, StoreError> {
        self.params.get_parameters_by_path(path)
    }
}

#[inline]
fn parse(contents: &str, format: Format) -> Result<MemoryStore, String> {
    if contents.trim().is_empty() {
        return Ok(MemoryStore::new());
    }

    let doc: JsonValue = match format {
        Format::Yaml => serde_yaml::from_str(contents).map_err(|err| err.to_string())?,
        Format::Json => serde_json::from_str(contents).map_err(|err| err.to_string())?,
        Format::Toml => toml::from_str(contents).map_err(|err| err.to_string())?,
    };

    match doc {
        JsonValue::Object(_) => {
            let mut params = MemoryStore::new();
            flatten("", &doc, &mut params);
            Ok(params)
        }
        JsonValue::Null => Ok(MemoryStore::new()),
        _ => Err("top level must be a mapping".to_string()),
    }
}

fn flatten(prefix: &str, value: &JsonValue, out: &mut MemoryStore) {
    match value {
        JsonValue::Object(map) => {
            for (k, v) in map {
                flatten(&join(prefix, k), v, out);
            }
        }
        JsonValue::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten(&join(prefix, &i.to_string()), v, out);
            }
        }
        JsonValue::Null => {
            out.insert(prefix, "");
        }
        JsonValue::String(s) => {
            out.insert(prefix, s.as_str());
        }
        JsonValue::Bool(_) | JsonValue::Number(_) => {
            out.insert(prefix, value.to_string());
        }
    }
}

#[inline]
fn join(prefix: &str, segment: &str) -> String {
    format!("{}/{}", prefix, segment.trim_matches('/'))
}
