//! Dataset provider reading exported JSON files from a directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use org_inspector::recipes::dataset::{
    dataset_from_records, dataset_from_rows, DatasetAlias, DatasetError, DatasetProvider,
    DatasetRequest, RawDataset,
};
use serde_json::Value;

/// Serves `<dir>/<cacheKey>.json`. A file holds either an object keyed by
/// record id or an array of records carrying their own `id`. Arrays of
/// dependency rows are kept whole and keyed by position.
#[derive(Debug, Clone)]
pub struct JsonDirectoryProvider {
    directory: PathBuf,
}

impl JsonDirectoryProvider {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, cache_key: &str) -> PathBuf {
        self.directory.join(format!("{cache_key}.json"))
    }
}

impl DatasetProvider for JsonDirectoryProvider {
    fn fetch(&self, request: &DatasetRequest) -> Result<RawDataset, DatasetError> {
        let cache_key = request.cache_key();
        let path = self.path_for(&cache_key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(DatasetError::NotFound { cache_key });
            }
            Err(source) => return Err(DatasetError::Io { cache_key, source }),
        };
        tracing::debug!(path = %path.display(), "dataset file read");
        parse_dataset(request.alias, &cache_key, &raw)
    }
}

fn parse_dataset(
    alias: DatasetAlias,
    cache_key: &str,
    raw: &str,
) -> Result<RawDataset, DatasetError> {
    let malformed = |reason: String| DatasetError::Malformed {
        cache_key: cache_key.to_string(),
        reason,
    };
    match serde_json::from_str::<Value>(raw).map_err(|err| malformed(err.to_string()))? {
        Value::Object(records) => Ok(records.into_iter().collect()),
        Value::Array(rows) if !alias.keyed_by_id() => Ok(dataset_from_rows(rows)),
        Value::Array(records) => {
            let count = records.len();
            let dataset = dataset_from_records(records);
            if dataset.len() < count {
                tracing::warn!(
                    cache_key,
                    skipped = count - dataset.len(),
                    "records without a string id or with a duplicate id were dropped"
                );
            }
            Ok(dataset)
        }
        other => Err(malformed(format!(
            "expected an object or an array, found {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
