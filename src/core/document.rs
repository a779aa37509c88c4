//! JSON document backed by a single file

use std::path::{Component, Path, PathBuf};

use serde_json::{Map, Number, Value};

use super::config::DocumentConfig;
use super::file_system::{dump_json, ensure_initialized, ensure_parent_dir, load_json};
use crate::error::{JsonWrapError, Result};

/// An in-memory JSON object mirroring the top-level object of one file.
///
/// Changes stay in memory until [`Document::commit`]; [`Document::reload`]
/// discards them in favour of what is on disk.
#[derive(Debug)]
pub struct Document {
    /// File path as given by the caller
    path: PathBuf,
    /// Absolute form of `path`, resolved at open time
    absolute: PathBuf,
    /// Document content
    data: Map<String, Value>,
    /// Commit settings
    config: DocumentConfig,
}

impl Document {
    /// Open a document, creating its directory and an empty `{}` file if needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, DocumentConfig::default())
    }

    /// Open a document with explicit commit settings
    pub fn open_with_config(path: impl AsRef<Path>, config: DocumentConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let absolute = absolutize(&path)?;

        ensure_parent_dir(&absolute)?;
        ensure_initialized(&absolute)?;
        let data = load_json(&absolute)?;

        tracing::debug!("Opened document {} with {} keys", path.display(), data.len());

        Ok(Self {
            path,
            absolute,
            data,
            config,
        })
    }

    /// Open `file_name` inside the per-user config directory of an application
    pub fn open_app_data(
        qualifier: &str,
        organization: &str,
        application: &str,
        file_name: &str,
    ) -> Result<Self> {
        let path = DocumentConfig::app_data_path(qualifier, organization, application, file_name)?;
        Self::open(path)
    }

    /// The path this document was opened with
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Absolute path of the backing file; all reads and writes go through it
    pub fn absolute_path(&self) -> &Path {
        &self.absolute
    }

    /// Commit settings
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// The document content.
    pub fn get(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Mutable access to the document content itself, not a copy.
    ///
    /// Edits made here and through the insert/remove methods land in the same
    /// object and are written by the next commit.
    pub fn get_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }

    /// Replace the in-memory content with the file content
    pub fn reload(&mut self) -> Result<()> {
        self.data = load_json(&self.absolute)?;
        tracing::debug!("Reloaded document: {}", self.path.display());
        Ok(())
    }

    /// Write the in-memory content to the file
    pub fn commit(&self) -> Result<()> {
        dump_json(&self.absolute, &self.data, &self.config)?;
        tracing::info!("Committed document: {}", self.path.display());
        Ok(())
    }

    /// Top-level keys in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Keys of the object stored at `key`
    pub fn subkeys(&self, key: &str) -> Result<Vec<String>> {
        Ok(self.object_at(key)?.keys().cloned().collect())
    }

    /// Top-level keys whose value deep-equals `value`.
    ///
    /// Numbers compare by value, so `1` matches `1.0`.
    pub fn keys_by_value(&self, value: &Value) -> Vec<String> {
        self.data
            .iter()
            .filter(|(_, v)| json_eq(v, value))
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Whether `key` is a top-level key
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the document has no keys
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Set `key` to `value`, returning the value it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    /// Set `subkey` of the object at `key` to `value`.
    ///
    /// Fails with `KeyNotFound` when `key` is absent or does not hold an object.
    pub fn insert_sub(
        &mut self,
        key: &str,
        subkey: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        match self.data.get_mut(key) {
            Some(Value::Object(map)) => Ok(map.insert(subkey.into(), value.into())),
            _ => Err(JsonWrapError::KeyNotFound(key.to_string())),
        }
    }

    /// Remove `key`, returning its value
    pub fn remove(&mut self, key: &str) -> Result<Value> {
        self.data
            .shift_remove(key)
            .ok_or_else(|| JsonWrapError::KeyNotFound(key.to_string()))
    }

    /// Remove `subkey` from the object at `key`, returning its value
    pub fn remove_sub(&mut self, key: &str, subkey: &str) -> Result<Value> {
        self.object_at_mut(key)?
            .shift_remove(subkey)
            .ok_or_else(|| JsonWrapError::KeyNotFound(subkey.to_string()))
    }

    fn object_at(&self, key: &str) -> Result<&Map<String, Value>> {
        match self.data.get(key) {
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err(JsonWrapError::TypeNotIndexable(key.to_string())),
            None => Err(JsonWrapError::KeyNotFound(key.to_string())),
        }
    }

    fn object_at_mut(&mut self, key: &str) -> Result<&mut Map<String, Value>> {
        match self.data.get_mut(key) {
            Some(Value::Object(map)) => Ok(map),
            Some(_) => Err(JsonWrapError::TypeNotIndexable(key.to_string())),
            None => Err(JsonWrapError::KeyNotFound(key.to_string())),
        }
    }
}

/// Structural equality where numbers compare numerically
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => number_eq(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| json_eq(x, y)))
        }
        _ => a == b,
    }
}

fn number_eq(x: &Number, y: &Number) -> bool {
    if x == y {
        return true;
    }
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    // Integers too wide for 64 bits only match their exact digits
    if !x.is_f64() && !y.is_f64() {
        return false;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Join relative paths onto the working directory and fold `.` and `..`
fn absolutize(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|source| JsonWrapError::Initialization {
            path: path.to_path_buf(),
            source,
        })?;
        cwd.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}
