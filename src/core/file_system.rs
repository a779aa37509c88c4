//! File operations and JSON encoding for document files

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use super::config::DocumentConfig;
use crate::error::{JsonWrapError, Result};

/// Content written to a document file that is missing or empty
pub const EMPTY_DOCUMENT: &str = "{}";

/// Read the whole file at `path` as UTF-8 text
pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| JsonWrapError::file(path, e))
}

/// Overwrite the file at `path` with `data`
pub fn write_file(path: &Path, data: &str) -> Result<()> {
    fs::write(path, data).map_err(|e| JsonWrapError::file(path, e))
}

/// Write `data` to a sibling temporary file, then rename it over `path`
pub fn write_file_atomic(path: &Path, data: &str) -> Result<()> {
    let tmp = temp_sibling(path);
    if let Err(e) = write_and_rename(&tmp, path, data) {
        // The temporary may not exist if creation itself failed
        let _ = fs::remove_file(&tmp);
        return Err(JsonWrapError::file(path, e));
    }
    Ok(())
}

fn write_and_rename(tmp: &Path, target: &Path, data: &str) -> io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    fs::rename(tmp, target)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

/// Parse `text` as a JSON document whose top level must be an object
pub fn parse_object(path: &Path, text: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(text).map_err(|source| JsonWrapError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(JsonWrapError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Load the JSON object stored at `path`
pub fn load_json(path: &Path) -> Result<Map<String, Value>> {
    let text = read_file(path)?;
    parse_object(path, &text)
}

/// Serialize `data` with `indent` spaces per level.
///
/// Control characters are escaped; non-ASCII characters are written as-is.
pub fn to_pretty_string(data: &Map<String, Value>, indent: usize) -> serde_json::Result<String> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(serde_json::Error::custom)
}

/// Serialize `data` and write it to `path` as configured
pub fn dump_json(path: &Path, data: &Map<String, Value>, config: &DocumentConfig) -> Result<()> {
    let mut text = to_pretty_string(data, config.indent).map_err(|source| JsonWrapError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    if config.trailing_newline {
        text.push('\n');
    }

    if config.atomic_commit {
        write_file_atomic(path, &text)
    } else {
        write_file(path, &text)
    }
}

/// Create the parent directory of `path` and any missing ancestors.
///
/// Nothing is created when the parent is empty or the current directory.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent == Path::new(".") || parent.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(parent).map_err(|source| JsonWrapError::Initialization {
        path: parent.to_path_buf(),
        source,
    })?;
    tracing::info!("Created directory: {}", parent.display());
    Ok(())
}

/// Write an empty object to `path` if the file is missing or zero-length.
///
/// Returns whether the file was (re)initialized.
pub fn ensure_initialized(path: &Path) -> Result<bool> {
    let needs_init = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(e) if e.kind() == io::ErrorKind::NotFound => true,
        Err(e) => return Err(JsonWrapError::file(path, e)),
    };

    if needs_init {
        write_file(path, EMPTY_DOCUMENT)?;
        tracing::info!("Initialized empty document: {}", path.display());
    }
    Ok(needs_init)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn pretty_string_uses_four_space_indent() {
        let data = object(json!({"a": 1, "b": {"c": [true, null]}}));
        let text = to_pretty_string(&data, 4).unwrap();
        let expected = "{\n    \"a\": 1,\n    \"b\": {\n        \"c\": [\n            true,\n            null\n        ]\n    }\n}";
        assert_eq!(text, expected);
    }

    #[test]
    fn pretty_string_keeps_non_ascii_and_escapes_controls() {
        let data = object(json!({"k": "日本語", "t": "a\tb\u{1}"}));
        let text = to_pretty_string(&data, 4).unwrap();
        assert!(text.contains("\"日本語\""));
        assert!(text.contains("\"a\\tb\\u0001\""));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn empty_object_renders_compact() {
        assert_eq!(to_pretty_string(&Map::new(), 4).unwrap(), "{}");
    }

    #[test]
    fn parse_object_rejects_non_objects() {
        let path = Path::new("doc.json");
        assert!(matches!(
            parse_object(path, "[1, 2]"),
            Err(JsonWrapError::NotAnObject { .. })
        ));
        assert!(matches!(
            parse_object(path, "{\"a\":"),
            Err(JsonWrapError::Parse { .. })
        ));
    }

    #[test]
    fn ensure_parent_dir_skips_bare_file_names() {
        ensure_parent_dir(Path::new("doc.json")).unwrap();
        ensure_parent_dir(Path::new("./doc.json")).unwrap();
    }

    #[test]
    fn ensure_initialized_fills_empty_file_only() {
        let temp = tempdir().unwrap();
        let empty = temp.path().join("empty.json");
        let full = temp.path().join("full.json");
        fs::write(&empty, b"").unwrap();
        fs::write(&full, b"{\"x\": 1}").unwrap();

        assert!(ensure_initialized(&empty).unwrap());
        assert!(!ensure_initialized(&full).unwrap());
        assert_eq!(fs::read_to_string(&empty).unwrap(), "{}");
        assert_eq!(fs::read_to_string(&full).unwrap(), "{\"x\": 1}");
    }

    #[test]
    fn atomic_write_replaces_target_and_cleans_up() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("doc.json");
        fs::write(&path, b"old").unwrap();

        write_file_atomic(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn read_missing_file_is_file_error() {
        let temp = tempdir().unwrap();
        let err = load_json(&temp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, JsonWrapError::File { .. }));
    }
}
