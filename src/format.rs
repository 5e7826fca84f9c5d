//! Structured-data formats for entry, translation, and bundle files.
//!
//! Every data file in a project can be written in any registered format; the
//! file extension picks the codec. All codecs parse into the same
//! [`serde_json::Value`] tree, so the rest of the pipeline never knows which
//! format a file came from.
//!
//! ## Registry
//!
//! | Codec | Extensions | Notes |
//! |-------|------------|-------|
//! | `json` | `.json` | Pretty-printed on serialize |
//! | `yaml` | `.yaml`, `.yml` | Block style on serialize |
//!
//! Registry order is also the lookup priority: when the same stem exists with
//! several extensions, `find_with_extensions` returns the first in
//! `json → yaml → yml` order.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(PathBuf),
    #[error("Invalid data in {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A parse/serialize pair for one structured-data format.
#[derive(Debug)]
pub struct Codec {
    /// Short format identifier, used on the command line (`convert --to yaml`).
    pub id: &'static str,
    /// File extensions handled by this codec, in lookup priority order.
    pub extensions: &'static [&'static str],
    parse: fn(&str) -> Result<Value, FormatError>,
    serialize: fn(&Value) -> Result<String, FormatError>,
}

impl Codec {
    pub fn parse(&self, text: &str) -> Result<Value, FormatError> {
        (self.parse)(text)
    }

    pub fn serialize(&self, value: &Value) -> Result<String, FormatError> {
        (self.serialize)(value)
    }

    /// Extension written by this codec when converting files.
    pub fn primary_extension(&self) -> &'static str {
        self.extensions[0]
    }
}

fn parse_json(text: &str) -> Result<Value, FormatError> {
    Ok(serde_json::from_str(text)?)
}

fn serialize_json(value: &Value) -> Result<String, FormatError> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

fn parse_yaml(text: &str) -> Result<Value, FormatError> {
    Ok(serde_yaml::from_str(text)?)
}

fn serialize_yaml(value: &Value) -> Result<String, FormatError> {
    Ok(serde_yaml::to_string(value)?)
}

/// All known codecs, in lookup priority order.
pub static CODECS: &[Codec] = &[
    Codec {
        id: "json",
        extensions: &["json"],
        parse: parse_json,
        serialize: serialize_json,
    },
    Codec {
        id: "yaml",
        extensions: &["yaml", "yml"],
        parse: parse_yaml,
        serialize: serialize_yaml,
    },
];

/// Look up a codec by its identifier (`"json"`, `"yaml"`).
pub fn codec_by_id(id: &str) -> Option<&'static Codec> {
    CODECS.iter().find(|c| c.id.eq_ignore_ascii_case(id))
}

/// Look up the codec for a path by its extension.
pub fn codec_for(path: &Path) -> Option<&'static Codec> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    CODECS.iter().find(|c| c.extensions.contains(&ext.as_str()))
}

/// Every registered extension, in priority order.
pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    CODECS.iter().flat_map(|c| c.extensions.iter().copied())
}

/// Whether a path carries a registered extension.
pub fn is_data_file(path: &Path) -> bool {
    path.is_file() && codec_for(path).is_some()
}

/// Return the first existing `dir/stem.<ext>` in registry priority order.
pub fn find_with_extensions(dir: &Path, stem: &str) -> Option<PathBuf> {
    supported_extensions()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
}

/// Read and parse a data file into a generic value tree.
pub fn read_value(path: &Path) -> Result<Value, FormatError> {
    let codec =
        codec_for(path).ok_or_else(|| FormatError::UnsupportedExtension(path.to_path_buf()))?;
    let text = fs::read_to_string(path).map_err(|source| FormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    codec.parse(&text)
}

/// Read a data file and deserialize it into `T`.
pub fn read<T: DeserializeOwned>(path: &Path) -> Result<T, FormatError> {
    let value = read_value(path)?;
    serde_json::from_value(value).map_err(|source| FormatError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn codec_selected_by_extension() {
        assert_eq!(codec_for(Path::new("a/b.json")).unwrap().id, "json");
        assert_eq!(codec_for(Path::new("a/b.yaml")).unwrap().id, "yaml");
        assert_eq!(codec_for(Path::new("a/b.YML")).unwrap().id, "yaml");
        assert!(codec_for(Path::new("a/b.toml")).is_none());
        assert!(codec_for(Path::new("a/b")).is_none());
    }

    #[test]
    fn extension_priority_is_json_yaml_yml() {
        let exts: Vec<&str> = supported_extensions().collect();
        assert_eq!(exts, vec!["json", "yaml", "yml"]);
    }

    #[test]
    fn find_with_extensions_prefers_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("x.yml"), "a: 1").unwrap();
        fs::write(tmp.path().join("x.json"), "{\"a\": 1}").unwrap();

        let found = find_with_extensions(tmp.path(), "x").unwrap();
        assert_eq!(found.file_name().unwrap(), "x.json");
    }

    #[test]
    fn find_with_extensions_falls_through_to_yml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("x.yml"), "a: 1").unwrap();

        let found = find_with_extensions(tmp.path(), "x").unwrap();
        assert_eq!(found.file_name().unwrap(), "x.yml");
        assert!(find_with_extensions(tmp.path(), "missing").is_none());
    }

    #[test]
    fn yaml_and_json_parse_to_same_value() {
        let from_json = codec_by_id("json")
            .unwrap()
            .parse(r#"{"title": "Hi", "tags": ["a", "b"], "n": {"x": "y"}}"#)
            .unwrap();
        let from_yaml = codec_by_id("yaml")
            .unwrap()
            .parse("title: Hi\ntags:\n  - a\n  - b\nn:\n  x: y\n")
            .unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn yaml_serialize_reparses_equal() {
        let value = json!({"code": "line one\nline two", "list": [{"k": "v"}]});
        let yaml = codec_by_id("yaml").unwrap();
        let text = yaml.serialize(&value).unwrap();
        assert_eq!(yaml.parse(&text).unwrap(), value);
    }

    #[test]
    fn read_value_malformed_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read_value(&path), Err(FormatError::Json(_))));
    }

    #[test]
    fn read_value_unsupported_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("x.toml");
        fs::write(&path, "a = 1").unwrap();
        assert!(matches!(
            read_value(&path),
            Err(FormatError::UnsupportedExtension(_))
        ));
    }
}
