//! Entry file format conversion.
//!
//! Re-encodes every entry file of every declared category into a target
//! codec. Each conversion is verified before anything is written: the new
//! text is parsed back and must yield the same value tree as the source.
//! Files that fail verification, or cannot be read at all, are reported and
//! left alone; the rest of the run continues.
//!
//! Without a target directory the command only verifies; with one, converted
//! files are written under `<target>/<category>/<stem>.<ext>`.

use crate::declarations::OrderedTable;
use crate::format::{self, Codec, FormatError};
use crate::store::{self, StoreError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Cannot convert {path}: {source}")]
    Format { path: PathBuf, source: FormatError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertStatus {
    /// Round trip verified and the converted file written.
    Written(PathBuf),
    /// Round trip verified; nothing written (no target directory).
    Verified,
    /// Source already uses the target codec.
    Skipped,
    /// Parsing the converted text did not reproduce the source value.
    Mismatch,
    /// The source could not be read or re-encoded.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOutcome {
    pub source: PathBuf,
    pub status: ConvertStatus,
}

/// Convert every entry file under `content_dir` to `target`.
pub fn convert_entries(
    content_dir: &Path,
    categories: &OrderedTable,
    target: &Codec,
    target_dir: Option<&Path>,
) -> Result<Vec<ConvertOutcome>, ConvertError> {
    let mut outcomes = Vec::new();
    for category in categories.ids() {
        let cat_dir = content_dir.join(category);
        if !cat_dir.is_dir() {
            continue;
        }
        for source in store::entry_files(&cat_dir)? {
            let dest_dir = target_dir.map(|dir| dir.join(category));
            let status = match convert_file(&source, target, dest_dir.as_deref()) {
                Ok(status) => status,
                Err(ConvertError::Format { source: e, .. }) => {
                    tracing::warn!(path = %source.display(), error = %e, "cannot convert; skipping");
                    ConvertStatus::Failed(e.to_string())
                }
                Err(e) => return Err(e),
            };
            if status == ConvertStatus::Mismatch {
                tracing::warn!(path = %source.display(), "round trip mismatch; not converted");
            }
            outcomes.push(ConvertOutcome { source, status });
        }
    }
    Ok(outcomes)
}

/// Convert one file, writing into `dest_dir` when given.
pub fn convert_file(
    source: &Path,
    target: &Codec,
    dest_dir: Option<&Path>,
) -> Result<ConvertStatus, ConvertError> {
    let with_path = |source_err| ConvertError::Format {
        path: source.to_path_buf(),
        source: source_err,
    };
    let codec = format::codec_for(source)
        .ok_or_else(|| with_path(FormatError::UnsupportedExtension(source.to_path_buf())))?;
    if codec.id == target.id {
        return Ok(ConvertStatus::Skipped);
    }

    let original = format::read_value(source).map_err(with_path)?;
    let text = target.serialize(&original).map_err(with_path)?;
    let reparsed = target.parse(&text).map_err(with_path)?;
    if reparsed != original {
        return Ok(ConvertStatus::Mismatch);
    }

    let Some(dir) = dest_dir else {
        return Ok(ConvertStatus::Verified);
    };
    let stem = source.file_stem().unwrap_or_default().to_string_lossy();
    let dest = dir.join(format!("{stem}.{}", target.primary_extension()));
    fs::create_dir_all(dir)?;
    fs::write(&dest, text)?;
    Ok(ConvertStatus::Written(dest))
}
