//! Persistence for the exclusion list - load and merge-save a JSON file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{LexUseError, Result};

use super::record::{ExclusionRecord, StoredEntry};

/// Durable set of excluded forms, keyed by form id.
///
/// The whole list is held in memory and rewritten on every [`add`]. A
/// missing file is an empty list; an existing file that is empty or not a
/// JSON object is refused, so a damaged list is never silently replaced.
///
/// [`add`]: ExclusionStore::add
#[derive(Debug)]
pub struct ExclusionStore {
    path: Option<PathBuf>,
    entries: IndexMap<String, StoredEntry>,
    degraded: bool,
}

impl ExclusionStore {
    /// Open the exclusion list at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!(path = %path.display(), "no exclusion list yet, starting empty");
            return Ok(Self {
                path: Some(path.to_path_buf()),
                entries: IndexMap::new(),
                degraded: false,
            });
        }

        let content = fs::read_to_string(path).map_err(|e| LexUseError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Err(LexUseError::CorruptExclusionList {
                path: path.to_path_buf(),
                message: "file is empty".to_string(),
            });
        }

        let entries: IndexMap<String, StoredEntry> =
            serde_json::from_str(&content).map_err(|e| LexUseError::CorruptExclusionList {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        debug!(path = %path.display(), records = entries.len(), "loaded exclusion list");

        Ok(Self {
            path: Some(path.to_path_buf()),
            entries,
            degraded: false,
        })
    }

    /// Create a store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: IndexMap::new(),
            degraded: false,
        }
    }

    /// Whether `form_id` is excluded for `language`.
    pub fn is_excluded(&self, form_id: &str, language: &str) -> bool {
        self.entries
            .get(form_id)
            .is_some_and(|entry| entry.lang == language)
    }

    /// Record a form, replacing any earlier record for the same form id,
    /// and write the list through to disk.
    ///
    /// A failed write does not abort the run: the record stays in memory,
    /// the failure is logged and the store reports itself as degraded.
    pub fn add(&mut self, record: ExclusionRecord) {
        debug!(form = %record.form_id, word = %record.word, "adding to exclusion list");
        self.entries.insert(record.form_id.clone(), record.to_entry());

        match self.persist() {
            Ok(()) => self.degraded = false,
            Err(e) => {
                warn!(error = %e, "exclusion list not saved, continuing in memory only");
                self.degraded = true;
            }
        }
    }

    /// Look up the record for a form id.
    pub fn get(&self, form_id: &str) -> Option<ExclusionRecord> {
        self.entries
            .get(form_id)
            .map(|entry| ExclusionRecord::from_entry(form_id, entry))
    }

    /// All records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = ExclusionRecord> + '_ {
        self.entries
            .iter()
            .map(|(form_id, entry)| ExclusionRecord::from_entry(form_id, entry))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the last write failed.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Write the list to a sibling temp file, sync it, then move it over the
    /// real file.
    fn persist(&self) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    LexUseError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let tmp_path = temp_path(path);
        let file = File::create(&tmp_path).map_err(|e| {
            LexUseError::Persistence(format!(
                "Failed to create file '{}': {}",
                tmp_path.display(),
                e
            ))
        })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.entries).map_err(|e| {
            LexUseError::Persistence(format!("Failed to serialize exclusion list: {}", e))
        })?;
        writer.flush().map_err(|e| LexUseError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        let file = writer.into_inner().map_err(|e| LexUseError::Io {
            path: tmp_path.clone(),
            source: e.into_error(),
        })?;
        file.sync_all().map_err(|e| LexUseError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;

        fs::rename(&tmp_path, path).map_err(|e| {
            LexUseError::Persistence(format!(
                "Failed to replace '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

/// Temp file used while rewriting the list.
fn temp_path(path: &Path) -> PathBuf {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!(".{}.tmp", name))
}
