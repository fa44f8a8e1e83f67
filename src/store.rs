//! The `ResourceStore`: a normalized key/value view over one XAML
//! `ResourceDictionary` file.
//!
//! The store owns the bound file path and the in-memory mapping, and
//! provides the load / get / list / set / save pipeline. It has no internal
//! locking; a single logical owner is expected to serialize calls.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    error::Error,
    formats::{XamlFormat, xaml::StringEntry},
    traits::Parser,
    types::Translation,
};

/// How a [`ResourceStore::load`] call obtained its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The backing file existed and parsed into a `ResourceDictionary`.
    Parsed,
    /// The backing file was missing; a skeleton document was written to the
    /// path and loaded.
    SkeletonCreated,
    /// The backing file existed but contained no recognizable structure
    /// (empty or whitespace-only); the skeleton was substituted in memory.
    SkeletonSubstituted,
}

/// A flat, key-addressable store of translation strings backed by one
/// `ResourceDictionary` file.
///
/// Keys are flat literal strings; dotted segments (`"MainWindow.Title"`)
/// are a naming convention, not structural nesting. The store starts
/// uninitialized: `get`/`list` return empty results and `set`/`save` are
/// no-ops until a `load` succeeds.
#[derive(Debug, Default)]
pub struct ResourceStore {
    path: Option<PathBuf>,
    entries: Option<BTreeMap<String, Translation>>,
}

impl ResourceStore {
    /// Creates a new, uninitialized store.
    pub fn new() -> Self {
        ResourceStore {
            path: None,
            entries: None,
        }
    }

    /// Whether a `load` has completed successfully.
    pub fn is_initialized(&self) -> bool {
        self.entries.is_some()
    }

    /// The file path bound by the last successful `load`.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads the dictionary at `path` and binds the path for later `save`
    /// calls.
    ///
    /// A missing file is not an error: a skeleton document is written to
    /// `path` and the store comes up initialized and empty. Likewise, an
    /// existing file with no recognizable `ResourceDictionary` structure is
    /// treated as the skeleton. Duplicate keys in the document resolve
    /// last-write-wins.
    ///
    /// On error the store is left untouched: neither the mapping nor the
    /// bound path changes.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadOutcome, Error> {
        let path = path.as_ref();

        let (content, mut outcome) = match fs::read_to_string(path) {
            Ok(content) => (Some(content), LoadOutcome::Parsed),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "resource file missing, writing skeleton");
                XamlFormat::skeleton().write_to(path)?;
                (None, LoadOutcome::SkeletonCreated)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read resource file");
                return Err(Error::Io(e));
            }
        };

        let format = match content {
            Some(content) => {
                let parsed = match XamlFormat::from_str(&content) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to parse resource file");
                        return Err(e);
                    }
                };
                if parsed.has_root {
                    parsed
                } else {
                    outcome = LoadOutcome::SkeletonSubstituted;
                    XamlFormat::skeleton()
                }
            }
            None => XamlFormat::skeleton(),
        };

        // Later entries overwrite earlier ones on duplicate keys.
        let mut entries = BTreeMap::new();
        for entry in &format.entries {
            entries.insert(entry.key.clone(), entry.to_translation());
        }

        debug!(
            path = %path.display(),
            entries = entries.len(),
            outcome = ?outcome,
            "resource dictionary loaded"
        );
        self.path = Some(path.to_path_buf());
        self.entries = Some(entries);
        Ok(outcome)
    }

    /// Returns the text at `key`, or `None` if the store is uninitialized
    /// or the key is absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.as_ref()?.get(key).map(|t| t.text.as_str())
    }

    /// Returns a copy of the full mapping; empty when uninitialized.
    pub fn list(&self) -> BTreeMap<String, Translation> {
        self.entries.clone().unwrap_or_default()
    }

    /// Inserts or overwrites the entry at `key`. No-op when uninitialized.
    ///
    /// `preserve_space` is raised to true when the text contains a newline
    /// or leading/trailing whitespace, so the entry survives a save/reload
    /// cycle unchanged.
    pub fn set(&mut self, key: impl Into<String>, translation: Translation) {
        let Some(entries) = self.entries.as_mut() else {
            return;
        };
        let preserve_space =
            translation.preserve_space || crate::types::text_needs_preserving(&translation.text);
        entries.insert(
            key.into(),
            Translation {
                preserve_space,
                ..translation
            },
        );
    }

    /// Writes the mapping back to the bound path. No-op `Ok(())` when the
    /// store is uninitialized or no path is bound.
    ///
    /// The document is serialized deterministically (sorted keys, fixed
    /// indentation, required root namespaces always present) and written via
    /// a sibling temporary file plus rename, so a failed write never
    /// truncates the existing file.
    pub fn save(&self) -> Result<(), Error> {
        let (Some(path), Some(entries)) = (self.path.as_ref(), self.entries.as_ref()) else {
            return Ok(());
        };

        let format = XamlFormat {
            entries: entries
                .iter()
                .map(|(key, translation)| StringEntry::from_translation(key, translation))
                .collect(),
            has_root: true,
        };

        let tmp = sibling_tmp_path(path);
        if let Err(e) = format.write_to(&tmp) {
            let _ = fs::remove_file(&tmp);
            warn!(path = %path.display(), error = %e, "failed to write resource file");
            return Err(e);
        }
        fs::rename(&tmp, path).map_err(Error::Io)?;

        debug!(path = %path.display(), entries = entries.len(), "resource dictionary saved");
        Ok(())
    }
}

/// Temporary file next to `path`, so the final rename stays on one
/// filesystem.
fn sibling_tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_store_is_inert() {
        let mut store = ResourceStore::new();
        assert!(!store.is_initialized());
        assert_eq!(store.get("any"), None);
        assert!(store.list().is_empty());
        store.set("any", Translation::new("x"));
        assert!(store.list().is_empty());
        assert!(store.save().is_ok());
    }

    #[test]
    fn test_sibling_tmp_path() {
        let tmp = sibling_tmp_path(Path::new("/lang/enUS.axaml"));
        assert_eq!(tmp, Path::new("/lang/enUS.axaml.tmp"));
    }
}
