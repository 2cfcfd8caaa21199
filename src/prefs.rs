//! Persistent integer preferences that survive process restarts.
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::PrefsError;

/// Key under which the best score is stored.
pub const BEST_SCORE_KEY: &str = "BestScore";

const PREFS_FILE: &str = "prefs.json";

pub trait PrefStore {
    /// Value stored under `key`, or `default` when absent.
    fn get_int(&self, key: &str, default: i64) -> i64;
    fn set_int(&mut self, key: &str, value: i64);
    /// Flush pending writes to the backing medium.
    fn save(&mut self) -> Result<(), PrefsError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsDocument {
    #[serde(default)]
    ints: BTreeMap<String, i64>,
}

/// JSON file in the platform data directory.
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    doc: PrefsDocument,
}

impl FilePrefs {
    /// Open the store in `dir`, reading any previously saved values.
    ///
    /// A file that no longer parses is moved aside to `prefs.json.bad` and
    /// the store starts empty.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, PrefsError> {
        let path = dir.as_ref().join(PREFS_FILE);
        let doc = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Unreadable preferences, starting fresh: {e}");
                    quarantine(&path);
                    PrefsDocument::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => PrefsDocument::default(),
            Err(e) => return Err(PrefsError::Io(e)),
        };
        tracing::debug!(path = %path.display(), keys = doc.ints.len(), "Preferences loaded");
        Ok(Self { path, doc })
    }

    /// Platform data directory, e.g. `~/.local/share/pipe-flap` on Linux.
    pub fn default_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "pipe-flap")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./save_data"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn quarantine(path: &Path) {
    let aside = path.with_extension("json.bad");
    if let Err(e) = fs::rename(path, &aside) {
        tracing::warn!(path = %path.display(), "Failed to move preferences aside: {e}");
    }
}

impl PrefStore for FilePrefs {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.doc.ints.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.doc.ints.insert(key.to_string(), value);
    }

    fn save(&mut self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(&self.doc)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory store. Clones share the same contents, so a test can keep a
/// handle while the keeper owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryPrefs {
    values: Rc<RefCell<BTreeMap<String, i64>>>,
    saves: Rc<Cell<usize>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_int(key: &str, value: i64) -> Self {
        let prefs = Self::default();
        prefs.values.borrow_mut().insert(key.to_string(), value);
        prefs
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.values.borrow().get(key).copied()
    }

    /// Number of `save` calls observed.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl PrefStore for MemoryPrefs {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }

    fn save(&mut self) -> Result<(), PrefsError> {
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
