//! Durable key-value slots. Each key holds one serialized document that is
//! replaced wholesale on every write.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("slot key {0:?} is not valid")]
    InvalidKey(String),
    #[error("slot io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type DbResult<T> = Result<T, DbError>;

/// Storage for named documents. Reads of an unknown key return `None`.
pub trait KvSlot {
    fn read(&self, key: &str) -> DbResult<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> DbResult<()>;
    fn remove(&mut self, key: &str) -> DbResult<()>;
}

impl<S: KvSlot + ?Sized> KvSlot for Box<S> {
    fn read(&self, key: &str) -> DbResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> DbResult<()> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) -> DbResult<()> {
        (**self).remove(key)
    }
}

impl<S: KvSlot + ?Sized> KvSlot for &mut S {
    fn read(&self, key: &str) -> DbResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> DbResult<()> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) -> DbResult<()> {
        (**self).remove(key)
    }
}

fn check_key(key: &str) -> DbResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DbError::InvalidKey(key.to_string()))
    }
}

/// In-process slot; contents vanish with the value.
#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    entries: HashMap<String, String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvSlot for MemorySlot {
    fn read(&self, key: &str) -> DbResult<Option<String>> {
        check_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> DbResult<()> {
        check_key(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DbResult<()> {
        check_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}

/// Slot backed by `<dir>/<key>.json` files. Writes go through a temp file
/// and a rename so readers never observe a half-written document.
#[derive(Clone, Debug)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn open(dir: impl Into<PathBuf>) -> DbResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| DbError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KvSlot for FileSlot {
    fn read(&self, key: &str) -> DbResult<Option<String>> {
        check_key(key)?;
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(DbError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> DbResult<()> {
        check_key(key)?;
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, value).map_err(|source| DbError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        std::fs::rename(&tmp_path, &path).map_err(|source| DbError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = value.len(), "slot written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> DbResult<()> {
        check_key(key)?;
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(DbError::Io { path, source }),
        }
    }
}

/// Environment-driven location of the data directory.
#[derive(Clone, Debug, Deserialize)]
pub struct SlotSettings {
    #[serde(default = "default_dir_key")]
    env_key: String,
    #[serde(default = "default_dir")]
    fallback_dir: PathBuf,
}

impl Default for SlotSettings {
    fn default() -> Self {
        Self {
            env_key: default_dir_key(),
            fallback_dir: default_dir(),
        }
    }
}

fn default_dir_key() -> String {
    "HR_DATA_DIR".to_string()
}

fn default_dir() -> PathBuf {
    PathBuf::from("data")
}

impl SlotSettings {
    pub fn new(env_key: impl Into<String>) -> Self {
        Self {
            env_key: env_key.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn with_fallback_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fallback_dir = dir.into();
        self
    }

    pub fn data_dir(&self) -> PathBuf {
        std::env::var_os(&self.env_key)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.fallback_dir.clone())
    }
}

/// Open the file slot described by `settings`, creating its directory.
pub fn connect(settings: &SlotSettings) -> DbResult<FileSlot> {
    FileSlot::open(settings.data_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_slot_reads_back_writes() {
        let mut slot = MemorySlot::new();
        assert_eq!(slot.read("employees").unwrap(), None);
        slot.write("employees", "[]").unwrap();
        assert_eq!(slot.read("employees").unwrap().as_deref(), Some("[]"));
        slot.remove("employees").unwrap();
        assert_eq!(slot.read("employees").unwrap(), None);
    }

    #[test]
    fn rejects_keys_that_could_escape_the_directory() {
        let mut slot = MemorySlot::new();
        for key in ["", "../etc", "a/b", "with space"] {
            assert!(matches!(slot.write(key, "x"), Err(DbError::InvalidKey(_))));
        }
        assert!(slot.write("currentUser", "x").is_ok());
        assert!(slot.write("employees_v2-backup", "x").is_ok());
    }

    #[test]
    fn file_slot_missing_key_is_none() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let slot = FileSlot::open(dir.path()).unwrap();
        assert_eq!(slot.read("employees").unwrap(), None);
    }

    #[test]
    fn file_slot_overwrites_whole_document() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut slot = FileSlot::open(dir.path().join("nested")).unwrap();
        slot.write("employees", "[1,2,3]").unwrap();
        slot.write("employees", "[4]").unwrap();

        assert_eq!(slot.read("employees").unwrap().as_deref(), Some("[4]"));
        let final_path = slot.path_for("employees");
        assert!(final_path.exists());
        assert!(
            !final_path.with_extension("json.tmp").exists(),
            "temp file should not survive a successful write"
        );
    }

    #[test]
    fn file_slot_remove_is_idempotent() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let mut slot = FileSlot::open(dir.path()).unwrap();
        slot.write("currentUser", "{}").unwrap();
        slot.remove("currentUser").unwrap();
        slot.remove("currentUser").unwrap();
        assert_eq!(slot.read("currentUser").unwrap(), None);
    }

    #[test]
    fn boxed_slot_delegates() {
        let mut slot: Box<dyn KvSlot> = Box::new(MemorySlot::new());
        slot.write("employees", "[]").unwrap();
        assert_eq!(slot.read("employees").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn settings_fall_back_when_env_missing() {
        let settings =
            SlotSettings::new("HR_TEST_DIR_THAT_IS_NEVER_SET").with_fallback_dir("/tmp/hr-data");
        assert_eq!(settings.data_dir(), PathBuf::from("/tmp/hr-data"));
    }
}
