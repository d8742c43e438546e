use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::sheet::state::AnswerMap;
use crate::store::schema::{
    ANSWERS_FILE, KEY_FILE, MODE_FILE, PersistedSheet, decode_mode, encode_mode,
};

/// Why a persisted record could not be loaded. Both cases resolve to "start
/// that record empty" at the call site; the distinction only feeds the log.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {name}: {source}")]
    Io {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {name}: {source}")]
    Parse {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value persistence for the sheet: one JSON file per record under the
/// user data dir. Writes are atomic (tmp + fsync + rename) and best-effort;
/// the in-memory state is never rolled back on a failed write.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(Self::default_base_dir())
    }

    /// Where records (and the log file) live when no override is given.
    pub fn default_base_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("marksheet")
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn read_record<T: DeserializeOwned>(
        &self,
        name: &'static str,
    ) -> Result<Option<T>, StoreError> {
        let path = self.file_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).map_err(|source| StoreError::Io { name, source })?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Parse { name, source })
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.file_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn load_answers(&self) -> Result<AnswerMap, StoreError> {
        Ok(self.read_record(ANSWERS_FILE)?.unwrap_or_default())
    }

    pub fn load_key(&self) -> Result<AnswerMap, StoreError> {
        Ok(self.read_record(KEY_FILE)?.unwrap_or_default())
    }

    pub fn load_mode(&self) -> Result<bool, StoreError> {
        Ok(self
            .read_record::<String>(MODE_FILE)?
            .is_some_and(|raw| decode_mode(&raw)))
    }

    /// Load all three records. A record that fails to load is logged and
    /// starts empty without affecting its siblings, so a corrupt answers
    /// file never blanks the key.
    pub fn load_all(&self) -> PersistedSheet {
        let answers = self.load_answers().unwrap_or_else(|e| {
            tracing::warn!("{e}; starting with empty answers");
            AnswerMap::new()
        });
        let key = self.load_key().unwrap_or_else(|e| {
            tracing::warn!("{e}; starting with empty answer key");
            AnswerMap::new()
        });
        let key_mode = self.load_mode().unwrap_or_else(|e| {
            tracing::warn!("{e}; starting in answering mode");
            false
        });
        PersistedSheet {
            answers,
            key,
            key_mode,
        }
    }

    pub fn save_answers(&self, answers: &AnswerMap) -> Result<()> {
        self.save(ANSWERS_FILE, answers)
    }

    pub fn save_key(&self, key: &AnswerMap) -> Result<()> {
        self.save(KEY_FILE, key)
    }

    pub fn save_mode(&self, key_mode: bool) -> Result<()> {
        self.save(MODE_FILE, &encode_mode(key_mode))
    }

    pub fn remove_answers(&self) -> Result<()> {
        self.remove(ANSWERS_FILE)
    }

    pub fn remove_key(&self) -> Result<()> {
        self.remove(KEY_FILE)
    }

    pub fn remove_mode(&self) -> Result<()> {
        self.remove(MODE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::choice::Choice;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn sample_map() -> AnswerMap {
        [(1, Choice::A), (42, Choice::C), (200, Choice::D)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_round_trip_answers() {
        let (_dir, store) = make_test_store();
        let answers = sample_map();
        store.save_answers(&answers).unwrap();
        assert_eq!(store.load_answers().unwrap(), answers);
    }

    #[test]
    fn test_answer_record_uses_string_keys() {
        let (_dir, store) = make_test_store();
        let answers: AnswerMap = [(7, Choice::B)].into_iter().collect();
        store.save_answers(&answers).unwrap();
        let raw = fs::read_to_string(store.file_path(ANSWERS_FILE)).unwrap();
        assert_eq!(raw, r#"{"7":"B"}"#);
    }

    #[test]
    fn test_mode_record_is_string_literal() {
        let (_dir, store) = make_test_store();
        store.save_mode(true).unwrap();
        let raw = fs::read_to_string(store.file_path(MODE_FILE)).unwrap();
        assert_eq!(raw, "\"true\"");
        assert!(store.load_mode().unwrap());

        store.save_mode(false).unwrap();
        assert!(!store.load_mode().unwrap());
    }

    #[test]
    fn test_missing_files_load_as_defaults() {
        let (_dir, store) = make_test_store();
        assert!(store.load_answers().unwrap().is_empty());
        assert!(store.load_key().unwrap().is_empty());
        assert!(!store.load_mode().unwrap());
    }

    #[test]
    fn test_corrupt_record_is_a_parse_error() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(ANSWERS_FILE), "{not json").unwrap();
        let err = store.load_answers().unwrap_err();
        assert!(matches!(err, StoreError::Parse { name, .. } if name == ANSWERS_FILE));
    }

    #[test]
    fn test_corrupt_record_does_not_affect_siblings() {
        let (_dir, store) = make_test_store();
        store.save_key(&sample_map()).unwrap();
        store.save_mode(true).unwrap();
        fs::write(store.file_path(ANSWERS_FILE), "][").unwrap();

        let loaded = store.load_all();
        assert!(loaded.answers.is_empty());
        assert_eq!(loaded.key, sample_map());
        assert!(loaded.key_mode);
    }

    #[test]
    fn test_out_of_range_persisted_entries_still_parse() {
        // The store is a dumb adapter; range enforcement lives in the state
        // machine's single mutation path.
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(ANSWERS_FILE), r#"{"999":"A"}"#).unwrap();
        let loaded = store.load_answers().unwrap();
        assert_eq!(loaded.get(&999), Some(&Choice::A));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, store) = make_test_store();
        store.save_answers(&sample_map()).unwrap();
        store.remove_answers().unwrap();
        assert!(!store.file_path(ANSWERS_FILE).exists());
        // Removing a file that is already gone is fine.
        store.remove_answers().unwrap();
    }

    #[test]
    fn test_corrupt_record_warning_reaches_the_sink() {
        let (dir, store) = make_test_store();
        fs::write(store.file_path(ANSWERS_FILE), "{bad").unwrap();

        let log_path = dir.path().join("test.log");
        let log_file = fs::File::create(&log_path).unwrap();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(log_file))
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            store.load_all();
        });

        let logged = fs::read_to_string(&log_path).unwrap();
        assert!(logged.contains("malformed JSON"));
        assert!(logged.contains(ANSWERS_FILE));
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (_dir, store) = make_test_store();
        store.save_answers(&sample_map()).unwrap();
        let tmp_files: Vec<_> = fs::read_dir(_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty());
    }
}
