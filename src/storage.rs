//! 言語設定の永続化
//!
//! 最後に選択されたロケールコードを 1 つのスロットに平文で保存する。

use std::path::{
    Path,
    PathBuf,
};
use std::sync::{
    Arc,
    Mutex,
    PoisonError,
};

use crate::error::StorageError;

/// Single durable slot holding the last selected locale code.
pub trait PreferenceStore: Send + Sync + 'static {
    /// Stored code, or `Ok(None)` when the slot was never written.
    ///
    /// # Errors
    /// Underlying storage could not be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// # Errors
    /// Underlying storage could not be written.
    fn save(&self, code: &str) -> Result<(), StorageError>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Arc<T> {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, code: &str) -> Result<(), StorageError> {
        (**self).save(code)
    }
}

/// Preference persisted to a plain-text file.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    /// 保存先ファイル
    path: PathBuf,
}

impl FilePreferenceStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wrap an I/O error with the slot path
    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), source }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let code = content.trim();
                Ok((!code.is_empty()).then(|| code.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Preference file not found: {:?}", self.path);
                Ok(None)
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, code: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        std::fs::write(&self.path, code).map_err(|e| self.io_error(e))
    }
}

/// In-process preference slot.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    /// 保存値
    value: Mutex<Option<String>>,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with `code`, as if saved in an earlier session.
    #[must_use]
    pub fn with_value(code: impl Into<String>) -> Self {
        Self { value: Mutex::new(Some(code.into())) }
    }

    /// Current slot contents.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.get())
    }

    fn save(&self, code: &str) -> Result<(), StorageError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(code.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;

    /// load: ファイルが存在しない場合は None
    #[googletest::test]
    fn file_store_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(temp_dir.path().join("language"));

        expect_that!(store.load(), ok(none()));
    }

    /// save → load: 前後の空白は無視される
    #[googletest::test]
    fn file_store_round_trips_code() {
        let temp_dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(temp_dir.path().join("nested/dir/language"));

        store.save("ja").unwrap();
        fs::write(store.path(), "ja\n").unwrap();

        expect_that!(store.load(), ok(some(eq("ja"))));
    }

    #[googletest::test]
    fn file_store_blank_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("language");
        fs::write(&path, "  \n").unwrap();

        expect_that!(FilePreferenceStore::new(path).load(), ok(none()));
    }

    #[googletest::test]
    fn file_store_unreadable_path_is_error() {
        let temp_dir = TempDir::new().unwrap();
        // ディレクトリは文字列として読めない
        let store = FilePreferenceStore::new(temp_dir.path());

        expect_that!(store.load(), err(displays_as(contains_substring("preference file"))));
    }

    #[googletest::test]
    fn memory_store_overwrites_slot() {
        let store = MemoryPreferenceStore::with_value("fr");

        store.save("bn").unwrap();

        expect_that!(store.get(), some(eq("bn")));
    }
}
