//! JSON Lines file store.
//!
//! Each collection lives in `<data_dir>/<collection>.jsonl`, one record per
//! line, in insertion order. Saves rewrite the whole file through
//! `fs::write_atomic`.

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::traits::{Record, RecordStore};
use crate::error::{LibraryError, Result};
use crate::fs::write_atomic;

/// File-backed record store for one collection.
#[derive(Debug)]
pub struct FileStore<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> FileStore<R> {
    /// Open the collection file inside `data_dir`, creating the directory if
    /// needed. The file itself is only created on the first save.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` if the directory cannot be created.
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).map_err(|e| {
            LibraryError::Storage(format!(
                "Failed to create data directory {}: {}",
                data_dir.display(),
                e
            ))
        })?;
        Ok(Self {
            path: Self::path_in(data_dir),
            _record: PhantomData,
        })
    }

    /// Location of this collection's file inside `data_dir`.
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}.jsonl", R::COLLECTION))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Record> RecordStore<R> for FileStore<R> {
    fn load(&self) -> Result<Vec<R>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            LibraryError::Storage(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let mut records = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(line).map_err(|e| {
                LibraryError::Storage(format!(
                    "Malformed {} record at {}:{}: {}",
                    R::KIND,
                    self.path.display(),
                    index + 1,
                    e
                ))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    fn save(&mut self, records: &[R]) -> Result<()> {
        let mut buffer = Vec::new();
        for record in records {
            serde_json::to_writer(&mut buffer, record)?;
            buffer.push(b'\n');
        }
        write_atomic(&self.path, &buffer)?;

        tracing::debug!(
            collection = R::COLLECTION,
            records = records.len(),
            path = %self.path.display(),
            "saved collection"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Book, Member, MemberStatus};
    use tempfile::tempdir;

    fn member(id: u32, name: &str) -> Member {
        Member {
            member_id: id,
            name: name.to_string(),
            email: format!("{}@example.org", name.to_lowercase()),
            phone: "555-0100".to_string(),
            status: MemberStatus::Active,
            total_borrows: 0,
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::<Book>::open(dir.path()).unwrap();
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_writes_one_line_per_record() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::<Member>::open(dir.path()).unwrap();

        store
            .save(&[member(1, "Ada"), member(2, "Grace")])
            .unwrap();

        let contents = fs::read_to_string(dir.path().join("members.jsonl")).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.lines().next().unwrap().contains("\"name\":\"Ada\""));
    }

    #[test]
    fn test_malformed_line_reports_location() {
        let dir = tempdir().unwrap();
        let store = FileStore::<Member>::open(dir.path()).unwrap();
        let good = serde_json::to_string(&member(1, "Ada")).unwrap();
        fs::write(store.path(), format!("{}\n\nnot json\n", good)).unwrap();

        let err = store.load().unwrap_err();

        match err {
            LibraryError::Storage(message) => assert!(message.contains("members.jsonl:3")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_open_creates_data_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        FileStore::<Book>::open(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
