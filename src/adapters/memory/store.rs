//! In-memory record store.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::ports::store::{CreateOutcome, DirStatus, PortError, RecordStore, StoreFuture};

/// Operations of the [`RecordStore`] port, used to target injected faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// `create_dir`
    CreateDir,
    /// `read_record`
    ReadRecord,
    /// `create_record`
    CreateRecord,
}

#[derive(Default)]
struct State {
    dirs: BTreeSet<PathBuf>,
    records: BTreeMap<PathBuf, String>,
    faults: HashMap<(StoreOp, PathBuf), String>,
    rivals: HashMap<PathBuf, String>,
    writes: usize,
}

/// In-memory [`RecordStore`].
#[derive(Default)]
pub struct MemoryRecordStore {
    state: Mutex<State>,
}

impl MemoryRecordStore {
    /// Creates a store in which `root` (and its ancestors) already exist.
    #[must_use]
    pub fn with_root(root: &Path) -> Self {
        let store = Self::default();
        {
            let mut state = store.lock();
            for ancestor in root.ancestors() {
                state.dirs.insert(ancestor.to_path_buf());
            }
        }
        store
    }

    /// Places a record directly, as if written by another process.
    pub fn insert_record(&self, path: &Path, contents: &str) {
        self.lock().records.insert(path.to_path_buf(), contents.to_string());
    }

    /// Makes every `op` on `path` fail with `message`.
    pub fn fail_on(&self, op: StoreOp, path: &Path, message: &str) {
        self.lock().faults.insert((op, path.to_path_buf()), message.to_string());
    }

    /// Makes the next `create_record` on `path` lose a race: `contents` is
    /// stored first, as if a concurrent writer got there between the read
    /// and the create.
    pub fn lose_race_on(&self, path: &Path, contents: &str) {
        self.lock().rivals.insert(path.to_path_buf(), contents.to_string());
    }

    /// Returns all directories, including the seeded root ancestors.
    #[must_use]
    pub fn dirs(&self) -> Vec<PathBuf> {
        self.lock().dirs.iter().cloned().collect()
    }

    /// Returns the contents of a record, if present.
    #[must_use]
    pub fn record(&self, path: &Path) -> Option<String> {
        self.lock().records.get(path).cloned()
    }

    /// Number of records successfully created through the port.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock leaves the maps consistent.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_fault(state: &State, op: StoreOp, path: &Path) -> Result<(), PortError> {
        match state.faults.get(&(op, path.to_path_buf())) {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }

    fn check_parent(state: &State, path: &Path) -> Result<(), PortError> {
        match path.parent() {
            Some(parent) if state.dirs.contains(parent) => Ok(()),
            _ => Err(format!("No such file or directory: {}", path.display()).into()),
        }
    }
}

impl RecordStore for MemoryRecordStore {
    fn create_dir<'a>(&'a self, path: &'a Path) -> StoreFuture<'a, DirStatus> {
        let result = self.create_dir_now(path);
        Box::pin(async move { result })
    }

    fn read_record<'a>(&'a self, path: &'a Path) -> StoreFuture<'a, Option<String>> {
        let result = self.read_record_now(path);
        Box::pin(async move { result })
    }

    fn create_record<'a>(
        &'a self,
        path: &'a Path,
        contents: &'a str,
    ) -> StoreFuture<'a, CreateOutcome> {
        let result = self.create_record_now(path, contents);
        Box::pin(async move { result })
    }
}

impl MemoryRecordStore {
    fn create_dir_now(&self, path: &Path) -> Result<DirStatus, PortError> {
        let mut state = self.lock();
        Self::check_fault(&state, StoreOp::CreateDir, path)?;
        if state.dirs.contains(path) {
            return Ok(DirStatus::AlreadyPresent);
        }
        if let Some(file) = path.ancestors().find(|a| state.records.contains_key(*a)) {
            return Err(format!("Not a directory: {}", file.display()).into());
        }
        for ancestor in path.ancestors() {
            state.dirs.insert(ancestor.to_path_buf());
        }
        Ok(DirStatus::Created)
    }

    fn read_record_now(&self, path: &Path) -> Result<Option<String>, PortError> {
        let state = self.lock();
        Self::check_fault(&state, StoreOp::ReadRecord, path)?;
        Ok(state.records.get(path).cloned())
    }

    fn create_record_now(&self, path: &Path, contents: &str) -> Result<CreateOutcome, PortError> {
        let mut state = self.lock();
        Self::check_fault(&state, StoreOp::CreateRecord, path)?;
        Self::check_parent(&state, path)?;
        if let Some(rival) = state.rivals.remove(path) {
            state.records.insert(path.to_path_buf(), rival);
        }
        if state.records.contains_key(path) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        state.records.insert(path.to_path_buf(), contents.to_string());
        state.writes += 1;
        Ok(CreateOutcome::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_dir_creates_ancestors_once() {
        let store = MemoryRecordStore::with_root(Path::new("/store"));

        assert_eq!(store.create_dir(Path::new("/store/a/b")).await.unwrap(), DirStatus::Created);
        assert_eq!(
            store.create_dir(Path::new("/store/a")).await.unwrap(),
            DirStatus::AlreadyPresent
        );
        assert!(store.dirs().contains(&PathBuf::from("/store/a")));
    }

    #[tokio::test]
    async fn create_dir_over_a_record_is_an_error() {
        let store = MemoryRecordStore::with_root(Path::new("/store"));
        store.insert_record(Path::new("/store/a"), "x");

        let err = store.create_dir(Path::new("/store/a")).await.unwrap_err();
        assert!(err.to_string().contains("Not a directory"));
    }

    #[tokio::test]
    async fn create_record_requires_directory() {
        let store = MemoryRecordStore::with_root(Path::new("/store"));

        assert!(store.create_record(Path::new("/store/a/rec"), "x").await.is_err());
        assert!(store.create_dir(Path::new("/store/a")).await.is_ok());
        assert_eq!(
            store.create_record(Path::new("/store/a/rec"), "x").await.unwrap(),
            CreateOutcome::Created
        );
    }

    #[tokio::test]
    async fn injected_fault_fails_only_targeted_op() {
        let store = MemoryRecordStore::with_root(Path::new("/store"));
        let record = Path::new("/store/rec");
        store.fail_on(StoreOp::ReadRecord, record, "EIO");

        let err = store.read_record(record).await.unwrap_err();
        assert_eq!(err.to_string(), "EIO");
        assert_eq!(store.create_record(record, "x").await.unwrap(), CreateOutcome::Created);
    }

    #[tokio::test]
    async fn lost_race_keeps_rival_contents() {
        let store = MemoryRecordStore::with_root(Path::new("/store"));
        let record = Path::new("/store/rec");
        store.lose_race_on(record, "rival\n");

        assert_eq!(store.create_record(record, "mine\n").await.unwrap(), CreateOutcome::AlreadyExists);
        assert_eq!(store.record(record).as_deref(), Some("rival\n"));
        assert_eq!(store.write_count(), 0);
    }
}
