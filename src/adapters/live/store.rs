//! Live record store adapter using `tokio::fs`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::ports::store::{CreateOutcome, DirStatus, PortError, RecordStore, StoreFuture};

/// Live record store backed by real disk I/O.
///
/// Records are created by writing a staged copy next to the target and
/// hard-linking it into place, so a record is never observed half-written
/// and an existing record is never replaced.
pub struct LiveRecordStore;

impl RecordStore for LiveRecordStore {
    fn create_dir<'a>(&'a self, path: &'a Path) -> StoreFuture<'a, DirStatus> {
        Box::pin(create_dir(path))
    }

    fn read_record<'a>(&'a self, path: &'a Path) -> StoreFuture<'a, Option<String>> {
        Box::pin(read_record(path))
    }

    fn create_record<'a>(
        &'a self,
        path: &'a Path,
        contents: &'a str,
    ) -> StoreFuture<'a, CreateOutcome> {
        Box::pin(create_record(path, contents))
    }
}

async fn create_dir(path: &Path) -> Result<DirStatus, PortError> {
    match tokio::fs::create_dir(path).await {
        Ok(()) => Ok(DirStatus::Created),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            require_dir(path).await?;
            Ok(DirStatus::AlreadyPresent)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tokio::fs::create_dir_all(path).await?;
            require_dir(path).await?;
            Ok(DirStatus::Created)
        }
        Err(e) => Err(e.into()),
    }
}

/// Fails unless `path` resolves to a directory.
async fn require_dir(path: &Path) -> Result<(), PortError> {
    if tokio::fs::metadata(path).await?.is_dir() {
        Ok(())
    } else {
        Err(format!("Not a directory: {}", path.display()).into())
    }
}

async fn read_record(path: &Path) -> Result<Option<String>, PortError> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn create_record(path: &Path, contents: &str) -> Result<CreateOutcome, PortError> {
    let staged = staging_path(path)?;
    let result = stage_and_link(&staged, path, contents).await;
    // The record, if linked, holds its own reference to the data.
    if let Err(e) = tokio::fs::remove_file(&staged).await {
        if e.kind() != ErrorKind::NotFound {
            tracing::warn!(path = %staged.display(), "failed to remove staged record: {e}");
        }
    }
    result
}

/// Unique sibling path used to stage a record before linking it into place.
fn staging_path(path: &Path) -> Result<PathBuf, PortError> {
    let parent = path
        .parent()
        .ok_or_else(|| format!("record path has no parent: {}", path.display()))?;
    let name = path
        .file_name()
        .ok_or_else(|| format!("record path has no file name: {}", path.display()))?
        .to_string_lossy();
    Ok(parent.join(format!(".{name}.{}.tmp", Uuid::new_v4().simple())))
}

async fn stage_and_link(
    staged: &Path,
    path: &Path,
    contents: &str,
) -> Result<CreateOutcome, PortError> {
    let mut file =
        tokio::fs::OpenOptions::new().write(true).create_new(true).open(staged).await?;
    file.write_all(contents.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);

    match tokio::fs::hard_link(staged, path).await {
        Ok(()) => {
            sync_parent(path).await?;
            Ok(CreateOutcome::Created)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(CreateOutcome::AlreadyExists),
        Err(e) => Err(e.into()),
    }
}

/// Flushes the directory entry of a newly linked record.
async fn sync_parent(path: &Path) -> Result<(), PortError> {
    let parent = path
        .parent()
        .ok_or_else(|| format!("record path has no parent: {}", path.display()))?;
    tokio::fs::File::open(parent).await?.sync_all().await?;
    Ok(())
}
