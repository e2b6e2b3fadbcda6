use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::ClientError;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no completed job to download")]
    NotCompleted,
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("cannot use {path:?} as output directory: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A result file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedResult {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Stream a job's result body into `output_dir/filename`.
///
/// Chunks are written to a temp file next to the target as they arrive; the
/// target is only replaced once the whole body was received and synced. A
/// body that breaks off leaves any earlier result in place and no temp file.
pub async fn save_result<S>(
    mut body: S,
    output_dir: &Path,
    filename: &str,
) -> Result<SavedResult, DownloadError>
where
    S: Stream<Item = Result<Bytes, ClientError>> + Unpin,
{
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|source| DownloadError::OutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

    let target = output_dir.join(filename);
    let write_error = |source: io::Error| DownloadError::Write {
        path: target.clone(),
        source,
    };

    let staging = NamedTempFile::new_in(output_dir).map_err(&write_error)?;
    let handle = staging.as_file().try_clone().map_err(&write_error)?;
    let mut file = tokio::fs::File::from_std(handle);
    let mut written = 0u64;
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await.map_err(&write_error)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(&write_error)?;
    file.sync_all().await.map_err(&write_error)?;
    drop(file);

    staging
        .persist(&target)
        .map_err(|err| write_error(err.error))?;
    Ok(SavedResult {
        path: target,
        bytes: written,
    })
}
