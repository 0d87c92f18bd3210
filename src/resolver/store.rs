//! On-disk transcript cache.
//!
//! One plain UTF-8 file per video at `{dir}/{video_id}.txt`. A file's
//! existence is the cache-hit signal, so writes go through a temporary file
//! and a rename.

use super::TranscriptRecord;
use crate::error::Result;
use crate::video::VideoId;
use chrono::{DateTime, Local};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const EXTENSION: &str = "txt";

/// A cached transcript as seen by a directory listing.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub video_id: VideoId,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Local>>,
}

/// Transcript files under a single directory.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, video_id: &VideoId) -> PathBuf {
        self.dir.join(video_id.file_name(EXTENSION))
    }

    /// Create the directory if it does not exist.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Read the transcript for `video_id`, or `None` when it is not cached.
    pub async fn read(&self, video_id: &VideoId) -> Result<Option<TranscriptRecord>> {
        let path = self.path_for(video_id);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(TranscriptRecord {
                video_id: video_id.clone(),
                text,
                path,
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write (or overwrite) the transcript for `video_id`.
    pub async fn write(&self, video_id: &VideoId, text: &str) -> Result<TranscriptRecord> {
        let path = self.path_for(video_id);
        let partial = self
            .dir
            .join(format!("{}.{}.{}.part", video_id, EXTENSION, Uuid::new_v4().simple()));

        tokio::fs::write(&partial, text).await?;
        if let Err(e) = tokio::fs::rename(&partial, &path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }

        debug!("Stored transcript at {}", path.display());
        Ok(TranscriptRecord {
            video_id: video_id.clone(),
            text: text.to_string(),
            path,
        })
    }

    /// Delete the transcript for `video_id`. Returns whether one existed.
    pub async fn remove(&self, video_id: &VideoId) -> Result<bool> {
        match tokio::fs::remove_file(self.path_for(video_id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// List cached transcripts, newest first. A missing directory is empty.
    pub async fn list(&self) -> Result<Vec<TranscriptEntry>> {
        let mut entries = Vec::new();

        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(entries),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(video_id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| VideoId::parse(s).ok())
            else {
                continue;
            };

            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            entries.push(TranscriptEntry {
                video_id,
                path,
                size_bytes: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Local>::from),
            });
        }

        entries.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.video_id.cmp(&b.video_id)));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> VideoId {
        VideoId::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());

        assert!(store.read(&id("abc123")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());

        let written = store.write(&id("abc123"), "hello world").await.unwrap();
        assert_eq!(written.path, dir.path().join("abc123.txt"));

        let read = store.read(&id("abc123")).await.unwrap().unwrap();
        assert_eq!(read, written);
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());

        store.write(&id("abc123"), "a much longer first version").await.unwrap();
        store.write(&id("abc123"), "short").await.unwrap();

        let read = store.read(&id("abc123")).await.unwrap().unwrap();
        assert_eq!(read.text, "short");
    }

    #[tokio::test]
    async fn test_list_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());

        store.write(&id("abc123"), "one").await.unwrap();
        store.write(&id("dQw4w9WgXcQ"), "two!").await.unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let entries = store.list().await.unwrap();
        assert_eq!(entries.len(), 2);
        let sizes: u64 = entries.iter().map(|e| e.size_bytes).sum();
        assert_eq!(sizes, 7);

        assert!(store.remove(&id("abc123")).await.unwrap());
        assert!(!store.remove(&id("abc123")).await.unwrap());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path().join("nope"));
        assert!(store.list().await.unwrap().is_empty());
    }
}
