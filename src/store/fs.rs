//! Flat-file page store.
//!
//! # Layout
//! ```text
//! <root>/
//!     FrontPage.txt      ← page content, mode 0600
//!     Notes.txt
//!     .Notes-<uuid>.tmp  ← in-flight write, renamed over Notes.txt
//! ```
//!
//! # Design Decisions
//! - Identifier is the title; the title grammar keeps file names inside root
//! - Writes go to a temp file then rename, so readers only see whole files
//! - Same-title writes race as last-write-wins, no merge
//! - `list` sorts by title so unmodified directories list identically

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::page::{Page, Title};
use crate::store::{CollisionPolicy, PageStore, StoreError};

const PAGE_EXT: &str = "txt";

/// Page store keeping one text file per page.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    on_collision: CollisionPolicy,
}

impl FileStore {
    /// Open the store, creating the data directory if needed.
    pub async fn open(
        root: impl Into<PathBuf>,
        on_collision: CollisionPolicy,
    ) -> Result<Self, StoreError> {
        let root = root.into();

        let mut builder = tokio::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o700);
        builder
            .create(&root)
            .await
            .map_err(|e| StoreError::io(&root, e))?;

        tracing::info!(
            path = %root.display(),
            on_collision = ?on_collision,
            "File store opened"
        );

        Ok(Self { root, on_collision })
    }

    /// Directory holding the page files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn page_path(&self, title: &Title) -> PathBuf {
        self.root.join(format!("{}.{}", title, PAGE_EXT))
    }

    /// Under `Reject`, fail if a page already lives under `key`.
    async fn ensure_vacant(&self, key: &Title) -> Result<(), StoreError> {
        if self.on_collision != CollisionPolicy::Reject {
            return Ok(());
        }

        // Check-then-write: two concurrent writers of one title can both pass.
        let path = self.page_path(key);
        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        if exists {
            return Err(StoreError::AlreadyExists(key.to_string()));
        }
        Ok(())
    }

    fn parse_title(title: &str) -> Result<Title, StoreError> {
        Title::parse(title).ok_or_else(|| StoreError::InvalidTitle(title.to_string()))
    }

    async fn write_page(&self, title: &Title, content: &[u8]) -> Result<(), StoreError> {
        let target = self.page_path(title);
        // Must not be longer than the final name
        let tmp = self.root.join(format!(".page-{}.tmp", Uuid::new_v4()));

        let written = async {
            let mut options = tokio::fs::OpenOptions::new();
            options.write(true).create_new(true);
            #[cfg(unix)]
            options.mode(0o600);

            let mut file = options.open(&tmp).await?;
            file.write_all(content).await?;
            file.flush().await?;
            file.sync_all().await?;
            drop(file);

            tokio::fs::rename(&tmp, &target).await
        }
        .await;

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::io(target, e));
        }

        tracing::debug!(title = %title, bytes = content.len(), "Page written");
        Ok(())
    }
}

impl PageStore for FileStore {
    type Key = Title;

    const BACKEND: &'static str = "file";

    async fn get(&self, key: &Title) -> Result<Page<Title>, StoreError> {
        let path = self.page_path(key);
        match tokio::fs::read(&path).await {
            Ok(content) => Ok(Page::new(key.clone(), key.as_str(), content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(key.to_string())),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    async fn list(&self) -> Result<Vec<Page<Title>>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| StoreError::io(&self.root, e))?;

        let mut titles = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.root, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(PAGE_EXT) {
                continue;
            }
            let Some(title) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(Title::parse)
            else {
                continue;
            };
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| StoreError::io(&path, e))?;
            if file_type.is_file() {
                titles.push(title);
            }
        }
        titles.sort();

        let mut pages = Vec::with_capacity(titles.len());
        for title in titles {
            match self.get(&title).await {
                Ok(page) => pages.push(page),
                // Removed between enumeration and read
                Err(StoreError::NotFound(_)) => {
                    tracing::debug!(title = %title, "Page vanished during listing");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(pages)
    }

    async fn create(&self, title: &str, content: &[u8]) -> Result<Title, StoreError> {
        let key = Self::parse_title(title)?;
        self.ensure_vacant(&key).await?;
        self.write_page(&key, content).await?;
        Ok(key)
    }

    /// Writes to the file named by `title`. When `title` differs from `key`
    /// this is a copy, not a rename: the page under `key` stays in place, and
    /// the new title is subject to the collision policy like a create.
    async fn save(&self, key: &Title, title: &str, content: &[u8]) -> Result<Title, StoreError> {
        let target = Self::parse_title(title)?;
        if &target != key {
            self.ensure_vacant(&target).await?;
            tracing::info!(
                from = %key,
                to = %target,
                "Saving under a new title, previous page kept"
            );
        }

        self.write_page(&target, content).await?;
        Ok(target)
    }
}
