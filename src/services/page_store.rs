//! Flat-file page persistence.
//!
//! Each page lives in `<data_dir>/<title>.txt` holding the raw body bytes.
//! Titles must come from [`crate::services::validate_path`]; the store does
//! not re-check them.
//!
//! There is no locking. Two saves to the same title race and whichever
//! rename lands last wins. Each save is written to its own temporary file and
//! renamed into place, so a reader sees either the old body or the new one,
//! never a mix.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, error, info};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::errors::WikiError;
use crate::types::Page;

const RESOURCE_EXT: &str = "txt";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Loads and saves pages under a single directory
#[derive(Clone, Debug)]
pub struct PageStore {
    data_dir: Arc<PathBuf>,
}

impl PageStore {
    /// Create a new page store rooted at `data_dir`
    pub fn new(data_dir: PathBuf) -> Self {
        debug!("Creating PageStore with data directory: {:?}", data_dir);
        Self { data_dir: Arc::new(data_dir) }
    }

    /// Create the data directory if it does not exist yet
    pub async fn ensure_data_dir(&self) -> Result<(), WikiError> {
        fs::create_dir_all(self.data_dir.as_ref()).await.map_err(|e| {
            error!("Failed to create data directory {:?}: {}", self.data_dir, e);
            WikiError::Io(e)
        })
    }

    #[cfg(test)]
    fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File backing the page with this title
    pub fn resource_path(&self, title: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", title, RESOURCE_EXT))
    }

    /// Read a page. Missing and unreadable files both come back as `NotFound`
    /// so callers can fall back instead of failing.
    pub async fn load(&self, title: &str) -> Result<Page, WikiError> {
        let path = self.resource_path(title);
        match fs::read(&path).await {
            Ok(body) => {
                debug!("Loaded page '{}' from {:?}, {} bytes", title, path, body.len());
                Ok(Page { title: title.to_string(), body })
            }
            Err(e) => {
                debug!("Could not load page '{}' from {:?}: {}", title, path, e);
                Err(WikiError::NotFound)
            }
        }
    }

    /// Write the page body, replacing whatever was stored for the title
    pub async fn save(&self, page: &Page) -> Result<(), WikiError> {
        let path = self.resource_path(&page.title);
        let temp = self.temp_path(&page.title);

        if let Err(e) = write_private(&temp, &page.body).await {
            let _ = fs::remove_file(&temp).await;
            return Err(WikiError::Io(e));
        }
        if let Err(e) = fs::rename(&temp, &path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(WikiError::Io(e));
        }

        info!("Saved page '{}' to {:?}, {} bytes", page.title, path, page.body.len());
        Ok(())
    }

    fn temp_path(&self, title: &str) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.data_dir
            .join(format!(".{}.{}.{}-{}.tmp", title, RESOURCE_EXT, std::process::id(), n))
    }
}

/// Create `path` readable and writable by the owner only, and fill it with `bytes`
async fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, PageStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn resource_path_is_title_dot_txt() {
        let store = PageStore::new(PathBuf::from("pages"));
        assert_eq!(store.resource_path("Home"), PathBuf::from("pages").join("Home.txt"));
    }

    #[tokio::test]
    async fn save_then_load_returns_same_body() {
        let (_dir, store) = store();
        let page = Page::new("Home", "Hello, <world> & friends\n");
        store.save(&page).await.unwrap();

        let loaded = store.load("Home").await.unwrap();
        assert_eq!(loaded, page);
    }

    #[tokio::test]
    async fn save_keeps_arbitrary_bytes() {
        let (_dir, store) = store();
        let page = Page::new("Binary", vec![0u8, 159, 146, 150, 255]);
        store.save(&page).await.unwrap();
        assert_eq!(store.load("Binary").await.unwrap().body, page.body);
    }

    #[tokio::test]
    async fn empty_body_round_trips() {
        let (dir, store) = store();
        store.save(&Page::empty("Blank")).await.unwrap();

        assert!(dir.path().join("Blank.txt").is_file());
        assert!(store.load("Blank").await.unwrap().body.is_empty());
    }

    #[tokio::test]
    async fn save_overwrites_existing_page() {
        let (_dir, store) = store();
        store.save(&Page::new("Home", "a much longer first version")).await.unwrap();
        store.save(&Page::new("Home", "short")).await.unwrap();

        assert_eq!(store.load("Home").await.unwrap().body, b"short");
    }

    #[tokio::test]
    async fn save_leaves_no_temp_files() {
        let (dir, store) = store();
        store.save(&Page::new("Home", "x")).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Home.txt".to_string()]);
    }

    #[tokio::test]
    async fn load_missing_page_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(store.load("Missing").await, Err(WikiError::NotFound)));
    }

    #[tokio::test]
    async fn load_unreadable_resource_is_not_found() {
        let (dir, store) = store();
        std::fs::create_dir(dir.path().join("Folder.txt")).unwrap();
        assert!(matches!(store.load("Folder").await, Err(WikiError::NotFound)));
    }

    #[tokio::test]
    async fn save_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path().join("does-not-exist"));
        assert!(matches!(store.save(&Page::new("Home", "x")).await, Err(WikiError::Io(_))));
    }

    #[tokio::test]
    async fn ensure_data_dir_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path().join("a").join("b"));
        store.ensure_data_dir().await.unwrap();
        assert!(store.data_dir().is_dir());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn saved_pages_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, store) = store();
        store.save(&Page::new("Secret", "x")).await.unwrap();
        let mode = std::fs::metadata(dir.path().join("Secret.txt")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
