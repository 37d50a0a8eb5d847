use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::pages::PageStore;

/// File holding the key/value store inside the data directory
pub const STORE_FILE: &str = "store.json";
/// Key of the serialized page array
pub const PAGES_KEY: &str = "ezwrite-pages-v1";
/// Key of the active page index
pub const ACTIVE_PAGE_KEY: &str = "ezwrite-active-page";
/// Key of the single-document text written by earlier versions
pub const LEGACY_KEY: &str = "zen-writing-content";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid store file {path}: {source}")]
    InvalidStore {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value storage persisted as one JSON object, the local
/// equivalent of a browser's local storage.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    /// Open the store in `data_dir`. A missing file is an empty store.
    pub fn open(data_dir: &Path) -> Result<Self, IoError> {
        let path = data_dir.join(STORE_FILE);
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|source| IoError::InvalidStore {
                path: path.clone(),
                source,
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Write the store to disk, creating the data directory if needed. The
    /// file is replaced in one rename so a crash never leaves half a store.
    pub fn save(&self) -> Result<(), IoError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&self.entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Load the pages from the store.
///
/// Unreadable page data is logged and replaced by empty pages. When no page
/// array exists yet, a legacy single document becomes the first page.
pub fn load_pages(store: &LocalStore) -> PageStore {
    let active = store
        .get(ACTIVE_PAGE_KEY)
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    if let Some(raw) = store.get(PAGES_KEY) {
        return match serde_json::from_str::<Vec<String>>(raw) {
            Ok(pages) => PageStore::from_pages(pages, active),
            Err(e) => {
                log::warn!("Ignoring unreadable page data in {}: {e}", store.path().display());
                PageStore::new()
            }
        };
    }

    match store.get(LEGACY_KEY) {
        Some(legacy) => {
            log::info!("Migrating single-document content into page 1");
            PageStore::from_pages(vec![legacy.to_string()], 0)
        }
        None => PageStore::new(),
    }
}

/// Store every page and the active index, then write the store to disk.
pub fn save_pages(store: &mut LocalStore, pages: &PageStore) -> Result<(), IoError> {
    store.set(PAGES_KEY, serde_json::to_string(pages.pages())?);
    store.set(ACTIVE_PAGE_KEY, pages.active().to_string());
    store.save()
}

/// Write an exported document into `dir`, returning its path.
pub fn write_export(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf, IoError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, content)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::create_test_store_dir;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_store_is_empty() {
        let dir = create_test_store_dir();
        let store = LocalStore::open(dir.path()).unwrap();
        assert_eq!(store.get(PAGES_KEY), None);
        assert_eq!(load_pages(&store), PageStore::new());
    }

    #[test]
    fn test_pages_round_trip_through_disk() {
        let dir = create_test_store_dir();
        let mut store = LocalStore::open(dir.path()).unwrap();
        let pages = PageStore::from_pages(vec!["one".into(), "list\nmilk".into()], 1);
        save_pages(&mut store, &pages).unwrap();

        let reopened = LocalStore::open(dir.path()).unwrap();
        assert_eq!(load_pages(&reopened), pages);
    }

    #[test]
    fn test_legacy_content_migrates_to_first_page() {
        let dir = create_test_store_dir();
        let mut store = LocalStore::open(dir.path()).unwrap();
        store.set(LEGACY_KEY, "old notes".into());

        let pages = load_pages(&store);
        assert_eq!(pages.page(0), Some("old notes"));
        assert_eq!(pages.active(), 0);
    }

    #[test]
    fn test_pages_key_wins_over_legacy() {
        let dir = create_test_store_dir();
        let mut store = LocalStore::open(dir.path()).unwrap();
        store.set(LEGACY_KEY, "old notes".into());
        store.set(PAGES_KEY, r#"["new"]"#.into());
        assert_eq!(load_pages(&store).page(0), Some("new"));
    }

    #[test]
    fn test_corrupt_page_data_falls_back_to_empty() {
        let dir = create_test_store_dir();
        let mut store = LocalStore::open(dir.path()).unwrap();
        store.set(PAGES_KEY, "{not json".into());
        assert_eq!(load_pages(&store), PageStore::new());
    }

    #[test]
    fn test_corrupt_store_file_is_an_error() {
        let dir = create_test_store_dir();
        fs::write(dir.path().join(STORE_FILE), "][").unwrap();
        assert!(matches!(
            LocalStore::open(dir.path()),
            Err(IoError::InvalidStore { .. })
        ));
    }

    #[test]
    fn test_write_export_creates_directory() {
        let dir = create_test_store_dir();
        let target = dir.path().join("exports");
        let path = write_export(&target, "ezwrite-2024-01-01.txt", "hello").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }
}
