//! Fixed set of pages, one of which is active at a time.

use serde::{Deserialize, Serialize};

/// Number of pages
pub const PAGE_COUNT: usize = 5;

/// Persisted texts of every page plus which one is active.
///
/// The active page's text here may lag behind the editor; it is brought up
/// to date when switching away or when saving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStore {
    pages: Vec<String>,
    active: usize,
}

impl Default for PageStore {
    fn default() -> Self {
        Self {
            pages: vec![String::new(); PAGE_COUNT],
            active: 0,
        }
    }
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored texts. Missing pages are empty, extra ones are
    /// dropped and an out-of-range active index falls back to the first page.
    pub fn from_pages(mut pages: Vec<String>, active: usize) -> Self {
        pages.resize(PAGE_COUNT, String::new());
        Self {
            pages,
            active: if active < PAGE_COUNT { active } else { 0 },
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_text(&self) -> &str {
        &self.pages[self.active]
    }

    pub fn set_active_text(&mut self, text: String) {
        self.pages[self.active] = text;
    }

    pub fn page(&self, index: usize) -> Option<&str> {
        self.pages.get(index).map(String::as_str)
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Make page `index` active, storing `outgoing` as the current page's
    /// text first. Returns the incoming page's text, or `None` when `index`
    /// is out of range or already active.
    pub fn switch_to(&mut self, index: usize, outgoing: String) -> Option<&str> {
        if index >= PAGE_COUNT || index == self.active {
            return None;
        }
        self.pages[self.active] = outgoing;
        self.active = index;
        Some(&self.pages[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_persists_outgoing_text() {
        let mut store = PageStore::new();
        store.set_active_text("first".into());

        let incoming = store.switch_to(2, "first, edited".into());
        assert_eq!(incoming, Some(""));
        assert_eq!(store.active(), 2);
        assert_eq!(store.page(0), Some("first, edited"));

        assert_eq!(store.switch_to(0, "third".into()), Some("first, edited"));
        assert_eq!(store.page(2), Some("third"));
    }

    #[test]
    fn test_switch_out_of_range_or_same_is_noop() {
        let mut store = PageStore::new();
        assert_eq!(store.switch_to(0, "ignored".into()), None);
        assert_eq!(store.switch_to(PAGE_COUNT, "ignored".into()), None);
        assert_eq!(store.active_text(), "");
    }

    #[test]
    fn test_from_pages_normalises() {
        let store = PageStore::from_pages(vec!["a".into(), "b".into()], 9);
        assert_eq!(store.pages().len(), PAGE_COUNT);
        assert_eq!(store.active(), 0);
        assert_eq!(store.page(1), Some("b"));
        assert_eq!(store.page(4), Some(""));

        let store = PageStore::from_pages(vec!["x".to_string(); 8], 4);
        assert_eq!(store.pages().len(), PAGE_COUNT);
        assert_eq!(store.active(), 4);
    }
}
