//! Overlays of many page images, keyed by the caller.

use std::hash::Hash;
use std::sync::{Arc, Mutex, RwLock};

use rustc_hash::FxHashMap;

use crate::error::{LayoutError, Result};

use super::page::PageOverlay;

pub type SharedPage = Arc<Mutex<PageOverlay>>;

/// Per-image overlay registry.
///
/// Each page sits behind its own lock, so edits to different images never
/// contend; operations on one image are serialized.
pub struct OverlayStore<K> {
    pages: RwLock<FxHashMap<K, SharedPage>>,
}

impl<K> Default for OverlayStore<K> {
    fn default() -> Self {
        Self {
            pages: RwLock::new(FxHashMap::default()),
        }
    }
}

impl<K: Eq + Hash> OverlayStore<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `overlay` under `key`, replacing any previous page.
    pub fn insert(&self, key: K, overlay: PageOverlay) -> Result<SharedPage> {
        let page = Arc::new(Mutex::new(overlay));
        let mut pages = self.pages.write().map_err(|_| LayoutError::LockPoisoned)?;
        pages.insert(key, Arc::clone(&page));
        Ok(page)
    }

    pub fn get(&self, key: &K) -> Result<Option<SharedPage>> {
        let pages = self.pages.read().map_err(|_| LayoutError::LockPoisoned)?;
        Ok(pages.get(key).cloned())
    }

    pub fn remove(&self, key: &K) -> Result<Option<SharedPage>> {
        let mut pages = self.pages.write().map_err(|_| LayoutError::LockPoisoned)?;
        Ok(pages.remove(key))
    }

    pub fn len(&self) -> Result<usize> {
        let pages = self.pages.read().map_err(|_| LayoutError::LockPoisoned)?;
        Ok(pages.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Runs `f` with exclusive access to one page.
    ///
    /// Returns `Ok(None)` when no page is registered under `key`.
    pub fn with_page<R>(
        &self,
        key: &K,
        f: impl FnOnce(&mut PageOverlay) -> R,
    ) -> Result<Option<R>> {
        let Some(page) = self.get(key)? else {
            return Ok(None);
        };
        let mut guard = page.lock().map_err(|_| LayoutError::LockPoisoned)?;
        Ok(Some(f(&mut guard)))
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::geometry::{FracRect, ImageSize};
    use crate::layout::params::Config;
    use crate::types::OcrLine;

    fn page(n: usize) -> PageOverlay {
        let lines = (0..n)
            .map(|i| OcrLine::new("x", FracRect::new(0.1, 0.1 * i as f64, 0.05, 0.05)))
            .collect();
        let config = Config {
            auto_merge_enabled: false,
            ..Config::default()
        };
        PageOverlay::new(ImageSize::new(1000, 1000), lines, &config)
    }

    #[test]
    fn pages_are_independent() {
        let store = OverlayStore::new();
        store.insert("a", page(3)).unwrap();
        store.insert("b", page(2)).unwrap();

        let handles: Vec<_> = ["a", "b"]
            .into_iter()
            .map(|key| {
                let page = store.get(&key).unwrap().unwrap();
                thread::spawn(move || {
                    let mut p = page.lock().unwrap();
                    let first = p.groups()[0].id;
                    p.delete_group(first)
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }

        assert_eq!(store.with_page(&"a", |p| p.groups().len()).unwrap(), Some(2));
        assert_eq!(store.with_page(&"b", |p| p.groups().len()).unwrap(), Some(1));
        assert_eq!(store.with_page(&"c", |p| p.groups().len()).unwrap(), None);
    }

    #[test]
    fn remove_drops_the_page() {
        let store = OverlayStore::new();
        store.insert(7u64, page(1)).unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert!(store.remove(&7).unwrap().is_some());
        assert!(store.is_empty().unwrap());
    }
}
