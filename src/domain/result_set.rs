use std::sync::Arc;

use super::catalog_item::CatalogItem;

/// Cumulative, insertion-ordered items loaded under the current criteria
/// version.
///
/// Page 1 replaces everything; later pages append in source order. Nothing
/// here reorders or deduplicates; the store guarantees disjoint pages.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    items: Vec<Arc<CatalogItem>>,
    loaded_page: u32,
}

impl ResultSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            loaded_page: 0,
        }
    }

    /// Merges one fetched page. Page 1 (or 0) replaces, anything else
    /// appends.
    pub fn merge(&mut self, page: u32, items: Vec<CatalogItem>) {
        if page <= 1 {
            self.items.clear();
            self.loaded_page = 1;
        } else {
            self.loaded_page = page;
        }
        self.items.extend(items.into_iter().map(Arc::new));
    }

    #[must_use]
    pub fn items(&self) -> &[Arc<CatalogItem>] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter().map(AsRef::as_ref)
    }

    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    #[must_use]
    pub const fn loaded_page(&self) -> u32 {
        self.loaded_page
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
