//! Micro-action catalog browsing.

use crate::data::{ActionCatalogEntry, DataStore, EventCategory};

/// Catalog entries in store order, optionally limited to one category.
pub fn action_catalog<S>(store: &S, category: Option<EventCategory>) -> Vec<ActionCatalogEntry>
where
    S: DataStore + ?Sized,
{
    store
        .actions_catalog()
        .iter()
        .filter(|a| category.is_none_or(|c| a.category == c))
        .cloned()
        .collect()
}
