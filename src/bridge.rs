use crate::order::{HostEntry, LibraryOrder};
use std::collections::HashSet;

/// The one capability the external engine needs while it runs dependency
/// checks: "does the load order include module X". The id set is indexed
/// once at construction; lookups are O(1) and an unknown id is simply not
/// selected.
#[derive(Debug, Clone, Default)]
pub struct ValidationBridge {
    selected: HashSet<String>,
}

impl ValidationBridge {
    pub fn from_host(order: &[HostEntry]) -> Self {
        let selected = order
            .iter()
            .filter(|entry| entry.enabled)
            .map(|entry| entry.id.clone())
            .collect();
        Self { selected }
    }

    pub fn from_library(order: &LibraryOrder) -> Self {
        let selected = order
            .values()
            .filter(|entry| entry.is_selected)
            .map(|entry| entry.id.clone())
            .collect();
        Self { selected }
    }

    pub fn is_selected(&self, module_id: &str) -> bool {
        self.selected.contains(module_id)
    }
}
