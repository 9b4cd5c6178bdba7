//! Pure mappers between the four order representations. Every function is
//! total: an entry that cannot be carried across is excluded, never an
//! error. Persisted and host forms tolerate ids with no catalog record
//! (routine for uninstalled-but-still-ordered modules); library and view
//! model forms require one and drop the entry.

use crate::bridge::ValidationBridge;
use crate::engine::OrderingEngine;
use crate::module::ModuleCatalog;
use crate::order::{
    locked_to_disabled, HostData, HostEntry, LibraryEntry, LibraryOrder, LockState,
    PersistedEntry, ViewModelEntry,
};
use std::collections::HashMap;

pub fn persisted_to_host(
    catalog: &ModuleCatalog,
    mod_index: &HashMap<String, String>,
    persisted: &[PersistedEntry],
) -> Vec<HostEntry> {
    persisted
        .iter()
        .map(|entry| {
            let record = catalog.get(&entry.id);
            HostEntry {
                id: entry.id.clone(),
                name: record
                    .map(|record| record.name.clone())
                    .unwrap_or_else(|| entry.name.clone()),
                enabled: entry.is_selected,
                locked: entry.is_disabled.then_some(LockState::True),
                mod_id: mod_index.get(&entry.id).cloned(),
                data: record.map(|record| HostData {
                    module_info: record.clone(),
                    index: entry.index,
                    is_disabled: Some(entry.is_disabled),
                    is_valid: None,
                }),
            }
        })
        .collect()
}

pub fn host_to_persisted(host: &[HostEntry]) -> Vec<PersistedEntry> {
    host.iter()
        .enumerate()
        .map(|(index, entry)| PersistedEntry {
            id: entry.id.clone(),
            name: entry.name.clone(),
            is_selected: entry.enabled,
            is_disabled: locked_to_disabled(entry.locked),
            index,
        })
        .collect()
}

pub fn host_to_library(catalog: &ModuleCatalog, host: &[HostEntry]) -> LibraryOrder {
    let mut order = LibraryOrder::new();
    for (index, entry) in host
        .iter()
        .filter(|entry| catalog.contains(&entry.id))
        .enumerate()
    {
        order.insert(
            entry.id.clone(),
            LibraryEntry {
                id: entry.id.clone(),
                name: entry.name.clone(),
                is_selected: entry.enabled,
                is_disabled: locked_to_disabled(entry.locked),
                index,
            },
        );
    }
    order
}

pub fn library_to_host(
    catalog: &ModuleCatalog,
    engine: &dyn OrderingEngine,
    mod_index: &HashMap<String, String>,
    library: &LibraryOrder,
) -> Vec<HostEntry> {
    let selection = ValidationBridge::from_library(library);
    ranked(catalog, library)
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            // ranked() only yields catalog-backed entries
            let record = catalog.get(&entry.id).cloned();
            let is_valid = record.as_ref().map(|record| {
                engine
                    .validate_module(catalog.records(), record, &selection)
                    .is_empty()
            });
            HostEntry {
                id: entry.id.clone(),
                name: entry.name.clone(),
                enabled: entry.is_selected,
                locked: entry.is_disabled.then_some(LockState::True),
                mod_id: mod_index.get(&entry.id).cloned(),
                data: record.map(|record| HostData {
                    module_info: record,
                    index,
                    is_disabled: Some(entry.is_disabled),
                    is_valid,
                }),
            }
        })
        .collect()
}

pub fn library_to_view_model(
    catalog: &ModuleCatalog,
    engine: &dyn OrderingEngine,
    library: &LibraryOrder,
) -> Vec<ViewModelEntry> {
    let selection = ValidationBridge::from_library(library);
    ranked(catalog, library)
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let record = catalog.get(&entry.id)?;
            let is_valid = engine
                .validate_module(catalog.records(), record, &selection)
                .is_empty();
            Some(ViewModelEntry {
                module_info: record.clone(),
                is_valid,
                is_selected: entry.is_selected,
                is_disabled: entry.is_disabled,
                index,
            })
        })
        .collect()
}

pub fn view_model_to_library(view_models: &[ViewModelEntry]) -> LibraryOrder {
    let mut order = LibraryOrder::new();
    for (index, entry) in view_models.iter().enumerate() {
        order.insert(
            entry.module_info.id.clone(),
            LibraryEntry {
                id: entry.module_info.id.clone(),
                name: entry.module_info.name.clone(),
                is_selected: entry.is_selected,
                is_disabled: entry.is_disabled,
                index,
            },
        );
    }
    order
}

pub fn view_model_to_host(
    mod_index: &HashMap<String, String>,
    view_models: &[ViewModelEntry],
) -> Vec<HostEntry> {
    view_models
        .iter()
        .enumerate()
        .map(|(index, entry)| HostEntry {
            id: entry.module_info.id.clone(),
            name: entry.module_info.name.clone(),
            enabled: entry.is_selected,
            locked: entry.is_disabled.then_some(LockState::True),
            mod_id: mod_index.get(&entry.module_info.id).cloned(),
            data: Some(HostData {
                module_info: entry.module_info.clone(),
                index,
                is_disabled: Some(entry.is_disabled),
                is_valid: Some(entry.is_valid),
            }),
        })
        .collect()
}

pub fn host_to_view_model(
    catalog: &ModuleCatalog,
    engine: &dyn OrderingEngine,
    host: &[HostEntry],
) -> Vec<ViewModelEntry> {
    let selection = ValidationBridge::from_host(host);
    host.iter()
        .filter_map(|entry| catalog.get(&entry.id).map(|record| (entry, record)))
        .enumerate()
        .map(|(index, (entry, record))| {
            let is_valid = engine
                .validate_module(catalog.records(), record, &selection)
                .is_empty();
            ViewModelEntry {
                module_info: record.clone(),
                is_valid,
                is_selected: entry.enabled,
                is_disabled: locked_to_disabled(entry.locked),
                index,
            }
        })
        .collect()
}

/// Library entries in rank order, restricted to catalog-backed ids. The
/// stored indices decide the ordering but are not trusted beyond that; the
/// caller re-derives dense indices from the resulting positions.
fn ranked(catalog: &ModuleCatalog, library: &LibraryOrder) -> Vec<LibraryEntry> {
    let mut entries: Vec<LibraryEntry> = library
        .values()
        .filter(|entry| catalog.contains(&entry.id))
        .cloned()
        .collect();
    entries.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.id.cmp(&b.id)));
    entries
}
