use crate::bridge::ValidationBridge;
use crate::convert;
use crate::engine::{HostCapabilities, NoticeKind, OrderingEngine, SortOutcome};
use crate::module::{ModuleCatalog, ModuleRecord};
use crate::order::HostEntry;
use crate::store::PersistedOrderStore;
use anyhow::{Context, Result};
use log::debug;
use std::sync::Arc;
use thiserror::Error;

/// The one error class allowed to cross this boundary loudly: operating
/// without an active profile or a discovered game would risk silently
/// corrupting an order that belongs to somebody else.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no active profile")]
    MissingProfile,
    #[error("game discovery path is missing")]
    MissingDiscovery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Uninitialized,
    Loaded,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEntry {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct OrderValidation {
    pub invalid: Vec<InvalidEntry>,
}

/// Orchestrates the load/validate/save cycle for one profile. One instance
/// per active profile; switching profiles discards the instance rather than
/// merging state.
pub struct SyncEngine {
    engine: Arc<dyn OrderingEngine>,
    host: Arc<dyn HostCapabilities>,
    store: PersistedOrderStore,
    catalog: ModuleCatalog,
    state: SyncState,
    initial_load_done: bool,
}

impl SyncEngine {
    pub fn new(
        engine: Arc<dyn OrderingEngine>,
        host: Arc<dyn HostCapabilities>,
        store: PersistedOrderStore,
    ) -> Self {
        Self {
            engine,
            host,
            store,
            catalog: ModuleCatalog::default(),
            state: SyncState::Uninitialized,
            initial_load_done: false,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Load the saved order, run it through the engine, and hand back the
    /// host form. The engine may auto-correct an invalid saved order; if it
    /// fails outright the raw order is kept instead. Launch parameters are
    /// only pushed from the second load onward, so the launch command line
    /// never reflects an order the user has not confirmed by saving.
    pub fn deserialize(&mut self) -> Result<Vec<HostEntry>> {
        let profile_id = self
            .host
            .active_profile_id()
            .ok_or(SyncError::MissingProfile)?;

        let modules = self.engine.get_modules().context("refresh module catalog")?;
        self.catalog = ModuleCatalog::new(modules);
        self.state = SyncState::Loaded;

        let mod_index = self.host.mod_index();
        let persisted = self.store.load(&profile_id);
        let raw_host = convert::persisted_to_host(&self.catalog, &mod_index, &persisted);
        let library = convert::host_to_library(&self.catalog, &raw_host);

        let SortOutcome {
            result,
            ordered,
            issues,
        } = self.engine.order_by_load_order(&library);

        let order = match ordered {
            Some(ordered) if result => {
                if !issues.is_empty() {
                    self.host
                        .notify(NoticeKind::Warning, "Load order adjusted", &issues);
                }
                convert::view_model_to_host(&mod_index, &ordered)
            }
            _ => {
                if !self.engine.is_sorting() {
                    self.host
                        .notify(NoticeKind::Warning, "Could not order the load order", &issues);
                }
                raw_host
            }
        };

        if self.initial_load_done {
            self.push_launch_arguments(&order)?;
        } else {
            self.initial_load_done = true;
            debug!("first load for profile {profile_id}, launch parameters untouched");
        }

        self.state = SyncState::Ready;
        Ok(order)
    }

    /// Persist a host-form order and make it the launch parameter set.
    pub fn serialize(&mut self, order: &[HostEntry]) -> Result<()> {
        let profile_id = self
            .host
            .active_profile_id()
            .ok_or(SyncError::MissingProfile)?;
        if self.host.discovery_path().is_none() {
            return Err(SyncError::MissingDiscovery.into());
        }

        let persisted = convert::host_to_persisted(order);
        self.store
            .save(&profile_id, &persisted)
            .with_context(|| format!("persist load order for profile {profile_id}"))?;
        self.push_launch_arguments(order)?;
        self.initial_load_done = true;
        self.state = SyncState::Ready;
        Ok(())
    }

    /// Ordering and structural issues for every enabled entry, flattened to
    /// `(id, reason)` pairs. A clean order is `None`, not an empty list;
    /// the consumer treats absence as "nothing to show".
    pub fn validate(&self, previous: &[HostEntry], current: &[HostEntry]) -> Option<OrderValidation> {
        // the host contract hands over both orders; only the target is checked
        let _ = previous;

        let selection = ValidationBridge::from_host(current);
        let enabled: Vec<ModuleRecord> = current
            .iter()
            .filter(|entry| entry.enabled)
            .filter_map(|entry| self.catalog.get(&entry.id).cloned())
            .collect();

        let mut invalid = Vec::new();
        for module in &enabled {
            for reason in self.engine.validate_load_order(&enabled, module) {
                invalid.push(InvalidEntry {
                    id: module.id.clone(),
                    reason,
                });
            }
            for reason in self.engine.validate_module(&enabled, module, &selection) {
                invalid.push(InvalidEntry {
                    id: module.id.clone(),
                    reason,
                });
            }
        }

        if invalid.is_empty() {
            None
        } else {
            Some(OrderValidation { invalid })
        }
    }

    fn push_launch_arguments(&self, order: &[HostEntry]) -> Result<()> {
        let ids: Vec<String> = order
            .iter()
            .filter(|entry| entry.enabled)
            .map(|entry| entry.id.clone())
            .collect();
        self.host
            .set_launch_arguments(&ids)
            .context("set launch parameters")
    }
}
