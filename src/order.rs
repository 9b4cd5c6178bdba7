use crate::module::ModuleRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Durable form. Written per profile as a pretty-printed JSON array where
/// array order encodes rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEntry {
    pub id: String,
    pub name: String,
    pub is_selected: bool,
    pub is_disabled: bool,
    pub index: usize,
}

/// The host's lock flag on an order entry. The host hands us booleans and
/// strings interchangeably, so all four observed spellings are kept apart
/// rather than collapsed at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    False,
    Never,
    True,
    Always,
}

/// Collapse rule for the lock tri-state: only `true`/`always` take the entry
/// away from the user. `never`, `false`, and an absent flag all stay
/// toggleable.
pub fn locked_to_disabled(locked: Option<LockState>) -> bool {
    matches!(locked, Some(LockState::True) | Some(LockState::Always))
}

/// Host (profile) form. `mod_id` is `None` for entries the host does not
/// track through an installed mod; `data` is `None` for entries with no
/// catalog record behind them.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEntry {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub locked: Option<LockState>,
    pub mod_id: Option<String>,
    pub data: Option<HostData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostData {
    pub module_info: ModuleRecord,
    pub index: usize,
    pub is_disabled: Option<bool>,
    pub is_valid: Option<bool>,
}

/// The shape the external engine consumes and produces: same fields as the
/// persisted form but keyed by module id, rank carried by `index` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub id: String,
    pub name: String,
    pub is_selected: bool,
    pub is_disabled: bool,
    pub index: usize,
}

pub type LibraryOrder = HashMap<String, LibraryEntry>;

/// UI-facing form: full catalog record plus the validity verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModelEntry {
    pub module_info: ModuleRecord,
    pub is_valid: bool,
    pub is_selected: bool,
    pub is_disabled: bool,
    pub index: usize,
}
