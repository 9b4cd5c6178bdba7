use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleVersion {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
    pub change_set: u32,
}

impl ModuleVersion {
    pub fn new(major: u32, minor: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            revision,
            change_set: 0,
        }
    }
}

impl std::fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.revision)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    #[default]
    Default,
    Steam,
}

/// The storefront the game installation itself came through, as opposed to
/// [`ProviderType`], which is where a single module's files came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStore {
    #[default]
    Default,
    Steam,
    Gog,
    Epic,
    Xbox,
}

impl GameStore {
    pub fn label(self) -> &'static str {
        match self {
            GameStore::Default => "default",
            GameStore::Steam => "steam",
            GameStore::Gog => "gog",
            GameStore::Epic => "epic",
            GameStore::Xbox => "xbox",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    LoadBefore,
    LoadAfter,
    Incompatible,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub id: String,
    pub kind: DependencyKind,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub version: Option<ModuleVersion>,
}

/// Immutable snapshot of one installed module, as reported by the external
/// dependency engine. The core only ever reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub id: String,
    pub name: String,
    pub version: ModuleVersion,
    pub is_official: bool,
    #[serde(default)]
    pub provider: ProviderType,
    #[serde(default)]
    pub dependencies: Vec<DependencyEdge>,
}

/// One refresh of the installed-module set. Built from `get_modules()` and
/// replaced wholesale on the next refresh, never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    records: Vec<ModuleRecord>,
    by_id: HashMap<String, usize>,
}

impl ModuleCatalog {
    pub fn new(records: Vec<ModuleRecord>) -> Self {
        let by_id = records
            .iter()
            .enumerate()
            .map(|(index, record)| (record.id.clone(), index))
            .collect();
        Self { records, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&ModuleRecord> {
        self.by_id.get(id).map(|index| &self.records[*index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn records(&self) -> &[ModuleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
