use crate::engine::{
    HostCapabilities, InstallTest, NoticeKind, OrderingEngine, RawInstructionKind,
};
use crate::module::GameStore;
use anyhow::Result;
use log::debug;
use serde_json::json;
use std::cell::Cell;
use std::path::Path;
use std::sync::Arc;

pub const STEAM_BINARY_FOLDER: &str = "Win64_Shipping_Client";
pub const XBOX_BINARY_FOLDER: &str = "Gaming.Desktop.x64_Shipping_Client";

const SUB_MODS_ATTRIBUTE: &str = "subModsIds";
const STORES_ATTRIBUTE: &str = "availableStores";
const STEAM_ON_XBOX_ATTRIBUTE: &str = "steamBinariesOnXbox";
const OBFUSCATED_ATTRIBUTE: &str = "obfuscatedBinaries";

const STEAM_ON_XBOX_QUESTION: &str = "This module ships no Xbox binaries. \
Install the Steam binaries into the Xbox binary folder instead? \
Your choice is remembered until the application restarts.";

/// Host-facing install instruction for one module. Attribute values end up
/// on the installed mod's persisted attribute set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallInstruction {
    Copy {
        source: String,
        destination: String,
    },
    Attribute {
        key: String,
        value: serde_json::Value,
    },
}

/// Turns an archive's file list into store-aware install instructions for a
/// single module. The Steam-on-Xbox substitution decision is asked at most
/// once and cached for the life of the resolver (one session).
pub struct InstallResolver {
    engine: Arc<dyn OrderingEngine>,
    host: Arc<dyn HostCapabilities>,
    steam_on_xbox: Cell<Option<bool>>,
}

impl InstallResolver {
    pub fn new(engine: Arc<dyn OrderingEngine>, host: Arc<dyn HostCapabilities>) -> Self {
        Self {
            engine,
            host,
            steam_on_xbox: Cell::new(None),
        }
    }

    /// Probe whether a file list looks like an installable module.
    pub fn test(&self, files: &[String]) -> InstallTest {
        self.engine.test_module(files)
    }

    /// Resolve install instructions for one module. A manifest that fails to
    /// parse is reported and yields an empty instruction set; the install
    /// itself is not aborted.
    pub fn resolve(
        &self,
        files: &[String],
        destination: &Path,
        archive: Option<&Path>,
    ) -> Result<Vec<InstallInstruction>> {
        debug!("resolving install of {} files into {destination:?}", files.len());

        let manifests = match self.engine.parse_manifests(files) {
            Ok(manifests) => manifests,
            Err(err) => {
                let source = archive
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "archive".to_string());
                self.host.notify(
                    NoticeKind::Error,
                    "Failed to read the module manifest",
                    &[format!("{source}: {err:#}")],
                );
                return Ok(Vec::new());
            }
        };

        let raw = self.engine.install_module(files, &manifests)?;

        let mut instructions = Vec::new();
        let mut sub_module_ids: Vec<String> = Vec::new();
        let mut stores: Vec<GameStore> = Vec::new();
        let mut steam_copies: Vec<(String, String)> = Vec::new();
        let mut has_xbox_copies = false;

        for instruction in &raw.instructions {
            match &instruction.kind {
                RawInstructionKind::Copy {
                    source,
                    destination,
                } => {
                    if !stores.contains(&instruction.store) {
                        stores.push(instruction.store);
                    }
                    match instruction.store {
                        GameStore::Steam => {
                            steam_copies.push((source.clone(), destination.clone()))
                        }
                        GameStore::Xbox => has_xbox_copies = true,
                        _ => {}
                    }
                    instructions.push(InstallInstruction::Copy {
                        source: source.clone(),
                        destination: destination.clone(),
                    });
                }
                RawInstructionKind::ModuleInfo { id } => {
                    if !sub_module_ids.contains(id) {
                        sub_module_ids.push(id.clone());
                    }
                }
            }
        }

        let mut substituted = false;
        if self.host.discovery_store() == GameStore::Xbox
            && !has_xbox_copies
            && !steam_copies.is_empty()
            && self.allow_steam_on_xbox()
        {
            for (source, steam_destination) in &steam_copies {
                instructions.push(InstallInstruction::Copy {
                    source: source.clone(),
                    destination: steam_destination
                        .replace(STEAM_BINARY_FOLDER, XBOX_BINARY_FOLDER),
                });
            }
            substituted = true;
        }

        let store_labels: Vec<&str> = stores.iter().map(|store| store.label()).collect();
        instructions.push(attribute(SUB_MODS_ATTRIBUTE, json!(sub_module_ids)));
        instructions.push(attribute(STORES_ATTRIBUTE, json!(store_labels)));
        instructions.push(attribute(STEAM_ON_XBOX_ATTRIBUTE, json!(substituted)));
        instructions.push(attribute(OBFUSCATED_ATTRIBUTE, json!(raw.obfuscated)));

        Ok(instructions)
    }

    fn allow_steam_on_xbox(&self) -> bool {
        if let Some(answer) = self.steam_on_xbox.get() {
            return answer;
        }
        let answer = self.host.ask_user(STEAM_ON_XBOX_QUESTION);
        self.steam_on_xbox.set(Some(answer));
        answer
    }
}

fn attribute(key: &str, value: serde_json::Value) -> InstallInstruction {
    InstallInstruction::Attribute {
        key: key.to_string(),
        value,
    }
}
