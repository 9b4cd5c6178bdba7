use crate::bridge::ValidationBridge;
use crate::module::{GameStore, ModuleRecord, ModuleVersion};
use crate::order::{LibraryOrder, ViewModelEntry};
use anyhow::Result;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// What `order_by_load_order` came back with. `result` false means the
/// engine could not produce an order at all; issues may be present either
/// way and describe what the engine corrected or objected to.
#[derive(Debug, Clone, Default)]
pub struct SortOutcome {
    pub result: bool,
    pub ordered: Option<Vec<ViewModelEntry>>,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct InstallTest {
    pub supported: bool,
    pub required_files: Vec<String>,
}

/// A `SubModule.xml` as parsed by the engine. Only the fields the install
/// flow needs come across.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleManifest {
    pub id: String,
    pub name: String,
    pub version: ModuleVersion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInstructionKind {
    Copy { source: String, destination: String },
    ModuleInfo { id: String },
}

/// Engine-internal install instruction: a copy or a sub-module marker,
/// tagged with the store whose binary layout it belongs to. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInstruction {
    pub kind: RawInstructionKind,
    pub store: GameStore,
}

#[derive(Debug, Clone, Default)]
pub struct RawInstallResult {
    pub instructions: Vec<RawInstruction>,
    pub obfuscated: bool,
}

/// The external dependency-ordering engine. The core consumes this contract
/// and never reimplements any of it; a host constructs its engine over a
/// [`HostCapabilities`] so the engine can reach files, notifications, and
/// per-profile settings.
pub trait OrderingEngine {
    /// Rescan the installation and return the current module set.
    fn get_modules(&self) -> Result<Vec<ModuleRecord>>;

    /// Order (and possibly auto-correct) a library-form load order.
    fn order_by_load_order(&self, order: &LibraryOrder) -> SortOutcome;

    /// Structural issues for one module against the given selection.
    fn validate_module(
        &self,
        modules: &[ModuleRecord],
        module: &ModuleRecord,
        selection: &ValidationBridge,
    ) -> Vec<String>;

    /// Ordering issues for one module against the full enabled set.
    fn validate_load_order(&self, modules: &[ModuleRecord], module: &ModuleRecord) -> Vec<String>;

    /// Locate and parse every `SubModule.xml` among archive-relative paths.
    fn parse_manifests(&self, files: &[String]) -> Result<Vec<ModuleManifest>>;

    /// Produce raw per-store install instructions for one module.
    fn install_module(
        &self,
        files: &[String],
        manifests: &[ModuleManifest],
    ) -> Result<RawInstallResult>;

    /// Probe whether an archive's file list is an installable module.
    fn test_module(&self, files: &[String]) -> InstallTest;

    fn compare_versions(&self, a: &ModuleVersion, b: &ModuleVersion) -> Ordering;

    /// Kick off the engine's own topological sort.
    fn sort(&self) -> Result<()>;

    /// True while the engine is inside an automatic sort pass; warnings are
    /// suppressed for failures on that path.
    fn is_sorting(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// Everything the core (and, through it, the engine) needs from the hosting
/// mod manager, as one named interface per host instead of a bundle of
/// positional closures.
pub trait HostCapabilities {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Non-modal notification surface.
    fn notify(&self, kind: NoticeKind, summary: &str, details: &[String]);

    /// Modal yes/no question; blocks until answered.
    fn ask_user(&self, question: &str) -> bool;

    /// Hand the game the module ids it should launch with, in rank order.
    fn set_launch_arguments(&self, module_ids: &[String]) -> Result<()>;

    fn active_profile_id(&self) -> Option<String>;
    fn discovery_path(&self) -> Option<PathBuf>;
    fn discovery_store(&self) -> GameStore;

    /// Per-profile toggle for the engine's beta sorter.
    fn beta_sorting(&self, profile_id: &str) -> bool;

    /// Per-game map of module id to the id of the installed mod owning it,
    /// used to resolve `mod_id` on host-form entries.
    fn mod_index(&self) -> std::collections::HashMap<String, String>;
}
