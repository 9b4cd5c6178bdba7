#![allow(dead_code)]

use anyhow::{anyhow, Context, Result};
use ordersmith::bridge::ValidationBridge;
use ordersmith::engine::{
    HostCapabilities, InstallTest, ModuleManifest, NoticeKind, OrderingEngine, RawInstallResult,
    SortOutcome,
};
use ordersmith::module::{
    DependencyEdge, DependencyKind, GameStore, ModuleRecord, ModuleVersion, ProviderType,
};
use ordersmith::order::{HostEntry, LibraryEntry, LibraryOrder, ViewModelEntry};
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub fn record(id: &str, version: ModuleVersion, official: bool) -> ModuleRecord {
    ModuleRecord {
        id: id.to_string(),
        name: id.to_string(),
        version,
        is_official: official,
        provider: ProviderType::Default,
        dependencies: Vec::new(),
    }
}

pub fn record_with_dep(id: &str, version: ModuleVersion, dep: &str) -> ModuleRecord {
    let mut module = record(id, version, false);
    module.dependencies.push(DependencyEdge {
        id: dep.to_string(),
        kind: DependencyKind::LoadAfter,
        optional: false,
        version: None,
    });
    module
}

pub fn host_entry(id: &str, enabled: bool) -> HostEntry {
    HostEntry {
        id: id.to_string(),
        name: id.to_string(),
        enabled,
        locked: None,
        mod_id: None,
        data: None,
    }
}

/// Scriptable stand-in for the external dependency engine. Sorting is a
/// plain rank sort plus an optional dependency-correcting pass, enough to
/// observe the contract without reimplementing the real topology.
pub struct FakeEngine {
    pub modules: RefCell<Vec<ModuleRecord>>,
    pub modules_fail: Cell<bool>,
    pub auto_sort: Cell<bool>,
    pub sort_fails: Cell<bool>,
    pub sorting: Cell<bool>,
    pub manifests: RefCell<Vec<ModuleManifest>>,
    pub manifest_error: Cell<bool>,
    pub install_result: RefCell<RawInstallResult>,
}

impl FakeEngine {
    pub fn with_modules(modules: Vec<ModuleRecord>) -> Self {
        Self {
            modules: RefCell::new(modules),
            modules_fail: Cell::new(false),
            auto_sort: Cell::new(false),
            sort_fails: Cell::new(false),
            sorting: Cell::new(false),
            manifests: RefCell::new(Vec::new()),
            manifest_error: Cell::new(false),
            install_result: RefCell::new(RawInstallResult::default()),
        }
    }

    fn load_after_violations(
        entries: &[LibraryEntry],
        catalog: &HashMap<String, ModuleRecord>,
    ) -> Vec<String> {
        let mut issues = Vec::new();
        for (position, entry) in entries.iter().enumerate() {
            if !entry.is_selected {
                continue;
            }
            let Some(module) = catalog.get(&entry.id) else {
                continue;
            };
            for dep in &module.dependencies {
                if dep.optional || dep.kind != DependencyKind::LoadAfter {
                    continue;
                }
                let dep_position = entries
                    .iter()
                    .position(|other| other.id == dep.id && other.is_selected);
                if matches!(dep_position, Some(found) if found > position) {
                    issues.push(format!("{} must load after {}", entry.id, dep.id));
                }
            }
        }
        issues
    }
}

impl OrderingEngine for FakeEngine {
    fn get_modules(&self) -> Result<Vec<ModuleRecord>> {
        if self.modules_fail.get() {
            return Err(anyhow!("module scan failed"));
        }
        Ok(self.modules.borrow().clone())
    }

    fn order_by_load_order(&self, order: &LibraryOrder) -> SortOutcome {
        if self.sort_fails.get() {
            return SortOutcome {
                result: false,
                ordered: None,
                issues: vec!["dependency engine rejected the order".to_string()],
            };
        }

        let catalog: HashMap<String, ModuleRecord> = self
            .modules
            .borrow()
            .iter()
            .map(|module| (module.id.clone(), module.clone()))
            .collect();
        let mut entries: Vec<LibraryEntry> = order
            .values()
            .filter(|entry| catalog.contains_key(&entry.id))
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.index);

        let issues = Self::load_after_violations(&entries, &catalog);
        if self.auto_sort.get() && !issues.is_empty() {
            let mut moved = true;
            while moved {
                moved = false;
                for position in 0..entries.len() {
                    let deps: Vec<String> = catalog
                        .get(&entries[position].id)
                        .map(|module| {
                            module
                                .dependencies
                                .iter()
                                .filter(|dep| dep.kind == DependencyKind::LoadAfter)
                                .map(|dep| dep.id.clone())
                                .collect()
                        })
                        .unwrap_or_default();
                    for dep in deps {
                        if let Some(found) = entries.iter().position(|entry| entry.id == dep) {
                            if found > position {
                                let entry = entries.remove(found);
                                entries.insert(position, entry);
                                moved = true;
                            }
                        }
                    }
                }
            }
        }

        let ordered = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| ViewModelEntry {
                module_info: catalog[&entry.id].clone(),
                is_valid: true,
                is_selected: entry.is_selected,
                is_disabled: entry.is_disabled,
                index,
            })
            .collect();

        SortOutcome {
            result: true,
            ordered: Some(ordered),
            issues,
        }
    }

    fn validate_module(
        &self,
        _modules: &[ModuleRecord],
        module: &ModuleRecord,
        selection: &ValidationBridge,
    ) -> Vec<String> {
        module
            .dependencies
            .iter()
            .filter(|dep| !dep.optional && !selection.is_selected(&dep.id))
            .map(|dep| format!("{} requires {} to be enabled", module.id, dep.id))
            .collect()
    }

    fn validate_load_order(&self, modules: &[ModuleRecord], module: &ModuleRecord) -> Vec<String> {
        let Some(position) = modules.iter().position(|other| other.id == module.id) else {
            return Vec::new();
        };
        module
            .dependencies
            .iter()
            .filter(|dep| !dep.optional && dep.kind == DependencyKind::LoadAfter)
            .filter(|dep| {
                matches!(
                    modules.iter().position(|other| other.id == dep.id),
                    Some(found) if found > position
                )
            })
            .map(|dep| format!("{} must load after {}", module.id, dep.id))
            .collect()
    }

    fn parse_manifests(&self, _files: &[String]) -> Result<Vec<ModuleManifest>> {
        if self.manifest_error.get() {
            return Err(anyhow!("no parsable SubModule.xml found"));
        }
        Ok(self.manifests.borrow().clone())
    }

    fn install_module(
        &self,
        _files: &[String],
        _manifests: &[ModuleManifest],
    ) -> Result<RawInstallResult> {
        Ok(self.install_result.borrow().clone())
    }

    fn test_module(&self, files: &[String]) -> InstallTest {
        let required_files: Vec<String> = files
            .iter()
            .filter(|file| file.ends_with("SubModule.xml"))
            .cloned()
            .collect();
        InstallTest {
            supported: !required_files.is_empty(),
            required_files,
        }
    }

    fn compare_versions(&self, a: &ModuleVersion, b: &ModuleVersion) -> Ordering {
        (a.major, a.minor, a.revision, a.change_set).cmp(&(
            b.major,
            b.minor,
            b.revision,
            b.change_set,
        ))
    }

    fn sort(&self) -> Result<()> {
        Ok(())
    }

    fn is_sorting(&self) -> bool {
        self.sorting.get()
    }
}

/// Recording stand-in for the hosting mod manager.
pub struct FakeHost {
    pub profile: RefCell<Option<String>>,
    pub discovery: RefCell<Option<PathBuf>>,
    pub store: Cell<GameStore>,
    pub notices: RefCell<Vec<(NoticeKind, String, Vec<String>)>>,
    pub questions: RefCell<Vec<String>>,
    pub answer: Cell<bool>,
    pub launch_pushes: RefCell<Vec<Vec<String>>>,
    pub mods: RefCell<HashMap<String, String>>,
    pub beta: Cell<bool>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            profile: RefCell::new(Some("default".to_string())),
            discovery: RefCell::new(Some(PathBuf::from("/games/bannerlord"))),
            store: Cell::new(GameStore::Steam),
            notices: RefCell::new(Vec::new()),
            questions: RefCell::new(Vec::new()),
            answer: Cell::new(false),
            launch_pushes: RefCell::new(Vec::new()),
            mods: RefCell::new(HashMap::new()),
            beta: Cell::new(false),
        }
    }

    pub fn notice_kinds(&self) -> Vec<NoticeKind> {
        self.notices.borrow().iter().map(|(kind, ..)| *kind).collect()
    }
}

impl HostCapabilities for FakeHost {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("read {path:?}"))
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        fs::write(path, data).with_context(|| format!("write {path:?}"))
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).with_context(|| format!("list {dir:?}"))? {
            files.push(entry?.path());
        }
        Ok(files)
    }

    fn notify(&self, kind: NoticeKind, summary: &str, details: &[String]) {
        self.notices
            .borrow_mut()
            .push((kind, summary.to_string(), details.to_vec()));
    }

    fn ask_user(&self, question: &str) -> bool {
        self.questions.borrow_mut().push(question.to_string());
        self.answer.get()
    }

    fn set_launch_arguments(&self, module_ids: &[String]) -> Result<()> {
        self.launch_pushes.borrow_mut().push(module_ids.to_vec());
        Ok(())
    }

    fn active_profile_id(&self) -> Option<String> {
        self.profile.borrow().clone()
    }

    fn discovery_path(&self) -> Option<PathBuf> {
        self.discovery.borrow().clone()
    }

    fn discovery_store(&self) -> GameStore {
        self.store.get()
    }

    fn beta_sorting(&self, _profile_id: &str) -> bool {
        self.beta.get()
    }

    fn mod_index(&self) -> HashMap<String, String> {
        self.mods.borrow().clone()
    }
}
