use crate::order::PersistedEntry;
use anyhow::{Context, Result};
use directories::BaseDirs;
use log::warn;
use std::{
    fs,
    path::{Path, PathBuf},
};

const ORDER_FILE_SUFFIX: &str = "_loadorder.json";

/// Per-profile JSON persistence of the durable order form. One array per
/// profile; array order encodes rank. A missing or unreadable file is an
/// empty order, never an error.
#[derive(Debug, Clone)]
pub struct PersistedOrderStore {
    root: PathBuf,
}

impl PersistedOrderStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn in_user_data() -> Result<Self> {
        let base = BaseDirs::new().context("resolve home dir")?;
        Ok(Self::new(base.data_local_dir().join("ordersmith")))
    }

    pub fn path_for(&self, profile_id: &str) -> PathBuf {
        self.root.join(format!("{profile_id}{ORDER_FILE_SUFFIX}"))
    }

    pub fn load(&self, profile_id: &str) -> Vec<PersistedEntry> {
        let path = self.path_for(profile_id);
        if !path.exists() {
            return Vec::new();
        }
        match read_order(&path) {
            Ok(order) => order,
            Err(err) => {
                warn!("discarding unreadable load order {path:?}: {err:#}");
                Vec::new()
            }
        }
    }

    pub fn save(&self, profile_id: &str, order: &[PersistedEntry]) -> Result<()> {
        fs::create_dir_all(&self.root).context("create load order dir")?;
        let path = self.path_for(profile_id);
        let raw = serde_json::to_string_pretty(order).context("serialize load order")?;
        fs::write(&path, raw).with_context(|| format!("write load order {path:?}"))?;
        Ok(())
    }
}

fn read_order(path: &Path) -> Result<Vec<PersistedEntry>> {
    let raw = fs::read_to_string(path).context("read load order")?;
    serde_json::from_str(&raw).context("parse load order")
}
