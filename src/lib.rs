pub mod bridge;
pub mod convert;
pub mod engine;
pub mod install;
pub mod module;
pub mod order;
pub mod store;
pub mod sync;

pub use bridge::ValidationBridge;
pub use engine::{HostCapabilities, NoticeKind, OrderingEngine};
pub use install::{InstallInstruction, InstallResolver};
pub use module::{GameStore, ModuleCatalog, ModuleRecord, ModuleVersion, ProviderType};
pub use order::{HostEntry, LibraryOrder, LockState, PersistedEntry, ViewModelEntry};
pub use store::PersistedOrderStore;
pub use sync::{SyncEngine, SyncError, SyncState};
