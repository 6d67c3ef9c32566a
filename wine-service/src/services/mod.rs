pub mod conversation;
pub mod database;
pub mod inventory;
pub mod keep_warm;
pub mod memory_store;
pub mod providers;

pub use database::{StoreError, SupabaseStore, WineStore};
pub use inventory::InventoryCache;
pub use keep_warm::KeepWarm;
pub use memory_store::MemoryStore;
pub use providers::{ChatProvider, ProviderError};
