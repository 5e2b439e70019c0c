pub mod fallback_store;
pub mod kv_store;

pub use fallback_store::FallbackStore;
pub use kv_store::{load_json, save_json, KeyValueStore, StoreError};
