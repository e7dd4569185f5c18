pub mod attributes;
pub mod config;
pub mod error;
pub mod identity;
pub mod path;
pub mod permission;
pub mod status;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::FilerStore;
