pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryResourceStore;
pub use models::resource::{Resource, ResourcePayload};
pub use postgres::PgResourceStore;
pub use store::{ResourceStore, StoreError};
