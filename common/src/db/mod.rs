// Database layer module: connection pool, repositories and the store trait

pub mod memory;
pub mod pool;
pub mod repositories;
pub mod store;

pub use memory::MemoryStore;
pub use pool::DbPool;
pub use store::{BakeryStore, PgStore};
