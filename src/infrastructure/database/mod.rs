pub mod connection_pool;
mod queries;
pub mod sqlite_store;

pub use connection_pool::ConnectionPool;
pub use sqlite_store::SqliteInteractionStore;
