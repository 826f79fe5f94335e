pub mod log_store;
pub mod memory;
pub mod postgres;

pub use log_store::LogStore;
pub use memory::MemoryLogStore;
pub use postgres::PgLogStore;
