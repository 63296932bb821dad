//! Storage adapters - implementations of the user store port.

mod file_user_store;
mod in_memory_user_store;

pub use file_user_store::FileUserStore;
pub use in_memory_user_store::InMemoryUserStore;
