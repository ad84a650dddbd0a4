pub mod fixtures;
pub mod memory_store;
