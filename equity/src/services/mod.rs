//! Service implementations
//!
//! Real implementations of the store and roster traits.

pub mod file_store;
pub mod memory_store;
pub mod roster;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use roster::StaticRoster;
