//! Ready-made sink writers

pub mod console;
pub mod file;
pub mod memory;

pub use memory::MemoryWriter;

// Re-export for `use bayaan::sinks::Sink`
pub use crate::core::Sink;
