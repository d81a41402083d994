pub mod commands;
pub mod harness;

// Re-export commonly used items
pub use harness::{Harness, DEFAULT_VERSION};
