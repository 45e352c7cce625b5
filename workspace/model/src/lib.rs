pub mod entities;
pub mod transaction;

// Re-export tracing for use in this crate
pub use tracing;
