//! # Warning: Unstable API
//!
//! This library API is unstable and subject to breaking changes without notice.
//! Only the CLI interface is considered stable. Use at your own risk.
//!
//! To use the CLI tool, install with: `cargo install leakcheck`

// All modules declared here for library structure
// Mark everything as doc(hidden) to avoid exposing unstable API in docs
#[doc(hidden)]
pub mod candidates;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod detect;
#[doc(hidden)]
pub mod matcher;
#[doc(hidden)]
pub mod reference;
#[doc(hidden)]
pub mod report;
#[doc(hidden)]
pub mod text;

// Re-export the entry points for convenience (also hidden from docs)
#[doc(hidden)]
pub use config::{read_config, Config};
#[doc(hidden)]
pub use detect::execute_detect;
