//! Test harness for CLI integration tests.
//!
//! Provides isolated vaults and config files, programmatic note creation,
//! and CLI assertion helpers using `assert_cmd`.

mod command;
mod env;
mod note;

// Re-export main types for external use
#[allow(unused_imports)]
pub use command::VellumCommand;
#[allow(unused_imports)]
pub use env::{COMPLETE_CONFIG, TestEnv};
#[allow(unused_imports)]
pub use note::TestNote;
