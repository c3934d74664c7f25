// ABOUTME: Crate-level constants shared between the library and the CLI binary

/// Crate version string, surfaced by the CLI's `--version` flag.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `tracing` filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";
