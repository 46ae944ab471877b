//! ToZeMoon Labs site engines.
//!
//! The hero flight sequencer and the contact relay live in their own crates; this facade
//! re-exports them so front-ends (CLI, server, tests) share one entry point.

pub use tozemoon_config as config;
pub use tozemoon_contact as contact;
pub use tozemoon_core as core;
pub use tozemoon_export as export;
pub use tozemoon_flight as flight;

pub mod skills;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
