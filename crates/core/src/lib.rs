//! Decide how to open a configuration file for editing, and open it.
//!
//! Some operating systems associate script extensions (e.g. `.js`) with a
//! script host by default, so "open this file" silently *runs* it. Before
//! delegating to the OS, we inspect the user's association for the extension
//! and fall back to a plain-text editor if the handler looks like a script
//! host. [OpenDispatcher] is the entrypoint:
//!
//! ```notrust
//!              +----------------+
//!              | OpenDispatcher |
//!              +----------------+
//!                      |
//!               PlatformPolicy
//!                      |
//!        +---Standard--+---AtRisk---+
//!        |                          |
//!        |               +----------------------+
//!        |               | AssociationInspector |
//!        |               +----------------------+
//!        |                          |
//!        |                 is_default_handler_safe
//!        |                          |
//!        |          +----safe-------+----unsafe/error----+
//!        v          v                                    v
//!   +--------------------+                     +------------------+
//!   |   NativeOpener     |                     | FallbackLauncher |
//!   +--------------------+                     +------------------+
//!              |                                         |
//!              +------------------> bool <---------------+
//! ```
//!
//! **This crate is not semver compliant**. The version is locked to the root
//! `cfgopen` crate version. If you choose to depend directly on this crate, you
//! do so at your own risk of breakage.

pub mod association;
pub mod dispatch;
pub mod launch;
pub mod policy;
#[cfg(test)]
mod test_util;

pub use association::{
    AssociationInspector, InspectionError, KeyPath, RegistryAccess,
};
pub use dispatch::{OpenDispatcher, OpenStrategy, PlatformPolicy};
pub use launch::{FallbackLauncher, LaunchError, SystemOpener};
pub use policy::is_default_handler_safe;
