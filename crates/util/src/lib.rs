//! Common utilities that aren't specific to one other subcrate and are unlikely
//! to change frequently.
//!
//! **This crate is not semver compliant**. The version is locked to the root
//! `cfgopen` crate version. If you choose to depend directly on this crate, you
//! do so at your own risk of breakage.

pub mod paths;
#[cfg(any(test, feature = "test"))]
mod test_util;

#[cfg(any(test, feature = "test"))]
pub use test_util::*;

use std::{error::Error, ops::Deref};
use tracing::error;

/// Extension trait for [Result]
pub trait ResultTraced<T, E>: Sized {
    /// If this is an error, trace it. Return the same result.
    #[must_use]
    fn traced(self) -> Self;
}

impl<T, E: 'static + Error> ResultTraced<T, E> for Result<T, E> {
    fn traced(self) -> Self {
        self.inspect_err(|err| error!(error = err as &dyn Error))
    }
}

/// [ResultTraced] but for the `anyhow` result. This has to be a separate trait
/// because we can't put a blanket impl on std `Error` *and* `anyhow::Result`,
/// as the two "could" conflict in the future.
pub trait ResultTracedAnyhow<T, E>: Sized {
    /// If this is an error, trace it. Return the same result.
    #[must_use]
    fn traced(self) -> Self;
}

// A blanket impl that covers `anyhow::Error` without actually referring to it.
// This allows us to omit anyhow as a dependency, so downstream consumers don't
// pull it in unless they need it.
impl<T, E> ResultTracedAnyhow<T, E> for Result<T, E>
where
    E: Deref<Target = dyn Error + Send + Sync>,
{
    fn traced(self) -> Self {
        self.inspect_err(|err| error!(error = err.deref()))
    }
}
