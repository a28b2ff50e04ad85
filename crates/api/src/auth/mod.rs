//! Authentication primitives.
//!
//! - [`identity`] -- verification of third-party login assertions.
//! - [`cookie`] -- the `auth` session cookie format.

pub mod cookie;
pub mod identity;
