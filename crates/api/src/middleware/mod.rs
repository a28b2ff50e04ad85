//! Session and authorization extractors.
//!
//! - [`session::Session`] -- resolves the `auth` cookie; never rejects.
//! - [`rbac::RequireRead`] -- requires the read capability.
//! - [`rbac::RequireWrite`] -- requires the write capability.
//! - [`rbac::RequireAdmin`] -- requires the admin capability.

pub mod rbac;
pub mod session;
