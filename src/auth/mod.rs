//! Session and role authorization.
//!
//! Two pieces live here: the static role→capability grant table checked on
//! every administrative request, and the session record carrying the role
//! claim between requests. Both are pure and I/O-free; the HTTP glue is in
//! `crate::api::auth`.

pub mod permissions;
pub mod session;

pub use permissions::{Capability, PermissionTable, Role};
pub use session::{Principal, SessionRecord};
