//! # DevHabit Security
//!
//! JWT issuance and validation, Argon2 password hashing, role checks and
//! AES-GCM encryption of secrets stored at rest.

pub mod encryption;
pub mod jwt;
pub mod password;
pub mod rbac;

pub use encryption::*;
pub use jwt::*;
pub use password::*;
pub use rbac::*;
