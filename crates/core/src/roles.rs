//! Well-known role names.
//!
//! These must match the CHECK constraint on `users.role` in the
//! `create_users_table` migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TECHNICIAN: &str = "technician";
pub const ROLE_VIEWER: &str = "viewer";

/// Every role a user row may carry, in descending order of privilege.
pub const ALL_ROLES: [&str; 3] = [ROLE_ADMIN, ROLE_TECHNICIAN, ROLE_VIEWER];

/// Whether `role` is one of the known role names.
pub fn is_valid_role(role: &str) -> bool {
    ALL_ROLES.contains(&role)
}
