//! Domain logic for the machine monitoring platform.
//!
//! Pure types and decision logic only, no I/O. The database layer lives in
//! `machwatch-db`, the HTTP surface in `machwatch-api`.

pub mod alert;
pub mod error;
pub mod evaluator;
pub mod roles;
pub mod status;
pub mod types;
