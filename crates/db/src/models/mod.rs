//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Input DTOs used by the repositories for inserts and patches

pub mod category;
pub mod event;
pub mod interaction;
pub mod job;
pub mod notification;
pub mod review;
pub mod user;
