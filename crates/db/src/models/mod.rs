//! Row structs for the PostgreSQL schema.
//!
//! Each submodule holds a `FromRow` struct matching one query shape and a
//! conversion into the corresponding `taskboard-core` entity. Request DTOs
//! live in the core crate; nothing here is serialized to clients.

pub mod comment;
pub mod project;
pub mod task;
pub mod user;
