//! Domain core for the taskboard backend.
//!
//! Holds the entity snapshots, the membership-based authorization policy,
//! the task mutation policy, and the [`tracker::Tracker`] service that wires
//! them to the store collaborators defined in [`store`].

pub mod access;
pub mod comment;
pub mod error;
pub mod password;
pub mod project;
pub mod store;
pub mod task;
pub mod tracker;
pub mod types;
pub mod user;
pub mod validation;
