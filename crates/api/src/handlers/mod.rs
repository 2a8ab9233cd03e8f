//! Request handlers, one module per resource.
//!
//! Handlers are thin: extract, call the [`Tracker`](taskboard_core::tracker::Tracker),
//! wrap the result in a [`DataResponse`](crate::response::DataResponse).

pub mod auth;
pub mod comment;
pub mod project;
pub mod task;
pub mod user;
