//! Token issuance and validation.

pub mod jwt;
