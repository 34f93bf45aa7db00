//! Request extractors that enforce authentication.

pub mod auth;
