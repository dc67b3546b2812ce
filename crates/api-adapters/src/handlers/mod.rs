//! HTTP handlers, grouped by resource.

pub mod auth;
pub mod community;
pub mod lists;
