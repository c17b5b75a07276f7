//! Utility functions and helpers.

pub mod dates;
pub mod http;
pub mod links;
