//! Configuration, errors and the result types shared across the crate.

pub mod config;
pub mod error;
pub mod models;
