//! Building blocks used by the verification pipeline.

pub mod classify;
pub mod dns;
pub(crate) mod lists;
pub mod smtp;
