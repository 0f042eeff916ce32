//! CLI commands

pub mod backup;
pub mod link;
