//! dotlink library
//!
//! Core functionality for linking configuration files from a managed store
//! into the user's home directory: the mapping-file parser, path expansion,
//! platform detection, and run configuration. The CLI commands live in the
//! binary.

pub mod config;
pub mod mapping;
pub mod paths;
pub mod platform;
