//! Database module.
//!
//! This module provides:
//! - Connection setup, idempotent initialization and migrations
//! - Repository layer for read queries

pub mod init;
pub mod repo;

pub use init::{init_db, InitError, InitOptions, MARKER_TABLE};
pub use repo::Repository;
