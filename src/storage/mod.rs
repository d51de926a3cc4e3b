//! Key persistence module.
//!
//! This module defines the persisted record format and the flat-file store
//! that keeps one directory per key identifier.

pub mod keystore;
pub mod record;
