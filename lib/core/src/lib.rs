//! Core domain types and utilities for the Clubee backend.
//!
//! This crate provides the foundational id types shared by the identity,
//! content, and server crates.

pub mod id;

pub use id::{LoginLogId, ParseIdError, ProgressId, UserId, ZunzunId};
