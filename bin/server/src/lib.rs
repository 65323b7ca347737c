//! Clubee backend server.
//!
//! Google sign-in, cookie sessions, the login audit log, and the zunzun and
//! trail-progress APIs, served over axum.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod types;
