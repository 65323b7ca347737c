//! Community content for the Clubee backend.
//!
//! - Zunzuns: short public posts, optionally anonymous
//! - Progress: per-user completion of activities along learning trails
//!
//! Storage goes through the `ZunzunStore` and `ProgressStore` traits; the
//! [`memory`] module holds in-process implementations.

pub mod error;
pub mod memory;
pub mod progress;
pub mod store;
pub mod zunzun;

pub use error::ContentError;
pub use progress::{Progress, ProgressUpdate};
pub use store::{ProgressStore, ZunzunStore};
pub use zunzun::{ANONYMOUS_AUTHOR, MAX_TEXT_CHARS, NewZunzun, Zunzun};
