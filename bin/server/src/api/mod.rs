//! JSON API handlers.

pub mod logins;
pub mod progress;
pub mod user;
pub mod zunzuns;

pub use logins::{admin_logins, list_logins};
pub use progress::{list_progress, save_progress};
pub use user::me;
pub use zunzuns::{create_zunzun, list_zunzuns};
