//! Domain models

pub mod problem;
pub mod submission;
pub mod user;

pub use problem::*;
pub use submission::*;
pub use user::*;
