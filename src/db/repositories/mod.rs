//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod problem_repo;
pub mod submission_repo;
pub mod user_repo;

pub use problem_repo::ProblemRepository;
pub use submission_repo::{RecentSubmissionRow, SubmissionRepository};
pub use user_repo::UserRepository;
