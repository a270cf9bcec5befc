//! Business logic services

pub mod admin_service;
pub mod auth_service;
pub mod problem_service;
pub mod submission_service;
pub mod user_service;

pub use admin_service::AdminService;
pub use auth_service::AuthService;
pub use problem_service::ProblemService;
pub use submission_service::SubmissionService;
pub use user_service::UserService;
