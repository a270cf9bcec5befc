//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default database location (created on first start)
pub const DEFAULT_DATABASE_URL: &str = "sqlite://uzleetcode.db?mode=rwc";

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// How long a connection waits on a locked database before giving up
pub const DATABASE_BUSY_TIMEOUT_SECONDS: u64 = 5;

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Username minimum length
pub const MIN_USERNAME_LENGTH: u64 = 3;

/// Username maximum length
pub const MAX_USERNAME_LENGTH: u64 = 32;

// =============================================================================
// AI PROVIDER DEFAULTS
// =============================================================================

/// Default Gemini model
pub const DEFAULT_AI_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API base URL
pub const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Deadline for one gateway operation, retries included
pub const DEFAULT_AI_TIMEOUT_SECONDS: u64 = 45;

/// Retries after the first attempt for transient failures
pub const DEFAULT_AI_MAX_RETRIES: u32 = 3;

/// First backoff delay; doubles on every retry
pub const DEFAULT_AI_BACKOFF_BASE_MS: u64 = 1000;

/// Upper bound for a single backoff delay
pub const DEFAULT_AI_BACKOFF_MAX_MS: u64 = 16_000;

/// Sampling temperature used for translations
pub const TRANSLATION_TEMPERATURE: f32 = 0.3;

/// Sampling temperature used for critiques
pub const CRITIQUE_TEMPERATURE: f32 = 0.2;

/// Statement characters forwarded to the judge prompt
pub const CRITIQUE_STATEMENT_PREVIEW_CHARS: usize = 4000;

// =============================================================================
// SUPPORTED LANGUAGES
// =============================================================================

/// Language identifiers accepted for submissions
pub mod languages {
    pub const PYTHON: &str = "python";
    pub const CPP: &str = "cpp";
    pub const C: &str = "c";
    pub const JAVA: &str = "java";
    pub const JAVASCRIPT: &str = "javascript";
    pub const GO: &str = "go";
    pub const RUST: &str = "rust";

    /// All supported language identifiers
    pub const ALL: &[&str] = &[PYTHON, CPP, C, JAVA, JAVASCRIPT, GO, RUST];
}

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const PARTICIPANT: &str = "participant";

    /// All user roles
    pub const ALL: &[&str] = &[ADMIN, PARTICIPANT];
}

// =============================================================================
// SUBMISSION STATUSES
// =============================================================================

/// Submission lifecycle statuses
pub mod statuses {
    pub const PENDING: &str = "pending";
    pub const COMPLETED: &str = "completed";
    pub const FAILED: &str = "failed";
}

/// AI judge verdicts
pub mod verdicts {
    pub const CORRECT: &str = "correct";
    pub const INCORRECT: &str = "incorrect";
    pub const NEEDS_REVIEW: &str = "needs_review";

    /// All verdicts the judge may return
    pub const ALL: &[&str] = &[CORRECT, INCORRECT, NEEDS_REVIEW];
}

/// Problem difficulty tags
pub mod difficulties {
    pub const EASY: &str = "easy";
    pub const MEDIUM: &str = "medium";
    pub const HARD: &str = "hard";

    /// All difficulty tags
    pub const ALL: &[&str] = &[EASY, MEDIUM, HARD];
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for paginated results
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum page size for paginated results
pub const MAX_PAGE_SIZE: u32 = 100;

/// Submissions shown on the account page
pub const RECENT_SUBMISSIONS_LIMIT: i64 = 20;

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum accepted request body (statement or source code plus JSON overhead)
pub const MAX_REQUEST_BODY_SIZE: usize = 256 * 1024;

/// Maximum problem title length
pub const MAX_PROBLEM_TITLE_LENGTH: u64 = 256;

/// Maximum problem slug length
pub const MAX_PROBLEM_SLUG_LENGTH: u64 = 128;

/// Maximum problem statement length (64 KiB)
pub const MAX_PROBLEM_STATEMENT_LENGTH: u64 = 65_536;

/// Maximum source code size in bytes (64 KiB)
pub const MAX_SOURCE_CODE_SIZE: u64 = 65_536;

/// Maximum number of topic tags on a problem
pub const MAX_PROBLEM_TAGS: u64 = 16;
