//! Utility functions

pub mod crypto;
pub mod validation;

pub use crypto::hash_string;
pub use validation::{
    normalize_tags, sanitize_string, slugify, validate_difficulty, validate_language,
    validate_slug, validate_source_code, validate_username,
};
