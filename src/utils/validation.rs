//! Input validation utilities

use crate::constants::{self, MAX_PROBLEM_SLUG_LENGTH, MAX_SOURCE_CODE_SIZE};

/// Validate username format
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err("Username can only contain letters, numbers, underscores, and hyphens");
    }
    if !username.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err("Username must start with a letter");
    }
    Ok(())
}

/// Validate programming language
pub fn validate_language(language: &str) -> Result<(), &'static str> {
    if constants::languages::ALL.contains(&language) {
        Ok(())
    } else {
        Err("Unsupported programming language")
    }
}

/// Validate problem difficulty
pub fn validate_difficulty(difficulty: &str) -> Result<(), &'static str> {
    if constants::difficulties::ALL.contains(&difficulty) {
        Ok(())
    } else {
        Err("Difficulty must be one of: easy, medium, hard")
    }
}

/// Validate source code size
pub fn validate_source_code(code: &str) -> Result<(), &'static str> {
    if code.trim().is_empty() {
        return Err("Source code cannot be empty");
    }
    if code.len() as u64 > MAX_SOURCE_CODE_SIZE {
        return Err("Source code exceeds maximum size of 64KB");
    }
    Ok(())
}

/// Validate a URL slug: lowercase ASCII letters, digits, single hyphens
pub fn validate_slug(slug: &str) -> Result<(), &'static str> {
    if slug.is_empty() || slug.len() as u64 > MAX_PROBLEM_SLUG_LENGTH {
        return Err("Slug must be between 1 and 128 characters");
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("Slug can only contain lowercase letters, digits, and hyphens");
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err("Slug cannot start or end with a hyphen or contain consecutive hyphens");
    }
    Ok(())
}

/// Derive a slug from a title ("Two Sum II" -> "two-sum-ii")
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug.truncate(MAX_PROBLEM_SLUG_LENGTH as usize);
    slug.trim_end_matches('-').to_string()
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Trim, lowercase, and deduplicate tags, dropping empty ones
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = sanitize_string(tag).to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("Alice_123").is_ok());
        assert!(validate_username("123abc").is_err()); // Starts with number
        assert!(validate_username("user@name").is_err()); // Invalid character
    }

    #[test]
    fn test_validate_language() {
        assert!(validate_language("python").is_ok());
        assert!(validate_language("cpp").is_ok());
        assert!(validate_language("cobol").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Two Sum"), "two-sum");
        assert_eq!(slugify("  LRU Cache (Hard!) "), "lru-cache-hard");
        assert_eq!(slugify("Ikki son yig'indisi"), "ikki-son-yig-indisi");
        assert!(validate_slug(&slugify("Median of Two Sorted Arrays")).is_ok());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("two-sum").is_ok());
        assert!(validate_slug("Two-Sum").is_err());
        assert!(validate_slug("-two").is_err());
        assert!(validate_slug("two--sum").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn test_validate_source_code() {
        assert!(validate_source_code("print(1)").is_ok());
        assert!(validate_source_code("   \n").is_err());
        assert!(validate_source_code(&"x".repeat(65_537)).is_err());
    }

    #[test]
    fn test_normalize_tags() {
        let tags = vec![" Array ".to_string(), "array".to_string(), "".to_string(), "DP".to_string()];
        assert_eq!(normalize_tags(&tags), vec!["array".to_string(), "dp".to_string()]);
    }
}
