//! Problem request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::constants::{
    MAX_PROBLEM_SLUG_LENGTH, MAX_PROBLEM_STATEMENT_LENGTH, MAX_PROBLEM_TAGS,
    MAX_PROBLEM_TITLE_LENGTH, MAX_SOURCE_CODE_SIZE,
};

/// Create problem request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProblemRequest {
    #[validate(length(min = 1, max = MAX_PROBLEM_TITLE_LENGTH))]
    pub title: String,

    /// Derived from the title when omitted
    #[validate(length(min = 1, max = MAX_PROBLEM_SLUG_LENGTH))]
    pub slug: Option<String>,

    /// Original (English) statement
    #[validate(length(min = 1, max = MAX_PROBLEM_STATEMENT_LENGTH))]
    pub statement: String,

    /// `easy`, `medium` or `hard`
    pub difficulty: String,

    #[validate(length(max = MAX_PROBLEM_TAGS))]
    pub tags: Option<Vec<String>>,

    /// Starter code shown in the editor
    #[validate(length(max = MAX_SOURCE_CODE_SIZE))]
    pub default_code: Option<String>,
}

/// Update problem request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProblemRequest {
    #[validate(length(min = 1, max = MAX_PROBLEM_TITLE_LENGTH))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = MAX_PROBLEM_SLUG_LENGTH))]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = MAX_PROBLEM_STATEMENT_LENGTH))]
    pub statement: Option<String>,

    pub difficulty: Option<String>,

    #[validate(length(max = MAX_PROBLEM_TAGS))]
    pub tags: Option<Vec<String>>,

    #[validate(length(max = MAX_SOURCE_CODE_SIZE))]
    pub default_code: Option<String>,
}

/// List problems query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListProblemsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub difficulty: Option<String>,
    pub tag: Option<String>,
}
