//! Problem repository

use chrono::{DateTime, Utc};
use sqlx::{SqlitePool, types::Json};
use uuid::Uuid;

use crate::{error::AppResult, models::Problem};

/// Repository for problem database operations
pub struct ProblemRepository;

impl ProblemRepository {
    /// Create a new problem
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        pool: &SqlitePool,
        slug: &str,
        title: &str,
        statement: &str,
        statement_digest: &str,
        difficulty: &str,
        tags: &[String],
        default_code: Option<&str>,
    ) -> AppResult<Problem> {
        let now = Utc::now();
        let problem = sqlx::query_as::<_, Problem>(
            r#"
            INSERT INTO problems (
                id, slug, title, statement, statement_digest,
                difficulty, tags, default_code, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(slug)
        .bind(title)
        .bind(statement)
        .bind(statement_digest)
        .bind(difficulty)
        .bind(Json(tags))
        .bind(default_code)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(problem)
    }

    /// Find problem by ID
    pub async fn find_by_id(pool: &SqlitePool, id: &Uuid) -> AppResult<Option<Problem>> {
        let problem = sqlx::query_as::<_, Problem>(r#"SELECT * FROM problems WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(problem)
    }

    /// Find problem by slug
    pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> AppResult<Option<Problem>> {
        let problem = sqlx::query_as::<_, Problem>(r#"SELECT * FROM problems WHERE slug = ?1"#)
            .bind(slug)
            .fetch_optional(pool)
            .await?;

        Ok(problem)
    }

    /// Update problem.
    ///
    /// When `statement_digest` differs from the stored one the translation is
    /// cleared in the same statement, so no reader sees a new statement paired
    /// with the old translation.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        pool: &SqlitePool,
        id: &Uuid,
        slug: Option<&str>,
        title: Option<&str>,
        statement: Option<&str>,
        statement_digest: Option<&str>,
        difficulty: Option<&str>,
        tags: Option<&[String]>,
        default_code: Option<&str>,
    ) -> AppResult<Option<Problem>> {
        let problem = sqlx::query_as::<_, Problem>(
            r#"
            UPDATE problems
            SET
                slug = COALESCE(?2, slug),
                title = COALESCE(?3, title),
                statement = COALESCE(?4, statement),
                statement_digest = COALESCE(?5, statement_digest),
                translated_statement = CASE
                    WHEN ?5 IS NOT NULL AND ?5 <> statement_digest THEN NULL
                    ELSE translated_statement
                END,
                translated_at = CASE
                    WHEN ?5 IS NOT NULL AND ?5 <> statement_digest THEN NULL
                    ELSE translated_at
                END,
                difficulty = COALESCE(?6, difficulty),
                tags = COALESCE(?7, tags),
                default_code = COALESCE(?8, default_code),
                updated_at = ?9
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(slug)
        .bind(title)
        .bind(statement)
        .bind(statement_digest)
        .bind(difficulty)
        .bind(tags.map(Json))
        .bind(default_code)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(problem)
    }

    /// Store a translation computed from the statement with `statement_digest`.
    ///
    /// Last write wins. Returns `false` when the statement changed in the
    /// meantime and the translation was discarded.
    pub async fn set_translation(
        pool: &SqlitePool,
        id: &Uuid,
        statement_digest: &str,
        translated_statement: &str,
        translated_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE problems
            SET translated_statement = ?3, translated_at = ?4
            WHERE id = ?1 AND statement_digest = ?2
            "#,
        )
        .bind(id)
        .bind(statement_digest)
        .bind(translated_statement)
        .bind(translated_at)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete problem
    pub async fn delete(pool: &SqlitePool, id: &Uuid) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM problems WHERE id = ?1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List problems with pagination and filters
    pub async fn list(
        pool: &SqlitePool,
        offset: i64,
        limit: i64,
        difficulty: Option<&str>,
        tag: Option<&str>,
        search: Option<&str>,
    ) -> AppResult<(Vec<Problem>, i64)> {
        let search_pattern = search.map(|s| format!("%{}%", escape_like(s)));

        let problems = sqlx::query_as::<_, Problem>(
            r#"
            SELECT * FROM problems
            WHERE
                (?1 IS NULL OR difficulty = ?1)
                AND (?2 IS NULL OR EXISTS (
                    SELECT 1 FROM json_each(problems.tags) WHERE json_each.value = ?2
                ))
                AND (?3 IS NULL OR title LIKE ?3 ESCAPE '\' OR slug LIKE ?3 ESCAPE '\')
            ORDER BY created_at ASC, slug ASC
            LIMIT ?4 OFFSET ?5
            "#,
        )
        .bind(difficulty)
        .bind(tag)
        .bind(&search_pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM problems
            WHERE
                (?1 IS NULL OR difficulty = ?1)
                AND (?2 IS NULL OR EXISTS (
                    SELECT 1 FROM json_each(problems.tags) WHERE json_each.value = ?2
                ))
                AND (?3 IS NULL OR title LIKE ?3 ESCAPE '\' OR slug LIKE ?3 ESCAPE '\')
            "#,
        )
        .bind(difficulty)
        .bind(tag)
        .bind(&search_pattern)
        .fetch_one(pool)
        .await?;

        Ok((problems, count))
    }

    /// Count total problems
    pub async fn count(pool: &SqlitePool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM problems"#)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Count problems per difficulty
    pub async fn count_by_difficulty(pool: &SqlitePool) -> AppResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"SELECT difficulty, COUNT(*) FROM problems GROUP BY difficulty"#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

/// Escape `LIKE` wildcards so search text matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::difficulties,
        error::AppError,
        test_utils::{create_problem, create_problem_with_difficulty, test_pool},
        utils::hash_string,
    };

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let problem = create_problem(&pool, "two-sum", "Given an array...").await;

        let by_id = ProblemRepository::find_by_id(&pool, &problem.id).await.unwrap().unwrap();
        let by_slug = ProblemRepository::find_by_slug(&pool, "two-sum").await.unwrap().unwrap();

        assert_eq!(by_id.id, by_slug.id);
        assert_eq!(by_id.tags.0, vec!["array".to_string()]);
        assert!(!by_id.is_translated());
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_already_exists() {
        let pool = test_pool().await;
        create_problem(&pool, "two-sum", "first").await;

        let err = ProblemRepository::create(
            &pool,
            "two-sum",
            "Two Sum",
            "second",
            &hash_string("second"),
            difficulties::EASY,
            &[],
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_set_translation_is_guarded_by_digest() {
        let pool = test_pool().await;
        let problem = create_problem(&pool, "fizz-buzz", "Print numbers").await;

        let stale = ProblemRepository::set_translation(&pool, &problem.id, "other", "Eski", Utc::now())
            .await
            .unwrap();
        assert!(!stale);

        let stored = ProblemRepository::set_translation(
            &pool,
            &problem.id,
            &problem.statement_digest,
            "Sonlarni chop eting",
            Utc::now(),
        )
        .await
        .unwrap();
        assert!(stored);

        let problem = ProblemRepository::find_by_id(&pool, &problem.id).await.unwrap().unwrap();
        assert_eq!(problem.translated_statement.as_deref(), Some("Sonlarni chop eting"));
        assert!(problem.translated_at.is_some());
    }

    #[tokio::test]
    async fn test_statement_edit_clears_translation() {
        let pool = test_pool().await;
        let problem = create_problem(&pool, "fizz-buzz", "Print numbers").await;
        ProblemRepository::set_translation(&pool, &problem.id, &problem.statement_digest, "Tarjima", Utc::now())
            .await
            .unwrap();

        // Title-only edit keeps the translation
        let renamed = ProblemRepository::update(
            &pool, &problem.id, None, Some("FizzBuzz"), None, None, None, None, None,
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(renamed.translated_statement.as_deref(), Some("Tarjima"));

        // Same statement resubmitted keeps it too
        let same = ProblemRepository::update(
            &pool,
            &problem.id,
            None,
            None,
            Some("Print numbers"),
            Some(&hash_string("Print numbers")),
            None,
            None,
            None,
        )
        .await
        .unwrap()
        .unwrap();
        assert!(same.is_translated());

        let edited = ProblemRepository::update(
            &pool,
            &problem.id,
            None,
            None,
            Some("Print numbers 1..n"),
            Some(&hash_string("Print numbers 1..n")),
            None,
            None,
            None,
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(edited.statement, "Print numbers 1..n");
        assert_eq!(edited.translated_statement, None);
        assert_eq!(edited.translated_at, None);
    }

    #[tokio::test]
    async fn test_update_missing_problem_returns_none() {
        let pool = test_pool().await;
        let updated = ProblemRepository::update(
            &pool, &Uuid::new_v4(), None, Some("x"), None, None, None, None, None,
        )
        .await
        .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let pool = test_pool().await;
        create_problem_with_difficulty(&pool, "two-sum", "a", difficulties::EASY).await;
        create_problem_with_difficulty(&pool, "lru-cache", "b", difficulties::MEDIUM).await;
        ProblemRepository::create(
            &pool,
            "median-of-arrays",
            "Median of Two Sorted Arrays",
            "c",
            &hash_string("c"),
            difficulties::HARD,
            &["binary-search".to_string()],
            None,
        )
        .await
        .unwrap();

        let (all, total) = ProblemRepository::list(&pool, 0, 10, None, None, None).await.unwrap();
        assert_eq!((all.len(), total), (3, 3));

        let (medium, _) = ProblemRepository::list(&pool, 0, 10, Some("medium"), None, None)
            .await
            .unwrap();
        assert_eq!(medium[0].slug, "lru-cache");

        let (tagged, count) = ProblemRepository::list(&pool, 0, 10, None, Some("binary-search"), None)
            .await
            .unwrap();
        assert_eq!((tagged.len(), count), (1, 1));

        let (searched, _) = ProblemRepository::list(&pool, 0, 10, None, None, Some("median"))
            .await
            .unwrap();
        assert_eq!(searched[0].slug, "median-of-arrays");

        let (wildcard, count) = ProblemRepository::list(&pool, 0, 10, None, None, Some("_"))
            .await
            .unwrap();
        assert!(wildcard.is_empty());
        assert_eq!(count, 0);

        let (percent, _) = ProblemRepository::list(&pool, 0, 10, None, None, Some("%"))
            .await
            .unwrap();
        assert!(percent.is_empty());

        let (page, total) = ProblemRepository::list(&pool, 2, 2, None, None, None).await.unwrap();
        assert_eq!((page.len(), total), (1, 3));

        let mut by_difficulty = ProblemRepository::count_by_difficulty(&pool).await.unwrap();
        by_difficulty.sort();
        assert_eq!(
            by_difficulty,
            vec![("easy".into(), 1), ("hard".into(), 1), ("medium".into(), 1)]
        );
    }
}
