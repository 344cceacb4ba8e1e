use crate::error::AppError;
use crate::models::{ArticleVersion, ArticleVersionSummary};
use sqlx::{Sqlite, SqlitePool};

/// 버전 스냅샷을 기록합니다. 글 생성 시(버전 1)와 본문 수정마다
/// 글 행 쓰기와 한 트랜잭션으로 호출되도록 Executor를 받습니다.
/// 생성된 스냅샷의 id를 반환합니다.
pub async fn insert_version<'e, E>(
    executor: E,
    article_id: &str,
    version_number: i64,
    content: &str,
    word_count: i64,
    char_count: i64,
) -> Result<String, AppError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO article_versions (id, article_id, version_number, content, word_count, char_count)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(article_id)
    .bind(version_number)
    .bind(content)
    .bind(word_count)
    .bind(char_count)
    .execute(executor)
    .await?;

    Ok(id)
}

pub async fn list_versions(
    pool: &SqlitePool,
    article_id: &str,
) -> Result<Vec<ArticleVersionSummary>, AppError> {
    let versions = sqlx::query_as::<_, ArticleVersionSummary>(
        r#"
        SELECT id, article_id, version_number, word_count, char_count, created_at
        FROM article_versions
        WHERE article_id = ?
        ORDER BY version_number DESC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?;

    Ok(versions)
}

pub async fn get_version(
    pool: &SqlitePool,
    version_id: &str,
) -> Result<Option<ArticleVersion>, AppError> {
    let version = sqlx::query_as::<_, ArticleVersion>(
        r#"
        SELECT id, article_id, version_number, content, word_count, char_count, created_at
        FROM article_versions
        WHERE id = ?
        "#,
    )
    .bind(version_id)
    .fetch_optional(pool)
    .await?;

    Ok(version)
}
