//! # 리뷰 코멘트 쿼리 모듈
//!
//! 리뷰 산출물 저장소의 코멘트 부분입니다. 검증은 모두 INSERT/UPDATE 전에
//! 끝내므로 검증 실패가 부분 기록을 남기는 일이 없습니다.
//! 이 모듈은 글의 status를 절대 건드리지 않습니다 (상태는 워크플로우
//! 엔진만 씁니다).

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

const MIN_BODY_LEN: usize = 3;
const MAX_BODY_LEN: usize = 1000;
const DEFAULT_COLOR: &str = "yellow";

/// 코멘트 생성 요청을 검증합니다.
///
/// - 본문 길이 3–1000자
/// - 앵커가 있으면 `0 <= start <= end <= content_len` (문자 단위)
///   앵커는 작성 시점에만 검증하며 이후 본문 변경을 따라가지 않습니다.
fn validate_comment(req: &AddCommentRequest, content_len: i64) -> Result<(), AppError> {
    let body_len = req.body.chars().count();
    if body_len < MIN_BODY_LEN || body_len > MAX_BODY_LEN {
        return Err(AppError::Validation(format!(
            "comment body must be {MIN_BODY_LEN}-{MAX_BODY_LEN} characters"
        )));
    }

    match (req.start_offset, req.end_offset) {
        (None, None) => {} // 앵커 없는 일반 코멘트
        (Some(start), Some(end)) => {
            if start < 0 || start > end || end > content_len {
                return Err(AppError::Validation(format!(
                    "text anchor must satisfy 0 <= start <= end <= {content_len}"
                )));
            }
        }
        _ => {
            return Err(AppError::Validation(
                "start_offset and end_offset must be given together".to_string(),
            ));
        }
    }

    Ok(())
}

/// 검증 후 `pending` 상태로 코멘트를 저장합니다.
pub async fn create_comment(
    pool: &SqlitePool,
    article_id: &str,
    reviewer_id: &str,
    req: &AddCommentRequest,
    content_len: i64,
) -> Result<ReviewComment, AppError> {
    validate_comment(req, content_len)?;

    let id = uuid::Uuid::now_v7().to_string();
    let color = req.color.as_deref().unwrap_or(DEFAULT_COLOR);

    sqlx::query(
        r#"
        INSERT INTO review_comments
            (id, article_id, reviewer_id, selected_text, start_offset, end_offset, body, color)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(article_id)
    .bind(reviewer_id)
    .bind(&req.selected_text)
    .bind(req.start_offset)
    .bind(req.end_offset)
    .bind(&req.body)
    .bind(color)
    .execute(pool)
    .await?;

    get_comment(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created comment".to_string()))
}

pub async fn get_comment(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<ReviewComment>, AppError> {
    let comment = sqlx::query_as::<_, ReviewComment>(
        r#"
        SELECT id, article_id, reviewer_id, selected_text, start_offset, end_offset,
               body, color, status, created_at, updated_at
        FROM review_comments
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

pub async fn list_comments(
    pool: &SqlitePool,
    article_id: &str,
) -> Result<Vec<ReviewComment>, AppError> {
    let comments = sqlx::query_as::<_, ReviewComment>(
        r#"
        SELECT id, article_id, reviewer_id, selected_text, start_offset, end_offset,
               body, color, status, created_at, updated_at
        FROM review_comments
        WHERE article_id = ?
        ORDER BY created_at
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// 코멘트 처리 상태를 갱신합니다. pending으로 되돌리는 경로는 없습니다.
pub async fn update_comment_status(
    pool: &SqlitePool,
    id: &str,
    status: CommentStatus,
) -> Result<Option<ReviewComment>, AppError> {
    if status == CommentStatus::Pending {
        return Err(AppError::Validation(
            "a comment cannot be moved back to pending".to_string(),
        ));
    }

    sqlx::query(
        r#"
        UPDATE review_comments
        SET status = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(status)
    .bind(id)
    .execute(pool)
    .await?;

    get_comment(pool, id).await
}

pub async fn delete_comment(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM review_comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
