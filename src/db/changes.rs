//! # 추적 변경(TrackedChange) 쿼리 모듈
//!
//! 제안 편집의 생성과 승인/반려 결정을 담습니다.
//! 결정은 `WHERE status = 'pending'` 가드로 정확히 한 번만 적용됩니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 종류별 텍스트 요구사항:
/// delete/modify는 old_text, add/modify는 new_text가 비어 있지 않아야 합니다.
fn validate_change(req: &ProposeChangeRequest) -> Result<(), AppError> {
    let has_old = req.old_text.as_deref().is_some_and(|t| !t.is_empty());
    let has_new = req.new_text.as_deref().is_some_and(|t| !t.is_empty());

    match req.change_type {
        ChangeType::Add if !has_new => Err(AppError::Validation(
            "new_text is required for an 'add' change".to_string(),
        )),
        ChangeType::Delete if !has_old => Err(AppError::Validation(
            "old_text is required for a 'delete' change".to_string(),
        )),
        ChangeType::Modify if !has_old || !has_new => Err(AppError::Validation(
            "old_text and new_text are both required for a 'modify' change".to_string(),
        )),
        _ => Ok(()),
    }
}

/// 검증 후 `pending` 상태로 제안 편집을 저장합니다.
pub async fn create_change(
    pool: &SqlitePool,
    article_id: &str,
    req: &ProposeChangeRequest,
) -> Result<TrackedChange, AppError> {
    validate_change(req)?;

    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO tracked_changes
            (id, article_id, version_id, change_type, old_text, new_text, position)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(article_id)
    .bind(&req.version_id)
    .bind(req.change_type)
    .bind(&req.old_text)
    .bind(&req.new_text)
    .bind(req.position.unwrap_or(0))
    .execute(pool)
    .await?;

    get_change(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created change".to_string()))
}

pub async fn get_change(pool: &SqlitePool, id: &str) -> Result<Option<TrackedChange>, AppError> {
    let change = sqlx::query_as::<_, TrackedChange>(
        r#"
        SELECT id, article_id, version_id, change_type, old_text, new_text, position,
               status, decided_by, decided_at, decision_reason, created_at
        FROM tracked_changes
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(change)
}

pub async fn list_changes(
    pool: &SqlitePool,
    article_id: &str,
) -> Result<Vec<TrackedChange>, AppError> {
    let changes = sqlx::query_as::<_, TrackedChange>(
        r#"
        SELECT id, article_id, version_id, change_type, old_text, new_text, position,
               status, decided_by, decided_at, decision_reason, created_at
        FROM tracked_changes
        WHERE article_id = ?
        ORDER BY position, created_at
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?;

    Ok(changes)
}

/// 제안 편집을 승인 또는 반려합니다. pending이 아닌 변경에 대한
/// 두 번째 결정은 `InvalidTransition`입니다 (재오픈 없음).
pub async fn decide_change(
    pool: &SqlitePool,
    id: &str,
    decided_by: &str,
    decision: ChangeStatus,
    reason: Option<&str>,
) -> Result<TrackedChange, AppError> {
    if decision == ChangeStatus::Pending {
        return Err(AppError::Validation(
            "a change decision must be 'approved' or 'rejected'".to_string(),
        ));
    }

    let result = sqlx::query(
        r#"
        UPDATE tracked_changes
        SET status = ?, decided_by = ?, decision_reason = ?,
            decided_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(decision)
    .bind(decided_by)
    .bind(reason)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        // 가드에 걸린 이유를 구분: 없는 변경이면 404, 이미 결정됐으면 409
        return match get_change(pool, id).await? {
            Some(change) => Err(AppError::InvalidTransition(format!(
                "change is already {}",
                change.status
            ))),
            None => Err(AppError::NotFound),
        };
    }

    get_change(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve decided change".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, testing};

    fn request(
        version_id: &str,
        change_type: ChangeType,
        old_text: Option<&str>,
        new_text: Option<&str>,
    ) -> ProposeChangeRequest {
        ProposeChangeRequest {
            version_id: version_id.to_string(),
            change_type,
            old_text: old_text.map(String::from),
            new_text: new_text.map(String::from),
            position: Some(0),
        }
    }

    async fn seed_with_version(pool: &SqlitePool) -> (String, String) {
        let article = testing::seed_article(pool, "author-1").await;
        let version_id = db::insert_version(pool, &article.id, 1, "첫 번째 초안", 3, 6)
            .await
            .unwrap();
        (article.id, version_id)
    }

    #[tokio::test]
    async fn text_requirements_follow_change_type() {
        let pool = testing::setup_pool().await;
        let (article_id, version_id) = seed_with_version(&pool).await;

        let err = create_change(&pool, &article_id, &request(&version_id, ChangeType::Add, None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = create_change(
            &pool,
            &article_id,
            &request(&version_id, ChangeType::Delete, Some(""), None),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = create_change(
            &pool,
            &article_id,
            &request(&version_id, ChangeType::Modify, Some("old"), None),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert!(list_changes(&pool, &article_id).await.unwrap().is_empty());

        let change = create_change(
            &pool,
            &article_id,
            &request(&version_id, ChangeType::Modify, Some("old"), Some("new")),
        )
        .await
        .unwrap();
        assert_eq!(change.status, ChangeStatus::Pending);
    }

    #[tokio::test]
    async fn decision_applies_exactly_once() {
        let pool = testing::setup_pool().await;
        let (article_id, version_id) = seed_with_version(&pool).await;

        let change = create_change(
            &pool,
            &article_id,
            &request(&version_id, ChangeType::Add, None, Some("추가 문장")),
        )
        .await
        .unwrap();

        let decided = decide_change(&pool, &change.id, "admin-1", ChangeStatus::Approved, None)
            .await
            .unwrap();
        assert_eq!(decided.status, ChangeStatus::Approved);
        assert_eq!(decided.decided_by.as_deref(), Some("admin-1"));
        assert!(decided.decided_at.is_some());

        // 두 번째 결정은 상태와 무관하게 거부
        let err = decide_change(&pool, &change.id, "admin-1", ChangeStatus::Rejected, Some("늦음"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));

        let unchanged = get_change(&pool, &change.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, ChangeStatus::Approved);
    }

    #[tokio::test]
    async fn deciding_back_to_pending_is_rejected() {
        let pool = testing::setup_pool().await;
        let (article_id, version_id) = seed_with_version(&pool).await;

        let change = create_change(
            &pool,
            &article_id,
            &request(&version_id, ChangeType::Delete, Some("빼기"), None),
        )
        .await
        .unwrap();

        let err = decide_change(&pool, &change.id, "admin-1", ChangeStatus::Pending, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn deciding_unknown_change_is_not_found() {
        let pool = testing::setup_pool().await;

        let err = decide_change(&pool, "no-such-id", "admin-1", ChangeStatus::Approved, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
