//! # 리뷰 평결(ReviewDecision) 쿼리 모듈
//!
//! 평결은 상태 전이와 함께 `db::articles::transition_with_decision`이
//! 한 트랜잭션으로 기록합니다. 생성 후에는 수정 경로가 없습니다 (불변 레코드).

use crate::error::AppError;
use crate::models::*;
use crate::workflow::MIN_FEEDBACK_LEN;
use sqlx::{Sqlite, SqlitePool};

/// 저장 경계의 피드백 길이 검사. 워크플로우 엔진이 이미 검사했지만,
/// 이 모듈을 다른 경로로 호출해도 잘못된 레코드가 들어갈 수 없게 합니다.
pub(super) fn validate_feedback(decision: ReviewVerdict, feedback: &str) -> Result<(), AppError> {
    if matches!(decision, ReviewVerdict::Reject | ReviewVerdict::RequestRevision)
        && feedback.chars().count() < MIN_FEEDBACK_LEN
    {
        return Err(AppError::Validation(format!(
            "feedback must be at least {MIN_FEEDBACK_LEN} characters for this decision"
        )));
    }
    Ok(())
}

/// 평결 레코드 INSERT. 상태 전이와 한 트랜잭션으로 묶을 수 있도록
/// Executor를 받습니다.
pub(super) async fn insert_decision<'e, E>(
    executor: E,
    article_id: &str,
    reviewer_id: &str,
    decision: ReviewVerdict,
    feedback: &str,
) -> Result<String, AppError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO review_decisions (id, article_id, reviewer_id, decision, feedback)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(article_id)
    .bind(reviewer_id)
    .bind(decision)
    .bind(feedback)
    .execute(executor)
    .await?;

    Ok(id)
}

pub async fn list_decisions(
    pool: &SqlitePool,
    article_id: &str,
) -> Result<Vec<ReviewDecision>, AppError> {
    let decisions = sqlx::query_as::<_, ReviewDecision>(
        r#"
        SELECT id, article_id, reviewer_id, decision, feedback, created_at
        FROM review_decisions
        WHERE article_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?;

    Ok(decisions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;

    #[test]
    fn short_feedback_fails_the_storage_boundary_check() {
        assert!(matches!(
            validate_feedback(ReviewVerdict::Reject, "too thin").unwrap_err(),
            AppError::Validation(_)
        ));
        assert!(matches!(
            validate_feedback(ReviewVerdict::RequestRevision, "short").unwrap_err(),
            AppError::Validation(_)
        ));
        // accept에는 피드백 길이 제한이 없음
        assert!(validate_feedback(ReviewVerdict::Accept, "").is_ok());
    }

    #[tokio::test]
    async fn recorded_decisions_are_listed_for_the_article() {
        let pool = testing::setup_pool().await;
        let article = testing::seed_article(&pool, "author-1").await;

        insert_decision(&pool, &article.id, "reviewer-1", ReviewVerdict::Accept, "")
            .await
            .unwrap();

        let listed = list_decisions(&pool, &article.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].decision, ReviewVerdict::Accept);
        assert_eq!(listed[0].reviewer_id, "reviewer-1");
    }
}
