//! # 글(Article) 데이터베이스 쿼리 모듈
//!
//! `articles` 테이블의 CRUD와, 워크플로우 엔진이 결정한 상태 전이를
//! 영속화하는 가드된 UPDATE들을 담습니다.
//!
//! 상태를 쓰는 쿼리는 모두 `WHERE id = ? AND status = ?` 형태로
//! 읽은 시점의 상태를 함께 검사합니다. 경쟁하는 전이 요청이 있으면
//! 늦게 도착한 쪽의 rows_affected가 0이 되어 깨끗하게 집니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::{Sqlite, SqlitePool};

pub async fn list_articles(pool: &SqlitePool) -> Result<Vec<Article>, AppError> {
    let articles = sqlx::query_as::<_, Article>(
        r#"
        SELECT id, title, slug, file_path, status, version, author_id, reviewer_id,
               word_count, char_count, created_at, updated_at
        FROM articles
        ORDER BY updated_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(articles)
}

pub async fn get_article(pool: &SqlitePool, id: &str) -> Result<Option<Article>, AppError> {
    let article = sqlx::query_as::<_, Article>(
        r#"
        SELECT id, title, slug, file_path, status, version, author_id, reviewer_id,
               word_count, char_count, created_at, updated_at
        FROM articles
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(article)
}

/// 새 글 INSERT (`draft` 상태, 버전 1). 초기 버전 스냅샷과 한 트랜잭션으로
/// 묶을 수 있도록 Executor를 받습니다.
pub async fn insert_article<'e, E>(
    executor: E,
    id: &str,
    title: &str,
    slug: &str,
    file_path: &str,
    author_id: &str,
) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO articles (id, title, slug, file_path, author_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(slug)
    .bind(file_path)
    .bind(author_id)
    .execute(executor)
    .await?;

    Ok(())
}

/// 새 글을 `draft` 상태, 버전 1로 생성합니다.
pub async fn create_article(
    pool: &SqlitePool,
    id: &str,
    title: &str,
    slug: &str,
    file_path: &str,
    author_id: &str,
) -> Result<Article, AppError> {
    insert_article(pool, id, title, slug, file_path, author_id).await?;

    get_article(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created article".to_string()))
}

/// 글 메타데이터 수정 (제목만 — 본문은 content 엔드포인트가 담당).
pub async fn update_article(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateArticleRequest,
) -> Result<Option<Article>, AppError> {
    let article = get_article(pool, id).await?;
    if article.is_none() {
        return Ok(None);
    }

    if let Some(title) = &req.title {
        sqlx::query(
            r#"
            UPDATE articles
            SET title = ?, slug = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(slug::slugify(title))
        .bind(id)
        .execute(pool)
        .await?;
    }

    get_article(pool, id).await
}

/// 워크플로우 엔진이 결정한 상태 전이를 영속화합니다.
///
/// `expected`: 엔진이 판정에 사용한 (호출자가 읽은) 현재 상태.
/// 그 사이 다른 요청이 상태를 바꿨다면 0행이 갱신되고 false를 반환합니다.
pub async fn transition_status(
    pool: &SqlitePool,
    id: &str,
    expected: ArticleStatus,
    next: ArticleStatus,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE articles
        SET status = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(next)
    .bind(id)
    .bind(expected)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 리뷰어 배정: under_review 전이와 reviewer_id 기록을 한 문장으로 수행합니다.
pub async fn assign_reviewer(
    pool: &SqlitePool,
    id: &str,
    expected: ArticleStatus,
    reviewer_id: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE articles
        SET status = ?, reviewer_id = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(ArticleStatus::UnderReview)
    .bind(reviewer_id)
    .bind(id)
    .bind(expected)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 리뷰 평결 기록과 상태 전이를 한 트랜잭션으로 수행합니다.
///
/// 가드에 걸리면(그 사이 다른 요청이 상태를 바꿈) 아무것도 기록하지 않고
/// false를 반환합니다. 전이 없는 평결 레코드 같은 부분 적용이 남을 수 없습니다.
pub async fn transition_with_decision(
    pool: &SqlitePool,
    id: &str,
    expected: ArticleStatus,
    next: ArticleStatus,
    reviewer_id: &str,
    decision: ReviewVerdict,
    feedback: &str,
) -> Result<bool, AppError> {
    super::decisions::validate_feedback(decision, feedback)?;

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE articles
        SET status = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(next)
    .bind(id)
    .bind(expected)
    .execute(&mut *tx)
    .await?;

    // 가드에 걸리면 tx가 드롭되며 롤백됨
    if result.rows_affected() == 0 {
        return Ok(false);
    }

    super::decisions::insert_decision(&mut *tx, id, reviewer_id, decision, feedback).await?;
    tx.commit().await?;

    Ok(true)
}

/// 본문 수정에 따른 버전 증가 (낙관적 동시성 검사 포함).
///
/// `WHERE version = ?`가 호출자의 expected_version을 검사합니다.
/// 0행 갱신이면 그 사이 다른 수정이 끼어든 것이므로 호출자는
/// Conflict로 보고해야 합니다 (글 자체가 없는 경우는 미리 조회로 걸러짐).
/// 새 버전 스냅샷과 한 트랜잭션으로 묶을 수 있도록 Executor를 받습니다.
pub async fn bump_version<'e, E>(
    executor: E,
    id: &str,
    expected_version: i64,
    word_count: i64,
    char_count: i64,
) -> Result<bool, AppError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE articles
        SET version = version + 1, word_count = ?, char_count = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND version = ?
        "#,
    )
    .bind(word_count)
    .bind(char_count)
    .bind(id)
    .bind(expected_version)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 글과 모든 자식 레코드(평결, 추적 변경, 코멘트, 버전)를
/// 하나의 트랜잭션에서 명시적으로 삭제합니다.
///
/// 스키마의 CASCADE에 기대지 않고 애플리케이션 계약으로 유지합니다.
pub async fn delete_article_cascade(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM review_decisions WHERE article_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM tracked_changes WHERE article_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM review_comments WHERE article_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM article_versions WHERE article_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, testing};
    use crate::middleware::auth::{Actor, Role};
    use crate::models::{AddCommentRequest, ReviewVerdict};
    use crate::workflow;

    fn actor(id: &str, role: Role) -> Actor {
        Actor {
            id: id.to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn create_and_get_roundtrip() {
        let pool = testing::setup_pool().await;
        let article = testing::seed_article(&pool, "author-1").await;

        assert_eq!(article.status, ArticleStatus::Draft);
        assert_eq!(article.version, 1);
        assert_eq!(article.reviewer_id, None);

        let fetched = get_article(&pool, &article.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, article.id);
        assert_eq!(fetched.author_id, "author-1");
    }

    #[tokio::test]
    async fn bump_version_increments_by_exactly_one() {
        let pool = testing::setup_pool().await;
        let article = testing::seed_article(&pool, "author-1").await;

        assert!(bump_version(&pool, &article.id, 1, 2, 10).await.unwrap());
        let article = get_article(&pool, &article.id).await.unwrap().unwrap();
        assert_eq!(article.version, 2);

        assert!(bump_version(&pool, &article.id, 2, 3, 15).await.unwrap());
        let article = get_article(&pool, &article.id).await.unwrap().unwrap();
        assert_eq!(article.version, 3);
    }

    #[tokio::test]
    async fn stale_expected_version_is_rejected_without_effect() {
        let pool = testing::setup_pool().await;
        let article = testing::seed_article(&pool, "author-1").await;

        // 다른 호출자가 이미 버전을 올렸다고 가정
        assert!(bump_version(&pool, &article.id, 1, 1, 1).await.unwrap());

        // 버전 1을 기대한 수정은 거절되고 아무것도 바뀌지 않아야 함
        assert!(!bump_version(&pool, &article.id, 1, 99, 99).await.unwrap());
        let article = get_article(&pool, &article.id).await.unwrap().unwrap();
        assert_eq!(article.version, 2);
        assert_ne!(article.word_count, 99);
    }

    #[tokio::test]
    async fn guarded_transition_loses_cleanly_on_stale_status() {
        let pool = testing::setup_pool().await;
        let article = testing::seed_article(&pool, "author-1").await;

        assert!(
            transition_status(&pool, &article.id, ArticleStatus::Draft, ArticleStatus::Submitted)
                .await
                .unwrap()
        );

        // 같은 기대 상태(draft)로 경쟁한 두 번째 전이는 가드에 걸림
        assert!(
            !transition_status(&pool, &article.id, ArticleStatus::Draft, ArticleStatus::Submitted)
                .await
                .unwrap()
        );

        let article = get_article(&pool, &article.id).await.unwrap().unwrap();
        assert_eq!(article.status, ArticleStatus::Submitted);
    }

    #[tokio::test]
    async fn cascade_delete_removes_all_child_records() {
        let pool = testing::setup_pool().await;
        let article = testing::seed_article(&pool, "author-1").await;

        let version_id = db::insert_version(&pool, &article.id, 1, "hello world", 2, 11)
            .await
            .unwrap();
        let comment_req = AddCommentRequest {
            body: "A general comment".to_string(),
            selected_text: None,
            start_offset: None,
            end_offset: None,
            color: None,
        };
        db::create_comment(&pool, &article.id, "reviewer-1", &comment_req, 11)
            .await
            .unwrap();
        let change_req = crate::models::ProposeChangeRequest {
            version_id,
            change_type: crate::models::ChangeType::Add,
            old_text: None,
            new_text: Some("world".to_string()),
            position: Some(1),
        };
        db::create_change(&pool, &article.id, &change_req).await.unwrap();
        crate::db::decisions::insert_decision(
            &pool,
            &article.id,
            "reviewer-1",
            ReviewVerdict::Accept,
            "fine",
        )
        .await
        .unwrap();

        assert!(delete_article_cascade(&pool, &article.id).await.unwrap());

        assert!(get_article(&pool, &article.id).await.unwrap().is_none());
        assert!(db::list_versions(&pool, &article.id).await.unwrap().is_empty());
        assert!(db::list_comments(&pool, &article.id).await.unwrap().is_empty());
        assert!(db::list_changes(&pool, &article.id).await.unwrap().is_empty());
        assert!(db::list_decisions(&pool, &article.id).await.unwrap().is_empty());
    }

    /// 전체 파이프라인 시나리오:
    /// draft → submit → approve → assign → 리뷰어 reject, 평결 레코드 확인
    #[tokio::test]
    async fn full_review_pipeline() {
        let pool = testing::setup_pool().await;
        let author = actor("author-x", Role::Author);
        let admin = actor("admin-1", Role::Admin);

        let article = testing::seed_article(&pool, &author.id).await;

        // 작성자 제출
        let next = workflow::submit(&article, &author).unwrap();
        assert!(transition_status(&pool, &article.id, article.status, next).await.unwrap());
        let article = get_article(&pool, &article.id).await.unwrap().unwrap();
        assert_eq!(article.status, ArticleStatus::Submitted);

        // 관리자 승인
        let next = workflow::approve(&article, &admin).unwrap();
        assert!(transition_status(&pool, &article.id, article.status, next).await.unwrap());
        let article = get_article(&pool, &article.id).await.unwrap().unwrap();
        assert_eq!(article.status, ArticleStatus::Approved);

        // 관리자가 리뷰어 배정
        workflow::assign_reviewer(&article, &admin).unwrap();
        assert!(assign_reviewer(&pool, &article.id, article.status, "reviewer-y").await.unwrap());
        let article = get_article(&pool, &article.id).await.unwrap().unwrap();
        assert_eq!(article.status, ArticleStatus::UnderReview);
        assert_eq!(article.reviewer_id.as_deref(), Some("reviewer-y"));

        // 배정된 리뷰어가 반려 평결 제출 (평결 기록과 전이는 한 트랜잭션)
        let reviewer = actor("reviewer-y", Role::Reviewer);
        let feedback = "Needs more citations and data.";
        let next =
            workflow::submit_review(&article, &reviewer, ReviewVerdict::Reject, feedback).unwrap();
        assert!(transition_with_decision(
            &pool,
            &article.id,
            article.status,
            next,
            &reviewer.id,
            ReviewVerdict::Reject,
            feedback
        )
        .await
        .unwrap());

        let article = get_article(&pool, &article.id).await.unwrap().unwrap();
        assert_eq!(article.status, ArticleStatus::Rejected);

        let decisions = db::list_decisions(&pool, &article.id).await.unwrap();
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].decision, ReviewVerdict::Reject);
        assert_eq!(decisions[0].feedback, feedback);

        // 작성자 복구 경로: 재수정 요청 후 재제출 가능
        let next = workflow::request_revision(&article, &author, "Will fix citations").unwrap();
        assert!(transition_status(&pool, &article.id, article.status, next).await.unwrap());
        let article = get_article(&pool, &article.id).await.unwrap().unwrap();
        assert_eq!(article.status, ArticleStatus::RevisionRequested);
        assert!(workflow::check_edit(&article, &author).is_ok());
    }

    #[tokio::test]
    async fn decision_and_transition_commit_together() {
        let pool = testing::setup_pool().await;
        let article = testing::seed_article(&pool, "author-1").await;

        transition_status(&pool, &article.id, ArticleStatus::Draft, ArticleStatus::Submitted)
            .await
            .unwrap();
        assign_reviewer(&pool, &article.id, ArticleStatus::Submitted, "reviewer-1")
            .await
            .unwrap();

        let applied = transition_with_decision(
            &pool,
            &article.id,
            ArticleStatus::UnderReview,
            ArticleStatus::Approved,
            "reviewer-1",
            ReviewVerdict::Accept,
            "",
        )
        .await
        .unwrap();
        assert!(applied);

        let article = get_article(&pool, &article.id).await.unwrap().unwrap();
        assert_eq!(article.status, ArticleStatus::Approved);
        assert_eq!(db::list_decisions(&pool, &article.id).await.unwrap().len(), 1);
    }

    /// 평결을 제출하는 사이 경쟁하는 전이가 상태를 옮긴 경우:
    /// 가드에 걸려 전이도, 평결 레코드도 남지 않아야 한다.
    #[tokio::test]
    async fn lost_status_race_records_no_decision() {
        let pool = testing::setup_pool().await;
        let article = testing::seed_article(&pool, "author-1").await;

        transition_status(&pool, &article.id, ArticleStatus::Draft, ArticleStatus::Submitted)
            .await
            .unwrap();
        assign_reviewer(&pool, &article.id, ArticleStatus::Submitted, "reviewer-1")
            .await
            .unwrap();

        // 경쟁 요청이 먼저 accept로 전이를 끝냄
        assert!(transition_status(
            &pool,
            &article.id,
            ArticleStatus::UnderReview,
            ArticleStatus::Approved
        )
        .await
        .unwrap());

        // under_review 스냅샷을 들고 있던 쪽의 반려 평결은 가드에 걸림
        let applied = transition_with_decision(
            &pool,
            &article.id,
            ArticleStatus::UnderReview,
            ArticleStatus::Rejected,
            "reviewer-1",
            ReviewVerdict::Reject,
            "Needs more citations.",
        )
        .await
        .unwrap();
        assert!(!applied);

        let article = get_article(&pool, &article.id).await.unwrap().unwrap();
        assert_eq!(article.status, ArticleStatus::Approved);
        assert!(db::list_decisions(&pool, &article.id).await.unwrap().is_empty());
    }

    /// 버전 증가와 스냅샷 INSERT는 커밋 전에 실패하면 함께 사라져야 한다.
    /// (본문 파일 쓰기가 실패한 편집 경로가 tx를 커밋하지 않는 경우에 해당)
    #[tokio::test]
    async fn uncommitted_edit_rolls_back_version_and_snapshot() {
        let pool = testing::setup_pool().await;
        let article = testing::seed_article(&pool, "author-1").await;

        let mut tx = pool.begin().await.unwrap();
        assert!(bump_version(&mut *tx, &article.id, 1, 2, 9).await.unwrap());
        db::insert_version(&mut *tx, &article.id, 2, "new state", 2, 9)
            .await
            .unwrap();
        drop(tx); // 커밋 없이 종료 → 롤백

        let article = get_article(&pool, &article.id).await.unwrap().unwrap();
        assert_eq!(article.version, 1);
        assert!(db::list_versions(&pool, &article.id).await.unwrap().is_empty());
    }
}
