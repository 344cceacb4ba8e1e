//! # 워크플로우 전이 라우트 핸들러
//!
//! 글을 승인 파이프라인 위에서 움직이는 엔드포인트들입니다.
//! 모든 핸들러는 같은 모양을 갖습니다:
//!
//! 1. 글 스냅샷을 읽는다
//! 2. 순수 엔진(`workflow` 모듈)에 (스냅샷, 액터, 동작)을 넘겨 다음 상태를
//!    판정받는다 — 실패하면 그대로 타입 있는 에러로 응답
//! 3. 판정에 쓰인 상태를 기대값으로 하는 가드된 UPDATE로 영속화한다
//!    (그 사이 상태가 바뀌었으면 409 Conflict)
//!
//! ## 엔드포인트
//! - `POST /api/v1/articles/:id/submit`           → 작성자 제출
//! - `POST /api/v1/articles/:id/approve`          → 관리자 승인
//! - `POST /api/v1/articles/:id/reject`           → 관리자 반려 (사유 필수)
//! - `POST /api/v1/articles/:id/assign`           → 관리자 리뷰어 배정
//! - `POST /api/v1/articles/:id/review`           → 리뷰어 평결 제출
//! - `POST /api/v1/articles/:id/request-revision` → 작성자 재수정 요청
//! - `POST /api/v1/articles/:id/publish`          → 관리자 발행

use crate::{
    db,
    error::AppError,
    middleware::auth::Actor,
    models::*,
    routes::articles::AppState,
    workflow,
};
use axum::{
    extract::{Path, State},
    Json,
};

/// 판정이 끝난 전이를 영속화하고 갱신된 글을 반환합니다.
///
/// 엔진 판정과 UPDATE 사이에 다른 요청이 상태를 바꿨다면
/// 가드에 걸려 0행이 갱신되고, Conflict로 보고합니다.
async fn persist_transition(
    state: &AppState,
    article: &Article,
    next: ArticleStatus,
) -> Result<Json<Article>, AppError> {
    let applied = db::transition_status(&state.pool, &article.id, article.status, next).await?;
    if !applied {
        return Err(AppError::Conflict(
            "the article status changed while handling the request".to_string(),
        ));
    }

    tracing::info!(
        "Article {} transitioned {} -> {}",
        article.id,
        article.status,
        next
    );

    let article = db::get_article(&state.pool, &article.id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(article))
}

/// `POST /articles/:id/submit` — 작성자가 초안을 제출합니다.
pub async fn submit_article(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<Json<Article>, AppError> {
    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let next = workflow::submit(&article, &actor)?;
    persist_transition(&state, &article, next).await
}

/// `POST /articles/:id/approve` — 관리자가 제출된 글을 승인합니다.
pub async fn approve_article(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<Json<Article>, AppError> {
    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let next = workflow::approve(&article, &actor)?;
    persist_transition(&state, &article, next).await
}

/// `POST /articles/:id/reject` — 관리자가 제출된 글을 반려합니다.
/// 비어 있지 않은 사유(reason)가 필요합니다.
pub async fn reject_article(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<Article>, AppError> {
    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let next = workflow::reject(&article, &actor, &req.reason)?;
    persist_transition(&state, &article, next).await
}

/// `POST /articles/:id/assign` — 관리자가 리뷰어를 배정합니다.
/// 상태 전이(under_review)와 reviewer_id 기록이 한 UPDATE로 수행됩니다.
pub async fn assign_reviewer(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<AssignReviewerRequest>,
) -> Result<Json<Article>, AppError> {
    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    workflow::assign_reviewer(&article, &actor)?;

    let applied =
        db::assign_reviewer(&state.pool, &id, article.status, &req.reviewer_id).await?;
    if !applied {
        return Err(AppError::Conflict(
            "the article status changed while handling the request".to_string(),
        ));
    }

    tracing::info!("Article {} assigned to reviewer {}", id, req.reviewer_id);

    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(article))
}

/// `POST /articles/:id/review` — 배정된 리뷰어(또는 관리자)가 평결을 제출합니다.
///
/// 평결 레코드(ReviewDecision)와 상태 전이는 한 트랜잭션으로 기록됩니다.
/// 가드에 걸리거나 검증에 실패하면 레코드도, 상태도 남지 않습니다.
pub async fn submit_review(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<SubmitReviewRequest>,
) -> Result<Json<Article>, AppError> {
    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    // 엔진이 권한/상태/피드백 길이를 모두 판정한 다음에만 기록을 시작합니다.
    let next = workflow::submit_review(&article, &actor, req.decision, &req.feedback)?;

    let applied = db::transition_with_decision(
        &state.pool,
        &id,
        article.status,
        next,
        &actor.id,
        req.decision,
        &req.feedback,
    )
    .await?;
    if !applied {
        return Err(AppError::Conflict(
            "the article status changed while handling the request".to_string(),
        ));
    }

    tracing::info!(
        "Article {} transitioned {} -> {}",
        article.id,
        article.status,
        next
    );

    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(article))
}

/// `POST /articles/:id/request-revision` — 반려된 글의 작성자가
/// 재수정을 요청합니다. 이후 본문을 편집하고 다시 제출할 수 있습니다.
pub async fn request_revision(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<Article>, AppError> {
    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let next = workflow::request_revision(&article, &actor, &req.reason)?;
    persist_transition(&state, &article, next).await
}

/// `POST /articles/:id/publish` — 관리자가 승인된 글을 발행합니다.
pub async fn publish_article(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<Json<Article>, AppError> {
    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let next = workflow::publish(&article, &actor)?;
    persist_transition(&state, &article, next).await
}
