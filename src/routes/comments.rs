//! # 리뷰 코멘트 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/articles/:id/comments` → 글의 코멘트 목록
//! - `POST   /api/v1/articles/:id/comments` → 코멘트 작성 (리뷰어/관리자)
//! - `PATCH  /api/v1/comments/:id`          → 처리 상태 변경 (작성 리뷰어/관리자)
//! - `DELETE /api/v1/comments/:id`          → 코멘트 삭제 (작성 리뷰어/관리자)

use crate::{
    db,
    error::AppError,
    middleware::auth::Actor,
    models::*,
    routes::articles::AppState,
    services,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    // 없는 글의 코멘트 조회는 빈 배열 대신 404
    db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let comments = db::list_comments(&state.pool, &id).await?;
    Ok(Json(json!({ "comments": comments })))
}

/// `POST /articles/:id/comments` — 리뷰어/관리자가 코멘트를 답니다.
///
/// 앵커가 있으면 현재 본문 길이(문자 단위)를 기준으로 검증합니다.
/// 검증 실패는 아무 레코드도 남기지 않습니다.
pub async fn add_comment(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<AddCommentRequest>,
) -> Result<Json<ReviewComment>, AppError> {
    if !actor.can_review() {
        return Err(AppError::Unauthorized(
            "only a reviewer or an admin may comment".to_string(),
        ));
    }

    let article = db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let content = services::read_content(&state.content_path, &article.file_path).await?;
    let content_len = services::count_chars(&content) as i64;

    let comment = db::create_comment(&state.pool, &id, &actor.id, &req, content_len).await?;
    Ok(Json(comment))
}

/// `PATCH /comments/:id` — 코멘트를 addressed/resolved로 표시합니다.
pub async fn update_comment_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<UpdateCommentStatusRequest>,
) -> Result<Json<ReviewComment>, AppError> {
    let comment = db::get_comment(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if comment.reviewer_id != actor.id && !actor.is_admin() {
        return Err(AppError::Unauthorized(
            "only the comment's author or an admin may update it".to_string(),
        ));
    }

    let comment = db::update_comment_status(&state.pool, &id, req.status)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let comment = db::get_comment(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if comment.reviewer_id != actor.id && !actor.is_admin() {
        return Err(AppError::Unauthorized(
            "only the comment's author or an admin may delete it".to_string(),
        ));
    }

    let deleted = db::delete_comment(&state.pool, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
