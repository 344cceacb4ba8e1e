//! # 추적 변경 / 평결 조회 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET  /api/v1/articles/:id/changes`   → 글의 제안 편집 목록
//! - `POST /api/v1/articles/:id/changes`   → 제안 편집 생성
//! - `POST /api/v1/changes/:id/decide`     → 승인/반려 결정 (리뷰어/관리자)
//! - `GET  /api/v1/articles/:id/decisions` → 글의 평결 이력

use crate::{
    db,
    error::AppError,
    middleware::auth::Actor,
    models::*,
    routes::articles::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

pub async fn list_changes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let changes = db::list_changes(&state.pool, &id).await?;
    Ok(Json(json!({ "changes": changes })))
}

/// `POST /articles/:id/changes` — 제안 편집을 생성합니다.
///
/// 참조하는 버전이 실재하고 이 글의 버전인지 확인한 뒤,
/// 종류별 텍스트 요구사항을 검증하여 `pending`으로 저장합니다.
pub async fn propose_change(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<ProposeChangeRequest>,
) -> Result<Json<TrackedChange>, AppError> {
    if !actor.can_review() {
        return Err(AppError::Unauthorized(
            "only a reviewer or an admin may propose a change".to_string(),
        ));
    }

    db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let version = db::get_version(&state.pool, &req.version_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if version.article_id != id {
        return Err(AppError::Validation(
            "version does not belong to this article".to_string(),
        ));
    }

    let change = db::create_change(&state.pool, &id, &req).await?;
    Ok(Json(change))
}

/// `POST /changes/:id/decide` — 제안 편집을 승인/반려합니다.
///
/// pending이 아닌 변경에 대한 두 번째 결정은 409 InvalidTransition입니다.
pub async fn decide_change(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
    Json(req): Json<DecideChangeRequest>,
) -> Result<Json<TrackedChange>, AppError> {
    if !actor.can_review() {
        return Err(AppError::Unauthorized(
            "only a reviewer or an admin may decide a change".to_string(),
        ));
    }

    let change =
        db::decide_change(&state.pool, &id, &actor.id, req.decision, req.reason.as_deref())
            .await?;

    tracing::info!("Change {} decided as {} by {}", id, change.status, actor.id);
    Ok(Json(change))
}

/// `GET /articles/:id/decisions` — 리뷰 평결 이력을 조회합니다.
pub async fn list_decisions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    db::get_article(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let decisions = db::list_decisions(&state.pool, &id).await?;
    Ok(Json(json!({ "decisions": decisions })))
}
